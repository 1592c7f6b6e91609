use rebind::{args, Block, Error, Invocation, Object, Session, Subject, Value};

#[test]
fn nil_by_default() {
    let session = Session::new();
    let obj = Object::new("obj");

    session.stub(&obj, "fuu");

    assert_eq!(Value::Nil, obj.send("fuu", ()).unwrap());
    session.verify_all().unwrap();
}

#[test]
fn same_value_on_every_call() {
    let session = Session::new();
    let obj = Object::new("obj");

    session
        .stub(&obj, "list")
        .returns(vec![Value::from(1), Value::from("two")]);

    for _ in 0..3 {
        let ret = obj.send("list", ()).unwrap();

        assert_eq!(Some(&[Value::Int(1), Value::from("two")][..]), ret.as_list());
    }

    session.verify_all().unwrap();
}

#[test]
fn callback_receives_the_arguments_and_the_block() {
    let session = Session::new();
    let obj = Object::new("obj");

    session.stub(&obj, "each").returning(|inv| {
        let block = inv.block.as_ref().ok_or_else(|| Error::raised("no block given"))?;
        let values = inv
            .args
            .positional
            .iter()
            .map(|v| block.call(std::slice::from_ref(v)))
            .collect::<Vec<_>>();

        Ok(Value::from(values))
    });

    let invocation = Invocation::new(args![1, 2, 3]).with_block(Block::new(|values| {
        Value::Int(values[0].as_int().unwrap_or_default() * 10)
    }));

    assert_eq!(
        Value::from(vec![10, 20, 30]),
        obj.send("each", invocation).unwrap()
    );

    let err = obj.send("each", args![1]).unwrap_err();
    assert_eq!("no block given", err.to_string());

    session.verify_all().unwrap();
}

#[test]
fn later_declarations_take_over_exhausted_ones() {
    let session = Session::new();
    let obj = Object::new("obj");

    session.mock(&obj, "next").returns(1);
    session.mock(&obj, "next").returns(2);
    session.mock(&obj, "next").returns(3);

    let values = (0..3)
        .map(|_| obj.send("next", ()).unwrap())
        .collect::<Vec<_>>();

    assert_eq!(vec![Value::Int(1), Value::Int(2), Value::Int(3)], values);
    session.verify_all().unwrap();
}
