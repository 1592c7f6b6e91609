use rebind::{args, Error, Object, Session, Subject, Value};

#[test]
fn probe_leaves_real_behaviour_unchanged() {
    let session = Session::new();
    let obj = Object::new("obj");
    obj.define("add", |inv| {
        let a = inv.args.get(0).and_then(Value::as_int).unwrap_or_default();
        let b = inv.args.get(1).and_then(Value::as_int).unwrap_or_default();

        Ok(Value::Int(a + b))
    });

    let probe = session.probe(&obj, "add").at_least(1).register();

    assert_eq!(Value::Int(3), obj.send("add", args![1, 2]).unwrap());
    assert_eq!(Value::Int(7), obj.send("add", args![3, 4]).unwrap());
    assert_eq!(2, probe.call_count());

    session.verify_all().unwrap();
}

#[test]
fn errors_of_the_original_are_propagated() {
    let session = Session::new();
    let obj = Object::new("obj");
    obj.define("save", |_| Err(Error::raised("disk full")));

    session.probe(&obj, "save");

    let err = obj.send("save", ()).unwrap_err();
    assert!(matches!(&err, Error::Raised(msg) if msg == "disk full"));

    session.verify_all().unwrap();
}

#[test]
fn forward_then_rewrites_the_result() {
    let session = Session::new();
    let obj = Object::new("obj");
    obj.define("name", |_| Ok(Value::from("rebind")));

    session
        .probe(&obj, "name")
        .forward_then(|ret| Ok(Value::from(format!("<{}>", ret.as_str().unwrap_or_default()))));

    assert_eq!(Value::from("<rebind>"), obj.send("name", ()).unwrap());
    session.verify_all().unwrap();
}

#[test]
fn forwarding_without_original_fails() {
    let session = Session::new();
    let obj = Object::new("obj");

    session.stub(&obj, "missing").forwards();

    let err = obj.send("missing", ()).unwrap_err();
    assert!(matches!(err, Error::NoMethod { .. }), "{err}");

    session.verify_all().unwrap();
}
