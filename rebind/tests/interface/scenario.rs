use pretty_assertions::assert_eq;
use rebind::{args, Error, Object, Session, Subject, Value};

#[test]
fn doubling_an_undefined_selector() {
    let session = Session::new();
    let obj = Object::new("obj");
    assert!(!obj.responds_to("total"));

    session.stub(&obj, "total").with_any_args().returns(42);

    assert_eq!(Value::Int(42), obj.send("total", args![1, 2]).unwrap());
    assert_eq!(Value::Int(42), obj.send("total", ()).unwrap());

    session.verify_all().unwrap();

    assert!(!obj.responds_to("total"));
    assert!(matches!(obj.send("total", ()), Err(Error::NoMethod { .. })));
}

#[test]
fn unmatched_invocation_names_both_patterns() {
    let session = Session::new();
    let obj = Object::new("obj");

    session.mock(&obj, "fuu").with_args(args!["x"]).never();

    let err = obj.send("fuu", args!["y"]).unwrap_err();
    let Error::UnmatchedInvocation {
        selector,
        args,
        expectations,
        ..
    } = &err
    else {
        panic!("unexpected error: {err}");
    };

    assert_eq!("fuu", selector.as_str());
    assert_eq!(r#"("y")"#, args);
    assert_eq!(&vec![r#"fuu("x")"#.to_string()], expectations);
    assert!(err.to_string().contains(r#"received fuu("y")"#), "{err}");

    session.verify_all().unwrap();
}

#[test]
fn dispatch_order() {
    let session = Session::new();
    let obj = Object::new("obj");

    let d1 = session.mock(&obj, "fuu").with_args(args![1, 2]).returns("d1").register();
    let d2 = session.stub(&obj, "fuu").returns("d2").register();

    let answers = (0..3)
        .map(|_| obj.send("fuu", args![1, 2]).unwrap())
        .collect::<Vec<_>>();

    assert_eq!(
        vec![Value::from("d1"), Value::from("d2"), Value::from("d2")],
        answers
    );
    assert_eq!(1, d1.call_count());
    assert_eq!(2, d2.call_count());

    session.verify_all().unwrap();
}
