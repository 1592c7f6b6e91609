use rebind::{mock, probe, stub, LocalSession, Object, Session, Subject, Value};

#[test]
fn free_functions_declare_on_the_local_session() {
    let local = LocalSession::new();
    let obj = Object::new("obj");
    obj.define("real", |_| Ok(Value::from("real")));

    mock(&obj, "fuu").returns(1);
    stub(&obj, "bar");
    probe(&obj, "real");

    assert!(local.is_doubled(obj.subject_id(), "fuu"));
    assert!(!Session::global().is_doubled(obj.subject_id(), "fuu"));

    assert_eq!(Value::Int(1), obj.send("fuu", ()).unwrap());
    assert_eq!(Value::from("real"), obj.send("real", ()).unwrap());

    local.verify_all().unwrap();
    assert!(!obj.responds_to("fuu"));
}

#[test]
fn sessions_of_other_threads_are_separate() {
    let local = LocalSession::new();
    let obj = Object::new("obj");

    let remote = obj.clone();
    std::thread::spawn(move || {
        let local = LocalSession::new();
        stub(&remote, "fuu").returns("remote");

        assert_eq!(1, local.registry().len());
        local.reset_all();
    })
    .join()
    .unwrap();

    assert!(local.registry().is_empty());
    assert!(!obj.responds_to("fuu"));
}
