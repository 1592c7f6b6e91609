use pretty_assertions::assert_eq;
use rebind::matcher::{
    any, closure, eq, is_a, multi, no_args, one_of, str_starts_with,
};
use rebind::{args, Args, Error, Object, Session, Subject, Value, ValueKind};

#[test]
fn positional_and_keyword_sub_matchers() {
    let session = Session::new();
    let obj = Object::new("obj");

    let double = session
        .mock(&obj, "create")
        .with(
            multi((str_starts_with("user_"), is_a(ValueKind::Int)))
                .keyword("role", one_of(["admin", "guest"])),
        )
        .times(2)
        .returns(true)
        .register();

    assert_eq!(
        r#"starts_with("user_"), is_a(Int), role: one_of(["admin", "guest"])"#,
        double.expectation()
    );

    let call = |name: &str, age: i64, role: &str| {
        obj.send("create", args![name, age].kwarg("role", role))
    };

    assert_eq!(Value::Bool(true), call("user_a", 30, "admin").unwrap());
    assert_eq!(Value::Bool(true), call("user_b", 40, "guest").unwrap());
    assert!(matches!(
        call("admin", 30, "admin"),
        Err(Error::UnmatchedInvocation { .. })
    ));
    assert!(matches!(
        call("user_c", 30, "root"),
        Err(Error::UnmatchedInvocation { .. })
    ));
    assert!(matches!(
        obj.send("create", args!["user_d", 1]),
        Err(Error::UnmatchedInvocation { .. })
    ));

    session.verify_all().unwrap();
}

#[test]
fn argument_count_must_match() {
    let session = Session::new();
    let obj = Object::new("obj");

    session.stub(&obj, "fuu").with(multi((eq(1), any())));
    session.stub(&obj, "bar").with_no_args();

    assert!(obj.send("fuu", args![1, "x"]).is_ok());
    assert!(obj.send("fuu", args![1]).is_err());
    assert!(obj.send("fuu", args![1, 2, 3]).is_err());

    assert!(obj.send("bar", ()).is_ok());
    assert!(obj.send("bar", args![1]).is_err());
    assert!(obj.send("bar", Args::new().kwarg("k", 1)).is_err());

    session.verify_all().unwrap();
}

#[test]
fn closures_over_the_whole_argument_list() {
    let session = Session::new();
    let obj = Object::new("obj");

    session
        .stub(&obj, "sum")
        .with(closure(|args: &Args| args.len() % 2 == 0).describe("an even number of arguments"))
        .returns("even");
    session.stub(&obj, "sum").with(no_args()).returns("empty");

    assert_eq!(Value::from("even"), obj.send("sum", args![1, 2]).unwrap());
    assert_eq!(Value::from("even"), obj.send("sum", ()).unwrap());

    let err = obj.send("sum", args![1]).unwrap_err();
    let message = err.to_string();

    assert!(message.contains("  - sum(an even number of arguments)"), "{message}");
    assert!(message.contains("  - sum()"), "{message}");

    session.verify_all().unwrap();
}
