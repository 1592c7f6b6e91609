use rebind::{args, Error, Invocation, Object, Phase, Responder, Result, Selector, Session, Subject, Value};

/// Answers every selector that starts with `find_by_`.
struct Finder;

impl Responder for Finder {
    fn responds_to(&self, selector: &str) -> bool {
        selector.starts_with("find_by_")
    }

    fn call(&self, selector: &Selector, invocation: &Invocation) -> Result<Value> {
        let key = selector.as_str().trim_start_matches("find_by_");
        let value = invocation.args.get(0).cloned().unwrap_or_default();

        Ok(Value::from(format!("{key}={value}")))
    }
}

#[test]
fn responder_selectors_are_intercepted() {
    let session = Session::new();
    let repo = Object::with_responder("repo", Finder);

    session.stub(&repo, "find_by_name").returns("stubbed");

    assert!(!repo.method_table().has_own_method("find_by_name"));
    assert_eq!(Value::from("stubbed"), repo.send("find_by_name", args!["x"]).unwrap());
    assert_eq!(Value::from(r#"id=1"#), repo.send("find_by_id", args![1]).unwrap());

    session.verify_all().unwrap();

    assert_eq!(Value::from(r#"name="x""#), repo.send("find_by_name", args!["x"]).unwrap());
}

#[test]
fn probes_forward_to_the_responder() {
    let session = Session::new();
    let repo = Object::with_responder("repo", Finder);

    let probe = session.probe(&repo, "find_by_id").twice().register();

    assert_eq!(Value::from("id=1"), repo.send("find_by_id", args![1]).unwrap());
    assert_eq!(Value::from("id=2"), repo.send("find_by_id", args![2]).unwrap());
    assert_eq!(2, probe.call_count());

    session.verify_all().unwrap();
}

#[test]
fn methods_defined_while_bound_are_still_intercepted() {
    let session = Session::new();
    let repo = Object::with_responder("repo", Finder);

    session.stub(&repo, "find_by_name").returns("stubbed");
    let point = session.point(repo.subject_id(), "find_by_name").unwrap();
    assert!(!point.has_original());

    repo.define("find_by_name", |_| Ok(Value::from("defined")));

    assert!(point.has_original());
    assert_eq!(Phase::Bound, point.phase());
    assert_eq!(Value::from("stubbed"), repo.send("find_by_name", ()).unwrap());

    session.verify_all().unwrap();

    assert_eq!(Value::from("defined"), repo.send("find_by_name", ()).unwrap());
}

#[test]
fn unknown_selectors_still_fail() {
    let session = Session::new();
    let repo = Object::with_responder("repo", Finder);

    session.stub(&repo, "find_by_name");

    let err = repo.send("delete", ()).unwrap_err();
    assert!(matches!(&err, Error::NoMethod { selector, .. } if selector.as_str() == "delete"));
    assert!(err.to_string().contains("#<repo:"), "{err}");

    session.reset_all();
}
