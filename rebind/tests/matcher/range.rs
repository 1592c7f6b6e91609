use rebind::matcher::{eq, ge, lt, multi, range};
use rebind::{args, Object, Session, Subject};

#[test]
fn inclusive_and_exclusive_bounds() {
    let session = Session::new();
    let obj = Object::new("obj");

    session.stub(&obj, "incl").with(multi((range(1..=3),)));
    session.stub(&obj, "excl").with(multi((range(1..3),)));
    session.stub(&obj, "from").with(multi((range(2.5..),)));

    assert!(obj.send("incl", args![1]).is_ok());
    assert!(obj.send("incl", args![3]).is_ok());
    assert!(obj.send("incl", args![4]).is_err());

    assert!(obj.send("excl", args![1]).is_ok());
    assert!(obj.send("excl", args![3]).is_err());

    assert!(obj.send("from", args![3]).is_ok());
    assert!(obj.send("from", args![2.5]).is_ok());
    assert!(obj.send("from", args![2]).is_err());
    assert!(obj.send("from", args!["3"]).is_err());

    session.verify_all().unwrap();
}

#[test]
fn comparisons() {
    let session = Session::new();
    let obj = Object::new("obj");

    session.stub(&obj, "fuu").with(multi((ge(10), lt(5.0))));

    assert!(obj.send("fuu", args![10, 4]).is_ok());
    assert!(obj.send("fuu", args![9, 4]).is_err());
    assert!(obj.send("fuu", args![10, 5]).is_err());

    session.verify_all().unwrap();
}

#[test]
fn equality_agrees_with_ordering_across_number_kinds() {
    let session = Session::new();
    let obj = Object::new("obj");

    session.stub(&obj, "eq").with(multi((eq(1.0),)));
    session.stub(&obj, "range").with(multi((range(1.0..=1.0),)));

    assert!(obj.send("eq", args![1]).is_ok());
    assert!(obj.send("range", args![1]).is_ok());
    assert!(obj.send("eq", args![2]).is_err());
    assert!(obj.send("range", args![2]).is_err());

    session.verify_all().unwrap();
}
