use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rebind::{args, Object, Session, Subject, Value};

fn calculator() -> Arc<Object> {
    let obj = Object::new("calculator");
    obj.define("sum", |inv| {
        Ok(Value::Int(
            inv.args.positional.iter().filter_map(Value::as_int).sum(),
        ))
    });

    obj
}

#[test]
fn a_bound_selector_belongs_to_one_session() {
    let a = Session::new();
    let b = Session::new();
    let obj = calculator();

    a.stub(&obj, "sum").returns("a");

    let err = catch_unwind(AssertUnwindSafe(|| {
        b.stub(&obj, "sum").returns("b");
    }))
    .unwrap_err();
    let message = err.downcast_ref::<String>().cloned().unwrap_or_default();
    assert!(message.contains("already doubled by another session"), "{message}");

    assert!(!b.is_doubled(obj.subject_id(), "sum"));
    b.reset_all();

    assert_eq!(Value::from("a"), obj.send("sum", args![1, 2]).unwrap());

    a.verify_all().unwrap();
    assert_eq!(Value::Int(3), obj.send("sum", args![1, 2]).unwrap());
}

#[test]
fn a_reset_selector_can_be_doubled_by_another_session() {
    let a = Session::new();
    let b = Session::new();
    let obj = calculator();

    a.stub(&obj, "sum").returns("a");
    a.reset_all();

    b.stub(&obj, "sum").returns("b");
    assert_eq!(Value::from("b"), obj.send("sum", ()).unwrap());

    b.verify_all().unwrap();
    assert_eq!(Value::Int(3), obj.send("sum", args![1, 2]).unwrap());
}

#[test]
fn sessions_doubling_other_selectors_keep_their_hooks() {
    let a = Session::new();
    let b = Session::new();
    let obj = calculator();

    a.stub(&obj, "late").returns("a");
    b.stub(&obj, "sum").returns("b");
    b.reset_all();

    obj.define("late", |_| Ok(Value::from("defined")));

    assert_eq!(Value::from("a"), obj.send("late", ()).unwrap());
    assert_eq!(Value::Int(3), obj.send("sum", args![1, 2]).unwrap());

    a.verify_all().unwrap();
    assert_eq!(Value::from("defined"), obj.send("late", ()).unwrap());
}
