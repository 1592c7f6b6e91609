use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rebind::{args, Config, Object, Phase, Session, Subject, Value, ViolationKind};

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
fn reset_restores_the_original_exactly() {
    let session = Session::with_config(Config::default().alias_prefix("__orig_"));
    let obj = calculator();

    session.stub(&obj, "sum").returns(0);

    assert!(obj.responds_to("__orig_sum"));
    assert_eq!(Value::Int(0), obj.send("sum", args![1, 2]).unwrap());

    session.reset_all();

    assert_eq!(Value::Int(3), obj.send("sum", args![1, 2]).unwrap());
    assert!(!obj.responds_to("__orig_sum"));
    assert!(session.registry().is_empty());
}

#[test]
fn verification_threshold() {
    let session = Session::new();
    let obj = calculator();

    for (calls, expected) in [
        (1, Some(ViolationKind::TooFew)),
        (2, None),
        (3, Some(ViolationKind::TooMany)),
    ] {
        session.mock(&obj, "sum").twice();

        for _ in 0..calls {
            obj.send("sum", ()).unwrap();
        }

        let result = session.verify_point(obj.subject_id(), "sum");
        assert_eq!(expected, result.err().map(|v| v.kind), "{calls} calls");
        assert!(!session.is_doubled(obj.subject_id(), "sum"));
    }
}

#[test]
fn too_many_reports_the_observed_count() {
    let session = Session::new();
    let obj = calculator();

    session.mock(&obj, "sum").with_args(args![1]).once();

    obj.send("sum", args![1]).unwrap();
    obj.send("sum", args![1]).unwrap();

    let err = session.verify_all().unwrap_err();
    let violation = &err.violations[0];

    assert_eq!(ViolationKind::TooMany, violation.kind);
    assert_eq!(2, violation.observed);
    assert_eq!("exactly 1 time", violation.expected);
    assert_eq!("(1)", violation.expectation);
}

#[test]
fn teardown_is_total() {
    let session = Session::new();
    let x = calculator();
    let y = calculator();

    session.mock(&x, "sum").once();
    let y_point_double = session.stub(&y, "sum").returns(-1).register();

    assert_eq!(Value::Int(-1), y.send("sum", args![5]).unwrap());
    let y_point = session.point(y.subject_id(), "sum").unwrap();

    let err = session.verify([x.subject_id(), y.subject_id()]).unwrap_err();

    assert_eq!(1, err.violations.len());
    assert_eq!(x.describe(), err.violations[0].subject);
    assert_eq!(Phase::Reset, y_point.phase());
    assert_eq!(1, y_point_double.call_count());
    assert_eq!(Value::Int(5), y.send("sum", args![5]).unwrap());
    assert_eq!(Value::Int(5), x.send("sum", args![5]).unwrap());
    assert!(session.registry().is_empty());
}

#[test]
fn verify_only_touches_the_passed_subjects() {
    let session = Session::new();
    let x = calculator();
    let y = calculator();

    session.stub(&x, "sum").returns(0);
    session.stub(&y, "sum").returns(0);

    session.verify([x.subject_id()]).unwrap();

    assert_eq!(Value::Int(1), x.send("sum", args![1]).unwrap());
    assert_eq!(Value::Int(0), y.send("sum", args![1]).unwrap());

    session.reset(y.subject_id());
    assert_eq!(Value::Int(1), y.send("sum", args![1]).unwrap());
}

#[test]
fn recursive_self_calls_are_dispatched() {
    let session = Session::new();
    let obj = calculator();
    let weak = Arc::downgrade(&obj);
    obj.define("double_sum", move |inv| {
        let obj = weak.upgrade().ok_or_else(|| rebind::Error::raised("gone"))?;
        let sum = obj.send("sum", inv.args.clone())?;

        Ok(Value::Int(sum.as_int().unwrap_or_default() * 2))
    });

    session.stub(&obj, "sum").returns(21);
    let probe = session.probe(&obj, "double_sum").register();

    assert_eq!(Value::Int(42), obj.send("double_sum", args![1]).unwrap());
    assert_eq!(1, probe.call_count());

    session.verify_all().unwrap();
    assert_eq!(Value::Int(2), obj.send("double_sum", args![1]).unwrap());
}

#[test]
#[should_panic(expected = ".sum(any): expected exactly 1 time, received fewer (0)")]
fn scope_panics_with_the_violation() {
    let session = Session::new();
    let obj = calculator();

    let _scope = session.scope();
    session.mock(&obj, "sum");
}

#[test]
fn scope_passes_when_satisfied() {
    let session = Session::new();
    let obj = calculator();

    {
        let scope = session.scope();
        session.mock(&obj, "sum").returns(7);

        assert_eq!(Value::Int(7), obj.send("sum", ()).unwrap());
        scope.checkpoint().unwrap();

        session.stub(&obj, "sum").returns(8);
        assert_eq!(Value::Int(8), obj.send("sum", ()).unwrap());
    }

    assert_eq!(Value::Int(0), obj.send("sum", ()).unwrap());
}

#[test]
fn scope_only_resets_while_unwinding() {
    let session = Session::new();
    let obj = calculator();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let _scope = session.scope();
        session.mock(&obj, "sum").returns(0);

        panic!("test failed for another reason");
    }));

    assert!(result.is_err());
    assert!(session.registry().is_empty());
    assert_eq!(Value::Int(3), obj.send("sum", args![1, 2]).unwrap());
}

#[test]
fn scope_without_verification() {
    let session = Session::with_config(Config::default().verify_on_drop(false));
    let obj = calculator();

    {
        let _scope = session.scope();
        session.mock(&obj, "sum").returns(0);
    }

    assert!(session.registry().is_empty());
    assert_eq!(Value::Int(3), obj.send("sum", args![1, 2]).unwrap());
}
