use crate::Value;

use super::Action;

/// Creates an action that returns the passed `value` when called.
pub fn return_<T: Into<Value>>(value: T) -> Action {
    Action::Return(value.into())
}

/// Creates an action that returns [`Value::Nil`].
#[must_use]
pub fn return_nil() -> Action {
    Action::Return(Value::Nil)
}
