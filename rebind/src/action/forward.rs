use std::sync::Arc;

use crate::{Result, Value};

use super::Action;

/// Creates an action that forwards the call to the original implementation.
#[must_use]
pub fn forward() -> Action {
    Action::Forward(None)
}

/// Creates an action that forwards the call to the original implementation
/// and passes the returned value through `after`.
pub fn forward_then<F>(after: F) -> Action
where
    F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
{
    Action::Forward(Some(Arc::new(after)))
}
