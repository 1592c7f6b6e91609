use std::sync::Arc;

use crate::{Invocation, Result, Value};

use super::Action;

/// Creates an action that calls `func` with the invocation.
pub fn invoke<F>(func: F) -> Action
where
    F: Fn(&Invocation) -> Result<Value> + Send + Sync + 'static,
{
    Action::Invoke(Arc::new(func))
}
