//! The [`action`](self) module contains the response strategies a double may
//! answer a call with.

mod forward;
mod invoke;
mod returns;

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

pub use forward::{forward, forward_then};
pub use invoke::invoke;
pub use returns::{return_, return_nil};

use crate::{Invocation, Result, Value};

/// Callback that computes the response from the call.
pub type Callback = Arc<dyn Fn(&Invocation) -> Result<Value> + Send + Sync>;

/// Callback that post-processes the value returned by the original
/// implementation.
pub type AfterForward = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// How a double answers a call that was routed to it.
#[derive(Clone)]
pub enum Action {
    /// Return a clone of the value.
    Return(Value),

    /// Invoke the callback with the call's arguments and block.
    Invoke(Callback),

    /// Forward the call to the original implementation, optionally passing
    /// its result through a callback.
    Forward(Option<AfterForward>),
}

impl Action {
    /// Execute the action for `invocation`.
    ///
    /// `original` is only called for [`Action::Forward`].
    ///
    /// # Errors
    /// Returns whatever error the callback or the original implementation
    /// returned.
    pub fn exec<F>(&self, invocation: &Invocation, original: F) -> Result<Value>
    where
        F: FnOnce(&Invocation) -> Result<Value>,
    {
        match self {
            Self::Return(value) => Ok(value.clone()),
            Self::Invoke(callback) => callback(invocation),
            Self::Forward(None) => original(invocation),
            Self::Forward(Some(after)) => after(original(invocation)?),
        }
    }

    /// Returns `true` if this action calls the original implementation.
    #[must_use]
    pub fn is_forward(&self) -> bool {
        matches!(self, Self::Forward(_))
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::Return(Value::Nil)
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Return(value) => f.debug_tuple("Return").field(value).finish(),
            Self::Invoke(_) => write!(f, "Invoke"),
            Self::Forward(None) => write!(f, "Forward"),
            Self::Forward(Some(_)) => write!(f, "ForwardThen"),
        }
    }
}

impl From<Value> for Action {
    fn from(value: Value) -> Self {
        Self::Return(value)
    }
}
