use std::fmt::{Formatter, Result as FmtResult};

use crate::{Matcher, Value, ValueKind};

/// Matches values of the passed `kind`.
pub fn is_a(kind: ValueKind) -> IsA {
    IsA(kind)
}

#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct IsA(pub ValueKind);

impl Matcher<Value> for IsA {
    fn matches(&self, value: &Value) -> bool {
        value.kind() == self.0
    }

    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "is_a({})", self.0)
    }
}
