use std::fmt::{Formatter, Result as FmtResult};

use crate::{Matcher, Value};

/* IsEmpty */

/// Matches empty strings and empty lists.
pub fn is_empty() -> IsEmpty {
    IsEmpty
}

#[must_use]
#[derive(Debug)]
pub struct IsEmpty;

impl Matcher<Value> for IsEmpty {
    fn matches(&self, value: &Value) -> bool {
        match value {
            Value::List(items) => items.is_empty(),
            value => value.as_str().is_some_and(str::is_empty),
        }
    }

    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "is_empty")
    }
}

macro_rules! impl_str_matcher {
    ($type:ident, str::$method:ident, $fmt:tt) => {
        pub fn $method<P: Into<String>>(pattern: P) -> $type {
            $type(pattern.into())
        }

        #[derive(Debug)]
        pub struct $type(String);

        impl Matcher<Value> for $type {
            fn matches(&self, value: &Value) -> bool {
                value.as_str().is_some_and(|s| s.$method(self.0.as_str()))
            }

            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                write!(f, $fmt, self.0)
            }
        }
    };
}

impl_str_matcher!(StartsWith, str::starts_with, "starts_with({:?})");
impl_str_matcher!(EndsWith, str::ends_with, "ends_with({:?})");
impl_str_matcher!(Contains, str::contains, "contains({:?})");
