use std::fmt::{Formatter, Result as FmtResult};

use crate::{Matcher, Value};

macro_rules! impl_matcher {
    ($type:ident, $trait:ident::$method:ident, $fmt:tt) => {
        pub fn $method<T: Into<Value>>(value: T) -> $type {
            $type(value.into())
        }

        #[derive(Debug, Clone)]
        pub struct $type(pub Value);

        impl Matcher<Value> for $type {
            fn matches(&self, value: &Value) -> bool {
                $trait::$method(value, &self.0)
            }

            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                write!(f, $fmt, self.0)
            }
        }
    };
}

impl_matcher!(Eq, PartialEq::eq, "{}");
impl_matcher!(Ne, PartialEq::ne, "ne({})");

impl_matcher!(Lt, PartialOrd::lt, "lt({})");
impl_matcher!(Le, PartialOrd::le, "le({})");
impl_matcher!(Gt, PartialOrd::gt, "gt({})");
impl_matcher!(Ge, PartialOrd::ge, "ge({})");

/// Matches values that are equal to one of `values`.
pub fn one_of<I>(values: I) -> OneOf
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    OneOf(values.into_iter().map(Into::into).collect())
}

#[derive(Debug, Clone)]
pub struct OneOf(pub Vec<Value>);

impl Matcher<Value> for OneOf {
    fn matches(&self, value: &Value) -> bool {
        self.0.contains(value)
    }

    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "one_of({})", Value::List(self.0.clone()))
    }
}
