//! The [`matcher`](self) module contains the matchers that decide whether a
//! call is answered by a double.
//!
//! Per-argument matchers implement [`Matcher<Value>`](Matcher), argument list
//! matchers implement [`Matcher<Args>`](Matcher). The wildcard [`any`] and the
//! predicate [`closure`] work on both levels.

mod any;
mod closure;
mod compare;
mod exact;
mod kind;
mod multi;
mod no_args;
mod range;
mod string;

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::marker::PhantomData;

pub use any::{any, Any};
pub use closure::{closure, Closure};
pub use compare::{eq, ge, gt, le, lt, ne, one_of, Eq, Ge, Gt, Le, Lt, Ne, OneOf};
pub use exact::{exactly, Exactly};
pub use kind::{is_a, IsA};
pub use multi::{multi, Multi};
pub use no_args::{no_args, NoArgs};
pub use range::{range, Range};
pub use string::{
    contains as str_contains, ends_with as str_ends_with, is_empty, starts_with as str_starts_with,
    Contains as StrContains, EndsWith as StrEndsWith, IsEmpty, StartsWith as StrStartsWith,
};

/// A matcher is used to check if the passed argument matches a pre-defined
/// expectation. It is mostly used to verify the arguments to an expected call.
pub trait Matcher<T> {
    /// Returns `true` if the passed `value` matches the expectations, `false`
    /// otherwise.
    fn matches(&self, value: &T) -> bool;

    /// Write a human readable representation of the matcher to the passed
    /// formatter.
    ///
    /// # Errors
    /// Returns an error if writing to the formatter failed.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult;
}

/// Argument list matcher as it is stored inside a double.
pub type ArgumentMatcher = Box<dyn Matcher<crate::Args> + Send + Sync>;

/// Render the human readable representation of `matcher`.
pub fn describe<T, M>(matcher: &M) -> String
where
    M: Matcher<T> + ?Sized,
{
    Describe(matcher, PhantomData).to_string()
}

struct Describe<'a, T, M: ?Sized>(&'a M, PhantomData<fn(&T)>);

impl<T, M> Display for Describe<'_, T, M>
where
    M: Matcher<T> + ?Sized,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Matcher::<T>::fmt(self.0, f)
    }
}
