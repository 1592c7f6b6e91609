use std::fmt::{Formatter, Result as FmtResult};

use crate::Matcher;

/// Create a predicate matcher from `f`.
pub fn closure<F>(f: F) -> Closure<F> {
    Closure {
        f,
        description: None,
    }
}

#[must_use]
#[derive(Debug)]
pub struct Closure<F> {
    f: F,
    description: Option<String>,
}

impl<F> Closure<F> {
    /// Name the predicate for error messages.
    pub fn describe<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());

        self
    }
}

impl<T, F> Matcher<T> for Closure<F>
where
    F: Fn(&T) -> bool,
{
    fn matches(&self, value: &T) -> bool {
        (self.f)(value)
    }

    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.description {
            Some(description) => write!(f, "{description}"),
            None => write!(f, "closure"),
        }
    }
}
