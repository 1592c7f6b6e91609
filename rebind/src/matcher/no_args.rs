use std::fmt::{Formatter, Result as FmtResult};

use crate::{Args, Matcher};

/// Matches calls without any positional or keyword argument.
pub fn no_args() -> NoArgs {
    NoArgs
}

#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct NoArgs;

impl Matcher<Args> for NoArgs {
    fn matches(&self, value: &Args) -> bool {
        value.is_empty()
    }

    fn fmt(&self, _: &mut Formatter<'_>) -> FmtResult {
        Ok(())
    }
}
