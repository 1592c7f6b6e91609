use std::fmt::{Formatter, Result as FmtResult};

use crate::{Args, Matcher};

/// Matches argument lists that are equal to `args`, position by position and
/// keyword by keyword.
pub fn exactly<A: Into<Args>>(args: A) -> Exactly {
    Exactly(args.into())
}

#[must_use]
#[derive(Debug, Clone)]
pub struct Exactly(pub Args);

impl Matcher<Args> for Exactly {
    fn matches(&self, value: &Args) -> bool {
        self.0 == *value
    }

    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt_list(f)
    }
}
