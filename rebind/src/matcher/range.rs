use std::fmt::{Formatter, Result as FmtResult};
use std::ops::{Bound, RangeBounds};

use crate::{Matcher, Value};

/// Matches values that lie within `range`.
pub fn range<R, T>(range: R) -> Range
where
    R: RangeBounds<T>,
    T: Into<Value> + Clone,
{
    Range {
        start: convert(range.start_bound()),
        end: convert(range.end_bound()),
    }
}

fn convert<T>(bound: Bound<&T>) -> Bound<Value>
where
    T: Into<Value> + Clone,
{
    match bound {
        Bound::Unbounded => Bound::Unbounded,
        Bound::Included(x) => Bound::Included(x.clone().into()),
        Bound::Excluded(x) => Bound::Excluded(x.clone().into()),
    }
}

#[must_use]
#[derive(Debug, Clone)]
pub struct Range {
    start: Bound<Value>,
    end: Bound<Value>,
}

impl Matcher<Value> for Range {
    fn matches(&self, value: &Value) -> bool {
        let above = match &self.start {
            Bound::Unbounded => true,
            Bound::Included(x) => x <= value,
            Bound::Excluded(x) => x < value,
        };

        let below = match &self.end {
            Bound::Unbounded => true,
            Bound::Included(x) => value <= x,
            Bound::Excluded(x) => value < x,
        };

        above && below
    }

    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.start {
            Bound::Unbounded => write!(f, "[_, "),
            Bound::Included(x) => write!(f, "[{x}, "),
            Bound::Excluded(x) => write!(f, "({x}, "),
        }?;

        match &self.end {
            Bound::Unbounded => write!(f, "_]"),
            Bound::Included(x) => write!(f, "{x}]"),
            Bound::Excluded(x) => write!(f, "{x})"),
        }?;

        Ok(())
    }
}
