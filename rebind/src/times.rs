//! The [`times`](self) module contains the types that track how often a double
//! was called and how often it is expected to be called.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::{
    Bound, Range, RangeBounds, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Observed call count of a double together with its expected bound.
///
/// The count only ever increases.
#[derive(Default, Debug)]
pub struct Times {
    /// Number of calls the double already received.
    pub count: AtomicUsize,

    /// Expected number of calls.
    pub range: TimesRange,
}

impl Times {
    /// Create a new [`Times`] instance from the passed `range`.
    pub fn new<R: Into<TimesRange>>(range: R) -> Self {
        Self {
            count: AtomicUsize::default(),
            range: range.into(),
        }
    }

    /// Record one call. Returns the count before the call.
    pub fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Return `true` if lower bound of the range is fulfilled.
    pub fn is_ready(&self) -> bool {
        match &self.range.lower {
            Bound::Unbounded => true,
            Bound::Included(x) => *x <= self.count(),
            Bound::Excluded(x) => *x < self.count(),
        }
    }

    /// Return `true` if the upper bound is reached, i.e. one more call would
    /// exceed the expectation.
    pub fn is_done(&self) -> bool {
        self.range.max().is_some_and(|max| self.count() >= max)
    }

    /// Return `true` if more calls than allowed were recorded.
    pub fn is_exceeded(&self) -> bool {
        self.range.max().is_some_and(|max| self.count() > max)
    }

    /// Return `true` if the recorded count lies within the expected range.
    pub fn is_satisfied(&self) -> bool {
        self.is_ready() && !self.is_exceeded()
    }
}

/// Defines the range of expected calls with a lower and a upper limit.
///
/// Similar to [`RangeBounds`] from the standard library but as struct instead
/// of trait.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TimesRange {
    lower: Bound<usize>,
    upper: Bound<usize>,
}

impl TimesRange {
    /// Exactly `n` calls.
    #[must_use]
    pub fn exactly(n: usize) -> Self {
        n.into()
    }

    /// `n` or more calls.
    #[must_use]
    pub fn at_least(n: usize) -> Self {
        (n..).into()
    }

    /// `0` up to `n` calls.
    #[must_use]
    pub fn at_most(n: usize) -> Self {
        (..=n).into()
    }

    /// Any number of calls, including none.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Smallest accepted call count.
    #[must_use]
    pub fn min(&self) -> usize {
        match self.lower {
            Bound::Unbounded => 0,
            Bound::Included(x) => x,
            Bound::Excluded(x) => x + 1,
        }
    }

    /// Largest accepted call count, `None` if there is no upper limit.
    #[must_use]
    pub fn max(&self) -> Option<usize> {
        match self.upper {
            Bound::Unbounded => None,
            Bound::Included(x) => Some(x),
            Bound::Excluded(x) => Some(x.saturating_sub(1)),
        }
    }
}

impl Default for TimesRange {
    fn default() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }
}

impl Display for TimesRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let plural = |n: usize| if n == 1 { "time" } else { "times" };

        match (self.min(), self.max()) {
            (0, None) => write!(f, "any number of times"),
            (min, None) => write!(f, "at least {min} {}", plural(min)),
            (0, Some(0)) => write!(f, "never"),
            (0, Some(max)) => write!(f, "at most {max} {}", plural(max)),
            (min, Some(max)) if min == max => write!(f, "exactly {min} {}", plural(min)),
            (min, Some(max)) => write!(f, "between {min} and {max} times"),
        }
    }
}

impl From<usize> for TimesRange {
    fn from(value: usize) -> Self {
        Self {
            lower: Bound::Included(value),
            upper: Bound::Included(value),
        }
    }
}

macro_rules! impl_from_range_bounds {
    ($x:ty) => {
        impl From<$x> for TimesRange {
            fn from(value: $x) -> Self {
                Self {
                    lower: value.start_bound().cloned(),
                    upper: value.end_bound().cloned(),
                }
            }
        }
    };
}

impl_from_range_bounds!(Range<usize>);
impl_from_range_bounds!(RangeFrom<usize>);
impl_from_range_bounds!(RangeFull);
impl_from_range_bounds!(RangeInclusive<usize>);
impl_from_range_bounds!(RangeTo<usize>);
impl_from_range_bounds!(RangeToInclusive<usize>);
