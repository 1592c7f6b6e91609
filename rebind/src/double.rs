//! The [`double`](self) module implements [`Double`], one declared expectation
//! attached to an interception point.

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::action::Action;
use crate::error::{TimesCalledViolation, ViolationKind};
use crate::matcher::{describe, ArgumentMatcher};
use crate::{Args, Invocation, Matcher, Result, Selector, Times, TimesRange, Value};

/// Flavour a double was declared with. Only used for descriptions.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq)]
pub enum DoubleKind {
    /// Supplies a response and is expected a number of times.
    #[default]
    Mock,

    /// Supplies a response without a call count requirement.
    Stub,

    /// Forwards to the original implementation and records the calls.
    Probe,
}

impl Display for DoubleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Mock => write!(f, "mock"),
            Self::Stub => write!(f, "stub"),
            Self::Probe => write!(f, "probe"),
        }
    }
}

/// One expectation unit: argument matcher, call count expectation and the
/// action that answers matching calls.
pub struct Double {
    kind: DoubleKind,
    matcher: ArgumentMatcher,
    times: Times,
    action: Action,
    description: Option<String>,
    verified: AtomicBool,
}

impl Double {
    pub fn new<M, R>(matcher: M, times: R, action: Action) -> Self
    where
        M: Matcher<Args> + Send + Sync + 'static,
        R: Into<TimesRange>,
    {
        Self::boxed(Box::new(matcher), times, action)
    }

    /// Like [`new`](Self::new) but with an already boxed matcher.
    pub fn boxed<R: Into<TimesRange>>(matcher: ArgumentMatcher, times: R, action: Action) -> Self {
        Self {
            kind: DoubleKind::default(),
            matcher,
            times: Times::new(times),
            action,
            description: None,
            verified: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: DoubleKind) -> Self {
        self.kind = kind;

        self
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;

        self
    }

    #[must_use]
    pub fn kind(&self) -> DoubleKind {
        self.kind
    }

    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }

    #[must_use]
    pub fn times(&self) -> &Times {
        &self.times
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.times.count()
    }

    /// Human readable form of the argument matcher, e.g. `1, any`.
    #[must_use]
    pub fn expectation(&self) -> String {
        describe::<Args, _>(&*self.matcher)
    }

    /// Returns `true` if the argument matcher accepts `args`.
    #[must_use]
    pub fn matches(&self, args: &Args) -> bool {
        self.matcher.matches(args)
    }

    /// Returns `true` if one more call would exceed the expected bound.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.times.is_done()
    }

    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.times.is_satisfied()
    }

    /// Returns `true` if [`verify`](Self::verify) succeeded for this double.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verified.load(Ordering::Relaxed)
    }

    /// Count one call that was routed to this double.
    pub fn record(&self) -> usize {
        self.times.increment()
    }

    /// Answer `invocation` with the action of this double. `original` is used
    /// if the action forwards to the original implementation.
    ///
    /// # Errors
    /// Returns the error of the invoked callback or original implementation.
    pub fn respond<F>(&self, invocation: &Invocation, original: F) -> Result<Value>
    where
        F: FnOnce(&Invocation) -> Result<Value>,
    {
        self.action.exec(invocation, original)
    }

    /// Count the call and answer it.
    ///
    /// # Errors
    /// See [`respond`](Self::respond).
    pub fn record_call<F>(&self, invocation: &Invocation, original: F) -> Result<Value>
    where
        F: FnOnce(&Invocation) -> Result<Value>,
    {
        self.record();

        self.respond(invocation, original)
    }

    /// Check the observed call count against the expected bound.
    ///
    /// # Errors
    /// Returns a [`TimesCalledViolation`] naming `subject` and `selector` if
    /// the double was called too few or too many times.
    pub fn verify(&self, subject: &str, selector: &Selector) -> Result<(), TimesCalledViolation> {
        if self.times.is_satisfied() {
            self.verified.store(true, Ordering::Relaxed);

            return Ok(());
        }

        let kind = if self.times.is_exceeded() {
            ViolationKind::TooMany
        } else {
            ViolationKind::TooFew
        };

        Err(TimesCalledViolation {
            subject: subject.into(),
            selector: selector.clone(),
            expectation: format!("({})", self.expectation()),
            expected: self.times.range.to_string(),
            observed: self.times.count(),
            kind,
        })
    }
}

impl Display for Double {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(description) = &self.description {
            return write!(f, "{description}");
        }

        write!(f, "{} ({})", self.kind, self.expectation())?;

        if self.kind != DoubleKind::Stub {
            write!(f, " {}", self.times.range)?;
        }

        Ok(())
    }
}

impl Debug for Double {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Double")
            .field("kind", &self.kind)
            .field("expectation", &self.expectation())
            .field("times", &self.times)
            .field("action", &self.action)
            .field("verified", &self.is_verified())
            .finish()
    }
}
