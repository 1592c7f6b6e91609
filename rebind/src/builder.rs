//! The [`builder`](self) module implements [`DoubleBuilder`], the declaration
//! layer for mocks, stubs and probes.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::mem::{replace, take};
use std::sync::Arc;

use crate::action::{forward, forward_then, invoke, return_, Action};
use crate::matcher::{any, exactly, no_args, ArgumentMatcher};
use crate::{
    Args, Double, DoubleKind, Invocation, Matcher, Result, Selector, Session, Subject, SubjectRef,
    TimesRange, Value,
};

/// Declare a mock of `selector` on `subject` in the [current](Session::current)
/// session.
pub fn mock<T, S>(subject: &T, selector: S) -> DoubleBuilder
where
    T: SubjectRef + ?Sized,
    S: Into<Selector>,
{
    Session::current().mock(subject, selector)
}

/// Declare a stub of `selector` on `subject` in the [current](Session::current)
/// session.
pub fn stub<T, S>(subject: &T, selector: S) -> DoubleBuilder
where
    T: SubjectRef + ?Sized,
    S: Into<Selector>,
{
    Session::current().stub(subject, selector)
}

/// Declare a probe of `selector` on `subject` in the
/// [current](Session::current) session.
pub fn probe<T, S>(subject: &T, selector: S) -> DoubleBuilder
where
    T: SubjectRef + ?Sized,
    S: Into<Selector>,
{
    Session::current().probe(subject, selector)
}

/// Builder to refine a double before it is declared.
///
/// The double is declared by [`register`](Self::register), or when the
/// builder is dropped.
pub struct DoubleBuilder {
    session: Session,
    subject: Arc<dyn Subject>,
    selector: Selector,
    kind: DoubleKind,
    matcher: ArgumentMatcher,
    times: TimesRange,
    action: Action,
    description: Option<String>,
    declared: bool,
}

impl DoubleBuilder {
    pub(crate) fn new<R: Into<TimesRange>>(
        session: Session,
        subject: Arc<dyn Subject>,
        selector: Selector,
        kind: DoubleKind,
        times: R,
        action: Action,
    ) -> Self {
        Self {
            session,
            subject,
            selector,
            kind,
            matcher: Box::new(any()),
            times: times.into(),
            action,
            description: None,
            declared: false,
        }
    }

    /// Only answer calls whose arguments are accepted by `matcher`.
    pub fn with<M>(mut self, matcher: M) -> Self
    where
        M: Matcher<Args> + Send + Sync + 'static,
    {
        self.matcher = Box::new(matcher);

        self
    }

    /// Only answer calls with exactly these arguments.
    pub fn with_args<A: Into<Args>>(self, args: A) -> Self {
        self.with(exactly(args))
    }

    pub fn with_any_args(self) -> Self {
        self.with(any())
    }

    pub fn with_no_args(self) -> Self {
        self.with(no_args())
    }

    pub fn times<R: Into<TimesRange>>(mut self, range: R) -> Self {
        self.times = range.into();

        self
    }

    pub fn never(self) -> Self {
        self.times(0)
    }

    pub fn once(self) -> Self {
        self.times(1)
    }

    pub fn twice(self) -> Self {
        self.times(2)
    }

    pub fn at_least(self, n: usize) -> Self {
        self.times(n..)
    }

    pub fn at_most(self, n: usize) -> Self {
        self.times(..=n)
    }

    pub fn any_number_of_times(self) -> Self {
        self.times(..)
    }

    /// Answer matching calls with `value`.
    pub fn returns<T: Into<Value>>(mut self, value: T) -> Self {
        self.action = return_(value);

        self
    }

    /// Answer matching calls with the result of `f`.
    pub fn returning<F>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation) -> Result<Value> + Send + Sync + 'static,
    {
        self.action = invoke(f);

        self
    }

    /// Forward matching calls to the original implementation.
    pub fn forwards(mut self) -> Self {
        self.action = forward();

        self
    }

    /// Forward matching calls to the original implementation and pass its
    /// result through `after`.
    pub fn forward_then<F>(mut self, after: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.action = forward_then(after);

        self
    }

    /// Use `value` instead of the generated description in error messages.
    pub fn description<S: Into<String>>(mut self, value: S) -> Self {
        self.description = Some(value.into());

        self
    }

    /// Declare the double and return it.
    pub fn register(mut self) -> Arc<Double> {
        self.declare()
    }

    fn declare(&mut self) -> Arc<Double> {
        self.declared = true;

        let matcher = replace(&mut self.matcher, Box::new(any()));
        let double = Double::boxed(matcher, self.times, take(&mut self.action))
            .with_kind(self.kind)
            .with_description(self.description.take());

        self.session
            .register_double(&self.subject, self.selector.clone(), double)
    }
}

impl Debug for DoubleBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DoubleBuilder")
            .field("subject", &self.subject.describe())
            .field("selector", &self.selector)
            .field("kind", &self.kind)
            .field("times", &self.times)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

impl Drop for DoubleBuilder {
    fn drop(&mut self) {
        if !self.declared {
            self.declare();
        }
    }
}
