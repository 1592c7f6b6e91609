//! The [`session`](self) module implements [`Session`], the test session
//! context that owns the [`IdentityRegistry`] and drives the verify and reset
//! lifecycle.

use std::collections::VecDeque;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::thread::panicking;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::action::{forward, return_nil, Action};
use crate::error::{TimesCalledViolation, VerificationFailed};
use crate::local_context::LocalSession;
use crate::{
    Args, Config, Double, DoubleBuilder, DoubleKind, IdentityRegistry, InterceptionPoint, Matcher,
    Selector, SubjectId, SubjectRef, TimesRange,
};

static GLOBAL: Lazy<Session> = Lazy::new(|| Session::with_config(Config::from_env()));

/// Test session context.
///
/// Doubles are declared on a session and verified or reset through it. The
/// session is a cheap handle: clones share the same registry.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    registry: IdentityRegistry,
    config: Config,
}

impl Session {
    /// Create a new session with the default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: IdentityRegistry::new(config.alias_prefix.clone()),
                config,
            }),
        }
    }

    /// Process wide session, configured from the environment.
    #[must_use]
    pub fn global() -> &'static Session {
        &GLOBAL
    }

    /// The innermost [`LocalSession`] of the current thread, or the
    /// [`global`](Self::global) session if there is none.
    #[must_use]
    pub fn current() -> Session {
        LocalSession::current().unwrap_or_else(|| GLOBAL.clone())
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    #[must_use]
    pub fn registry(&self) -> &IdentityRegistry {
        &self.inner.registry
    }

    /// Returns `true` if `self` and `other` share the same registry.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Register a new double on `(subject, selector)` and bind the point.
    pub fn declare<T, S, M, R>(&self, subject: &T, selector: S, matcher: M, times: R, action: Action) -> Arc<Double>
    where
        T: SubjectRef + ?Sized,
        S: Into<Selector>,
        M: Matcher<Args> + Send + Sync + 'static,
        R: Into<TimesRange>,
    {
        self.register_double(subject, selector, Double::new(matcher, times, action))
    }

    /// Register `double` on `(subject, selector)` and bind the point.
    ///
    /// Doubles registered on the same pair share one point and are tried in
    /// registration order.
    pub fn register_double<T, S>(&self, subject: &T, selector: S, double: Double) -> Arc<Double>
    where
        T: SubjectRef + ?Sized,
        S: Into<Selector>,
    {
        let subject = subject.to_subject();
        let selector = selector.into();

        let point = self.registry().find_or_create(&subject, &selector);
        let double = Arc::new(double);
        point.register(double.clone());
        point.bind(&*subject);

        debug!(subject = point.subject_label(), %selector, %double, "declared double");

        double
    }

    /// Start declaring a mock: expected exactly once, returns nil.
    pub fn mock<T, S>(&self, subject: &T, selector: S) -> DoubleBuilder
    where
        T: SubjectRef + ?Sized,
        S: Into<Selector>,
    {
        DoubleBuilder::new(self.clone(), subject.to_subject(), selector.into(), DoubleKind::Mock, 1, return_nil())
    }

    /// Start declaring a stub: any number of calls, returns nil.
    pub fn stub<T, S>(&self, subject: &T, selector: S) -> DoubleBuilder
    where
        T: SubjectRef + ?Sized,
        S: Into<Selector>,
    {
        DoubleBuilder::new(self.clone(), subject.to_subject(), selector.into(), DoubleKind::Stub, .., return_nil())
    }

    /// Start declaring a probe: expected exactly once, forwards to the
    /// original implementation.
    pub fn probe<T, S>(&self, subject: &T, selector: S) -> DoubleBuilder
    where
        T: SubjectRef + ?Sized,
        S: Into<Selector>,
    {
        DoubleBuilder::new(self.clone(), subject.to_subject(), selector.into(), DoubleKind::Probe, 1, forward())
    }

    #[must_use]
    pub fn point(&self, subject: SubjectId, selector: &str) -> Option<Arc<InterceptionPoint>> {
        self.registry().find(subject, selector)
    }

    /// Returns `true` if a point exists for `(subject, selector)`.
    #[must_use]
    pub fn is_doubled(&self, subject: SubjectId, selector: &str) -> bool {
        self.registry().exists(subject, selector)
    }

    /// Verify every point of every subject, then reset them.
    ///
    /// # Errors
    /// Returns one violation per failing point.
    pub fn verify_all(&self) -> Result<(), VerificationFailed> {
        self.verify_points(self.registry().each(None))
    }

    /// Verify and reset the points of the passed `subjects` only.
    ///
    /// # Errors
    /// Returns one violation per failing point.
    pub fn verify<I>(&self, subjects: I) -> Result<(), VerificationFailed>
    where
        I: IntoIterator<Item = SubjectId>,
    {
        let points = subjects
            .into_iter()
            .flat_map(|id| self.registry().each(Some(id)))
            .collect();

        self.verify_points(points)
    }

    /// Verify and reset the point of `(subject, selector)`.
    ///
    /// Returns `Ok` if there is no such point.
    ///
    /// # Errors
    /// Returns the violation of the first failing double.
    pub fn verify_point(&self, subject: SubjectId, selector: &str) -> Result<(), TimesCalledViolation> {
        let Some(point) = self.point(subject, selector) else {
            return Ok(());
        };

        let _teardown = Teardown::new(self, vec![point.clone()]);

        point.verify().map_err(|violation| {
            warn!(%violation, "verification failed");

            violation
        })
    }

    /// Reset every point without verifying it.
    pub fn reset_all(&self) {
        drop(Teardown::new(self, self.registry().each(None)));
    }

    /// Reset the points of `subject` without verifying them.
    pub fn reset(&self, subject: SubjectId) {
        drop(Teardown::new(self, self.registry().each(Some(subject))));
    }

    /// Create a [`Scope`] that verifies this session when it is dropped.
    pub fn scope(&self) -> Scope {
        Scope {
            session: self.clone(),
            verify_on_drop: self.config().verify_on_drop,
        }
    }

    fn verify_points(&self, points: Vec<Arc<InterceptionPoint>>) -> Result<(), VerificationFailed> {
        let mut teardown = Teardown::new(self, points);
        let mut violations = Vec::new();

        while let Some(point) = teardown.points.front().cloned() {
            if let Err(violation) = point.verify() {
                warn!(%violation, "verification failed");

                violations.push(violation);
            }

            teardown.finish_front();
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(VerificationFailed { violations })
        }
    }

    fn forget(&self, point: &InterceptionPoint) {
        self.registry()
            .forget(point.subject_id(), point.selector().as_str());
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Session")
            .field("config", &self.inner.config)
            .field("registry", &self.inner.registry)
            .finish()
    }
}

/// Points that still have to be torn down.
///
/// Everything left is reset and forgotten on drop, so a failing or panicking
/// verification never leaves an override installed.
struct Teardown<'a> {
    session: &'a Session,
    points: VecDeque<Arc<InterceptionPoint>>,
}

impl<'a> Teardown<'a> {
    fn new(session: &'a Session, points: Vec<Arc<InterceptionPoint>>) -> Self {
        Self {
            session,
            points: points.into(),
        }
    }

    fn finish_front(&mut self) {
        if let Some(point) = self.points.pop_front() {
            point.reset();
            self.session.forget(&point);
        }
    }
}

impl Drop for Teardown<'_> {
    fn drop(&mut self) {
        while !self.points.is_empty() {
            self.finish_front();
        }
    }
}

/// Guard that verifies a [`Session`] when it goes out of scope.
///
/// On drop all points are verified and the guard panics with the collected
/// violations. If the thread is already panicking, or verification on drop is
/// disabled, the points are only reset.
#[must_use]
pub struct Scope {
    session: Session,
    verify_on_drop: bool,
}

impl Scope {
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Verify and reset all points now. The scope stays armed for doubles
    /// declared afterwards.
    ///
    /// # Errors
    /// See [`Session::verify_all`].
    pub fn checkpoint(&self) -> Result<(), VerificationFailed> {
        self.session.verify_all()
    }

    /// Drop the scope without verifying. All points are reset.
    pub fn release(mut self) {
        self.verify_on_drop = false;

        drop(self);
    }
}

impl Debug for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Scope")
            .field("verify_on_drop", &self.verify_on_drop)
            .finish_non_exhaustive()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if self.verify_on_drop && !panicking() {
            if let Err(err) = self.session.verify_all() {
                panic!("{err}");
            }
        } else {
            self.session.reset_all();
        }
    }
}
