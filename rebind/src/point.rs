//! The [`point`](self) module implements [`InterceptionPoint`], the installed
//! override of one selector on one subject together with its doubles.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::mem::replace;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::dispatch::DispatchEngine;
use crate::error::TimesCalledViolation;
use crate::subject::{method, Method, MethodTable, Resolution};
use crate::{Double, Error, Invocation, Result, Selector, Subject, SubjectId, Value};

/// Lifecycle phase of an [`InterceptionPoint`].
///
/// `Unbound -> Bound -> (Verified) -> Reset`, where `Reset` is terminal.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    Unbound,
    Bound,
    Verified,
    Reset,
}

/// How the calls reach the point.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Route {
    /// An override is stored in the subject's own methods.
    Override,

    /// The subject only answered the selector through its responder, so the
    /// registry's interceptor routes the calls.
    Interceptor,
}

/// Implementation the subject had for the selector before it was bound.
struct Original {
    method: Method,
    inherited: bool,
}

struct State {
    phase: Phase,
    route: Route,
    original: Option<Original>,
}

/// Override of one `(subject, selector)` pair plus its ordered doubles.
pub struct InterceptionPoint {
    subject_id: SubjectId,
    subject: Weak<dyn Subject>,
    label: String,
    selector: Selector,
    alias: Selector,
    state: Mutex<State>,
    doubles: Mutex<Vec<Arc<Double>>>,
}

impl InterceptionPoint {
    pub(crate) fn new(subject: &Arc<dyn Subject>, selector: Selector, alias_prefix: &str) -> Arc<Self> {
        let alias = Selector::from(format!("{alias_prefix}{selector}"));

        Arc::new(Self {
            subject_id: subject.subject_id(),
            subject: Arc::downgrade(subject),
            label: subject.describe(),
            selector,
            alias,
            state: Mutex::new(State {
                phase: Phase::Unbound,
                route: Route::Override,
                original: None,
            }),
            doubles: Mutex::default(),
        })
    }

    #[must_use]
    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    /// Description of the subject, captured when the point was created.
    #[must_use]
    pub fn subject_label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Reserved name the original implementation is kept under while bound.
    #[must_use]
    pub fn alias(&self) -> &Selector {
        &self.alias
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    /// Returns `true` if an original implementation was captured.
    #[must_use]
    pub fn has_original(&self) -> bool {
        self.state.lock().original.is_some()
    }

    /// Snapshot of the registered doubles in dispatch order.
    #[must_use]
    pub fn doubles(&self) -> Vec<Arc<Double>> {
        self.doubles.lock().clone()
    }

    /// Append `double` to the dispatch order.
    pub fn register(&self, double: Arc<Double>) {
        self.doubles.lock().push(double);
    }

    /// Install the override on `subject`. Binding a point twice is a no-op.
    pub fn bind(self: &Arc<Self>, subject: &dyn Subject) {
        let mut state = self.state.lock();
        if state.phase != Phase::Unbound {
            return;
        }

        let table = subject.method_table();
        table.claim(self);

        let how = match table.resolve(&self.selector) {
            Resolution::Missing => {
                self.install_override(table);

                "override"
            }
            Resolution::Override => {
                self.install_override(table);

                "attached to existing override"
            }
            Resolution::Own(method) => {
                self.capture(table, &mut state, method, false);
                self.install_override(table);

                "own method aliased"
            }
            Resolution::Inherited(method) => {
                self.capture(table, &mut state, method, true);
                self.install_override(table);

                "inherited method aliased"
            }
            Resolution::Responder => {
                state.route = Route::Interceptor;

                "responder fallback"
            }
        };

        state.phase = Phase::Bound;

        debug!(subject = %self.label, selector = %self.selector, how, "bound interception point");
    }

    /// Dispatch `invocation` to the doubles of this point.
    ///
    /// # Errors
    /// See [`DispatchEngine::call`].
    pub fn dispatch(&self, invocation: &Invocation) -> Result<Value> {
        DispatchEngine::call(self, invocation)
    }

    /// Call the implementation the subject had before the point was bound.
    ///
    /// An inherited original is looked up on the class again, so the call sees
    /// the method the subject would inherit after a reset.
    ///
    /// # Errors
    /// Returns [`Error::NoMethod`] if there is neither a captured original nor
    /// a responder that answers the selector.
    pub fn call_original(&self, invocation: &Invocation) -> Result<Value> {
        let original = self
            .state
            .lock()
            .original
            .as_ref()
            .map(|o| (o.method.clone(), o.inherited));
        let subject = self.subject.upgrade();

        if let Some((captured, inherited)) = original {
            let live = subject
                .filter(|_| inherited)
                .and_then(|s| s.method_table().class().and_then(|c| c.lookup(self.selector.as_str())));

            return live.unwrap_or(captured)(invocation);
        }

        if let Some(subject) = subject {
            if let Some(ret) = subject
                .method_table()
                .call_responder(&self.selector, invocation)
            {
                return ret;
            }
        }

        Err(Error::NoMethod {
            subject: self.label.clone(),
            selector: self.selector.clone(),
        })
    }

    /// Verify every double in declaration order, then reset the point.
    ///
    /// The reset also happens if verification fails or panics.
    ///
    /// # Errors
    /// Returns the violation of the first double whose call count is outside
    /// its expected bound.
    pub fn verify(&self) -> Result<(), TimesCalledViolation> {
        let _guard = ResetGuard(self);

        for double in self.doubles() {
            double.verify(&self.label, &self.selector)?;
        }

        let mut state = self.state.lock();
        if state.phase == Phase::Bound {
            state.phase = Phase::Verified;
        }

        Ok(())
    }

    /// Uninstall the override and restore the original implementation.
    ///
    /// Safe to call in any phase and more than once.
    pub fn reset(&self) {
        let (previous, original, route) = {
            let mut state = self.state.lock();
            let previous = replace(&mut state.phase, Phase::Reset);

            (previous, state.original.take(), state.route)
        };

        if previous == Phase::Reset {
            return;
        }

        self.doubles.lock().clear();

        if previous == Phase::Unbound {
            return;
        }

        let Some(subject) = self.subject.upgrade() else {
            trace!(subject = %self.label, selector = %self.selector, "subject already dropped");

            return;
        };

        let table = subject.method_table();
        table.release(self);

        if route == Route::Override {
            table.remove_override(&self.selector);
        }

        match original {
            Some(Original {
                method,
                inherited: false,
            }) => {
                table.remove_method(self.alias.as_str());
                table.insert(self.selector.clone(), method, false);
            }
            Some(Original {
                inherited: true, ..
            }) => {
                table.remove_method(self.alias.as_str());
            }
            None => (),
        }

        debug!(subject = %self.label, selector = %self.selector, "reset interception point");
    }

    /// Returns `true` if calls for the selector have to be routed here by the
    /// registry's interceptor.
    pub(crate) fn intercepts_missing(&self) -> bool {
        let state = self.state.lock();

        state.route == Route::Interceptor && matches!(state.phase, Phase::Bound | Phase::Verified)
    }

    /// A method was defined for the selector while the point is bound: keep it
    /// as the original and make sure the override answers the calls.
    pub(crate) fn adopt(self: &Arc<Self>, table: &MethodTable, method: &Method) -> bool {
        let mut state = self.state.lock();
        if state.phase != Phase::Bound {
            return false;
        }

        self.capture(table, &mut state, method.clone(), false);

        if state.route == Route::Interceptor {
            state.route = Route::Override;
            self.install_override(table);
        }

        debug!(subject = %self.label, selector = %self.selector, "adopted late defined method");

        true
    }

    fn capture(&self, table: &MethodTable, state: &mut State, method: Method, inherited: bool) {
        table.insert(self.alias.clone(), method.clone(), false);

        state.original = Some(Original { method, inherited });
    }

    fn install_override(self: &Arc<Self>, table: &MethodTable) {
        let point = Arc::downgrade(self);
        let subject = self.label.clone();
        let selector = self.selector.clone();

        let dispatcher = method(move |invocation| match point.upgrade() {
            Some(point) => point.dispatch(invocation),
            None => Err(Error::SelectorNotDoubled {
                subject: subject.clone(),
                selector: selector.clone(),
            }),
        });

        table.insert(self.selector.clone(), dispatcher, true);
    }
}

impl Debug for InterceptionPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InterceptionPoint")
            .field("subject", &self.label)
            .field("selector", &self.selector)
            .field("phase", &self.phase())
            .field("doubles", &self.doubles.lock().len())
            .finish_non_exhaustive()
    }
}

struct ResetGuard<'a>(&'a InterceptionPoint);

impl Drop for ResetGuard<'_> {
    fn drop(&mut self) {
        self.0.reset();
    }
}
