//! The [`subject`](self) module implements the dispatch boundary that makes an
//! instance interceptable.
//!
//! Rust has no per-instance method tables, so a type opts in by implementing
//! [`Subject`] and routing the calls of its trait facade through its
//! [`MethodTable`]. The table answers selectors in this order:
//!
//!   1. methods defined on the instance itself (including installed overrides)
//!   2. methods inherited from the shared [`Class`]
//!   3. the engine's [`Interceptor`]s, newest first
//!   4. the instance's [`Responder`], which may answer arbitrary selectors
//!
//! No lock of the table is held while a method runs, so methods may call back
//! into the same subject.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::{Error, InterceptionPoint, Invocation, Phase, Result, Value};

/// Identity of a subject, allocated once per [`MethodTable`].
///
/// The id is never derived from the subject's value, so two subjects that are
/// equal but distinct always get different ids.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubjectId(usize);

impl Display for SubjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Get the next subject id
pub fn next_subject_id() -> SubjectId {
    SubjectId(NEXT_SUBJECT_ID.fetch_add(1, Ordering::Relaxed))
}

static NEXT_SUBJECT_ID: AtomicUsize = AtomicUsize::new(0);

/// Name of an intercepted method.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Selector(Arc<str>);

impl Selector {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl Debug for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:?}", &*self.0)
    }
}

impl Borrow<str> for Selector {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<&Selector> for Selector {
    fn from(value: &Selector) -> Self {
        value.clone()
    }
}

/// Implementation of a selector.
pub type Method = Arc<dyn Fn(&Invocation) -> Result<Value> + Send + Sync>;

/// Create a [`Method`] from a closure.
pub fn method<F>(f: F) -> Method
where
    F: Fn(&Invocation) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Answers selectors that are not defined as methods, like a catch-all
/// handler of a dynamic proxy.
pub trait Responder: Send + Sync {
    /// Returns `true` if the responder answers `selector`.
    fn responds_to(&self, selector: &str) -> bool;

    /// Answer `selector`.
    ///
    /// # Errors
    /// Whatever the responder fails with, usually [`Error::NoMethod`].
    fn call(&self, selector: &Selector, invocation: &Invocation) -> Result<Value>;
}

/// Hook installed by the engine into the table of an intercepted subject.
pub trait Interceptor: Send + Sync {
    /// Returns the method that should answer `selector`, which is neither
    /// defined on the subject nor inherited.
    fn lookup(&self, selector: &Selector) -> Option<Method>;

    /// Called before `method` is defined for `selector` on the subject.
    ///
    /// Returns `true` if the interceptor took the method over, in which case
    /// the table does not store it under `selector`.
    fn method_added(&self, table: &MethodTable, selector: &Selector, method: &Method) -> bool;
}

/// Shared set of methods that subjects inherit.
pub struct Class {
    name: String,
    methods: RwLock<HashMap<Selector, Method>>,
}

impl Class {
    pub fn new<S: Into<String>>(name: S) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            methods: RwLock::default(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Define (or replace) `selector` for all subjects of this class.
    pub fn define<S, F>(&self, selector: S, f: F)
    where
        S: Into<Selector>,
        F: Fn(&Invocation) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.write().insert(selector.into(), method(f));
    }

    pub fn remove(&self, selector: &str) -> Option<Method> {
        self.methods.write().remove(selector)
    }

    #[must_use]
    pub fn lookup(&self, selector: &str) -> Option<Method> {
        self.methods.read().get(selector).cloned()
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Class").field("name", &self.name).finish_non_exhaustive()
    }
}

/// How a subject currently answers a selector.
pub(crate) enum Resolution {
    /// Defined directly on the instance.
    Own(Method),

    /// Answered by an override that was installed before.
    Override,

    /// Inherited from the class.
    Inherited(Method),

    /// Only answered by the responder.
    Responder,

    /// Not answered at all.
    Missing,
}

#[derive(Clone)]
struct Entry {
    method: Method,
    is_override: bool,
}

#[derive(Default)]
struct TableState {
    own: HashMap<Selector, Entry>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    responder: Option<Arc<dyn Responder>>,

    /// Bound interception point of each intercepted selector.
    claims: HashMap<Selector, Weak<InterceptionPoint>>,
}

/// Per-instance dispatch table of a [`Subject`].
pub struct MethodTable {
    id: SubjectId,
    class: Option<Arc<Class>>,
    state: RwLock<TableState>,
}

impl MethodTable {
    /// Create an empty table with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: next_subject_id(),
            class: None,
            state: RwLock::default(),
        }
    }

    /// Create an empty table that inherits the methods of `class`.
    #[must_use]
    pub fn with_class(class: Arc<Class>) -> Self {
        Self {
            class: Some(class),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn id(&self) -> SubjectId {
        self.id
    }

    #[must_use]
    pub fn class(&self) -> Option<&Arc<Class>> {
        self.class.as_ref()
    }

    /// Define `selector` on this instance.
    ///
    /// If the selector is intercepted the new method becomes the original
    /// implementation behind the interception instead.
    pub fn define_method<S: Into<Selector>>(&self, selector: S, method: Method) {
        let selector = selector.into();

        let interceptors = self.state.read().interceptors.clone();
        if interceptors
            .iter()
            .any(|i| i.method_added(self, &selector, &method))
        {
            return;
        }

        self.insert(selector, method, false);
    }

    /// Define `selector` on this instance from a closure.
    pub fn define<S, F>(&self, selector: S, f: F)
    where
        S: Into<Selector>,
        F: Fn(&Invocation) -> Result<Value> + Send + Sync + 'static,
    {
        self.define_method(selector, method(f));
    }

    /// Remove the method defined on this instance.
    pub fn remove_method(&self, selector: &str) -> Option<Method> {
        self.state.write().own.remove(selector).map(|e| e.method)
    }

    /// Set the responder that answers arbitrary selectors.
    pub fn set_responder<R: Responder + 'static>(&self, responder: R) {
        self.state.write().responder = Some(Arc::new(responder));
    }

    #[must_use]
    pub fn has_own_method(&self, selector: &str) -> bool {
        self.state.read().own.contains_key(selector)
    }

    /// Returns `true` if the subject answers `selector` in any way.
    #[must_use]
    pub fn responds_to(&self, selector: &str) -> bool {
        let state = self.state.read();

        state.own.contains_key(selector)
            || self.inherited(selector).is_some()
            || state
                .responder
                .as_ref()
                .is_some_and(|r| r.responds_to(selector))
    }

    /// Invoke `selector` with the passed `invocation`.
    ///
    /// # Errors
    /// Returns [`Error::NoMethod`] if the subject does not answer `selector`,
    /// or whatever error the answering method returns.
    pub fn send<S, I>(&self, selector: S, invocation: I) -> Result<Value>
    where
        S: Into<Selector>,
        I: Into<Invocation>,
    {
        let selector = selector.into();
        let invocation = invocation.into();

        let (method, interceptors, responder) = {
            let state = self.state.read();
            let method = state
                .own
                .get(&selector)
                .map(|e| e.method.clone())
                .or_else(|| self.inherited(selector.as_str()));

            (method, state.interceptors.clone(), state.responder.clone())
        };

        if let Some(method) = method {
            return method(&invocation);
        }

        if let Some(method) = interceptors.iter().rev().find_map(|i| i.lookup(&selector)) {
            return method(&invocation);
        }

        match responder {
            Some(responder) if responder.responds_to(selector.as_str()) => {
                responder.call(&selector, &invocation)
            }
            _ => Err(Error::NoMethod {
                subject: format!("#<subject:{}>", self.id),
                selector,
            }),
        }
    }

    /// Forward `selector` to the responder, bypassing every method and the
    /// interceptor.
    pub(crate) fn call_responder(&self, selector: &Selector, invocation: &Invocation) -> Option<Result<Value>> {
        let responder = self.state.read().responder.clone()?;

        responder
            .responds_to(selector.as_str())
            .then(|| responder.call(selector, invocation))
    }

    pub(crate) fn resolve(&self, selector: &Selector) -> Resolution {
        let state = self.state.read();

        match state.own.get(selector) {
            Some(entry) if entry.is_override => Resolution::Override,
            Some(entry) => Resolution::Own(entry.method.clone()),
            None => match self.inherited(selector.as_str()) {
                Some(method) => Resolution::Inherited(method),
                None if state
                    .responder
                    .as_ref()
                    .is_some_and(|r| r.responds_to(selector.as_str())) =>
                {
                    Resolution::Responder
                }
                None => Resolution::Missing,
            },
        }
    }

    pub(crate) fn insert(&self, selector: Selector, method: Method, is_override: bool) {
        self.state
            .write()
            .own
            .insert(selector, Entry { method, is_override });
    }

    pub(crate) fn remove_override(&self, selector: &Selector) {
        let mut state = self.state.write();

        if state.own.get(selector).is_some_and(|e| e.is_override) {
            state.own.remove(selector);
        }
    }

    pub(crate) fn install_interceptor(&self, interceptor: Arc<dyn Interceptor>) {
        self.state.write().interceptors.push(interceptor);
    }

    pub(crate) fn remove_interceptor(&self, interceptor: &Arc<dyn Interceptor>) {
        self.state
            .write()
            .interceptors
            .retain(|i| !Arc::ptr_eq(i, interceptor));
    }

    pub(crate) fn has_interceptor(&self) -> bool {
        !self.state.read().interceptors.is_empty()
    }

    /// Record `point` as the bound point of its selector.
    pub(crate) fn claim(&self, point: &Arc<InterceptionPoint>) {
        self.state
            .write()
            .claims
            .insert(point.selector().clone(), Arc::downgrade(point));
    }

    /// Drop the claim of `point`, unless another point holds it.
    pub(crate) fn release(&self, point: &InterceptionPoint) {
        let mut state = self.state.write();

        if state
            .claims
            .get(point.selector())
            .is_some_and(|w| ptr::eq(w.as_ptr(), point))
        {
            state.claims.remove(point.selector());
        }
    }

    /// Point that currently holds the claim on `selector`.
    pub(crate) fn claimant(&self, selector: &str) -> Option<Arc<InterceptionPoint>> {
        let claim = self.state.read().claims.get(selector).cloned()?;

        claim.upgrade().filter(|p| p.phase() != Phase::Reset)
    }

    fn inherited(&self, selector: &str) -> Option<Method> {
        self.class.as_ref().and_then(|c| c.lookup(selector))
    }
}

impl Default for MethodTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for MethodTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let state = self.state.read();
        let mut own = state.own.keys().map(Selector::as_str).collect::<Vec<_>>();
        own.sort_unstable();

        f.debug_struct("MethodTable")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("own", &own)
            .finish_non_exhaustive()
    }
}

/// An object whose selectors can be intercepted.
///
/// Identity is the id of the [`MethodTable`]; the engine never compares or
/// hashes the implementing type itself.
pub trait Subject: Send + Sync + 'static {
    /// The dispatch table of this instance.
    fn method_table(&self) -> &MethodTable;

    /// Human readable name used in error messages.
    fn describe(&self) -> String {
        format!("#<subject:{}>", self.method_table().id())
    }

    fn subject_id(&self) -> SubjectId {
        self.method_table().id()
    }

    fn responds_to(&self, selector: &str) -> bool {
        self.method_table().responds_to(selector)
    }

    /// Invoke `selector` on this subject.
    ///
    /// # Errors
    /// See [`MethodTable::send`].
    fn send<S, I>(&self, selector: S, invocation: I) -> Result<Value>
    where
        Self: Sized,
        S: Into<Selector>,
        I: Into<Invocation>,
    {
        let selector = selector.into();

        self.method_table()
            .send(selector.clone(), invocation)
            .map_err(|err| match err {
                Error::NoMethod { selector: s, .. } if s == selector => Error::NoMethod {
                    subject: self.describe(),
                    selector,
                },
                err => err,
            })
    }
}

/// Shared handle to a [`Subject`], accepted wherever a subject is declared on.
///
/// Implemented for `Arc<T>` of any concrete subject and for
/// `Arc<dyn Subject>`.
pub trait SubjectRef {
    fn to_subject(&self) -> Arc<dyn Subject>;
}

impl<T: Subject> SubjectRef for Arc<T> {
    fn to_subject(&self) -> Arc<dyn Subject> {
        self.clone()
    }
}

impl SubjectRef for Arc<dyn Subject> {
    fn to_subject(&self) -> Arc<dyn Subject> {
        self.clone()
    }
}
