//! The [`registry`](self) module implements [`IdentityRegistry`], the table of
//! interception points keyed by subject identity.

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::trace;

use crate::subject::{method, Interceptor, Method, MethodTable};
use crate::{InterceptionPoint, Selector, Subject, SubjectId};

/// Interception points of all subjects, keyed by [`SubjectId`].
///
/// Subjects are referenced weakly and dropped from the registry as soon as
/// their last point is forgotten.
pub struct IdentityRegistry {
    inner: Arc<Mutex<Entries>>,
    alias_prefix: String,
}

#[derive(Default)]
struct Entries {
    subjects: BTreeMap<SubjectId, SubjectEntry>,
}

struct SubjectEntry {
    subject: Weak<dyn Subject>,
    interceptor: Arc<dyn Interceptor>,
    points: Vec<Arc<InterceptionPoint>>,
}

impl Entries {
    fn find(&self, subject: SubjectId, selector: &str) -> Option<&Arc<InterceptionPoint>> {
        self.subjects
            .get(&subject)?
            .points
            .iter()
            .find(|p| p.selector().as_str() == selector)
    }
}

impl IdentityRegistry {
    /// Create an empty registry whose points keep original implementations
    /// under `alias_prefix` + selector.
    pub fn new<S: Into<String>>(alias_prefix: S) -> Self {
        Self {
            inner: Arc::default(),
            alias_prefix: alias_prefix.into(),
        }
    }

    /// Get the point for `(subject, selector)`, creating an unbound one if
    /// there is none yet.
    ///
    /// # Panics
    /// If the pair is already bound by a point of another registry. A subject
    /// table holds one override per selector, so two sessions must not double
    /// the same selector of the same subject at the same time.
    pub fn find_or_create(&self, subject: &Arc<dyn Subject>, selector: &Selector) -> Arc<InterceptionPoint> {
        let id = subject.subject_id();

        if let Some(point) = self.find(id, selector.as_str()) {
            return point;
        }

        if let Some(other) = subject.method_table().claimant(selector.as_str()) {
            panic!(
                "{}.{} is already doubled by another session",
                other.subject_label(),
                other.selector()
            );
        }

        let (point, interceptor) = {
            let mut entries = self.inner.lock();
            if let Some(point) = entries.find(id, selector.as_str()) {
                return point.clone();
            }

            let mut interceptor = None;
            let entry = entries.subjects.entry(id).or_insert_with(|| {
                let hook: Arc<dyn Interceptor> = Arc::new(RegistryInterceptor {
                    entries: Arc::downgrade(&self.inner),
                    subject: id,
                });
                interceptor = Some(hook.clone());

                SubjectEntry {
                    subject: Arc::downgrade(subject),
                    interceptor: hook,
                    points: Vec::new(),
                }
            });

            let point = InterceptionPoint::new(subject, selector.clone(), &self.alias_prefix);
            entry.points.push(point.clone());

            (point, interceptor)
        };

        if let Some(interceptor) = interceptor {
            subject.method_table().install_interceptor(interceptor);

            trace!(subject = %subject.describe(), "subject registered");
        }

        point
    }

    #[must_use]
    pub fn find(&self, subject: SubjectId, selector: &str) -> Option<Arc<InterceptionPoint>> {
        self.inner.lock().find(subject, selector).cloned()
    }

    #[must_use]
    pub fn exists(&self, subject: SubjectId, selector: &str) -> bool {
        self.inner.lock().find(subject, selector).is_some()
    }

    /// Points of `subject`, or of all subjects if `None` is passed.
    ///
    /// Subjects are visited in registration order, points in creation order.
    #[must_use]
    pub fn each(&self, subject: Option<SubjectId>) -> Vec<Arc<InterceptionPoint>> {
        let entries = self.inner.lock();

        match subject {
            Some(id) => entries
                .subjects
                .get(&id)
                .map(|e| e.points.clone())
                .unwrap_or_default(),
            None => entries
                .subjects
                .values()
                .flat_map(|e| e.points.iter().cloned())
                .collect(),
        }
    }

    /// Ids of all subjects with at least one point.
    #[must_use]
    pub fn subjects(&self) -> Vec<SubjectId> {
        self.inner.lock().subjects.keys().copied().collect()
    }

    /// Remove the point for `(subject, selector)` from the registry.
    ///
    /// The point itself is not reset. If it was the last point of the subject
    /// the subject is removed as well.
    pub fn forget(&self, subject: SubjectId, selector: &str) -> Option<Arc<InterceptionPoint>> {
        let (point, removed) = {
            let mut entries = self.inner.lock();
            let entry = entries.subjects.get_mut(&subject)?;
            let index = entry
                .points
                .iter()
                .position(|p| p.selector().as_str() == selector)?;
            let point = entry.points.remove(index);

            let removed = if entry.points.is_empty() {
                entries.subjects.remove(&subject)
            } else {
                None
            };

            (point, removed)
        };

        let removed = removed.and_then(|e| Some((e.subject.upgrade()?, e.interceptor)));
        if let Some((subject, interceptor)) = removed {
            subject.method_table().remove_interceptor(&interceptor);

            trace!(subject = %subject.describe(), "subject unregistered");
        }

        Some(point)
    }

    /// Number of registered points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .subjects
            .values()
            .map(|e| e.points.len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().subjects.is_empty()
    }
}

impl Debug for IdentityRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let entries = self.inner.lock();

        f.debug_map()
            .entries(entries.subjects.iter().map(|(id, e)| {
                let selectors = e.points.iter().map(|p| p.selector().clone()).collect::<Vec<_>>();

                (id, selectors)
            }))
            .finish()
    }
}

/// Catch-any fallback installed into the table of every registered subject.
struct RegistryInterceptor {
    entries: Weak<Mutex<Entries>>,
    subject: SubjectId,
}

impl RegistryInterceptor {
    fn find(&self, selector: &str) -> Option<Arc<InterceptionPoint>> {
        self.entries
            .upgrade()?
            .lock()
            .find(self.subject, selector)
            .cloned()
    }
}

impl Interceptor for RegistryInterceptor {
    fn lookup(&self, selector: &Selector) -> Option<Method> {
        let point = self.find(selector.as_str())?;
        if !point.intercepts_missing() {
            return None;
        }

        Some(method(move |invocation| point.dispatch(invocation)))
    }

    fn method_added(&self, table: &MethodTable, selector: &Selector, method: &Method) -> bool {
        self.find(selector.as_str())
            .is_some_and(|point| point.adopt(table, method))
    }
}
