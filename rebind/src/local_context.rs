//! The [`local_context`](self) module implements the [`LocalSession`] type.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::ops::Deref;

use crate::Session;

/// Guard that makes a [`Session`] the current session of this thread.
///
/// Doubles declared through [`mock`](crate::mock), [`stub`](crate::stub) and
/// [`probe`](crate::probe) end up in the innermost local session, or in the
/// [global](Session::global) session if no local session exists.
///
/// Local sessions are useful to run tests in parallel: using the global session
/// the points of multiple tests are verified and reset together.
///
/// A selector of a subject can only be doubled by one session at a time, so
/// an inner session must not double a selector the outer one has bound.
#[must_use]
#[derive(Debug)]
pub struct LocalSession {
    session: Session,
    _marker: PhantomData<*const ()>,
}

struct Inner {
    parent: Option<Box<Inner>>,
    session: Session,
}

impl LocalSession {
    /// Push a new session with the default config.
    pub fn new() -> Self {
        Self::with_session(Session::new())
    }

    /// Push `session` as current session of this thread.
    pub fn with_session(session: Session) -> Self {
        CURRENT_SESSION.with(|cell| {
            let mut cell = cell.borrow_mut();
            let parent = cell.take().map(Box::new);

            *cell = Some(Inner {
                parent,
                session: session.clone(),
            });
        });

        Self {
            session,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get the innermost local session of this thread.
    #[must_use]
    pub fn current() -> Option<Session> {
        CURRENT_SESSION.with(|cell| cell.borrow().as_ref().map(|inner| inner.session.clone()))
    }
}

impl Default for LocalSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for LocalSession {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.session
    }
}

impl Drop for LocalSession {
    fn drop(&mut self) {
        CURRENT_SESSION.with(|cell| {
            let mut cell = cell.borrow_mut();
            if let Some(inner) = cell.take() {
                *cell = inner.parent.map(|x| *x);
            }
        });
    }
}

thread_local! {
    static CURRENT_SESSION: RefCell<Option<Inner>> = RefCell::new(None);
}
