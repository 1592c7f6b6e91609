//! Error types raised by intercepted calls and by verification.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

use crate::Selector;

/// Result type used by methods, dispatch and the lifecycle operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors an intercepted (or plain) call may fail with.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The call arguments matched none of the doubles registered for the
    /// selector.
    #[error(
        "{subject} received {selector}{args}, which does not match any expectation\nDeclared expectations:\n{}",
        list(.expectations)
    )]
    UnmatchedInvocation {
        subject: String,
        selector: Selector,
        args: String,
        expectations: Vec<String>,
    },

    /// The selector is intercepted but no double was registered for it.
    #[error("{selector} is intercepted on {subject} but has no doubles")]
    SelectorNotDoubled { subject: String, selector: Selector },

    /// The subject does not respond to the selector.
    #[error("undefined selector {selector} for {subject}")]
    NoMethod { subject: String, selector: Selector },

    /// A method implementation failed.
    #[error("{0}")]
    Raised(String),
}

impl Error {
    /// Create an error that is returned by a method implementation.
    pub fn raised<S: Into<String>>(message: S) -> Self {
        Self::Raised(message.into())
    }
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        return "  (none)".into();
    }

    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A double was called a number of times outside its declared bound.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{subject}.{selector}{expectation}: expected {expected}, {kind} ({observed})")]
pub struct TimesCalledViolation {
    pub subject: String,
    pub selector: Selector,
    pub expectation: String,
    pub expected: String,
    pub observed: usize,
    pub kind: ViolationKind,
}

/// Whether a double was called too few or too many times.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ViolationKind {
    TooFew,
    TooMany,
}

impl Display for ViolationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::TooFew => write!(f, "received fewer"),
            Self::TooMany => write!(f, "received more"),
        }
    }
}

/// Verification of one or more interception points failed.
#[derive(Debug, Clone, Error)]
#[error("{} expectation(s) were not met:\n{}", .violations.len(), render(.violations))]
pub struct VerificationFailed {
    pub violations: Vec<TimesCalledViolation>,
}

fn render(violations: &[TimesCalledViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}
