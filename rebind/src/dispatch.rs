//! The [`dispatch`](self) module decides which double answers a call.

use std::sync::Arc;

use tracing::trace;

use crate::{Args, Double, Error, InterceptionPoint, Invocation, Result, Value};

/// Selects the double for an invocation, counts the call and produces the
/// response.
///
/// Doubles are tried in declaration order. The first double whose matcher
/// accepts the arguments and that is not exhausted yet wins. If every matching
/// double is exhausted the last matching one still receives the call, so the
/// over-call is counted and reported on verification.
#[derive(Debug)]
pub struct DispatchEngine;

impl DispatchEngine {
    /// Answer `invocation` on `point`.
    ///
    /// No lock is held while the selected double responds, so the response
    /// may call other (or the same) intercepted selectors.
    ///
    /// # Errors
    /// - [`Error::SelectorNotDoubled`] if the point has no doubles
    /// - [`Error::UnmatchedInvocation`] if no double matches the arguments
    /// - any error returned by the response itself
    pub fn call(point: &InterceptionPoint, invocation: &Invocation) -> Result<Value> {
        let double = Self::select(point, &invocation.args)?;

        double.respond(invocation, |invocation| point.call_original(invocation))
    }

    /// Select the double for `args` and record the call on it.
    ///
    /// Matchers run on a snapshot of the doubles without holding the point's
    /// lock, so a matcher may call the intercepted selector itself.
    ///
    /// # Errors
    /// See [`call`](Self::call).
    pub fn select(point: &InterceptionPoint, args: &Args) -> Result<Arc<Double>> {
        let doubles = point.doubles();

        if doubles.is_empty() {
            return Err(Error::SelectorNotDoubled {
                subject: point.subject_label().into(),
                selector: point.selector().clone(),
            });
        }

        let mut last = None;
        for (index, double) in doubles.iter().enumerate() {
            if !double.matches(args) {
                continue;
            }

            if !double.is_exhausted() {
                double.record();

                trace!(
                    subject = point.subject_label(),
                    selector = %point.selector(),
                    %args,
                    index,
                    "dispatched call"
                );

                return Ok(double.clone());
            }

            last = Some((index, double));
        }

        if let Some((index, double)) = last {
            double.record();

            trace!(
                subject = point.subject_label(),
                selector = %point.selector(),
                %args,
                index,
                "dispatched call to exhausted double"
            );

            return Ok(double.clone());
        }

        Err(Error::UnmatchedInvocation {
            subject: point.subject_label().into(),
            selector: point.selector().clone(),
            args: args.to_string(),
            expectations: doubles
                .iter()
                .map(|d| format!("{}({})", point.selector(), d.expectation()))
                .collect(),
        })
    }
}
