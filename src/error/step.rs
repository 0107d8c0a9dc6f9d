// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step outcome errors.
//!
//! These are data during a run: they are reported as events and only the
//! end-of-run strategies may turn them into an [`Err`].

use std::sync::Arc;

use derive_more::with_trait::{Display, Error};

use crate::parameters::InvalidParameter;

/// Step matching no registered candidate.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
#[display("Step `{step}` is pending")]
pub struct PendingStep {
    /// Text of the pending step.
    #[error(not(source))]
    pub step: String,
}

impl PendingStep {
    /// Creates a new [`PendingStep`] error.
    #[must_use]
    pub fn new(step: impl Into<String>) -> Self {
        Self { step: step.into() }
    }
}

/// Failure of a step or hook.
#[derive(Clone, Debug, Display, Error)]
pub enum Failure {
    /// Captured argument failed to convert.
    #[display("{_0}")]
    InvalidParameter(InvalidParameter),

    /// Handler returned an error.
    #[display("`{step}` failed: {cause}")]
    Invocation {
        /// Text of the failed step or hook.
        #[error(not(source))]
        step: String,

        /// Error returned by the handler.
        cause: Arc<anyhow::Error>,
    },

    /// Handler panicked.
    #[display("`{step}` panicked: {message}")]
    Panic {
        /// Text of the panicked step or hook.
        #[error(not(source))]
        step: String,

        /// Message of the panic payload.
        message: String,
    },
}

impl Failure {
    /// Creates a new [`Failure::Invocation`].
    #[must_use]
    pub fn invocation(step: impl Into<String>, cause: anyhow::Error) -> Self {
        Self::Invocation {
            step: step.into(),
            cause: Arc::new(cause),
        }
    }

    /// Creates a new [`Failure::Panic`].
    #[must_use]
    pub fn panic(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Panic {
            step: step.into(),
            message: message.into(),
        }
    }
}

/// Error outcome of a step.
#[derive(Clone, Debug, Display, Error)]
pub enum StepError {
    /// Step has no matching candidate.
    #[display("{_0}")]
    Pending(PendingStep),

    /// Step or hook failed.
    #[display("{_0}")]
    Failed(Failure),
}

impl StepError {
    /// Indicates whether this is a [`StepError::Pending`] one.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Indicates whether this is a [`StepError::Failed`] one.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the more important of the `current` and the `candidate`
    /// errors.
    ///
    /// A failure outranks a pending step. Among errors of equal rank the
    /// `current` one is kept.
    #[must_use]
    pub fn most_important(current: Option<Self>, candidate: Self) -> Self {
        match current {
            Some(current)
                if current.is_failure() || candidate.is_pending() =>
            {
                current
            }
            _ => candidate,
        }
    }
}

impl From<PendingStep> for StepError {
    fn from(err: PendingStep) -> Self {
        Self::Pending(err)
    }
}

impl From<Failure> for StepError {
    fn from(err: Failure) -> Self {
        Self::Failed(err)
    }
}

impl From<InvalidParameter> for StepError {
    fn from(err: InvalidParameter) -> Self {
        Self::Failed(Failure::InvalidParameter(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(step: &str) -> StepError {
        Failure::panic(step, "boom").into()
    }

    fn pending(step: &str) -> StepError {
        PendingStep::new(step).into()
    }

    #[test]
    fn failure_outranks_pending() {
        let kept = StepError::most_important(Some(pending("a")), failed("b"));

        assert!(kept.is_failure());
    }

    #[test]
    fn pending_never_replaces_failure() {
        let kept = StepError::most_important(Some(failed("a")), pending("b"));

        assert!(matches!(
            kept,
            StepError::Failed(Failure::Panic { step, .. }) if step == "a",
        ));
    }

    #[test]
    fn first_of_equal_rank_wins() {
        let kept = StepError::most_important(Some(failed("a")), failed("b"));
        assert!(matches!(
            kept,
            StepError::Failed(Failure::Panic { step, .. }) if step == "a",
        ));

        let kept = StepError::most_important(Some(pending("a")), pending("b"));
        assert!(matches!(kept, StepError::Pending(p) if p.step == "a"));

        let kept = StepError::most_important(None, pending("b"));
        assert!(kept.is_pending());
    }

    #[test]
    fn displays_step_and_cause() {
        let err = Failure::invocation("Given x", anyhow::anyhow!("no funds"));

        assert_eq!(err.to_string(), "`Given x` failed: no funds");
        assert_eq!(pending("When y").to_string(), "Step `When y` is pending");
    }
}
