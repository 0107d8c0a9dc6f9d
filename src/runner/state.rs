// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`ExecutionState`] of a story run.

use crate::{Configuration, error::StepError};

/// State of the step sequence being run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SequenceState {
    /// Every unit of the sequence went fine so far.
    #[default]
    FineSoFar,

    /// Some unit failed or was pending, so the rest isn't performed.
    SomethingHappened,
}

/// Strategy deciding the outcome of a run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActiveStrategy {
    /// [`ErrorStrategy`] of the [`Configuration`].
    ///
    /// [`ErrorStrategy`]: crate::strategy::ErrorStrategy
    Error,

    /// [`PendingStepStrategy`] of the [`Configuration`].
    ///
    /// [`PendingStepStrategy`]: crate::strategy::PendingStepStrategy
    Pending,
}

/// State of a top-level story run.
///
/// The [`SequenceState`] resets at every step sequence, while the
/// outstanding error persists for the whole run, given stories included.
#[derive(Clone, Debug, Default)]
pub struct ExecutionState {
    /// State of the current step sequence.
    sequence: SequenceState,

    /// Most important error of the run so far.
    outstanding: Option<StepError>,
}

impl ExecutionState {
    /// Returns the [`SequenceState`] of the current step sequence.
    #[must_use]
    pub const fn sequence(&self) -> SequenceState {
        self.sequence
    }

    /// Returns the most important error of the run so far.
    #[must_use]
    pub const fn outstanding_error(&self) -> Option<&StepError> {
        self.outstanding.as_ref()
    }

    /// Returns the strategy the outstanding error is to be handled with.
    #[must_use]
    pub fn active_strategy(&self) -> ActiveStrategy {
        match &self.outstanding {
            Some(e) if e.is_pending() => ActiveStrategy::Pending,
            _ => ActiveStrategy::Error,
        }
    }

    /// Indicates whether the current step sequence went fine so far.
    #[must_use]
    pub fn is_fine(&self) -> bool {
        self.sequence == SequenceState::FineSoFar
    }

    /// Clears the outstanding error at the start of a top-level run.
    pub(crate) fn reset_run(&mut self) {
        self.outstanding = None;
        self.sequence = SequenceState::FineSoFar;
    }

    /// Starts a new step sequence.
    pub(crate) fn reset_sequence(&mut self) {
        self.sequence = SequenceState::FineSoFar;
    }

    /// Records the given `error` of a performed unit.
    ///
    /// A failure outranks a pending step, otherwise the first seen error is
    /// kept.
    pub(crate) fn record(&mut self, error: StepError) {
        self.sequence = SequenceState::SomethingHappened;
        self.outstanding =
            Some(StepError::most_important(self.outstanding.take(), error));
    }

    /// Hands the outstanding error over to the active strategy of the given
    /// [`Configuration`].
    pub(crate) fn conclude(
        &self,
        config: &Configuration,
    ) -> Result<(), StepError> {
        match self.active_strategy() {
            ActiveStrategy::Pending => {
                config.pending_strategy().handle(self.outstanding.as_ref())
            }
            ActiveStrategy::Error => {
                config.error_strategy().handle(self.outstanding.as_ref())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Failure, PendingStep};

    #[test]
    fn failure_outranks_pending() {
        let mut state = ExecutionState::default();

        state.record(PendingStep::new("Given a").into());
        assert_eq!(state.active_strategy(), ActiveStrategy::Pending);
        assert_eq!(state.sequence(), SequenceState::SomethingHappened);

        state.reset_sequence();
        state.record(Failure::panic("When b", "boom").into());
        state.record(PendingStep::new("Then c").into());

        assert_eq!(state.active_strategy(), ActiveStrategy::Error);
        assert_eq!(
            state.outstanding_error().map(ToString::to_string).as_deref(),
            Some("`When b` panicked: boom"),
        );
    }

    #[test]
    fn first_failure_is_kept() {
        let mut state = ExecutionState::default();

        state.record(Failure::panic("Given a", "first").into());
        state.record(Failure::panic("Given b", "second").into());

        assert!(
            state
                .outstanding_error()
                .unwrap()
                .to_string()
                .contains("first"),
        );

        state.reset_run();
        assert!(state.outstanding_error().is_none());
        assert!(state.is_fine());
    }

    #[test]
    fn conclusion_uses_the_strategy_of_the_error_kind() {
        let config = Configuration::default();
        let mut state = ExecutionState::default();
        assert!(state.conclude(&config).is_ok());

        state.record(PendingStep::new("Given a").into());
        assert!(state.conclude(&config).is_ok());

        state.record(Failure::panic("Given b", "boom").into());
        assert!(state.conclude(&config).unwrap_err().is_failure());
    }
}
