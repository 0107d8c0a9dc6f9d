// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Strategies deciding at the end of a run whether its outstanding
//! [`StepError`] turns the run into a failure.

use std::fmt::Debug;

use crate::error::StepError;

/// Strategy handling the outstanding failure of a run.
pub trait ErrorStrategy: Debug + Send + Sync {
    /// Handles the outstanding `error` of a run, if any.
    ///
    /// # Errors
    ///
    /// If the run should fail.
    fn handle(&self, error: Option<&StepError>) -> Result<(), StepError>;
}

/// Strategy handling the outstanding pending step of a run.
pub trait PendingStepStrategy: Debug + Send + Sync {
    /// Handles the outstanding pending `error` of a run, if any.
    ///
    /// # Errors
    ///
    /// If the run should fail.
    fn handle(&self, error: Option<&StepError>) -> Result<(), StepError>;
}

/// [`ErrorStrategy`] swallowing any failure, leaving it visible only through
/// the reported events.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentlyAbsorbing;

impl ErrorStrategy for SilentlyAbsorbing {
    fn handle(&self, _: Option<&StepError>) -> Result<(), StepError> {
        Ok(())
    }
}

/// [`ErrorStrategy`] returning any failure to the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rethrowing;

impl ErrorStrategy for Rethrowing {
    fn handle(&self, error: Option<&StepError>) -> Result<(), StepError> {
        error.map_or(Ok(()), |e| Err(e.clone()))
    }
}

/// [`PendingStepStrategy`] treating pending steps as passing.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassingUponPending;

impl PendingStepStrategy for PassingUponPending {
    fn handle(&self, _: Option<&StepError>) -> Result<(), StepError> {
        Ok(())
    }
}

/// [`PendingStepStrategy`] failing the run on a pending step.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingUponPending;

impl PendingStepStrategy for FailingUponPending {
    fn handle(&self, error: Option<&StepError>) -> Result<(), StepError> {
        error.map_or(Ok(()), |e| Err(e.clone()))
    }
}
