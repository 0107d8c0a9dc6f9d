// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Events emitted by a [`StoryRunner`] to a [`Reporter`].
//!
//! Events are emitted in the order things happen: a story is opened by
//! [`Event::BeforeStory`] and closed by [`Event::AfterStory`], embedding its
//! scenarios, which embed the events of their given stories and steps.
//!
//! [`Reporter`]: crate::Reporter
//! [`StoryRunner`]: crate::StoryRunner

use std::sync::Arc;

use crate::{
    error::{PendingStep, StepError},
    model::{ExamplesTable, Row, Story},
};

/// Event of a story run.
#[derive(Clone, Debug)]
pub enum Event {
    /// Story run being started.
    BeforeStory {
        /// Started [`Story`].
        story: Arc<Story>,

        /// Whether the [`Story`] runs as a given story of another one.
        embedded: bool,
    },

    /// Story run being finished.
    AfterStory {
        /// Whether the story ran as a given story of another one.
        embedded: bool,
    },

    /// Scenario with the given title being started.
    BeforeScenario(String),

    /// Scenario being finished.
    AfterScenario,

    /// Given stories of a scenario about to be run, in their run order.
    GivenStories(Vec<String>),

    /// Scenario steps about to be run for every row of the `table`.
    BeforeExamples {
        /// Raw scenario steps.
        steps: Vec<String>,

        /// [`ExamplesTable`] parameterizing the steps.
        table: ExamplesTable,
    },

    /// Scenario steps about to be run for the given example [`Row`].
    Example(Row),

    /// All example rows being run.
    AfterExamples,

    /// Step (or hook) succeeded.
    Successful(String),

    /// Step (or hook) failed with the [`StepError`].
    Failed(String, StepError),

    /// Step matched no candidate.
    Pending(String),

    /// Step not performed because an earlier one failed or was pending.
    NotPerformed(String),

    /// Step marked as a comment.
    Ignorable(String),
}

impl Event {
    /// Returns the [`StepOutcome`] this [`Event`] reports, if it's a step
    /// one.
    #[must_use]
    pub fn as_outcome(&self) -> Option<StepOutcome> {
        Some(match self {
            Self::Successful(s) => StepOutcome::Successful(s.clone()),
            Self::Failed(s, e) => StepOutcome::Failed(s.clone(), e.clone()),
            Self::Pending(s) => StepOutcome::Pending(s.clone()),
            Self::NotPerformed(s) => StepOutcome::NotPerformed(s.clone()),
            Self::Ignorable(s) => StepOutcome::Ignorable(s.clone()),
            Self::BeforeStory { .. }
            | Self::AfterStory { .. }
            | Self::BeforeScenario(_)
            | Self::AfterScenario
            | Self::GivenStories(_)
            | Self::BeforeExamples { .. }
            | Self::Example(_)
            | Self::AfterExamples => return None,
        })
    }
}

/// Outcome of a single step (or hook), carrying its text.
#[derive(Clone, Debug)]
pub enum StepOutcome {
    /// Step succeeded.
    Successful(String),

    /// Step failed.
    Failed(String, StepError),

    /// Step matched no candidate.
    Pending(String),

    /// Step wasn't performed.
    NotPerformed(String),

    /// Step is a comment.
    Ignorable(String),
}

impl StepOutcome {
    /// Returns the text of the step.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Successful(s)
            | Self::Failed(s, _)
            | Self::Pending(s)
            | Self::NotPerformed(s)
            | Self::Ignorable(s) => s,
        }
    }

    /// Returns the [`StepError`] of a failed or pending step.
    #[must_use]
    pub fn error(&self) -> Option<StepError> {
        match self {
            Self::Failed(_, e) => Some(e.clone()),
            Self::Pending(s) => Some(PendingStep::new(s.clone()).into()),
            Self::Successful(_)
            | Self::NotPerformed(_)
            | Self::Ignorable(_) => None,
        }
    }
}

impl From<StepOutcome> for Event {
    fn from(outcome: StepOutcome) -> Self {
        match outcome {
            StepOutcome::Successful(s) => Self::Successful(s),
            StepOutcome::Failed(s, e) => Self::Failed(s, e),
            StepOutcome::Pending(s) => Self::Pending(s),
            StepOutcome::NotPerformed(s) => Self::NotPerformed(s),
            StepOutcome::Ignorable(s) => Self::Ignorable(s),
        }
    }
}
