// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Story and scenario [`Hook`]s.

use std::sync::Arc;

use derive_more::with_trait::{Debug, Display};

use crate::{error::Failure, panic_trap};

/// Handler of a [`Hook`].
pub type HookFn<W> = Arc<dyn Fn(&mut W) -> anyhow::Result<()> + Send + Sync>;

/// Type of a [`Hook`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum HookType {
    /// Executed before each story.
    #[display("BeforeStory")]
    BeforeStory,

    /// Executed after each story.
    #[display("AfterStory")]
    AfterStory,

    /// Executed before each scenario pass.
    #[display("BeforeScenario")]
    BeforeScenario,

    /// Executed after each scenario pass.
    #[display("AfterScenario")]
    AfterScenario,
}

/// Outcome of the preceding units an after-scenario [`Hook`] runs upon.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UponOutcome {
    /// Runs whatever happened before.
    #[default]
    Any,

    /// Runs only if every preceding unit went fine.
    Success,

    /// Runs only if some preceding unit failed or was pending.
    Failure,
}

impl UponOutcome {
    /// Indicates whether a [`Hook`] with this [`UponOutcome`] runs, given
    /// whether the sequence went `fine` so far.
    #[must_use]
    pub const fn admits(self, fine: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Success => fine,
            Self::Failure => !fine,
        }
    }
}

/// Hook executed around stories or scenarios.
#[derive(Debug)]
pub struct Hook<W> {
    /// [`HookType`] of this [`Hook`].
    pub hook_type: HookType,

    /// Whether this story [`Hook`] runs for given (embedded) stories rather
    /// than for top-level ones.
    ///
    /// Always `false` for scenario hooks.
    pub upon_given_story: bool,

    /// [`UponOutcome`] this [`Hook`] runs upon.
    ///
    /// Always [`UponOutcome::Any`] for hooks other than after-scenario ones.
    pub upon_outcome: UponOutcome,

    /// Handler of this [`Hook`].
    #[debug(ignore)]
    pub handler: HookFn<W>,
}

// Implemented manually to omit redundant `W: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<W> Clone for Hook<W> {
    fn clone(&self) -> Self {
        Self {
            hook_type: self.hook_type,
            upon_given_story: self.upon_given_story,
            upon_outcome: self.upon_outcome,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<W> Hook<W> {
    /// Returns the text this [`Hook`] is reported with.
    #[must_use]
    pub fn label(&self) -> String {
        if self.upon_given_story {
            format!("@{} (upon given story)", self.hook_type)
        } else {
            format!("@{}", self.hook_type)
        }
    }

    /// Runs this [`Hook`] against the given `world`.
    ///
    /// # Errors
    ///
    /// If the handler fails or panics.
    pub fn run(&self, world: &mut W) -> Result<(), Failure> {
        panic_trap::run(&self.label(), || (self.handler)(world))
    }
}
