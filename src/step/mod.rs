// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step definitions, their compiled patterns and the [`Collection`] matching
//! step texts against them.
//!
//! - [`pattern`]: compilation of `$placeholder` patterns
//! - [`variants`]: expansion of `{a|b}` pattern directives
//! - [`candidate`]: step [`Definition`]s and compiled [`CandidateStep`]s
//! - [`collection`]: the registry and its lookups
//! - [`context`]: arguments handed to step handlers

pub mod candidate;
pub mod collection;
pub mod context;
pub mod error;
pub mod hook;
pub mod pattern;
pub mod variants;

use derive_more::with_trait::Display;

#[doc(inline)]
pub use self::{
    candidate::{CandidateStep, Definition, Handler},
    collection::{Collection, CollectionBuilder, Match, find_across},
    context::{Argument, Context},
    error::{DuplicateDefinition, InvalidPattern},
    hook::{Hook, HookFn, HookType, UponOutcome},
    pattern::{StepMatcher, StepPatternParser},
};

/// Type of a step.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum StepType {
    /// Sets up the initial context.
    #[display("Given")]
    Given,

    /// Describes an action.
    #[display("When")]
    When,

    /// Asserts an outcome.
    #[display("Then")]
    Then,
}
