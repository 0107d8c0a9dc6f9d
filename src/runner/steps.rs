// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Resolution and execution of step sequences.

use std::{borrow::Cow, sync::Arc};

use lazy_regex::{Captures, regex};

use super::state::ExecutionState;
use crate::{
    Configuration, Reporter,
    event::StepOutcome,
    model::Row,
    parameters::Converters,
    step::{Collection, Hook, HookType, Match, find_across},
};

/// Single unit of a step sequence.
#[derive(Debug)]
pub(crate) enum Unit<'c, W> {
    /// Story or scenario [`Hook`].
    Hook(&'c Hook<W>),

    /// Step matched by a candidate.
    Matched {
        /// Step text, with example values substituted.
        text: String,

        /// Matched candidate with its raw arguments.
        found: Match<'c, W>,
    },

    /// Step matching no candidate.
    Pending(String),

    /// Comment step.
    Ignorable(String),
}

impl<W> Unit<'_, W> {
    /// Performs this [`Unit`] against the given `world`.
    ///
    /// Returns [`None`] for a successful [`Hook`], which isn't reported.
    fn perform(
        &self,
        world: &mut W,
        converters: &Converters,
        row: Option<&Row>,
        dry_run: bool,
    ) -> Option<StepOutcome> {
        match self {
            Self::Hook(_) if dry_run => None,
            Self::Hook(hook) => hook
                .run(world)
                .err()
                .map(|e| StepOutcome::Failed(hook.label(), e.into())),
            Self::Matched { text, .. } if dry_run => {
                Some(StepOutcome::Successful(text.clone()))
            }
            Self::Matched { text, found } => Some(
                match found
                    .candidate
                    .invoke(world, text, &found.args, row, converters)
                {
                    Ok(()) => StepOutcome::Successful(text.clone()),
                    Err(e) => StepOutcome::Failed(text.clone(), e),
                },
            ),
            Self::Pending(text) => Some(StepOutcome::Pending(text.clone())),
            Self::Ignorable(text) => Some(StepOutcome::Ignorable(text.clone())),
        }
    }

    /// Returns the outcome of this [`Unit`] once something happened earlier
    /// in the sequence.
    fn not_performed(&self) -> StepOutcome {
        match self {
            Self::Hook(hook) => StepOutcome::NotPerformed(hook.label()),
            Self::Matched { text, .. } | Self::Pending(text) => {
                StepOutcome::NotPerformed(text.clone())
            }
            Self::Ignorable(text) => StepOutcome::Ignorable(text.clone()),
        }
    }
}

/// Replaces every `<column>` token of the `step` with the value of the
/// `row`.
///
/// Tokens naming no column are left as is.
#[must_use]
pub fn substitute<'s>(step: &'s str, row: Option<&Row>) -> Cow<'s, str> {
    let Some(row) = row else {
        return Cow::Borrowed(step);
    };
    regex!(r"<([^<>\s]+)>").replace_all(step, |caps: &Captures<'_>| {
        row.get(&caps[1]).cloned().unwrap_or_else(|| caps[0].to_owned())
    })
}

/// Resolves the `raw` step text against the given registries.
pub(crate) fn resolve<'c, W>(
    config: &Configuration,
    collections: &'c [Arc<Collection<W>>],
    raw: &str,
    row: Option<&Row>,
) -> Unit<'c, W> {
    let text = substitute(raw, row).into_owned();
    if config.keywords().is_ignorable(&text) {
        return Unit::Ignorable(text);
    }
    match find_across(collections, &text) {
        Some(found) => {
            tracing::debug!(
                step = %text,
                pattern = found.candidate.pattern(),
                "step resolved",
            );
            Unit::Matched { text, found }
        }
        None => {
            tracing::debug!(step = %text, "no candidate matches the step");
            Unit::Pending(text)
        }
    }
}

/// Lists the story [`Hook`]s of the given `hook_type`, in registry order.
pub(crate) fn story_hooks<W>(
    collections: &[Arc<Collection<W>>],
    hook_type: HookType,
    embedded: bool,
) -> Vec<Unit<'_, W>> {
    collections
        .iter()
        .flat_map(|c| c.hooks(hook_type))
        .filter(|h| h.upon_given_story == embedded)
        .map(Unit::Hook)
        .collect()
}

/// Builds the sequence of a scenario pass: before-scenario hooks of the
/// registries in reverse order, the resolved `steps`, then after-scenario
/// hooks of the registries in forward order.
pub(crate) fn scenario_units<'c, W>(
    config: &Configuration,
    collections: &'c [Arc<Collection<W>>],
    steps: &[String],
    row: Option<&Row>,
) -> Vec<Unit<'c, W>> {
    let before = collections
        .iter()
        .rev()
        .flat_map(|c| c.hooks(HookType::BeforeScenario))
        .map(Unit::Hook);
    let resolved = steps
        .iter()
        .map(|raw| resolve(config, collections, raw, row));
    let after = collections
        .iter()
        .flat_map(|c| c.hooks(HookType::AfterScenario))
        .map(Unit::Hook);

    before.chain(resolved).chain(after).collect()
}

/// Runs the given `units` as one sequence, reporting their outcomes.
///
/// Steps are performed while the sequence goes fine, and reported as not
/// performed after the first failed or pending one. [`Hook`]s always run,
/// as long as their [`UponOutcome`] admits the sequence state.
///
/// [`UponOutcome`]: crate::step::UponOutcome
pub(crate) fn run_sequence<W, R>(
    state: &mut ExecutionState,
    world: &mut W,
    units: &[Unit<'_, W>],
    row: Option<&Row>,
    config: &Configuration,
    reporter: &mut R,
) where
    R: Reporter + ?Sized,
{
    state.reset_sequence();
    for unit in units {
        let fine = state.is_fine();
        let outcome = match unit {
            Unit::Hook(hook) if !hook.upon_outcome.admits(fine) => continue,
            Unit::Hook(_) => {
                unit.perform(world, config.converters(), row, config.dry_run())
            }
            _ if fine => {
                unit.perform(world, config.converters(), row, config.dry_run())
            }
            _ => Some(unit.not_performed()),
        };

        if let Some(outcome) = outcome {
            if let Some(e) = outcome.error() {
                state.record(e);
            }
            tracing::debug!(step = outcome.text(), ?outcome, "step finished");
            reporter.handle_event(&outcome.into());
        }
    }
}
