// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Registry of [`CandidateStep`]s and [`Hook`]s.

use std::{cmp::Reverse, collections::HashSet, sync::Arc};

use derive_more::with_trait::Debug;

use super::{
    CandidateStep, Context, Definition, DuplicateDefinition, Hook, HookType,
    StepPatternParser, StepType, UponOutcome, variants,
};
use crate::Keywords;

/// Successful lookup of a step text in a [`Collection`].
#[derive(Debug)]
pub struct Match<'c, W> {
    /// Matched [`CandidateStep`].
    pub candidate: &'c CandidateStep<W>,

    /// Raw placeholder values, in their order of appearance.
    pub args: Vec<String>,
}

/// Immutable registry of [`CandidateStep`]s and [`Hook`]s, built with a
/// [`CollectionBuilder`].
#[derive(Debug)]
pub struct Collection<W> {
    /// [`Keywords`] used to strip starting words off step texts.
    keywords: Keywords,

    /// Registered [`CandidateStep`]s, in registration order.
    candidates: Vec<CandidateStep<W>>,

    /// Registered [`Hook`]s, in registration order.
    hooks: Vec<Hook<W>>,
}

impl<W> Collection<W> {
    /// Creates a new [`CollectionBuilder`] with English [`Keywords`] and the
    /// default placeholder prefix.
    #[must_use]
    pub fn builder() -> CollectionBuilder<W> {
        CollectionBuilder::default()
    }

    /// Returns the [`Keywords`] of this [`Collection`].
    #[must_use]
    pub const fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    /// Returns all the [`CandidateStep`]s, in registration order.
    #[must_use]
    pub fn candidates(&self) -> &[CandidateStep<W>] {
        &self.candidates
    }

    /// Iterates over the [`Hook`]s of the given [`HookType`], in
    /// registration order.
    pub fn hooks(&self, hook_type: HookType) -> impl Iterator<Item = &Hook<W>> {
        self.hooks.iter().filter(move |h| h.hook_type == hook_type)
    }

    /// Looks up the best [`CandidateStep`] for the given `step` text.
    ///
    /// Highest priority wins, ties going to the earliest registered one.
    #[must_use]
    pub fn find(&self, step: &str) -> Option<Match<'_, W>> {
        self.matches(step).into_iter().min_by_key(|m| {
            (Reverse(m.candidate.priority()), m.candidate.order())
        })
    }

    /// Lists every [`CandidateStep`] matching the given `step` text, in
    /// registration order.
    #[must_use]
    pub fn matching(&self, step: &str) -> Vec<&CandidateStep<W>> {
        self.matches(step).into_iter().map(|m| m.candidate).collect()
    }

    /// Collects all the [`Match`]es of the given `step` text.
    fn matches(&self, step: &str) -> Vec<Match<'_, W>> {
        let stripped = self.keywords.strip_starting_word(step);
        self.candidates
            .iter()
            .filter_map(|candidate| {
                let args = candidate.matcher().extract(stripped)?;
                Some(Match { candidate, args })
            })
            .collect()
    }
}

/// Looks up the best [`CandidateStep`] for the given `step` text across
/// several [`Collection`]s.
///
/// Highest priority wins, ties going to the earliest [`Collection`], then to
/// the earliest registered [`CandidateStep`].
#[must_use]
pub fn find_across<'c, W>(
    collections: &'c [Arc<Collection<W>>],
    step: &str,
) -> Option<Match<'c, W>> {
    collections
        .iter()
        .enumerate()
        .flat_map(|(i, c)| c.matches(step).into_iter().map(move |m| (i, m)))
        .min_by_key(|(i, m)| {
            (Reverse(m.candidate.priority()), *i, m.candidate.order())
        })
        .map(|(_, m)| m)
}

/// Builder of a [`Collection`].
#[derive(Debug)]
pub struct CollectionBuilder<W> {
    /// [`StepPatternParser`] compiling the patterns.
    pattern_parser: StepPatternParser,

    /// [`Keywords`] of the built [`Collection`].
    keywords: Keywords,

    /// Declared step [`Definition`]s.
    definitions: Vec<Definition<W>>,

    /// Declared [`Hook`]s.
    hooks: Vec<Hook<W>>,
}

// Implemented manually to omit redundant `W: Default` trait bound, imposed by
// `#[derive(Default)]`.
impl<W> Default for CollectionBuilder<W> {
    fn default() -> Self {
        Self {
            pattern_parser: StepPatternParser::default(),
            keywords: Keywords::english(),
            definitions: Vec::new(),
            hooks: Vec::new(),
        }
    }
}

impl<W> CollectionBuilder<W> {
    /// Sets the [`StepPatternParser`] compiling the patterns.
    #[must_use]
    pub const fn pattern_parser(mut self, parser: StepPatternParser) -> Self {
        self.pattern_parser = parser;
        self
    }

    /// Sets the [`Keywords`] used to strip starting words off step texts.
    #[must_use]
    pub fn keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Adds the given step [`Definition`].
    #[must_use]
    pub fn step(mut self, definition: Definition<W>) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Adds a [`StepType::Given`] step.
    #[must_use]
    pub fn given<F>(self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut W, &Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.step(Definition::new(StepType::Given, pattern, handler))
    }

    /// Adds a [`StepType::When`] step.
    #[must_use]
    pub fn when<F>(self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut W, &Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.step(Definition::new(StepType::When, pattern, handler))
    }

    /// Adds a [`StepType::Then`] step.
    #[must_use]
    pub fn then<F>(self, pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut W, &Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.step(Definition::new(StepType::Then, pattern, handler))
    }

    /// Adds a [`HookType::BeforeStory`] hook, running either for top-level
    /// stories or for given ones.
    #[must_use]
    pub fn before_story<F>(self, upon_given_story: bool, handler: F) -> Self
    where
        F: Fn(&mut W) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hook(
            HookType::BeforeStory,
            upon_given_story,
            UponOutcome::Any,
            handler,
        )
    }

    /// Adds a [`HookType::AfterStory`] hook, running either for top-level
    /// stories or for given ones.
    #[must_use]
    pub fn after_story<F>(self, upon_given_story: bool, handler: F) -> Self
    where
        F: Fn(&mut W) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hook(
            HookType::AfterStory,
            upon_given_story,
            UponOutcome::Any,
            handler,
        )
    }

    /// Adds a [`HookType::BeforeScenario`] hook.
    #[must_use]
    pub fn before_scenario<F>(self, handler: F) -> Self
    where
        F: Fn(&mut W) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hook(HookType::BeforeScenario, false, UponOutcome::Any, handler)
    }

    /// Adds a [`HookType::AfterScenario`] hook, running whatever the
    /// outcome of the scenario steps.
    #[must_use]
    pub fn after_scenario<F>(self, handler: F) -> Self
    where
        F: Fn(&mut W) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.after_scenario_upon(UponOutcome::Any, handler)
    }

    /// Adds a [`HookType::AfterScenario`] hook, running only upon the given
    /// [`UponOutcome`] of the scenario steps.
    #[must_use]
    pub fn after_scenario_upon<F>(
        self,
        outcome: UponOutcome,
        handler: F,
    ) -> Self
    where
        F: Fn(&mut W) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hook(HookType::AfterScenario, false, outcome, handler)
    }

    fn hook<F>(
        mut self,
        hook_type: HookType,
        upon_given_story: bool,
        upon_outcome: UponOutcome,
        handler: F,
    ) -> Self
    where
        F: Fn(&mut W) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks.push(Hook {
            hook_type,
            upon_given_story,
            upon_outcome,
            handler: Arc::new(handler),
        });
        self
    }

    /// Compiles every pattern, alias and variant of the declared
    /// [`Definition`]s into a [`Collection`].
    ///
    /// # Errors
    ///
    /// - [`DuplicateDefinition`] if the same [`StepType`] declares the same
    ///   literal pattern twice.
    /// - [`InvalidPattern`] if a pattern fails to compile.
    ///
    /// [`InvalidPattern`]: super::InvalidPattern
    pub fn build(self) -> crate::Result<Collection<W>> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for definition in &self.definitions {
            for pattern in definition.patterns().flat_map(variants::expand) {
                if !seen.insert((definition.step_type, pattern.clone())) {
                    return Err(DuplicateDefinition {
                        step_type: definition.step_type,
                        pattern,
                    }
                    .into());
                }
                let matcher = self.pattern_parser.parse(&pattern)?;
                tracing::debug!(
                    step_type = %definition.step_type,
                    %pattern,
                    priority = definition.priority,
                    "registered candidate step",
                );
                let order = candidates.len();
                candidates.push(CandidateStep::new(
                    definition, pattern, matcher, order,
                ));
            }
        }

        Ok(Collection {
            keywords: self.keywords,
            candidates,
            hooks: self.hooks,
        })
    }
}
