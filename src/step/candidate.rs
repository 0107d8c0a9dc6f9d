// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step [`Definition`]s and the [`CandidateStep`]s compiled out of them.

use std::sync::Arc;

use derive_more::with_trait::Debug;

use super::{Context, StepMatcher, StepType, context::Argument};
use crate::{
    error::StepError,
    model::Row,
    panic_trap,
    parameters::{Converters, ParamKind},
};

/// Handler of a step, invoked with the world and the [`Context`].
pub type Handler<W> =
    Arc<dyn Fn(&mut W, &Context) -> anyhow::Result<()> + Send + Sync>;

/// Declaration of a step, before its patterns are compiled.
#[derive(Debug)]
pub struct Definition<W> {
    /// [`StepType`] of this [`Definition`].
    pub(super) step_type: StepType,

    /// Main pattern, possibly with `{a|b}` variants.
    pub(super) pattern: String,

    /// Additional patterns sharing the same handler.
    pub(super) aliases: Vec<String>,

    /// Priority, higher values winning over lower ones.
    pub(super) priority: i32,

    /// Declared [`ParamKind`]s of the placeholders, by position.
    pub(super) kinds: Vec<ParamKind>,

    /// Handler of this [`Definition`].
    #[debug(ignore)]
    pub(super) handler: Handler<W>,
}

impl<W> Definition<W> {
    /// Creates a new [`Definition`] of the given [`StepType`].
    #[must_use]
    pub fn new<F>(
        step_type: StepType,
        pattern: impl Into<String>,
        handler: F,
    ) -> Self
    where
        F: Fn(&mut W, &Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            step_type,
            pattern: pattern.into(),
            aliases: Vec::new(),
            priority: 0,
            kinds: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Creates a new [`StepType::Given`] [`Definition`].
    #[must_use]
    pub fn given<F>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut W, &Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(StepType::Given, pattern, handler)
    }

    /// Creates a new [`StepType::When`] [`Definition`].
    #[must_use]
    pub fn when<F>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut W, &Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(StepType::When, pattern, handler)
    }

    /// Creates a new [`StepType::Then`] [`Definition`].
    #[must_use]
    pub fn then<F>(pattern: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut W, &Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(StepType::Then, pattern, handler)
    }

    /// Sets the priority of this [`Definition`].
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Adds an alias pattern sharing the handler of this [`Definition`].
    #[must_use]
    pub fn alias(mut self, pattern: impl Into<String>) -> Self {
        self.aliases.push(pattern.into());
        self
    }

    /// Declares the [`ParamKind`] of the next placeholder.
    ///
    /// Undeclared placeholders are [`ParamKind::Text`].
    #[must_use]
    pub fn param(mut self, kind: ParamKind) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Returns the main pattern followed by the aliases.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.pattern.as_str())
            .chain(self.aliases.iter().map(String::as_str))
    }
}

/// Compiled step definition, matched against step texts.
#[derive(Debug)]
pub struct CandidateStep<W> {
    /// [`StepType`] this candidate was declared with.
    step_type: StepType,

    /// Literal pattern, after variants expansion.
    pattern: String,

    /// Priority, higher values winning over lower ones.
    priority: i32,

    /// Compiled `pattern`.
    matcher: StepMatcher,

    /// Declared [`ParamKind`]s of the placeholders, by position.
    kinds: Vec<ParamKind>,

    /// Position of this candidate in its registry.
    order: usize,

    /// Handler invoked on a match.
    #[debug(ignore)]
    handler: Handler<W>,
}

// Implemented manually to omit redundant `W: Clone` trait bound, imposed by
// `#[derive(Clone)]`.
impl<W> Clone for CandidateStep<W> {
    fn clone(&self) -> Self {
        Self {
            step_type: self.step_type,
            pattern: self.pattern.clone(),
            priority: self.priority,
            matcher: self.matcher.clone(),
            kinds: self.kinds.clone(),
            order: self.order,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<W> CandidateStep<W> {
    /// Creates a new [`CandidateStep`] out of the given [`Definition`] parts.
    pub(super) fn new(
        definition: &Definition<W>,
        pattern: String,
        matcher: StepMatcher,
        order: usize,
    ) -> Self {
        Self {
            step_type: definition.step_type,
            pattern,
            priority: definition.priority,
            matcher,
            kinds: definition.kinds.clone(),
            order,
            handler: Arc::clone(&definition.handler),
        }
    }

    /// Returns the [`StepType`] of this [`CandidateStep`].
    #[must_use]
    pub const fn step_type(&self) -> StepType {
        self.step_type
    }

    /// Returns the literal pattern of this [`CandidateStep`].
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the priority of this [`CandidateStep`].
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the position of this [`CandidateStep`] in its registry.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Returns the compiled [`StepMatcher`] of this [`CandidateStep`].
    #[must_use]
    pub const fn matcher(&self) -> &StepMatcher {
        &self.matcher
    }

    /// Converts the `raw_args` captured from the `step` and invokes the
    /// handler of this [`CandidateStep`].
    ///
    /// # Errors
    ///
    /// If an argument fails to convert, or the handler fails or panics.
    pub fn invoke(
        &self,
        world: &mut W,
        step: &str,
        raw_args: &[String],
        row: Option<&Row>,
        converters: &Converters,
    ) -> Result<(), StepError> {
        let args = raw_args
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let kind =
                    self.kinds.get(i).copied().unwrap_or(ParamKind::Text);
                Ok(Argument {
                    name: self
                        .matcher
                        .parameter_names()
                        .get(i)
                        .cloned()
                        .unwrap_or_default(),
                    raw: raw.clone(),
                    value: converters.convert(raw, kind)?,
                })
            })
            .collect::<Result<Vec<_>, StepError>>()?;
        let ctx = Context {
            step: step.to_owned(),
            args,
            row: row.cloned(),
        };

        panic_trap::run(step, || (self.handler)(world, &ctx))
            .map_err(StepError::Failed)
    }
}
