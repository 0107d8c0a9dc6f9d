// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for executing [`Story`]s.
//!
//! # Order guarantees
//!
//! A [`StoryRunner`] emits [`Event`]s in a [happened-before] order: the
//! [`Event::BeforeStory`] of a [`Story`] predates any other event of it, while
//! [`Event::AfterStory`] is the last one. Given stories of a [`Scenario`] are
//! run to completion before its steps, and their events are nested between
//! the [`Event::BeforeScenario`] and the steps of the including
//! [`Scenario`].
//!
//! [`Scenario`]: crate::model::Scenario
//! [happened-before]: https://en.wikipedia.org/wiki/Happened-before

pub mod state;
pub mod steps;

use std::sync::Arc;

use derive_more::with_trait::Debug;

use crate::{
    Configuration, Error, Event, Reporter, StoryParser,
    model::{Scenario, Story},
    step::{Collection, HookType},
};

#[doc(inline)]
pub use self::{
    state::{ActiveStrategy, ExecutionState, SequenceState},
    steps::substitute,
};

/// Executor of [`Story`]s against the step [`Collection`]s, reporting
/// [`Event`]s to a [`Reporter`].
///
/// Runs are synchronous: one [`StoryRunner`] drives a single world at a
/// time.
#[derive(Debug)]
pub struct StoryRunner<W> {
    /// [`Configuration`] of the runs.
    config: Configuration,

    /// Step [`Collection`]s, in their lookup order.
    #[debug(ignore)]
    collections: Vec<Arc<Collection<W>>>,

    /// [`ExecutionState`] of the current (or last) run.
    state: ExecutionState,

    /// [`StoryParser`] for given stories.
    parser: StoryParser,

    /// Paths of the stories being run, outermost first.
    running: Vec<String>,
}

impl<W> StoryRunner<W> {
    /// Creates a new [`StoryRunner`] with the given [`Configuration`] and no
    /// step [`Collection`]s.
    #[must_use]
    pub fn new(config: Configuration) -> Self {
        let parser = config.story_parser();
        Self {
            config,
            collections: Vec::new(),
            state: ExecutionState::default(),
            parser,
            running: Vec::new(),
        }
    }

    /// Appends the given step [`Collection`] to the lookup order.
    #[must_use]
    pub fn with_collection(
        mut self,
        collection: impl Into<Arc<Collection<W>>>,
    ) -> Self {
        self.collections.push(collection.into());
        self
    }

    /// Returns the [`Configuration`] of this [`StoryRunner`].
    #[must_use]
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    /// Returns the step [`Collection`]s, in their lookup order.
    #[must_use]
    pub fn collections(&self) -> &[Arc<Collection<W>>] {
        &self.collections
    }

    /// Returns the [`ExecutionState`] of the current (or last) run.
    #[must_use]
    pub const fn state(&self) -> &ExecutionState {
        &self.state
    }

    /// Runs the given top-level [`Story`].
    ///
    /// # Errors
    ///
    /// - [`Error::Step`] if the active strategy turns the outstanding step
    ///   error of the run into a fatal one.
    /// - [`Error::Load`] if a given story fails to load.
    /// - [`Error::RecursiveGivenStory`] if a given story includes itself.
    pub fn run<R>(
        &mut self,
        world: &mut W,
        story: Story,
        reporter: &mut R,
    ) -> crate::Result<()>
    where
        R: Reporter + ?Sized,
    {
        self.run_story(world, Arc::new(story), false, reporter)
    }

    /// Loads, parses and runs the top-level [`Story`] at the given `path`.
    ///
    /// # Errors
    ///
    /// See [`StoryRunner::run()`], plus [`Error::Load`] if the story itself
    /// fails to load.
    pub fn run_path<R>(
        &mut self,
        world: &mut W,
        path: &str,
        reporter: &mut R,
    ) -> crate::Result<()>
    where
        R: Reporter + ?Sized,
    {
        let text = self.config.story_loader().load_story_text(path)?;
        let story = self.parser.parse(&text, Some(path));
        self.run(world, story, reporter)
    }

    /// Runs the given [`Story`], either as a top-level one or as a given
    /// story of another one.
    ///
    /// Only a top-level run resets the outstanding error and hands it over to
    /// the active strategy once finished.
    ///
    /// # Errors
    ///
    /// See [`StoryRunner::run()`].
    pub fn run_story<R>(
        &mut self,
        world: &mut W,
        story: Arc<Story>,
        embedded: bool,
        reporter: &mut R,
    ) -> crate::Result<()>
    where
        R: Reporter + ?Sized,
    {
        if !embedded {
            self.state.reset_run();
            self.running.clear();
        }
        let span = tracing::info_span!("story", path = story.path(), embedded);
        let _entered = span.enter();

        self.running.push(story.path().to_owned());
        let collections = self.collections.clone();

        reporter.handle_event(&Event::BeforeStory {
            story: Arc::clone(&story),
            embedded,
        });

        let before =
            steps::story_hooks(&collections, HookType::BeforeStory, embedded);
        steps::run_sequence(
            &mut self.state,
            world,
            &before,
            None,
            &self.config,
            reporter,
        );

        let scenarios = story.scenarios.iter().try_for_each(|scenario| {
            self.run_scenario(world, &collections, scenario, reporter)
        });

        let after =
            steps::story_hooks(&collections, HookType::AfterStory, embedded);
        steps::run_sequence(
            &mut self.state,
            world,
            &after,
            None,
            &self.config,
            reporter,
        );

        reporter.handle_event(&Event::AfterStory { embedded });
        _ = self.running.pop();

        if let Err(e) = scenarios {
            tracing::error!(error = %e, "story aborted");
            return Err(e);
        }
        if embedded {
            return Ok(());
        }
        tracing::debug!(
            strategy = ?self.state.active_strategy(),
            error = ?self.state.outstanding_error(),
            "story finished",
        );
        self.state.conclude(&self.config).map_err(Error::from)
    }

    /// Runs a single [`Scenario`], once per example row if it has any.
    ///
    /// A given story failing to run aborts the [`Scenario`] right after it,
    /// still closing it with an [`Event::AfterScenario`].
    fn run_scenario<R>(
        &mut self,
        world: &mut W,
        collections: &[Arc<Collection<W>>],
        scenario: &Scenario,
        reporter: &mut R,
    ) -> crate::Result<()>
    where
        R: Reporter + ?Sized,
    {
        reporter.handle_event(&Event::BeforeScenario(scenario.title.clone()));

        if !scenario.given_stories.is_empty() {
            reporter.handle_event(&Event::GivenStories(
                scenario.given_stories.clone(),
            ));
            let given = scenario.given_stories.iter().try_for_each(|path| {
                self.run_given_story(world, path, reporter)
            });
            if let Err(e) = given {
                reporter.handle_event(&Event::AfterScenario);
                return Err(e);
            }
        }

        if scenario.examples.is_empty() {
            let units = steps::scenario_units(
                &self.config,
                collections,
                &scenario.steps,
                None,
            );
            steps::run_sequence(
                &mut self.state,
                world,
                &units,
                None,
                &self.config,
                reporter,
            );
        } else {
            reporter.handle_event(&Event::BeforeExamples {
                steps: scenario.steps.clone(),
                table: scenario.examples.clone(),
            });
            for row in scenario.examples.rows() {
                reporter.handle_event(&Event::Example(row.clone()));
                let units = steps::scenario_units(
                    &self.config,
                    collections,
                    &scenario.steps,
                    Some(row),
                );
                steps::run_sequence(
                    &mut self.state,
                    world,
                    &units,
                    Some(row),
                    &self.config,
                    reporter,
                );
            }
            reporter.handle_event(&Event::AfterExamples);
        }

        reporter.handle_event(&Event::AfterScenario);
        Ok(())
    }

    /// Loads, parses and runs the given story at `path` as an embedded one.
    fn run_given_story<R>(
        &mut self,
        world: &mut W,
        path: &str,
        reporter: &mut R,
    ) -> crate::Result<()>
    where
        R: Reporter + ?Sized,
    {
        if self.running.iter().any(|p| p == path) {
            return Err(Error::RecursiveGivenStory(path.to_owned()));
        }
        let text = self.config.story_loader().load_story_text(path)?;
        let story = self.parser.parse(&text, Some(path));
        self.run_story(world, Arc::new(story), true, reporter)
    }
}
