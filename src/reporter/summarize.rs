// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Reporter`] decorator summarizing the outcomes of a run.

use std::{
    borrow::Cow,
    time::{Duration, Instant},
};

use derive_more::with_trait::Deref;
use itertools::Itertools as _;

use super::{Arbitrary, Reporter, out::Styles};
use crate::{Event, cli::Coloring, event::StepOutcome};

/// Numbers of steps (or scenarios) by their outcome.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of successful steps (or scenarios).
    pub passed: usize,

    /// Number of failed steps (or scenarios).
    pub failed: usize,

    /// Number of pending steps (or scenarios having one).
    pub pending: usize,

    /// Number of not performed steps.
    pub not_performed: usize,

    /// Number of ignorable steps.
    pub ignorable: usize,
}

impl Stats {
    /// Creates new [`Stats`] with all counts set to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            passed: 0,
            failed: 0,
            pending: 0,
            not_performed: 0,
            ignorable: 0,
        }
    }

    /// Returns the total number of steps (or scenarios) these [`Stats`] have
    /// been collected for.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed
            + self.failed
            + self.pending
            + self.not_performed
            + self.ignorable
    }

    /// Counts the given [`StepOutcome`].
    pub fn record(&mut self, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Successful(_) => self.passed += 1,
            StepOutcome::Failed(..) => self.failed += 1,
            StepOutcome::Pending(_) => self.pending += 1,
            StepOutcome::NotPerformed(_) => self.not_performed += 1,
            StepOutcome::Ignorable(_) => self.ignorable += 1,
        }
    }
}

/// Outcome of a scenario still being run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ScenarioStatus {
    Passed,
    Pending,
    Failed,
}

/// [`Reporter`] decorator collecting [`Stats`] of steps and scenarios, and
/// writing a summary to the wrapped [`Reporter`] once a top-level story is
/// finished.
///
/// Scenarios of given stories are counted as well. Running several stories
/// through the same [`Summarize`] accumulates their [`Stats`].
#[derive(Debug, Deref)]
pub struct Summarize<R> {
    /// Wrapped [`Reporter`].
    #[deref]
    reporter: R,

    /// [`Styles`] of the summary.
    styles: Styles,

    /// Number of started stories, including given ones.
    stories: usize,

    /// [`Stats`] of finished scenarios.
    scenarios: Stats,

    /// [`Stats`] of steps and hooks.
    steps: Stats,

    /// Statuses of the scenarios being run, innermost last.
    running: Vec<ScenarioStatus>,

    /// Moment the first top-level story started.
    started: Option<Instant>,
}

impl<R> Summarize<R> {
    /// Wraps the given [`Reporter`] into an uncolored [`Summarize`].
    #[must_use]
    pub fn new(reporter: R) -> Self {
        let mut styles = Styles::new();
        styles.apply_coloring(Coloring::Never);
        Self {
            reporter,
            styles,
            stories: 0,
            scenarios: Stats::new(),
            steps: Stats::new(),
            running: Vec::new(),
            started: None,
        }
    }

    /// Applies the given [`Coloring`] to the summary.
    #[must_use]
    pub fn coloring(mut self, color: Coloring) -> Self {
        let mut styles = Styles::new();
        styles.apply_coloring(color);
        self.styles = styles;
        self
    }

    /// Returns the number of started stories, including given ones.
    #[must_use]
    pub const fn stories_count(&self) -> usize {
        self.stories
    }

    /// Returns the [`Stats`] of finished scenarios.
    #[must_use]
    pub const fn scenarios_stats(&self) -> &Stats {
        &self.scenarios
    }

    /// Returns the [`Stats`] of steps and hooks.
    #[must_use]
    pub const fn steps_stats(&self) -> &Stats {
        &self.steps
    }

    /// Indicates whether any step or hook has failed.
    #[must_use]
    pub const fn execution_has_failed(&self) -> bool {
        self.steps.failed > 0
    }

    /// Consumes this [`Summarize`] returning the wrapped [`Reporter`].
    #[must_use]
    pub fn into_inner(self) -> R {
        self.reporter
    }

    /// Renders the summary of the run so far.
    #[must_use]
    pub fn summary(&self) -> String {
        let s = &self.styles;
        let stories = self.maybe_plural("story", "stories", self.stories);
        let scenarios =
            self.maybe_plural("scenario", "scenarios", self.scenarios.total());
        let steps = self.maybe_plural("step", "steps", self.steps.total());
        let elapsed = self.started.map_or(Duration::ZERO, |at| {
            Duration::from_millis(
                u64::try_from(at.elapsed().as_millis()).unwrap_or(u64::MAX),
            )
        });

        format!(
            "{summary}\n{stories}\n{scenarios}{}\n{steps}{}\n{}",
            self.format_stats(self.scenarios),
            self.format_stats(self.steps),
            s.bold(format!("Took {}", humantime::format_duration(elapsed))),
            summary = s.bold(s.header("[Summary]")),
        )
    }

    fn format_stats(&self, stats: Stats) -> Cow<'static, str> {
        let s = &self.styles;
        let formatted = [
            (stats.passed > 0)
                .then(|| s.ok(format!("{} passed", stats.passed))),
            (stats.failed > 0)
                .then(|| s.err(format!("{} failed", stats.failed))),
            (stats.pending > 0)
                .then(|| s.skipped(format!("{} pending", stats.pending))),
            (stats.not_performed > 0).then(|| {
                s.skipped(format!("{} not performed", stats.not_performed))
            }),
            (stats.ignorable > 0)
                .then(|| Cow::Owned(format!("{} ignorable", stats.ignorable))),
        ]
        .into_iter()
        .flatten()
        .join(", ");

        if formatted.is_empty() {
            "".into()
        } else {
            format!(" ({formatted})").into()
        }
    }

    fn maybe_plural(
        &self,
        singular: &str,
        plural: &str,
        num: usize,
    ) -> Cow<'static, str> {
        self.styles
            .bold(format!("{num} {}", if num == 1 { singular } else { plural }))
    }

    /// Updates the collected [`Stats`] with the given [`Event`].
    fn track(&mut self, event: &Event) {
        match event {
            Event::BeforeStory { embedded, .. } => {
                self.stories += 1;
                if !embedded && self.started.is_none() {
                    self.started = Some(Instant::now());
                }
            }
            Event::BeforeScenario(_) => {
                self.running.push(ScenarioStatus::Passed);
            }
            Event::AfterScenario => match self.running.pop() {
                Some(ScenarioStatus::Passed) => self.scenarios.passed += 1,
                Some(ScenarioStatus::Pending) => self.scenarios.pending += 1,
                Some(ScenarioStatus::Failed) => self.scenarios.failed += 1,
                None => {
                    tracing::debug!("scenario finished without being started");
                }
            },
            ev => {
                let Some(outcome) = ev.as_outcome() else {
                    return;
                };
                self.steps.record(&outcome);
                if let Some(status) = self.running.last_mut() {
                    match outcome {
                        StepOutcome::Failed(..) => {
                            *status = ScenarioStatus::Failed;
                        }
                        StepOutcome::Pending(_)
                            if *status == ScenarioStatus::Passed =>
                        {
                            *status = ScenarioStatus::Pending;
                        }
                        StepOutcome::Successful(_)
                        | StepOutcome::Pending(_)
                        | StepOutcome::NotPerformed(_)
                        | StepOutcome::Ignorable(_) => {}
                    }
                }
            }
        }
    }
}

impl<R: Arbitrary> Reporter for Summarize<R> {
    fn handle_event(&mut self, event: &Event) {
        self.track(event);
        self.reporter.handle_event(event);
        if matches!(event, Event::AfterStory { embedded: false }) {
            let summary = self.summary();
            self.reporter.write(&summary);
        }
    }
}

impl<R: Arbitrary> Arbitrary for Summarize<R> {
    fn write(&mut self, text: &str) {
        self.reporter.write(text);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        error::{Failure, StepError},
        model::Story,
        reporter::{Ext as _, Recorder},
    };

    fn story(embedded: bool) -> Event {
        Event::BeforeStory { story: Arc::new(Story::default()), embedded }
    }

    #[test]
    fn counts_steps_and_scenarios() {
        let mut summarize = Recorder::new().summarized();
        let failure = StepError::from(Failure::panic("When b", "boom"));

        for ev in [
            story(false),
            Event::BeforeScenario("ok".into()),
            Event::Successful("Given a".into()),
            Event::AfterScenario,
            Event::BeforeScenario("broken".into()),
            Event::Successful("Given a".into()),
            Event::Failed("When b".into(), failure),
            Event::NotPerformed("Then c".into()),
            Event::AfterScenario,
            Event::BeforeScenario("unfinished".into()),
            Event::Pending("Given z".into()),
            Event::Ignorable("!-- note".into()),
            Event::AfterScenario,
            Event::AfterStory { embedded: false },
        ] {
            summarize.handle_event(&ev);
        }

        assert_eq!(summarize.stories_count(), 1);
        assert_eq!(
            *summarize.scenarios_stats(),
            Stats { passed: 1, failed: 1, pending: 1, ..Stats::new() },
        );
        assert_eq!(summarize.steps_stats().total(), 6);
        assert!(summarize.execution_has_failed());

        let summary = &summarize.written()[0];
        assert!(summary.starts_with("[Summary]\n1 story\n"));
        assert!(
            summary.contains("3 scenarios (1 passed, 1 failed, 1 pending)"),
        );
        assert!(summary.contains(
            "6 steps (2 passed, 1 failed, 1 pending, \
             1 not performed, 1 ignorable)",
        ));
        assert!(summary.contains("Took "));
    }

    #[test]
    fn given_stories_are_summarized_once() {
        let mut summarize = Recorder::new().summarized();

        for ev in [
            story(false),
            Event::BeforeScenario("outer".into()),
            story(true),
            Event::BeforeScenario("inner".into()),
            Event::Successful("Given a".into()),
            Event::AfterScenario,
            Event::AfterStory { embedded: true },
            Event::Pending("Given b".into()),
            Event::AfterScenario,
            Event::AfterStory { embedded: false },
        ] {
            summarize.handle_event(&ev);
        }

        assert_eq!(summarize.written().len(), 1);
        assert_eq!(summarize.stories_count(), 2);
        assert_eq!(summarize.scenarios_stats().passed, 1);
        assert_eq!(summarize.scenarios_stats().pending, 1);
        assert!(!summarize.execution_has_failed());
        assert_eq!(summarize.into_inner().events().len(), 10);
    }
}
