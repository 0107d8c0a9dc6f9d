// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Reporter`] decorator hiding the scenarios that went fine.

use derive_more::with_trait::Deref;

use super::{Arbitrary, Reporter};
use crate::Event;

/// [`Reporter`] decorator buffering the [`Event`]s of each top-level
/// scenario, and passing them to the wrapped [`Reporter`] only if some step
/// of the scenario (or of its given stories) failed or was pending.
///
/// Events outside of scenarios are passed through as is.
#[derive(Debug, Deref)]
pub struct SilentSuccess<R> {
    /// Wrapped [`Reporter`].
    #[deref]
    reporter: R,

    /// [`Event`]s of the scenario being run.
    buffer: Vec<Event>,

    /// Number of scenarios being run, including the ones of given stories.
    depth: usize,

    /// Whether the scenario being run has a failed or pending step.
    noteworthy: bool,
}

impl<R> SilentSuccess<R> {
    /// Wraps the given [`Reporter`] into a [`SilentSuccess`] one.
    #[must_use]
    pub const fn new(reporter: R) -> Self {
        Self {
            reporter,
            buffer: Vec::new(),
            depth: 0,
            noteworthy: false,
        }
    }

    /// Consumes this [`SilentSuccess`] returning the wrapped [`Reporter`].
    #[must_use]
    pub fn into_inner(self) -> R {
        self.reporter
    }
}

impl<R: Reporter> Reporter for SilentSuccess<R> {
    fn handle_event(&mut self, event: &Event) {
        if matches!(event, Event::BeforeScenario(_)) {
            self.depth += 1;
        }
        if self.depth == 0 {
            self.reporter.handle_event(event);
            return;
        }

        if matches!(event, Event::Failed(..) | Event::Pending(_)) {
            self.noteworthy = true;
        }
        self.buffer.push(event.clone());

        if matches!(event, Event::AfterScenario) {
            self.depth -= 1;
            if self.depth == 0 {
                let buffered = std::mem::take(&mut self.buffer);
                if std::mem::take(&mut self.noteworthy) {
                    for ev in &buffered {
                        self.reporter.handle_event(ev);
                    }
                }
            }
        }
    }
}

impl<R: Arbitrary> Arbitrary for SilentSuccess<R> {
    fn write(&mut self, text: &str) {
        self.reporter.write(text);
    }
}
