// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Reporter`] passing events to an ordered list of other ones.

use derive_more::with_trait::Debug;

use super::Reporter;
use crate::Event;

/// [`Reporter`] passing every [`Event`] to each of its [`Reporter`]s, in
/// their registration order.
#[derive(Debug, Default)]
pub struct Delegating<'r> {
    /// [`Reporter`]s to pass [`Event`]s to.
    #[debug(ignore)]
    reporters: Vec<Box<dyn Reporter + 'r>>,
}

impl<'r> Delegating<'r> {
    /// Creates a new [`Delegating`] [`Reporter`] without any delegates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the given `reporter` to the delegates.
    #[must_use]
    pub fn with(mut self, reporter: impl Reporter + 'r) -> Self {
        self.push(reporter);
        self
    }

    /// Appends the given `reporter` to the delegates.
    pub fn push(&mut self, reporter: impl Reporter + 'r) {
        self.reporters.push(Box::new(reporter));
    }

    /// Returns the number of delegates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    /// Indicates whether there are no delegates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl Reporter for Delegating<'_> {
    fn handle_event(&mut self, event: &Event) {
        for reporter in &mut self.reporters {
            reporter.handle_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::Recorder;

    #[test]
    fn passes_events_to_every_delegate() {
        let (mut first, mut second) = (Recorder::new(), Recorder::new());

        {
            let mut delegating =
                Delegating::new().with(&mut first).with(&mut second);
            delegating.handle_event(&Event::AfterScenario);
            delegating.handle_event(&Event::AfterExamples);
            assert_eq!(delegating.len(), 2);
        }

        assert_eq!(first.events().len(), 2);
        assert_eq!(second.events().len(), 2);
    }
}
