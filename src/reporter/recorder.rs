// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Reporter`] recording every [`Event`] for later inspection.

use super::{Arbitrary, Reporter};
use crate::Event;

/// [`Reporter`] keeping every received [`Event`] and written text in
/// memory.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    /// Received [`Event`]s, in their order.
    events: Vec<Event>,

    /// Texts written with [`Arbitrary::write()`].
    written: Vec<String>,
}

impl Recorder {
    /// Creates an empty [`Recorder`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the received [`Event`]s, in their order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns the texts written with [`Arbitrary::write()`].
    #[must_use]
    pub fn written(&self) -> &[String] {
        &self.written
    }

    /// Consumes this [`Recorder`] returning the received [`Event`]s.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl Reporter for Recorder {
    fn handle_event(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}

impl Arbitrary for Recorder {
    fn write(&mut self, text: &str) {
        self.written.push(text.to_owned());
    }
}
