// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for outputting [`Event`]s of story runs.
//!
//! [`Reporter`]s compose: decorators like [`Summarize`] and
//! [`SilentSuccess`] wrap another [`Reporter`], while [`Delegating`] fans
//! events out to an ordered list of them.

pub mod basic;
pub mod delegating;
pub mod out;
pub mod recorder;
pub mod silent_success;
pub mod summarize;

use sealed::sealed;

use crate::Event;

#[doc(inline)]
pub use self::{
    basic::Basic,
    delegating::Delegating,
    recorder::Recorder,
    silent_success::SilentSuccess,
    summarize::{Stats, Summarize},
};

/// Sink of story run [`Event`]s.
///
/// A [`Reporter`] is fed by a single run at a time, so one instance should
/// be used per concurrently running story.
pub trait Reporter {
    /// Handles the given [`Event`].
    fn handle_event(&mut self, event: &Event);
}

/// [`Reporter`] that also can output arbitrary text in addition to regular
/// [`Event`]s.
pub trait Arbitrary: Reporter {
    /// Writes the given `text` to the output of this [`Reporter`].
    fn write(&mut self, text: &str);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn handle_event(&mut self, event: &Event) {
        (**self).handle_event(event);
    }
}

impl<R: Arbitrary + ?Sized> Arbitrary for &mut R {
    fn write(&mut self, text: &str) {
        (**self).write(text);
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn handle_event(&mut self, event: &Event) {
        (**self).handle_event(event);
    }
}

/// Extension of [`Reporter`] allowing its decoration.
#[sealed]
pub trait Ext: Reporter + Sized {
    /// Wraps this [`Reporter`] to output a summary at the end of a run.
    ///
    /// See [`Summarize`] for more information.
    #[must_use]
    fn summarized(self) -> Summarize<Self>;

    /// Wraps this [`Reporter`] to output only the scenarios having failed or
    /// pending steps.
    ///
    /// See [`SilentSuccess`] for more information.
    #[must_use]
    fn silent_success(self) -> SilentSuccess<Self>;
}

#[sealed]
impl<T: Reporter> Ext for T {
    fn summarized(self) -> Summarize<Self> {
        Summarize::new(self)
    }

    fn silent_success(self) -> SilentSuccess<Self> {
        SilentSuccess::new(self)
    }
}
