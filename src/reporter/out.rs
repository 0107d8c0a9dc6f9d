// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Terminal styling and string output helpers shared by reporters.

use std::{borrow::Cow, io, str};

use console::Style;
use derive_more::with_trait::{Deref, DerefMut, Display, From, Into};

use crate::cli::Coloring;

/// Palette of [`Style`]s a reporter paints its lines with.
#[derive(Clone, Debug)]
pub struct Styles {
    /// Passed steps.
    pub ok: Style,

    /// Pending and not performed steps.
    pub skipped: Style,

    /// Failed steps and their errors.
    pub err: Style,

    /// Story headers and example rows.
    pub header: Style,

    /// Titles.
    pub bold: Style,

    /// Whether lines get painted at all.
    pub is_present: bool,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            ok: Style::new().green(),
            skipped: Style::new().cyan(),
            err: Style::new().red(),
            header: Style::new().blue(),
            bold: Style::new().bold(),
            is_present: console::Term::stdout().is_term()
                && console::colors_enabled(),
        }
    }
}

impl Styles {
    /// Creates [`Styles`] painting only when stdout is a colored terminal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the given [`Coloring`] to these [`Styles`].
    pub fn apply_coloring(&mut self, color: Coloring) {
        match color {
            Coloring::Auto => {}
            Coloring::Always => {
                self.is_present = true;
                for style in [
                    &mut self.ok,
                    &mut self.skipped,
                    &mut self.err,
                    &mut self.header,
                    &mut self.bold,
                ] {
                    *style = style.clone().force_styling(true);
                }
            }
            Coloring::Never => self.is_present = false,
        }
    }

    /// Paints `input` as a passed step.
    #[must_use]
    pub fn ok<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.apply(&self.ok, input)
    }

    /// Paints `input` as a pending or not performed step.
    #[must_use]
    pub fn skipped<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.apply(&self.skipped, input)
    }

    /// Paints `input` as a failure.
    #[must_use]
    pub fn err<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.apply(&self.err, input)
    }

    /// Paints `input` as a header.
    #[must_use]
    pub fn header<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.apply(&self.header, input)
    }

    /// Paints `input` as a title.
    #[must_use]
    pub fn bold<'a>(&self, input: impl Into<Cow<'a, str>>) -> Cow<'a, str> {
        self.apply(&self.bold, input)
    }

    /// Paints `input` with the given `style`, unless painting is off.
    fn apply<'a>(
        &self,
        style: &Style,
        input: impl Into<Cow<'a, str>>,
    ) -> Cow<'a, str> {
        if self.is_present {
            style.apply_to(input.into()).to_string().into()
        } else {
            input.into()
        }
    }
}

/// [`io::Write`] extension writing whole strings.
pub trait WriteStrExt: io::Write {
    /// Writes all of the `string`.
    ///
    /// # Errors
    ///
    /// If the underlying write fails.
    fn write_str(&mut self, string: impl AsRef<str>) -> io::Result<()> {
        self.write_all(string.as_ref().as_bytes())
    }

    /// Writes all of the `string` and terminates the line.
    ///
    /// # Errors
    ///
    /// If the underlying write fails.
    fn write_line(&mut self, string: impl AsRef<str>) -> io::Result<()> {
        self.write_str(string)?;
        self.write_all(b"\n")
    }
}

impl<T: io::Write + ?Sized> WriteStrExt for T {}

/// In-memory [`io::Write`] sink collecting UTF-8 output into a [`String`].
#[derive(
    Clone,
    Debug,
    Default,
    Deref,
    DerefMut,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub struct WritableString(pub String);

impl io::Write for WritableString {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = str::from_utf8(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.0.push_str(text);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coloring_toggles_styling() {
        let mut styles = Styles::new();

        styles.apply_coloring(Coloring::Never);
        assert_eq!(styles.ok("fine"), "fine");

        styles.apply_coloring(Coloring::Always);
        assert_ne!(styles.err("broken"), "broken");
        assert!(styles.err("broken").contains("broken"));
    }

    #[test]
    fn writable_string_collects_lines() {
        let mut out = WritableString::default();

        out.write_line("a").unwrap();
        out.write_str("b").unwrap();

        assert_eq!(out.0, "a\nb");
    }
}
