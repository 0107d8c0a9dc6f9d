// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default [`Reporter`] implementation.

use std::{borrow::Cow, io};

use derive_more::with_trait::Debug;
use itertools::Itertools as _;

use super::{
    Arbitrary, Reporter,
    out::{Styles, WriteStrExt as _},
};
use crate::{
    Event, Keyword, Keywords, cli::Coloring, model::Story,
};

/// Default [`Reporter`] implementation outputting to an [`io::Write`]
/// implementor ([`io::Stdout`] by default).
///
/// Stories, scenarios and steps are indented by their nesting, given stories
/// being nested into the scenarios requiring them.
#[derive(Debug)]
pub struct Basic<Out: io::Write = io::Stdout> {
    /// [`io::Write`] implementor to write the output into.
    #[debug(ignore)]
    output: Out,

    /// [`Styles`] for terminal output.
    styles: Styles,

    /// [`Keywords`] labelling the rendered structure and outcomes.
    keywords: Keywords,

    /// Current indentation of the output.
    indent: usize,
}

impl Basic {
    /// Creates a new [`Basic`] [`Reporter`] outputting to [`io::Stdout`].
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout(), Coloring::Auto)
    }
}

impl<Out: io::Write> Basic<Out> {
    /// Creates a new [`Basic`] [`Reporter`] outputting to the given `output`
    /// with the given [`Coloring`].
    #[must_use]
    pub fn new(output: Out, color: Coloring) -> Self {
        let mut styles = Styles::new();
        styles.apply_coloring(color);
        Self {
            output,
            styles,
            keywords: Keywords::english(),
            indent: 0,
        }
    }

    /// Renders labels with the given [`Keywords`] instead of English ones.
    #[must_use]
    pub fn with_keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Returns the [`Styles`] of this [`Basic`] [`Reporter`].
    #[must_use]
    pub const fn styles(&self) -> &Styles {
        &self.styles
    }

    /// Returns the output of this [`Basic`] [`Reporter`].
    #[must_use]
    pub const fn output(&self) -> &Out {
        &self.output
    }

    /// Consumes this [`Basic`] [`Reporter`] returning its output.
    #[must_use]
    pub fn into_output(self) -> Out {
        self.output
    }

    /// Renders the given [`Event`] into lines of output.
    fn render(&self, event: &Event) -> Vec<Cow<'static, str>> {
        let (s, kw) = (&self.styles, &self.keywords);
        match event {
            Event::BeforeStory { story, embedded } => {
                self.story_header(story, *embedded)
            }
            Event::BeforeScenario(title) => {
                vec![s.bold(format!("{} {title}", kw.get(Keyword::Scenario)))]
            }
            Event::GivenStories(paths) => vec![
                format!(
                    "{} {}",
                    kw.get(Keyword::GivenStories),
                    paths.iter().join(", "),
                )
                .into(),
            ],
            Event::BeforeExamples { table, .. } => {
                let header = kw.get(Keyword::ExamplesTable).to_owned();
                std::iter::once(Cow::Owned(header))
                    .chain(
                        table
                            .to_string()
                            .lines()
                            .map(|l| Cow::Owned(format!("  {l}"))),
                    )
                    .collect()
            }
            Event::Example(row) => {
                let values =
                    row.iter().map(|(k, v)| format!("{k}={v}")).join(", ");
                vec![s.header(format!(
                    "{} {{{values}}}",
                    kw.get(Keyword::ExamplesTableRow),
                ))]
            }
            Event::AfterStory { .. }
            | Event::AfterScenario
            | Event::AfterExamples => vec![],
            Event::Successful(step) => {
                vec![s.ok(format!("\u{2714}  {step}"))]
            }
            Event::Failed(step, err) => vec![
                s.err(format!(
                    "\u{2718}  {step} ({})",
                    kw.get(Keyword::Failed),
                )),
                s.err(format!("   {err}")),
            ],
            Event::Pending(step) => vec![s.skipped(format!(
                "?  {step} ({})",
                kw.get(Keyword::Pending),
            ))],
            Event::NotPerformed(step) => vec![s.skipped(format!(
                "-  {step} ({})",
                kw.get(Keyword::NotPerformed),
            ))],
            Event::Ignorable(step) => vec![step.clone().into()],
        }
    }

    /// Renders the header lines of the given [`Story`].
    fn story_header(
        &self,
        story: &Story,
        embedded: bool,
    ) -> Vec<Cow<'static, str>> {
        let kw = &self.keywords;
        let kind = if embedded { "Given story" } else { "Story" };
        let mut lines = vec![
            self.styles
                .bold(self.styles.header(format!("{kind}: {}", story.path()))),
        ];
        lines.extend(
            story
                .description
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| Cow::Owned(format!("  {}", l.trim()))),
        );
        let narrative = &story.narrative;
        if !narrative.is_empty() {
            lines.push(format!("  {}", kw.get(Keyword::Narrative)).into());
            let clauses = if narrative.is_alternative() {
                [
                    (Keyword::AsA, &narrative.as_a),
                    (Keyword::IWantTo, &narrative.i_want_to),
                    (Keyword::SoThat, &narrative.so_that),
                ]
            } else {
                [
                    (Keyword::InOrderTo, &narrative.in_order_to),
                    (Keyword::AsA, &narrative.as_a),
                    (Keyword::IWantTo, &narrative.i_want_to),
                ]
            };
            lines.extend(
                clauses
                    .into_iter()
                    .map(|(k, v)| Cow::Owned(format!("    {} {v}", kw.get(k)))),
            );
        }
        lines
    }

    /// Writes the given `lines` with the current indentation.
    fn write_lines<'a>(
        &mut self,
        lines: impl IntoIterator<Item = Cow<'a, str>>,
    ) {
        let indent = " ".repeat(self.indent);
        for line in lines {
            if let Err(e) = self.output.write_line(format!("{indent}{line}")) {
                tracing::error!("failed to write story output: {e}");
                return;
            }
        }
    }
}

impl<Out: io::Write> Reporter for Basic<Out> {
    fn handle_event(&mut self, event: &Event) {
        if matches!(event, Event::AfterStory { .. } | Event::AfterScenario) {
            self.indent = self.indent.saturating_sub(2);
        }

        let lines = self.render(event);
        self.write_lines(lines);

        if matches!(event, Event::BeforeStory { .. } | Event::BeforeScenario(_))
        {
            self.indent += 2;
        }
    }
}

impl<Out: io::Write> Arbitrary for Basic<Out> {
    fn write(&mut self, text: &str) {
        let indent = self.indent;
        self.indent = 0;
        self.write_lines(text.lines().map(Cow::Borrowed));
        self.indent = indent;
    }
}
