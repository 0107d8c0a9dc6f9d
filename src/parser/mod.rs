// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for parsing textual [`Story`]s and loading them.
//!
//! Parsing is a single linear pass over the lines of a text, recognising
//! keywords only at the start of a line.

pub mod loader;

use crate::{
    keywords::{Keyword, Keywords},
    model::{ExamplesTable, Narrative, Scenario, Story},
};

#[doc(inline)]
pub use self::loader::{FileSystem, InMemory, LoadError, StoryLoader};

/// Parser of textual [`Story`]s.
///
/// Never fails: irregular input degrades into an empty [`Narrative`], an
/// anonymous [`Scenario`] or ignored lines, each reported via [`tracing`].
#[derive(Clone, Debug, Default)]
pub struct StoryParser {
    /// [`Keywords`] recognised in a story text.
    keywords: Keywords,
}

/// Kind of a line opening a new part of a story.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Opener {
    Narrative,
    Scenario,
    GivenStories,
    Examples,
    Step,
}

/// Part of a [`Scenario`] being collected.
#[derive(Debug)]
enum Section {
    Title(Vec<String>),
    GivenStories(Vec<String>),
    Step(Vec<String>),
    Examples(Vec<String>),
}

impl Opener {
    /// Indicates whether this [`Opener`] starts a part of a [`Scenario`].
    const fn opens_scenario_part(self) -> bool {
        matches!(self, Self::Step | Self::GivenStories | Self::Examples)
    }
}

impl StoryParser {
    /// Creates a new [`StoryParser`] recognising the given [`Keywords`].
    #[must_use]
    pub const fn new(keywords: Keywords) -> Self {
        Self { keywords }
    }

    /// Returns the [`Keywords`] this [`StoryParser`] recognises.
    #[must_use]
    pub const fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    /// Parses the given story `text`, optionally loaded from the given
    /// `path`.
    #[must_use]
    pub fn parse(&self, text: &str, path: Option<&str>) -> Story {
        let lines = text.lines().collect::<Vec<_>>();
        let openers = lines
            .iter()
            .map(|l| self.opener_of(l))
            .collect::<Vec<_>>();

        let description_end = openers
            .iter()
            .position(Option::is_some)
            .unwrap_or(lines.len());
        let description = lines[..description_end].join("\n").trim().to_owned();

        let first_scenario = openers
            .iter()
            .position(|o| *o == Some(Opener::Scenario));

        let (narrative, body_start) =
            if openers.get(description_end) == Some(&Some(Opener::Narrative)) {
                let end = first_scenario.unwrap_or_else(|| {
                    openers
                        .iter()
                        .skip(description_end + 1)
                        .position(|o| {
                            o.is_some_and(Opener::opens_scenario_part)
                        })
                        .map_or(lines.len(), |p| p + description_end + 1)
                });
                let text = self.strip_keyword(
                    &lines[description_end..end].join("\n"),
                    Keyword::Narrative,
                );
                (self.parse_narrative(&text), end)
            } else {
                (Narrative::EMPTY, description_end)
            };

        let scenarios = match first_scenario {
            Some(first) => {
                let stray = lines[body_start..first.max(body_start)]
                    .iter()
                    .any(|l| !l.trim().is_empty());
                if stray {
                    tracing::debug!(
                        "ignoring text between narrative and first scenario \
                         of story `{}`",
                        path.unwrap_or_default(),
                    );
                }
                let starts = (first..lines.len())
                    .filter(|i| openers[*i] == Some(Opener::Scenario))
                    .collect::<Vec<_>>();
                starts
                    .iter()
                    .enumerate()
                    .map(|(n, &start)| {
                        let end =
                            starts.get(n + 1).copied().unwrap_or(lines.len());
                        let title =
                            self.strip_keyword(lines[start], Keyword::Scenario);
                        self.parse_scenario(&title, &lines[start + 1..end])
                    })
                    .collect()
            }
            None => {
                let body = &lines[body_start..];
                if body.iter().all(|l| l.trim().is_empty()) {
                    vec![]
                } else {
                    vec![self.parse_scenario("", body)]
                }
            }
        };

        Story {
            path: path.map(ToOwned::to_owned),
            description,
            narrative,
            scenarios,
        }
    }

    /// Returns the [`Opener`] the given `line` starts with, if any.
    fn opener_of(&self, line: &str) -> Option<Opener> {
        let kw = &self.keywords;
        let trimmed = line.trim_start();
        let starts = |k| trimmed.starts_with(kw.get(k));

        if starts(Keyword::Scenario) {
            Some(Opener::Scenario)
        } else if starts(Keyword::Narrative) {
            Some(Opener::Narrative)
        } else if starts(Keyword::GivenStories) {
            Some(Opener::GivenStories)
        } else if starts(Keyword::ExamplesTable) {
            Some(Opener::Examples)
        } else if kw.starts_step(trimmed) {
            Some(Opener::Step)
        } else {
            None
        }
    }

    /// Strips the given [`Keyword`] off the start of the `text`.
    fn strip_keyword(&self, text: &str, keyword: Keyword) -> String {
        let text = text.trim_start();
        text.strip_prefix(self.keywords.get(keyword))
            .unwrap_or(text)
            .to_owned()
    }

    /// Parses the text following the `Narrative:` keyword.
    fn parse_narrative(&self, text: &str) -> Narrative {
        let kw = &self.keywords;
        let narrative = split_clauses(
            text,
            [
                kw.get(Keyword::InOrderTo),
                kw.get(Keyword::AsA),
                kw.get(Keyword::IWantTo),
            ],
        )
        .map(|[in_order_to, as_a, i_want_to]| {
            Narrative::new(in_order_to, as_a, i_want_to)
        })
        .or_else(|| {
            split_clauses(
                text,
                [
                    kw.get(Keyword::AsA),
                    kw.get(Keyword::IWantTo),
                    kw.get(Keyword::SoThat),
                ],
            )
            .map(|[as_a, i_want_to, so_that]| {
                Narrative::alternative(as_a, i_want_to, so_that)
            })
        });

        narrative.unwrap_or_else(|| {
            tracing::debug!("unrecognised narrative: {}", text.trim());
            Narrative::EMPTY
        })
    }

    /// Parses a [`Scenario`] block out of its `title` line remainder and the
    /// `lines` following it.
    fn parse_scenario(&self, title: &str, lines: &[&str]) -> Scenario {
        let mut scenario = Scenario::default();
        let mut section = Section::Title(vec![title.to_owned()]);

        for line in lines {
            if let Section::Examples(buf) = &mut section {
                buf.push((*line).to_owned());
                continue;
            }
            let next = match self.opener_of(line) {
                Some(Opener::Examples) => Section::Examples(vec![
                    self.strip_keyword(line, Keyword::ExamplesTable),
                ]),
                Some(Opener::GivenStories) => Section::GivenStories(vec![
                    self.strip_keyword(line, Keyword::GivenStories),
                ]),
                Some(Opener::Step) => {
                    Section::Step(vec![line.trim_start().to_owned()])
                }
                Some(Opener::Narrative | Opener::Scenario) | None => {
                    match &mut section {
                        Section::Title(buf)
                        | Section::GivenStories(buf)
                        | Section::Step(buf)
                        | Section::Examples(buf) => {
                            buf.push((*line).to_owned());
                        }
                    }
                    continue;
                }
            };
            close(&mut scenario, std::mem::replace(&mut section, next));
        }
        close(&mut scenario, section);

        scenario
    }
}

/// Finishes the given [`Section`] into the `scenario`.
fn close(scenario: &mut Scenario, section: Section) {
    match section {
        Section::Title(buf) => {
            scenario.title = buf.join("\n").trim().to_owned();
        }
        Section::GivenStories(buf) => {
            scenario.given_stories.extend(
                buf.join(",")
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(ToOwned::to_owned),
            );
        }
        Section::Step(buf) => {
            scenario.steps.push(buf.join("\n").trim().to_owned());
        }
        Section::Examples(buf) => {
            scenario.examples = ExamplesTable::parse(&buf.join("\n"));
        }
    }
}

/// Splits the `text` by the given clause keywords, expected in this exact
/// order, returning the trimmed text following each of them.
fn split_clauses<'t>(
    text: &'t str,
    keywords: [&str; 3],
) -> Option<[&'t str; 3]> {
    let mut bounds = [(0, 0); 3];
    let mut from = 0;
    for (i, kw) in keywords.into_iter().enumerate() {
        let at = from + text[from..].find(kw)?;
        bounds[i] = (at, at + kw.len());
        from = at + kw.len();
    }
    let clause = move |i: usize| {
        let end = bounds.get(i + 1).map_or(text.len(), |b| b.0);
        text[bounds[i].1..end].trim()
    };
    Some([clause(0), clause(1), clause(2)])
}
