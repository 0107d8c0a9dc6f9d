// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Locale-specific [`Keywords`] used to recognise the structure of a
//! [`Story`] text.
//!
//! [`Story`]: crate::Story

use std::collections::HashMap;

use derive_more::with_trait::{Display, Error};

use crate::step::StepType;

/// Every token a [`Keywords`] table must provide.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Keyword {
    /// Starts a [`Narrative`](crate::Narrative) block.
    Narrative,

    /// `In order to` clause of a [`Narrative`](crate::Narrative).
    InOrderTo,

    /// `As a` clause of a [`Narrative`](crate::Narrative).
    AsA,

    /// `I want to` clause of a [`Narrative`](crate::Narrative).
    IWantTo,

    /// `So that` clause of a [`Narrative`](crate::Narrative).
    SoThat,

    /// Starts a [`Scenario`](crate::Scenario) block.
    Scenario,

    /// Introduces the given stories of a [`Scenario`](crate::Scenario).
    GivenStories,

    /// Introduces the [`ExamplesTable`](crate::ExamplesTable) of a
    /// [`Scenario`](crate::Scenario).
    ExamplesTable,

    /// Starting word of a [`StepType::Given`] step.
    Given,

    /// Starting word of a [`StepType::When`] step.
    When,

    /// Starting word of a [`StepType::Then`] step.
    Then,

    /// Starting word continuing the previous step type.
    And,

    /// Prefix of a comment step, which is never executed.
    Ignorable,

    /// Label of a pending step outcome.
    Pending,

    /// Label of a not performed step outcome.
    NotPerformed,

    /// Label of a failed step outcome.
    Failed,

    /// Label of a single example row.
    ExamplesTableRow,
}

impl Keyword {
    /// All the [`Keyword`]s, in their canonical order.
    pub const ALL: [Self; 17] = [
        Self::Narrative,
        Self::InOrderTo,
        Self::AsA,
        Self::IWantTo,
        Self::SoThat,
        Self::Scenario,
        Self::GivenStories,
        Self::ExamplesTable,
        Self::Given,
        Self::When,
        Self::Then,
        Self::And,
        Self::Ignorable,
        Self::Pending,
        Self::NotPerformed,
        Self::Failed,
        Self::ExamplesTableRow,
    ];

    /// Returns the English token of this [`Keyword`].
    #[must_use]
    pub const fn english(self) -> &'static str {
        match self {
            Self::Narrative => "Narrative:",
            Self::InOrderTo => "In order to",
            Self::AsA => "As a",
            Self::IWantTo => "I want to",
            Self::SoThat => "So that",
            Self::Scenario => "Scenario:",
            Self::GivenStories => "GivenStories:",
            Self::ExamplesTable => "Examples:",
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::Ignorable => "!--",
            Self::Pending => "PENDING",
            Self::NotPerformed => "NOT PERFORMED",
            Self::Failed => "FAILED",
            Self::ExamplesTableRow => "Example:",
        }
    }
}

/// Error of constructing [`Keywords`] from an incomplete table.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("Keyword `{_0}` is missing from the keywords table")]
pub struct KeywordNotFound(#[error(not(source))] pub Keyword);

/// Complete table of the tokens recognised in a story text.
///
/// Construction validates that every [`Keyword`] is present, so lookups
/// afterwards never fail.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Keywords {
    /// Tokens indexed by [`Keyword`] discriminant.
    tokens: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        Self::english()
    }
}

impl Keywords {
    /// Creates [`Keywords`] out of the provided `table`.
    ///
    /// # Errors
    ///
    /// If any [`Keyword`] is absent from the `table`.
    pub fn new<I, S>(table: I) -> Result<Self, KeywordNotFound>
    where
        I: IntoIterator<Item = (Keyword, S)>,
        S: Into<String>,
    {
        let mut table = table
            .into_iter()
            .map(|(k, v)| (k, v.into()))
            .collect::<HashMap<_, _>>();
        let tokens = Keyword::ALL
            .iter()
            .map(|k| table.remove(k).ok_or(KeywordNotFound(*k)))
            .collect::<Result<_, _>>()?;
        Ok(Self { tokens })
    }

    /// Creates the default English [`Keywords`].
    #[must_use]
    pub fn english() -> Self {
        Self {
            tokens: Keyword::ALL
                .iter()
                .map(|k| k.english().to_owned())
                .collect(),
        }
    }

    /// Returns the token of the given [`Keyword`].
    #[must_use]
    pub fn get(&self, keyword: Keyword) -> &str {
        &self.tokens[keyword as usize]
    }

    /// Returns the starting words of steps, in `Given`, `When`, `Then`,
    /// `And` order.
    #[must_use]
    pub fn starting_words(&self) -> [&str; 4] {
        [
            self.get(Keyword::Given),
            self.get(Keyword::When),
            self.get(Keyword::Then),
            self.get(Keyword::And),
        ]
    }

    /// Returns the starting word the given `step` text begins with, if any.
    ///
    /// A starting word only counts when followed by whitespace or the end of
    /// the text, so `Givenly` doesn't start with `Given`.
    #[must_use]
    pub fn starting_word<'s>(&self, step: &'s str) -> Option<&'s str> {
        let step = step.trim_start();
        self.starting_words().into_iter().find_map(|word| {
            let rest = step.strip_prefix(word)?;
            (rest.is_empty() || rest.starts_with(char::is_whitespace))
                .then(|| &step[..word.len()])
        })
    }

    /// Strips the starting word (and the whitespace following it) off the
    /// given `step` text.
    ///
    /// Returns the trimmed `step` as is, if it has no starting word.
    #[must_use]
    pub fn strip_starting_word<'s>(&self, step: &'s str) -> &'s str {
        let step = step.trim_start();
        match self.starting_word(step) {
            Some(word) => step[word.len()..].trim_start(),
            None => step,
        }
    }

    /// Returns [`StepType`] denoted by the starting word of the given `step`,
    /// if any. `And` resolves to the provided `previous` type.
    #[must_use]
    pub fn step_type_of(
        &self,
        step: &str,
        previous: Option<StepType>,
    ) -> Option<StepType> {
        let word = self.starting_word(step)?;
        if word == self.get(Keyword::Given) {
            Some(StepType::Given)
        } else if word == self.get(Keyword::When) {
            Some(StepType::When)
        } else if word == self.get(Keyword::Then) {
            Some(StepType::Then)
        } else {
            previous
        }
    }

    /// Indicates whether the given `step` is a comment, which is never
    /// executed.
    #[must_use]
    pub fn is_ignorable(&self, step: &str) -> bool {
        step.trim_start().starts_with(self.get(Keyword::Ignorable))
    }

    /// Indicates whether the given `line` starts a new step.
    #[must_use]
    pub fn starts_step(&self, line: &str) -> bool {
        self.starting_word(line).is_some() || self.is_ignorable(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_table_is_complete() {
        let kw = Keywords::default();

        assert_eq!(kw.get(Keyword::Narrative), "Narrative:");
        assert_eq!(kw.get(Keyword::ExamplesTable), "Examples:");
        assert_eq!(kw.get(Keyword::NotPerformed), "NOT PERFORMED");
        assert_eq!(kw.get(Keyword::ExamplesTableRow), "Example:");
    }

    #[test]
    fn missing_keyword_is_reported() {
        let table = Keyword::ALL
            .into_iter()
            .filter(|k| *k != Keyword::SoThat)
            .map(|k| (k, k.english()));

        assert_eq!(Keywords::new(table), Err(KeywordNotFound(Keyword::SoThat)));
    }

    #[test]
    fn custom_table_is_used() {
        let table = Keyword::ALL.into_iter().map(|k| match k {
            Keyword::Given => (k, "Gegeben"),
            Keyword::When => (k, "Wenn"),
            _ => (k, k.english()),
        });
        let kw = Keywords::new(table).unwrap();

        assert_eq!(kw.starting_word("Gegeben ein Konto"), Some("Gegeben"));
        assert_eq!(kw.strip_starting_word("Wenn   ich zahle"), "ich zahle");
        assert_eq!(kw.starting_word("Given nothing"), None);
    }

    #[test]
    fn starting_word_needs_a_word_boundary() {
        let kw = Keywords::default();

        assert_eq!(kw.starting_word("Given a scenario"), Some("Given"));
        assert_eq!(kw.starting_word("Givenly so"), None);
        assert_eq!(kw.starting_word("  Then"), Some("Then"));
        assert_eq!(kw.strip_starting_word("Givenly so"), "Givenly so");
    }

    #[test]
    fn and_continues_previous_type() {
        let kw = Keywords::default();

        assert_eq!(
            kw.step_type_of("And more", Some(StepType::When)),
            Some(StepType::When),
        );
        assert_eq!(kw.step_type_of("Then done", None), Some(StepType::Then));
        assert_eq!(kw.step_type_of("!-- note", None), None);
    }

    #[test]
    fn comments_start_steps() {
        let kw = Keywords::default();

        assert!(kw.is_ignorable("!-- a comment"));
        assert!(kw.starts_step("!--no space needed"));
        assert!(!kw.starts_step("Scenario: x"));
    }
}
