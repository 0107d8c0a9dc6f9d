// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parsed [`Story`] and its parts.

use super::ExamplesTable;

/// Parsed story document.
///
/// Immutable once produced by a [`StoryParser`].
///
/// [`StoryParser`]: crate::StoryParser
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Story {
    /// Path this [`Story`] was loaded from, if any.
    pub path: Option<String>,

    /// Free text preceding the [`Narrative`] and the [`Scenario`]s.
    pub description: String,

    /// [`Narrative`] of this [`Story`].
    pub narrative: Narrative,

    /// [`Scenario`]s of this [`Story`], in their declaration order.
    pub scenarios: Vec<Scenario>,
}

impl Story {
    /// Creates a new [`Story`] out of the given [`Scenario`]s only.
    #[must_use]
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self {
            scenarios,
            ..Self::default()
        }
    }

    /// Returns the path of this [`Story`], or an empty string if it has
    /// none.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or_default()
    }
}

/// Narrative of a [`Story`], stating its purpose.
///
/// Either the `in order to` / `as a` / `i want to` form, or the alternative
/// `as a` / `i want to` / `so that` one.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Narrative {
    /// `In order to` clause.
    pub in_order_to: String,

    /// `As a` clause.
    pub as_a: String,

    /// `I want to` clause.
    pub i_want_to: String,

    /// `So that` clause of the alternative form.
    pub so_that: String,
}

impl Narrative {
    /// [`Narrative`] of a [`Story`] having none (or an unparseable one).
    pub const EMPTY: Self = Self {
        in_order_to: String::new(),
        as_a: String::new(),
        i_want_to: String::new(),
        so_that: String::new(),
    };

    /// Creates a new [`Narrative`] in the `in order to` form.
    #[must_use]
    pub fn new(
        in_order_to: impl Into<String>,
        as_a: impl Into<String>,
        i_want_to: impl Into<String>,
    ) -> Self {
        Self {
            in_order_to: in_order_to.into(),
            as_a: as_a.into(),
            i_want_to: i_want_to.into(),
            so_that: String::new(),
        }
    }

    /// Creates a new [`Narrative`] in the alternative `so that` form.
    #[must_use]
    pub fn alternative(
        as_a: impl Into<String>,
        i_want_to: impl Into<String>,
        so_that: impl Into<String>,
    ) -> Self {
        Self {
            in_order_to: String::new(),
            as_a: as_a.into(),
            i_want_to: i_want_to.into(),
            so_that: so_that.into(),
        }
    }

    /// Indicates whether this is the [`Narrative::EMPTY`] one.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Indicates whether this [`Narrative`] is in the alternative `so that`
    /// form.
    #[must_use]
    pub fn is_alternative(&self) -> bool {
        !self.so_that.is_empty()
    }
}

/// Scenario of a [`Story`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Scenario {
    /// Title of this [`Scenario`], empty for an anonymous one.
    pub title: String,

    /// Paths of the stories to run before this [`Scenario`]'s steps.
    pub given_stories: Vec<String>,

    /// Raw step texts, including their starting words.
    pub steps: Vec<String>,

    /// [`ExamplesTable`] parameterizing this [`Scenario`].
    pub examples: ExamplesTable,
}

impl Scenario {
    /// Creates a new [`Scenario`] with the given `title` and `steps`.
    #[must_use]
    pub fn new<S: Into<String>>(
        title: impl Into<String>,
        steps: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            title: title.into(),
            steps: steps.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the given stories of this [`Scenario`].
    #[must_use]
    pub fn with_given_stories<S: Into<String>>(
        mut self,
        paths: impl IntoIterator<Item = S>,
    ) -> Self {
        self.given_stories = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the [`ExamplesTable`] of this [`Scenario`].
    #[must_use]
    pub fn with_examples(mut self, examples: ExamplesTable) -> Self {
        self.examples = examples;
        self
    }
}
