// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Consolidated error handling types of the crate.
//!
//! - [`step`] - outcome errors of steps and hooks, reported during a run
//! - [`Error`] - fatal errors of building registries and running stories

pub mod step;

use derive_more::with_trait::Display;

use crate::{
    keywords::KeywordNotFound,
    parser::LoadError,
    step::{DuplicateDefinition, InvalidPattern},
};

#[doc(inline)]
pub use self::step::{Failure, PendingStep, StepError};

/// Top-level error of the crate.
#[derive(Debug, Display, derive_more::with_trait::Error)]
pub enum Error {
    /// [`Keywords`] table is incomplete.
    ///
    /// [`Keywords`]: crate::Keywords
    #[display("{_0}")]
    KeywordNotFound(KeywordNotFound),

    /// Registry declares the same step twice.
    #[display("{_0}")]
    DuplicateDefinition(DuplicateDefinition),

    /// Step pattern doesn't compile.
    #[display("{_0}")]
    InvalidPattern(InvalidPattern),

    /// Step outcome turned fatal by a strategy.
    #[display("{_0}")]
    Step(StepError),

    /// Given story failed to load.
    #[display("{_0}")]
    Load(LoadError),

    /// Given story includes itself, directly or transitively.
    #[display("Given story `{_0}` recursively includes itself")]
    RecursiveGivenStory(#[error(not(source))] String),
}

/// Result type alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Returns the [`StepError`] this [`Error`] carries, if any.
    #[must_use]
    pub const fn as_step_error(&self) -> Option<&StepError> {
        match self {
            Self::Step(e) => Some(e),
            _ => None,
        }
    }
}

impl From<KeywordNotFound> for Error {
    fn from(err: KeywordNotFound) -> Self {
        Self::KeywordNotFound(err)
    }
}

impl From<DuplicateDefinition> for Error {
    fn from(err: DuplicateDefinition) -> Self {
        Self::DuplicateDefinition(err)
    }
}

impl From<InvalidPattern> for Error {
    fn from(err: InvalidPattern) -> Self {
        Self::InvalidPattern(err)
    }
}

impl From<StepError> for Error {
    fn from(err: StepError) -> Self {
        Self::Step(err)
    }
}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Self {
        Self::Load(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;
    use crate::keywords::Keyword;

    #[test]
    fn conversions_keep_the_source() {
        let err = Error::from(KeywordNotFound(Keyword::Given));

        assert!(matches!(err, Error::KeywordNotFound(_)));
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Keyword `Given` is missing from the keywords table",
        );
    }

    #[test]
    fn step_errors_are_exposed() {
        let err = Error::from(StepError::from(PendingStep::new("Given x")));

        assert!(err.as_step_error().is_some_and(StepError::is_pending));
        assert!(Error::RecursiveGivenStory("a".into()).source().is_none());
    }
}
