// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of building a step [`Collection`].
//!
//! [`Collection`]: super::Collection

use derive_more::with_trait::{Display, Error};

use super::StepType;

/// Error of a [`Collection`] declaring the same step pattern twice for the
/// same [`StepType`].
///
/// [`Collection`]: super::Collection
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
#[display("Duplicate `{step_type} {pattern}` step definition")]
pub struct DuplicateDefinition {
    /// [`StepType`] of the duplicate definition.
    #[error(not(source))]
    pub step_type: StepType,

    /// Literal pattern of the duplicate definition.
    pub pattern: String,
}

/// Error of a step pattern failing to compile.
#[derive(Clone, Debug, Display, Error)]
#[display("Invalid step pattern `{pattern}`: {source}")]
pub struct InvalidPattern {
    /// Pattern failed to compile.
    pub pattern: String,

    /// Underlying [`regex`] error.
    pub source: regex::Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_definition_names_the_step() {
        let err = DuplicateDefinition {
            step_type: StepType::Given,
            pattern: "a given".into(),
        };

        assert_eq!(
            err.to_string(),
            "Duplicate `Given a given` step definition",
        );
    }
}
