// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Compilation of step patterns with prefixed placeholders into
//! [`StepMatcher`]s.
//!
//! A pattern like `I have $count cucumbers in $place` compiles into an
//! anchored [`Regex`] capturing every placeholder, while the rest of the
//! pattern matches literally, any whitespace run matching any other.

use regex::Regex;
use smart_default::SmartDefault;

use super::error::InvalidPattern;

/// Compiler of step patterns.
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub struct StepPatternParser {
    /// Character prefixing a placeholder name.
    #[default('$')]
    prefix: char,
}

impl StepPatternParser {
    /// Creates a new [`StepPatternParser`] recognising placeholders prefixed
    /// with the given character.
    #[must_use]
    pub const fn new(prefix: char) -> Self {
        Self { prefix }
    }

    /// Returns the placeholder prefix of this [`StepPatternParser`].
    #[must_use]
    pub const fn prefix(&self) -> char {
        self.prefix
    }

    /// Compiles the given `pattern` into a [`StepMatcher`].
    ///
    /// # Errors
    ///
    /// If the resulting [`Regex`] fails to compile.
    pub fn parse(&self, pattern: &str) -> Result<StepMatcher, InvalidPattern> {
        let trimmed = pattern.trim();
        let mut source = String::from("(?s)^");
        let mut parameter_names = Vec::new();
        let mut chars = trimmed.char_indices().peekable();

        while let Some((at, c)) = chars.next() {
            if c.is_whitespace() {
                while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
                source.push_str(r"\s+");
            } else if c == self.prefix
                && chars.peek().is_some_and(|(_, c)| is_word(*c))
            {
                let mut end = at + c.len_utf8();
                while let Some((i, c)) = chars.next_if(|(_, c)| is_word(*c)) {
                    end = i + c.len_utf8();
                }
                parameter_names
                    .push(trimmed[at + c.len_utf8()..end].to_owned());
                source.push_str("(.*)");
            } else {
                source.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
            }
        }
        source.push('$');

        tracing::trace!("compiled step pattern `{pattern}` into `{source}`");

        let regex = Regex::new(&source).map_err(|e| InvalidPattern {
            pattern: pattern.to_owned(),
            source: e,
        })?;
        Ok(StepMatcher {
            pattern: pattern.to_owned(),
            regex,
            parameter_names,
        })
    }
}

/// Indicates whether the given character may continue a placeholder name.
fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Compiled step pattern.
#[derive(Clone, Debug)]
pub struct StepMatcher {
    /// Pattern this [`StepMatcher`] was compiled from.
    pattern: String,

    /// Compiled [`Regex`].
    regex: Regex,

    /// Placeholder names, in their order of appearance.
    parameter_names: Vec<String>,
}

impl StepMatcher {
    /// Returns the pattern this [`StepMatcher`] was compiled from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the compiled [`Regex`].
    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns the placeholder names, in their order of appearance.
    #[must_use]
    pub fn parameter_names(&self) -> &[String] {
        &self.parameter_names
    }

    /// Indicates whether the given `step` text (stripped of its starting
    /// word) matches.
    #[must_use]
    pub fn matches(&self, step: &str) -> bool {
        self.regex.is_match(step.trim())
    }

    /// Extracts the trimmed placeholder values out of the given `step` text
    /// (stripped of its starting word), if it matches.
    #[must_use]
    pub fn extract(&self, step: &str) -> Option<Vec<String>> {
        let captures = self.regex.captures(step.trim())?;
        Some(
            captures
                .iter()
                .skip(1)
                .map(|m| m.map_or("", |m| m.as_str().trim()).to_owned())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str) -> StepMatcher {
        StepPatternParser::default().parse(pattern).unwrap()
    }

    #[test]
    fn extracts_placeholders_in_order() {
        let m = compile("I have $count cucumbers in $place");

        assert_eq!(m.parameter_names(), ["count", "place"]);
        assert_eq!(
            m.extract("I have 5 cucumbers in my  belly").unwrap(),
            ["5", "my  belly"],
        );
        assert!(!m.matches("I had 5 cucumbers in my belly"));
    }

    #[test]
    fn escapes_metacharacters() {
        let m = compile("a (price) of $amount.$cents [total]? + *tax*");

        assert_eq!(
            m.extract("a (price) of 3.50 [total]? + *tax*").unwrap(),
            ["3", "50"],
        );
        assert!(!m.matches("a price of 3.50 total + tax"));
    }

    #[test]
    fn whitespace_runs_are_interchangeable() {
        let m = compile("the  user\tlogs in");

        assert!(m.matches("the user logs in"));
        assert!(m.matches("the   user \n logs in"));
        assert!(!m.matches("the userlogs in"));
    }

    #[test]
    fn anchored_and_case_sensitive() {
        let m = compile("a step");

        assert!(m.matches("a step"));
        assert!(!m.matches("a step more"));
        assert!(!m.matches("not a step"));
        assert!(!m.matches("A step"));
    }

    #[test]
    fn captures_span_lines() {
        let m = compile("a table $table");

        assert_eq!(
            m.extract("a table |a|b|\n|1|2|").unwrap(),
            ["|a|b|\n|1|2|"],
        );
    }

    #[test]
    fn captures_are_trimmed() {
        let m = compile("$who pays $amount");

        assert_eq!(m.extract("Bob  pays   10 ").unwrap(), ["Bob", "10"]);
    }

    #[test]
    fn custom_prefix_is_used() {
        let m = StepPatternParser::new('%').parse("I see %n $items").unwrap();

        assert_eq!(m.parameter_names(), ["n"]);
        assert_eq!(m.extract("I see 3 $items").unwrap(), ["3"]);
        assert!(!m.matches("I see 3 apples"));
    }

    #[test]
    fn lone_prefix_is_literal() {
        let m = compile("costs $ $amount");

        assert_eq!(m.parameter_names(), ["amount"]);
        assert_eq!(m.extract("costs $ 5").unwrap(), ["5"]);
    }

    #[test]
    fn round_trips_many_placeholders() {
        let names = ["a", "b_2", "c", "d", "e"];
        let pattern = names
            .iter()
            .map(|n| format!("(${n})?"))
            .collect::<Vec<_>>()
            .join(" + ");
        let values = ["1", "x y", "^$", "a.b", "[z]"];
        let text = values
            .iter()
            .map(|v| format!("({v})?"))
            .collect::<Vec<_>>()
            .join(" + ");
        let m = compile(&pattern);

        assert_eq!(m.parameter_names(), names);
        assert_eq!(m.extract(&text).unwrap(), values);
    }
}
