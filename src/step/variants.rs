// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Expansion of `{a|b|}` variant directives in step patterns.

use itertools::Itertools as _;
use lazy_regex::regex;

/// Expands every `{...|...}` directive of the given `pattern` into all the
/// combinations of its alternatives, in declaration order.
///
/// An empty alternative (like the trailing one in `{a|b|}`) drops the
/// directive. Whitespace runs of the results are compressed into a single
/// space, and duplicates are removed.
///
/// ```rust
/// use storyline::step::variants::expand;
///
/// assert_eq!(
///     expand("a {big|small|} cat"),
///     ["a big cat", "a small cat", "a cat"],
/// );
/// ```
#[must_use]
pub fn expand(pattern: &str) -> Vec<String> {
    let mut variants = vec![String::new()];
    let mut rest = pattern;

    while let Some((head, options, tail)) = next_directive(rest) {
        variants = variants
            .iter()
            .cartesian_product(options.split('|'))
            .map(|(prefix, option)| format!("{prefix}{head}{option}"))
            .collect();
        rest = tail;
    }

    variants
        .into_iter()
        .map(|v| compress_whitespace(&format!("{v}{rest}")))
        .unique()
        .collect()
}

/// Splits the given `text` around its first `{...}` directive, returning the
/// text before it, its inner options and the text after it.
fn next_directive(text: &str) -> Option<(&str, &str, &str)> {
    let open = text.find('{')?;
    let close = open + text[open..].find('}')?;
    Some((&text[..open], &text[open + 1..close], &text[close + 1..]))
}

/// Replaces every whitespace run in the given `text` with a single space
/// and trims it.
fn compress_whitespace(text: &str) -> String {
    regex!(r"\s+").replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_without_directives_is_kept() {
        assert_eq!(expand("a  plain\tpattern "), ["a plain pattern"]);
    }

    #[test]
    fn expands_alternatives_in_order() {
        assert_eq!(
            expand("I {log|sign} {in|on}"),
            ["I log in", "I log on", "I sign in", "I sign on"],
        );
    }

    #[test]
    fn empty_alternative_drops_directive() {
        assert_eq!(expand("{the |}user"), ["the user", "user"]);
    }

    #[test]
    fn single_option_directive_is_unwrapped() {
        assert_eq!(expand("a {b} c"), ["a b c"]);
    }

    #[test]
    fn duplicates_are_removed() {
        assert_eq!(expand("{a|a} {b|b }"), ["a b"]);
    }

    #[test]
    fn placeholders_survive_expansion() {
        assert_eq!(
            expand("{a|the} $item costs $price"),
            ["a $item costs $price", "the $item costs $price"],
        );
    }

    #[test]
    fn unclosed_brace_is_literal() {
        assert_eq!(expand("a {b"), ["a {b"]);
    }
}
