// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pipe-delimited [`ExamplesTable`] parameterizing a [`Scenario`].
//!
//! [`Scenario`]: crate::Scenario

use std::fmt;

use linked_hash_map::LinkedHashMap;

/// Single row of an [`ExamplesTable`], mapping column headers to values in
/// the column order.
pub type Row = LinkedHashMap<String, String>;

/// Separator of cells in a table row.
const SEPARATOR: char = '|';

/// Prefix of a table row which is ignored.
const IGNORABLE_SEPARATOR: &str = "|--";

/// Table of examples, every row of which runs its [`Scenario`] once.
///
/// # Example
///
/// ```rust
/// use storyline::ExamplesTable;
///
/// let table = ExamplesTable::parse(
///     "|name|age|\n\
///      |--  a comment row|\n\
///      |Alice|30|\n\
///      |Bob|25|",
/// );
///
/// assert_eq!(table.headers(), ["name", "age"]);
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.rows()[1]["age"], "25");
/// ```
///
/// [`Scenario`]: crate::Scenario
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExamplesTable {
    /// Ordered column headers.
    headers: Vec<String>,

    /// Ordered rows.
    rows: Vec<Row>,

    /// Text this table was parsed from.
    text: String,
}

impl ExamplesTable {
    /// Creates an empty [`ExamplesTable`], running its scenario once
    /// unparameterized.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses the given pipe-delimited `text`.
    ///
    /// The first non-ignorable line gives the headers. Lines starting with
    /// `|--` and blank lines are skipped. Cells are trimmed, cells beyond the
    /// headers are dropped, and missing trailing cells are filled with empty
    /// values.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let mut headers = Vec::new();
        let mut rows = Vec::new();

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with(IGNORABLE_SEPARATOR) {
                continue;
            }
            let cells = parse_cells(line);
            if headers.is_empty() {
                headers = cells;
                continue;
            }
            if cells.len() != headers.len() {
                tracing::debug!(
                    "examples row `{line}` has {} cells, expected {}",
                    cells.len(),
                    headers.len(),
                );
            }
            let mut cells = cells.into_iter();
            rows.push(
                headers
                    .iter()
                    .map(|h| (h.clone(), cells.next().unwrap_or_default()))
                    .collect(),
            );
        }

        Self {
            headers,
            rows,
            text: text.to_owned(),
        }
    }

    /// Returns the column headers.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the rows, in their declaration order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the row at the given `index`, if any.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Returns the number of rows, excluding the headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Indicates whether this [`ExamplesTable`] has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the text this [`ExamplesTable`] was parsed from.
    #[must_use]
    pub fn as_text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ExamplesTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for h in &self.headers {
            write!(f, "{SEPARATOR}{h}")?;
        }
        writeln!(f, "{SEPARATOR}")?;
        for row in &self.rows {
            for v in row.values() {
                write!(f, "{SEPARATOR}{v}")?;
            }
            writeln!(f, "{SEPARATOR}")?;
        }
        Ok(())
    }
}

/// Splits the given table `line` into trimmed cells, dropping the blank
/// leading and trailing ones produced by the outer separators.
fn parse_cells(line: &str) -> Vec<String> {
    let mut cells = line
        .split(SEPARATOR)
        .map(|c| c.trim().to_owned())
        .collect::<Vec<_>>();
    if cells.first().is_some_and(String::is_empty) {
        _ = cells.remove(0);
    }
    if cells.last().is_some_and(String::is_empty) {
        _ = cells.pop();
    }
    cells
}
