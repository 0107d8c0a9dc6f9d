// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Extensible chain of [`Converter`]s.

use std::{
    any::Any,
    fmt::{self, Debug},
    str::FromStr,
    sync::Arc,
};

use lazy_regex::regex;

use super::{InvalidParameter, ParamKind, Value};
use crate::model::ExamplesTable;

/// Line ending of the current platform, used to normalize text values.
#[cfg(windows)]
const NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
const NEWLINE: &str = "\n";

/// Default separator of list values.
pub const DEFAULT_SEPARATOR: &str = ",";

/// Converter of raw parameter text into a typed [`Value`].
pub trait Converter: Debug + Send + Sync {
    /// Indicates whether this [`Converter`] produces values of the given
    /// [`ParamKind`].
    fn accepts(&self, kind: ParamKind) -> bool;

    /// Converts the `raw` text into a [`Value`] of the given [`ParamKind`].
    ///
    /// # Errors
    ///
    /// If the `raw` text doesn't represent a value of the [`ParamKind`].
    fn convert(
        &self,
        raw: &str,
        kind: ParamKind,
    ) -> Result<Value, InvalidParameter>;
}

/// Ordered chain of [`Converter`]s.
///
/// The first accepting [`Converter`] wins. User-registered ones are consulted
/// before the built-in ones, in their registration order. Kinds no
/// [`Converter`] accepts fall back to [`Value::Text`] with line endings
/// normalized to the platform ones.
#[derive(Clone, Debug)]
pub struct Converters {
    /// [`Converter`]s in their lookup order.
    chain: Vec<Arc<dyn Converter>>,

    /// Number of user-registered [`Converter`]s heading the `chain`.
    custom: usize,
}

impl Default for Converters {
    fn default() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }
}

impl Converters {
    /// Creates [`Converters`] with the built-in [`Converter`]s, splitting
    /// lists by [`DEFAULT_SEPARATOR`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates [`Converters`] with the built-in [`Converter`]s, splitting
    /// lists by the given `separator`.
    #[must_use]
    pub fn with_separator(separator: impl Into<String>) -> Self {
        let separator = separator.into();
        Self {
            chain: vec![
                Arc::new(NumberConverter),
                Arc::new(NumberListConverter::new(separator.clone())),
                Arc::new(TextListConverter::new(separator)),
                Arc::new(TableConverter),
            ],
            custom: 0,
        }
    }

    /// Registers the given `converter` ahead of the built-in ones, but after
    /// the previously registered custom ones.
    #[must_use]
    pub fn with(mut self, converter: impl Converter + 'static) -> Self {
        self.chain.insert(self.custom, Arc::new(converter));
        self.custom += 1;
        self
    }

    /// Converts the `raw` text into a [`Value`] of the given [`ParamKind`].
    ///
    /// # Errors
    ///
    /// If the accepting [`Converter`] fails.
    pub fn convert(
        &self,
        raw: &str,
        kind: ParamKind,
    ) -> Result<Value, InvalidParameter> {
        match self.chain.iter().find(|c| c.accepts(kind)) {
            Some(c) => c.convert(raw, kind),
            None => Ok(Value::Text(normalize_newlines(raw))),
        }
    }
}

/// Replaces every line ending in the given `raw` text with the platform one.
fn normalize_newlines(raw: &str) -> String {
    regex!(r"\r?\n").replace_all(raw, NEWLINE).into_owned()
}

/// Parses the given `raw` trimmed text as a number.
fn parse_number<T>(raw: &str) -> Result<T, InvalidParameter>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| InvalidParameter::new(raw, e))
}

/// Splits the given `raw` text by the `separator` into trimmed elements,
/// yielding none for a blank text.
fn split_list<'r>(
    raw: &'r str,
    separator: &'r str,
) -> impl Iterator<Item = &'r str> + 'r {
    let blank = raw.trim().is_empty();
    raw.split(separator)
        .map(str::trim)
        .filter(move |_| !blank)
}

/// [`Converter`] of [`ParamKind::Integer`] and [`ParamKind::Float`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NumberConverter;

impl Converter for NumberConverter {
    fn accepts(&self, kind: ParamKind) -> bool {
        matches!(kind, ParamKind::Integer | ParamKind::Float)
    }

    fn convert(
        &self,
        raw: &str,
        kind: ParamKind,
    ) -> Result<Value, InvalidParameter> {
        if kind == ParamKind::Integer {
            parse_number(raw).map(Value::Integer)
        } else {
            parse_number(raw).map(Value::Float)
        }
    }
}

/// [`Converter`] of [`ParamKind::IntegerList`] and [`ParamKind::FloatList`].
#[derive(Clone, Debug)]
pub struct NumberListConverter {
    /// Separator of the list elements.
    separator: String,
}

impl NumberListConverter {
    /// Creates a new [`NumberListConverter`] splitting by the given
    /// `separator`.
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Converter for NumberListConverter {
    fn accepts(&self, kind: ParamKind) -> bool {
        matches!(kind, ParamKind::IntegerList | ParamKind::FloatList)
    }

    fn convert(
        &self,
        raw: &str,
        kind: ParamKind,
    ) -> Result<Value, InvalidParameter> {
        let items = split_list(raw, &self.separator);
        if kind == ParamKind::IntegerList {
            items
                .map(parse_number::<i64>)
                .collect::<Result<_, _>>()
                .map(Value::Integers)
        } else {
            items
                .map(parse_number::<f64>)
                .collect::<Result<_, _>>()
                .map(Value::Floats)
        }
    }
}

/// [`Converter`] of [`ParamKind::TextList`].
#[derive(Clone, Debug)]
pub struct TextListConverter {
    /// Separator of the list elements.
    separator: String,
}

impl TextListConverter {
    /// Creates a new [`TextListConverter`] splitting by the given
    /// `separator`.
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Converter for TextListConverter {
    fn accepts(&self, kind: ParamKind) -> bool {
        kind == ParamKind::TextList
    }

    fn convert(
        &self,
        raw: &str,
        _: ParamKind,
    ) -> Result<Value, InvalidParameter> {
        Ok(Value::Texts(
            split_list(raw, &self.separator)
                .map(ToOwned::to_owned)
                .collect(),
        ))
    }
}

/// [`Converter`] of [`ParamKind::Table`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TableConverter;

impl Converter for TableConverter {
    fn accepts(&self, kind: ParamKind) -> bool {
        kind == ParamKind::Table
    }

    fn convert(
        &self,
        raw: &str,
        _: ParamKind,
    ) -> Result<Value, InvalidParameter> {
        Ok(Value::Table(ExamplesTable::parse(raw)))
    }
}

/// [`Converter`] of a [`ParamKind::Custom`] kind, backed by a function.
///
/// # Example
///
/// ```rust
/// use storyline::parameters::{Converters, Custom, ParamKind};
///
/// #[derive(Debug, PartialEq)]
/// struct Celsius(i32);
///
/// let converters = Converters::new().with(Custom::new("celsius", |raw: &str| {
///     raw.trim_end_matches("°C").parse().map(Celsius)
/// }));
/// let value = converters
///     .convert("21°C", ParamKind::Custom("celsius"))
///     .unwrap();
///
/// assert_eq!(value.as_custom::<Celsius>(), Some(&Celsius(21)));
/// ```
pub struct Custom<F> {
    /// Name of the [`ParamKind::Custom`] kind.
    name: &'static str,

    /// Conversion function.
    convert: F,
}

// Implemented manually to omit redundant `F: Debug` trait bound.
impl<F> Debug for Custom<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Custom").field(&self.name).finish()
    }
}

impl<F> Custom<F> {
    /// Creates a new [`Custom`] [`Converter`] of the `name`d kind.
    #[must_use]
    pub const fn new(name: &'static str, convert: F) -> Self {
        Self { name, convert }
    }
}

impl<F, T, E> Converter for Custom<F>
where
    F: Fn(&str) -> Result<T, E> + Send + Sync,
    T: Any + Send + Sync,
    E: fmt::Display,
{
    fn accepts(&self, kind: ParamKind) -> bool {
        kind == ParamKind::Custom(self.name)
    }

    fn convert(
        &self,
        raw: &str,
        _: ParamKind,
    ) -> Result<Value, InvalidParameter> {
        (self.convert)(raw)
            .map(|v| Value::Custom(Arc::new(v)))
            .map_err(|e| InvalidParameter::new(raw, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_numbers() {
        let c = Converters::new();

        assert_eq!(
            c.convert(" 42 ", ParamKind::Integer).unwrap().as_integer(),
            Some(42),
        );
        assert_eq!(
            c.convert("-1.5", ParamKind::Float).unwrap().as_float(),
            Some(-1.5),
        );
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let err = Converters::new()
            .convert("forty", ParamKind::Integer)
            .unwrap_err();

        assert_eq!(err.value, "forty");
        assert!(!err.cause.is_empty());
    }

    #[test]
    fn converts_number_lists() {
        let c = Converters::new();

        assert_eq!(
            c.convert("1, 2 ,3", ParamKind::IntegerList)
                .unwrap()
                .as_integers(),
            Some(&[1, 2, 3][..]),
        );
        assert_eq!(
            c.convert("0.5,2", ParamKind::FloatList).unwrap().as_floats(),
            Some(&[0.5, 2.0][..]),
        );
        assert!(c.convert("1,x", ParamKind::IntegerList).is_err());
    }

    #[test]
    fn converts_text_lists() {
        let c = Converters::new();

        assert_eq!(
            c.convert(" a , b,c ", ParamKind::TextList).unwrap().as_texts(),
            Some(&["a".to_owned(), "b".to_owned(), "c".to_owned()][..]),
        );
        assert_eq!(
            c.convert("   ", ParamKind::TextList).unwrap().as_texts(),
            Some(&[][..]),
        );
    }

    #[test]
    fn custom_separator_splits_lists() {
        let c = Converters::with_separator("|");

        assert_eq!(
            c.convert("1|2", ParamKind::IntegerList).unwrap().as_integers(),
            Some(&[1, 2][..]),
        );
    }

    #[test]
    fn converts_tables() {
        let value = Converters::new()
            .convert("|a|b|\n|1|2|", ParamKind::Table)
            .unwrap();

        assert_eq!(value.as_table().unwrap().rows()[0]["b"], "2");
    }

    #[test]
    fn normalizes_text_newlines() {
        let value = Converters::new()
            .convert("one\r\ntwo\nthree", ParamKind::Text)
            .unwrap();

        assert_eq!(
            value.as_text(),
            Some(["one", "two", "three"].join(NEWLINE).as_str()),
        );
    }

    #[test]
    fn unknown_custom_kind_falls_back_to_text() {
        let value = Converters::new()
            .convert("raw", ParamKind::Custom("nope"))
            .unwrap();

        assert_eq!(value.as_text(), Some("raw"));
    }

    #[test]
    fn custom_converters_precede_builtins_in_order() {
        let c = Converters::new()
            .with(Custom::new("x", |_: &str| Ok::<_, String>(1_u8)))
            .with(Custom::new("x", |_: &str| Ok::<_, String>(2_u8)))
            .with(Custom::new("int", |raw: &str| raw.parse::<i64>()));

        assert_eq!(
            c.convert("", ParamKind::Custom("x")).unwrap().as_custom::<u8>(),
            Some(&1),
        );
        assert!(c.convert("x", ParamKind::Custom("int")).is_err());
    }

    #[test]
    fn custom_converter_overrides_builtin_kind() {
        #[derive(Debug)]
        struct Doubling;

        impl Converter for Doubling {
            fn accepts(&self, kind: ParamKind) -> bool {
                kind == ParamKind::Integer
            }

            fn convert(
                &self,
                raw: &str,
                _: ParamKind,
            ) -> Result<Value, InvalidParameter> {
                parse_number::<i64>(raw).map(|n| Value::Integer(n * 2))
            }
        }

        let c = Converters::new().with(Doubling);

        assert_eq!(
            c.convert("4", ParamKind::Integer).unwrap().as_integer(),
            Some(8),
        );
    }
}
