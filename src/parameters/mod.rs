// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Typed step parameters and the [`Converters`] producing them out of raw
//! captured text.

pub mod converters;

use std::{any::Any, sync::Arc};

use derive_more::with_trait::{Display, Error};

use crate::model::ExamplesTable;

#[doc(inline)]
pub use self::converters::{
    Converter, Converters, Custom, NumberConverter, NumberListConverter,
    TableConverter, TextListConverter,
};

/// Declared kind of a step parameter, selecting its [`Converter`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParamKind {
    /// Plain text, with line endings normalized.
    Text,

    /// Signed integer number.
    Integer,

    /// Floating point number.
    Float,

    /// Separated list of integer numbers.
    IntegerList,

    /// Separated list of floating point numbers.
    FloatList,

    /// Separated list of texts.
    TextList,

    /// Pipe-delimited [`ExamplesTable`].
    Table,

    /// Kind handled by a user-registered [`Converter`], named for it.
    Custom(&'static str),
}

/// Converted value of a step parameter.
#[derive(Clone, Debug)]
pub enum Value {
    /// [`ParamKind::Text`] value.
    Text(String),

    /// [`ParamKind::Integer`] value.
    Integer(i64),

    /// [`ParamKind::Float`] value.
    Float(f64),

    /// [`ParamKind::IntegerList`] value.
    Integers(Vec<i64>),

    /// [`ParamKind::FloatList`] value.
    Floats(Vec<f64>),

    /// [`ParamKind::TextList`] value.
    Texts(Vec<String>),

    /// [`ParamKind::Table`] value.
    Table(ExamplesTable),

    /// [`ParamKind::Custom`] value.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Returns the text of a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number of a [`Value::Integer`].
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number of a [`Value::Float`] or a [`Value::Integer`].
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the numbers of a [`Value::Integers`].
    #[must_use]
    pub fn as_integers(&self) -> Option<&[i64]> {
        match self {
            Self::Integers(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the numbers of a [`Value::Floats`].
    #[must_use]
    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Self::Floats(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the texts of a [`Value::Texts`].
    #[must_use]
    pub fn as_texts(&self) -> Option<&[String]> {
        match self {
            Self::Texts(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the table of a [`Value::Table`].
    #[must_use]
    pub const fn as_table(&self) -> Option<&ExamplesTable> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the value of a [`Value::Custom`], if it is of type `T`.
    #[must_use]
    pub fn as_custom<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            Self::Custom(v) => v.downcast_ref(),
            _ => None,
        }
    }
}

/// Error of converting a raw parameter value.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
#[display("Unable to convert `{value}`: {cause}")]
pub struct InvalidParameter {
    /// Raw value failed to convert.
    #[error(not(source))]
    pub value: String,

    /// Description of the conversion failure.
    pub cause: String,
}

impl InvalidParameter {
    /// Creates a new [`InvalidParameter`] error.
    #[must_use]
    pub fn new(value: impl Into<String>, cause: impl ToString) -> Self {
        Self {
            value: value.into(),
            cause: cause.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variants() {
        assert_eq!(Value::Text("a".into()).as_text(), Some("a"));
        assert_eq!(Value::Integer(3).as_integer(), Some(3));
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
        assert_eq!(Value::Float(0.5).as_integer(), None);
        assert_eq!(
            Value::Integers(vec![1, 2]).as_integers(),
            Some(&[1, 2][..]),
        );
        assert!(Value::Text("a".into()).as_table().is_none());
    }

    #[test]
    fn custom_values_downcast() {
        let value = Value::Custom(Arc::new(7_u8));

        assert_eq!(value.as_custom::<u8>(), Some(&7));
        assert_eq!(value.as_custom::<u16>(), None);
    }

    #[test]
    fn invalid_parameter_displays_value_and_cause() {
        let err = InvalidParameter::new("abc", "not a number");

        assert_eq!(err.to_string(), "Unable to convert `abc`: not a number");
    }
}
