// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step execution [`Context`], carrying the converted arguments.

use std::any::Any;

use anyhow::anyhow;

use crate::{
    model::{ExamplesTable, Row},
    parameters::Value,
};

/// Single converted argument of a step.
#[derive(Clone, Debug)]
pub struct Argument {
    /// Name of the placeholder capturing this [`Argument`].
    pub name: String,

    /// Raw captured text.
    pub raw: String,

    /// Converted [`Value`].
    pub value: Value,
}

/// Context of a step handler execution.
#[derive(Clone, Debug)]
pub struct Context {
    /// Text of the executed step, with example row values substituted.
    pub step: String,

    /// Converted arguments, in their placeholder order.
    pub args: Vec<Argument>,

    /// Example row the step runs for, if any.
    pub row: Option<Row>,
}

impl Context {
    /// Returns the [`Value`] of the argument at the given `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.args.get(index).map(|a| &a.value)
    }

    /// Returns the [`Value`] of the argument captured by the `name`d
    /// placeholder.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&Value> {
        self.args.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    /// Returns the raw text of the argument at the given `index`.
    #[must_use]
    pub fn raw(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(|a| a.raw.as_str())
    }

    /// Returns the value of the given `column` of the example row, if any.
    #[must_use]
    pub fn row_value(&self, column: &str) -> Option<&str> {
        self.row.as_ref()?.get(column).map(String::as_str)
    }

    /// Returns the text argument at the given `index`.
    ///
    /// # Errors
    ///
    /// If there is no such argument, or it's not a [`Value::Text`].
    pub fn text(&self, index: usize) -> anyhow::Result<&str> {
        self.typed(index, "text", Value::as_text)
    }

    /// Returns the integer argument at the given `index`.
    ///
    /// # Errors
    ///
    /// If there is no such argument, or it's not a [`Value::Integer`].
    pub fn integer(&self, index: usize) -> anyhow::Result<i64> {
        self.typed(index, "integer", Value::as_integer)
    }

    /// Returns the floating point argument at the given `index`.
    ///
    /// # Errors
    ///
    /// If there is no such argument, or it's not a number.
    pub fn float(&self, index: usize) -> anyhow::Result<f64> {
        self.typed(index, "float", Value::as_float)
    }

    /// Returns the table argument at the given `index`.
    ///
    /// # Errors
    ///
    /// If there is no such argument, or it's not a [`Value::Table`].
    pub fn table(&self, index: usize) -> anyhow::Result<&ExamplesTable> {
        self.typed(index, "table", Value::as_table)
    }

    /// Returns the custom argument of type `T` at the given `index`.
    ///
    /// # Errors
    ///
    /// If there is no such argument, or it's not a [`Value::Custom`] of `T`.
    pub fn custom<T: Any + Send + Sync>(
        &self,
        index: usize,
    ) -> anyhow::Result<&T> {
        self.typed(index, std::any::type_name::<T>(), Value::as_custom::<T>)
    }

    /// Extracts the argument at the given `index` with the `extract`
    /// function.
    fn typed<'s, T>(
        &'s self,
        index: usize,
        expected: &str,
        extract: impl FnOnce(&'s Value) -> Option<T>,
    ) -> anyhow::Result<T> {
        let arg = self.args.get(index).ok_or_else(|| {
            anyhow!("step `{}` has no argument #{index}", self.step)
        })?;
        extract(&arg.value).ok_or_else(|| {
            anyhow!(
                "argument `{}` of step `{}` is not {expected}: {:?}",
                arg.name,
                self.step,
                arg.value,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        let mut row = Row::new();
        _ = row.insert("name".into(), "Alice".into());
        Context {
            step: "Given Alice has 3 apples".into(),
            args: vec![
                Argument {
                    name: "who".into(),
                    raw: "Alice".into(),
                    value: Value::Text("Alice".into()),
                },
                Argument {
                    name: "count".into(),
                    raw: "3".into(),
                    value: Value::Integer(3),
                },
            ],
            row: Some(row),
        }
    }

    #[test]
    fn accesses_arguments_by_index_and_name() {
        let ctx = context();

        assert_eq!(ctx.text(0).unwrap(), "Alice");
        assert_eq!(ctx.integer(1).unwrap(), 3);
        assert_eq!(ctx.float(1).unwrap(), 3.0);
        assert_eq!(ctx.named("count").and_then(Value::as_integer), Some(3));
        assert_eq!(ctx.raw(1), Some("3"));
        assert_eq!(ctx.row_value("name"), Some("Alice"));
    }

    #[test]
    fn reports_missing_and_mistyped_arguments() {
        let ctx = context();

        assert!(ctx.integer(0).unwrap_err().to_string().contains("who"));
        assert!(ctx.text(2).unwrap_err().to_string().contains("#2"));
        assert!(ctx.custom::<u8>(1).is_err());
        assert!(ctx.table(0).is_err());
    }
}
