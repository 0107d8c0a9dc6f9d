// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Trapping of step and hook handler panics into [`Failure`]s.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use crate::error::Failure;

/// Runs the given handler `f` of the `step`, turning both its returned error
/// and its panic into a [`Failure`].
pub(crate) fn run<F>(step: &str, f: F) -> Result<(), Failure>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(Failure::invocation(step, e)),
        Err(payload) => Err(Failure::panic(step, coerce_error(&*payload))),
    }
}

/// Coerces the given panic payload into a [`String`].
pub(crate) fn coerce_error(err: &(dyn Any + Send)) -> String {
    if let Some(string) = err.downcast_ref::<String>() {
        string.clone()
    } else if let Some(&string) = err.downcast_ref::<&str>() {
        string.to_owned()
    } else {
        "(Could not resolve panic payload)".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_success_through() {
        assert!(run("Given ok", || Ok(())).is_ok());
    }

    #[test]
    fn wraps_returned_errors() {
        let err =
            run("Given err", || Err(anyhow::anyhow!("nope"))).unwrap_err();

        assert!(matches!(
            err,
            Failure::Invocation { step, cause }
                if step == "Given err" && cause.to_string() == "nope",
        ));
    }

    #[test]
    fn traps_panics() {
        let err = run("Given panic", || panic!("boom {}", 42)).unwrap_err();

        assert!(matches!(
            err,
            Failure::Panic { step, message }
                if step == "Given panic" && message == "boom 42",
        ));
    }

    #[test]
    fn coerces_static_payloads() {
        let err =
            run("Given panic", || std::panic::panic_any(7_u8)).unwrap_err();

        assert!(matches!(
            err,
            Failure::Panic { message, .. }
                if message == "(Could not resolve panic payload)",
        ));
    }
}
