// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Textual story runner for behaviour-driven development.
//!
//! Stories are plain text documents made of an optional narrative and
//! scenarios of keyword-prefixed steps:
//!
//! ```text
//! Narrative:
//! In order to count things
//! As a counter
//! I want to add numbers
//!
//! Scenario: adding
//! Given a total of 1
//! When 2 is added
//! Then the total is 3
//! ```
//!
//! Steps are matched against the patterns of a step [`Collection`], whose
//! `$name` placeholders capture the arguments handed to the step handler.
//!
//! ```rust
//! use storyline::{
//!     Collection, Configuration, Definition, StoryRunner,
//!     parameters::ParamKind, reporter::Recorder,
//! };
//!
//! let steps = Collection::<i64>::builder()
//!     .step(
//!         Definition::given("a total of $n", |total: &mut i64, ctx| {
//!             *total = ctx.integer(0)?;
//!             Ok(())
//!         })
//!         .param(ParamKind::Integer),
//!     )
//!     .step(
//!         Definition::when("$n is added", |total: &mut i64, ctx| {
//!             *total += ctx.integer(0)?;
//!             Ok(())
//!         })
//!         .param(ParamKind::Integer),
//!     )
//!     .then("the total is $n", |total: &mut i64, ctx| {
//!         let expected = ctx.text(0)?;
//!         anyhow::ensure!(total.to_string() == expected, "total is {total}");
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let config = Configuration::default();
//! let story = config.story_parser().parse(
//!     "Scenario: adding\n\
//!      Given a total of 1\n\
//!      When 2 is added\n\
//!      Then the total is 3",
//!     None,
//! );
//!
//! let mut runner = StoryRunner::new(config).with_collection(steps);
//! let mut reporter = Recorder::new();
//! runner.run(&mut 0, story, &mut reporter)?;
//!
//! assert!(runner.state().outstanding_error().is_none());
//! # Ok::<_, storyline::Error>(())
//! ```

#![deny(nonstandard_style, trivial_casts, trivial_numeric_casts)]
#![forbid(non_ascii_idents, unsafe_code)]
#![warn(
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::missing_const_for_fn,
    clippy::unwrap_used,
    missing_docs,
    rustdoc::all,
    unreachable_pub,
    unused_results
)]

pub mod cli;
pub mod configuration;
pub mod error;
pub mod event;
pub mod keywords;
pub mod model;
pub mod parameters;
mod panic_trap;
pub mod parser;
pub mod reporter;
pub mod runner;
pub mod step;
pub mod strategy;

#[doc(inline)]
pub use self::{
    configuration::{Configuration, ConfigurationBuilder},
    error::{Error, Result},
    event::Event,
    keywords::{Keyword, Keywords},
    model::{ExamplesTable, Narrative, Scenario, Story},
    parser::StoryParser,
    reporter::Reporter,
    runner::StoryRunner,
    step::{Collection, CollectionBuilder, Context, Definition, StepType},
};
