// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI options of a story run.
//!
//! [`Opts`] is a [`clap::Args`] group meant to be flattened into the CLI of
//! a test binary, and applied with [`ConfigurationBuilder::with_cli()`].
//!
//! ```rust
//! use clap::Parser as _;
//! use storyline::{Configuration, cli};
//!
//! #[derive(clap::Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     stories: cli::Opts,
//! }
//!
//! let cli = Cli::parse_from(["test", "--dry-run", "--parameter-prefix", "%"]);
//! let config = Configuration::builder().with_cli(&cli.stories).build();
//!
//! assert!(config.dry_run());
//! assert_eq!(config.pattern_parser().prefix(), '%');
//! ```
//!
//! [`ConfigurationBuilder::with_cli()`]: crate::ConfigurationBuilder::with_cli

use std::str::FromStr;

/// CLI options of a story run.
#[derive(Clone, Copy, Debug, Default, clap::Args)]
#[group(skip)]
pub struct Opts {
    /// Report matched steps as successful without invoking them.
    #[arg(long)]
    pub dry_run: bool,

    /// Fail the run if any step is pending.
    #[arg(long)]
    pub fail_on_pending: bool,

    /// Don't fail the run on failed steps, only report them.
    #[arg(long)]
    pub absorb_failures: bool,

    /// Character prefixing placeholders in step patterns.
    #[arg(long, value_name = "char")]
    pub parameter_prefix: Option<char>,

    /// Whether the story report is colored.
    ///
    /// Leaves the configured coloring as is, if omitted.
    #[arg(long, value_name = "auto|always|never")]
    pub color: Option<Coloring>,
}

/// When story reports are colored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Coloring {
    /// Colored on a terminal with colors enabled.
    Auto,

    /// Always colored, even when piped.
    Always,

    /// Never colored.
    Never,
}

impl FromStr for Coloring {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err("possible options: auto, always, never"),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        opts: Opts,
    }

    #[test]
    fn defaults_are_lenient() {
        let cli = Cli::parse_from(["test"]);

        assert!(!cli.opts.dry_run);
        assert!(!cli.opts.fail_on_pending);
        assert!(!cli.opts.absorb_failures);
        assert_eq!(cli.opts.parameter_prefix, None);
        assert_eq!(cli.opts.color, None);
    }

    #[test]
    fn parses_every_option() {
        let cli = Cli::parse_from([
            "test",
            "--dry-run",
            "--fail-on-pending",
            "--absorb-failures",
            "--parameter-prefix",
            "#",
            "--color",
            "NEVER",
        ]);

        assert!(cli.opts.dry_run);
        assert!(cli.opts.fail_on_pending);
        assert!(cli.opts.absorb_failures);
        assert_eq!(cli.opts.parameter_prefix, Some('#'));
        assert_eq!(cli.opts.color, Some(Coloring::Never));
    }

    #[test]
    fn rejects_unknown_coloring() {
        assert!(Cli::try_parse_from(["test", "--color", "sometimes"]).is_err());
        assert_eq!("Always".parse(), Ok(Coloring::Always));
    }
}
