// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Immutable [`Configuration`] of story runs and its builder.

use std::sync::Arc;

use smart_default::SmartDefault;

use crate::{
    Keywords, StoryParser,
    cli::{self, Coloring},
    parameters::Converters,
    parser::{FileSystem, StoryLoader},
    step::{CollectionBuilder, StepPatternParser},
    strategy::{
        ErrorStrategy, FailingUponPending, PassingUponPending,
        PendingStepStrategy, Rethrowing, SilentlyAbsorbing,
    },
};

/// Immutable configuration shared by story runs.
///
/// Cheap to clone, so every concurrently running [`StoryRunner`] may own a
/// copy.
///
/// [`StoryRunner`]: crate::StoryRunner
#[derive(Clone, Debug)]
pub struct Configuration {
    /// [`Keywords`] of the parsed stories.
    keywords: Arc<Keywords>,

    /// Compiler of step patterns.
    pattern_parser: StepPatternParser,

    /// Chain of parameter [`Converters`].
    converters: Arc<Converters>,

    /// Loader of given stories.
    story_loader: Arc<dyn StoryLoader>,

    /// Strategy handling the outstanding failure of a run.
    error_strategy: Arc<dyn ErrorStrategy>,

    /// Strategy handling the outstanding pending step of a run.
    pending_strategy: Arc<dyn PendingStepStrategy>,

    /// Whether matched steps are reported without being invoked.
    dry_run: bool,

    /// Coloring policy of console reporters.
    coloring: Coloring,
}

impl Default for Configuration {
    fn default() -> Self {
        ConfigurationBuilder::default().build()
    }
}

impl Configuration {
    /// Creates a new [`ConfigurationBuilder`] with the default settings.
    #[must_use]
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Returns the [`Keywords`] of the parsed stories.
    #[must_use]
    pub fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    /// Returns the compiler of step patterns.
    #[must_use]
    pub const fn pattern_parser(&self) -> StepPatternParser {
        self.pattern_parser
    }

    /// Returns the chain of parameter [`Converters`].
    #[must_use]
    pub fn converters(&self) -> &Converters {
        &self.converters
    }

    /// Returns the loader of given stories.
    #[must_use]
    pub fn story_loader(&self) -> &dyn StoryLoader {
        &*self.story_loader
    }

    /// Returns the strategy handling the outstanding failure of a run.
    #[must_use]
    pub fn error_strategy(&self) -> &dyn ErrorStrategy {
        &*self.error_strategy
    }

    /// Returns the strategy handling the outstanding pending step of a run.
    #[must_use]
    pub fn pending_strategy(&self) -> &dyn PendingStepStrategy {
        &*self.pending_strategy
    }

    /// Indicates whether matched steps are reported without being invoked.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the coloring policy of console reporters.
    #[must_use]
    pub const fn coloring(&self) -> Coloring {
        self.coloring
    }

    /// Creates a [`StoryParser`] using the configured [`Keywords`].
    #[must_use]
    pub fn story_parser(&self) -> StoryParser {
        StoryParser::new(Keywords::clone(&self.keywords))
    }

    /// Creates a [`CollectionBuilder`] using the configured [`Keywords`] and
    /// pattern compiler.
    #[must_use]
    pub fn collection_builder<W>(&self) -> CollectionBuilder<W> {
        CollectionBuilder::default()
            .keywords(Keywords::clone(&self.keywords))
            .pattern_parser(self.pattern_parser)
    }
}

/// Builder of a [`Configuration`].
///
/// Defaults to English [`Keywords`], the `$` placeholder prefix, stories
/// loaded from the current directory, rethrown failures and passing pending
/// steps.
#[derive(Debug, SmartDefault)]
pub struct ConfigurationBuilder {
    /// [`Keywords`] of the parsed stories.
    #[default(Keywords::english())]
    keywords: Keywords,

    /// Compiler of step patterns.
    pattern_parser: StepPatternParser,

    /// Chain of parameter [`Converters`].
    converters: Converters,

    /// Loader of given stories.
    #[default(Arc::new(FileSystem::default()))]
    story_loader: Arc<dyn StoryLoader>,

    /// Strategy handling the outstanding failure of a run.
    #[default(Arc::new(Rethrowing))]
    error_strategy: Arc<dyn ErrorStrategy>,

    /// Strategy handling the outstanding pending step of a run.
    #[default(Arc::new(PassingUponPending))]
    pending_strategy: Arc<dyn PendingStepStrategy>,

    /// Whether matched steps are reported without being invoked.
    dry_run: bool,

    /// Coloring policy of console reporters.
    #[default(Coloring::Auto)]
    coloring: Coloring,
}

impl ConfigurationBuilder {
    /// Sets the [`Keywords`] of the parsed stories.
    #[must_use]
    pub fn keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Sets the character prefixing placeholders in step patterns.
    #[must_use]
    pub const fn parameter_prefix(mut self, prefix: char) -> Self {
        self.pattern_parser = StepPatternParser::new(prefix);
        self
    }

    /// Sets the chain of parameter [`Converters`].
    #[must_use]
    pub fn converters(mut self, converters: Converters) -> Self {
        self.converters = converters;
        self
    }

    /// Sets the loader of given stories.
    #[must_use]
    pub fn story_loader(mut self, loader: impl StoryLoader + 'static) -> Self {
        self.story_loader = Arc::new(loader);
        self
    }

    /// Sets the strategy handling the outstanding failure of a run.
    #[must_use]
    pub fn error_strategy(
        mut self,
        strategy: impl ErrorStrategy + 'static,
    ) -> Self {
        self.error_strategy = Arc::new(strategy);
        self
    }

    /// Sets the strategy handling the outstanding pending step of a run.
    #[must_use]
    pub fn pending_strategy(
        mut self,
        strategy: impl PendingStepStrategy + 'static,
    ) -> Self {
        self.pending_strategy = Arc::new(strategy);
        self
    }

    /// Makes matched steps reported as successful without being invoked.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the coloring policy of console reporters.
    #[must_use]
    pub const fn coloring(mut self, coloring: Coloring) -> Self {
        self.coloring = coloring;
        self
    }

    /// Applies the given CLI [`Opts`] on top of the current settings.
    ///
    /// Flags only ever switch their setting on, so options given explicitly
    /// in code survive absent flags.
    ///
    /// [`Opts`]: cli::Opts
    #[must_use]
    pub fn with_cli(mut self, opts: &cli::Opts) -> Self {
        if opts.dry_run {
            self.dry_run = true;
        }
        if opts.fail_on_pending {
            self.pending_strategy = Arc::new(FailingUponPending);
        }
        if opts.absorb_failures {
            self.error_strategy = Arc::new(SilentlyAbsorbing);
        }
        if let Some(prefix) = opts.parameter_prefix {
            self.pattern_parser = StepPatternParser::new(prefix);
        }
        if let Some(color) = opts.color {
            self.coloring = color;
        }
        self
    }

    /// Builds the immutable [`Configuration`].
    #[must_use]
    pub fn build(self) -> Configuration {
        Configuration {
            keywords: Arc::new(self.keywords),
            pattern_parser: self.pattern_parser,
            converters: Arc::new(self.converters),
            story_loader: self.story_loader,
            error_strategy: self.error_strategy,
            pending_strategy: self.pending_strategy,
            dry_run: self.dry_run,
            coloring: self.coloring,
        }
    }
}
