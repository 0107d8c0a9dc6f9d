// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`StoryLoader`]s resolving story paths into story texts.

use std::{
    collections::HashMap,
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use derive_more::with_trait::{Display, Error};

/// Source of story texts, addressed by their paths.
pub trait StoryLoader: Debug + Send + Sync {
    /// Loads the text of the story at the given `path`.
    ///
    /// # Errors
    ///
    /// If the story cannot be found or read.
    fn load_story_text(&self, path: &str) -> Result<String, LoadError>;
}

/// Error of loading a story text.
#[derive(Clone, Debug, Display, Error)]
pub enum LoadError {
    /// No story exists at the path.
    #[display("Story `{path}` not found")]
    NotFound {
        /// Path of the missing story.
        #[error(not(source))]
        path: String,
    },

    /// Story exists but cannot be read.
    #[display("Failed to read story `{path}`: {source}")]
    Io {
        /// Path of the unreadable story.
        path: String,

        /// Underlying I/O error.
        source: Arc<io::Error>,
    },
}

impl LoadError {
    /// Returns the path of the story failed to load.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path } | Self::Io { path, .. } => path,
        }
    }
}

/// [`StoryLoader`] serving story texts registered in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemory {
    /// Story texts by their paths.
    stories: HashMap<String, String>,
}

impl InMemory {
    /// Creates an empty [`InMemory`] loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the story `text` under the given `path`, replacing the
    /// previous one, if any.
    #[must_use]
    pub fn with_story(
        mut self,
        path: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        _ = self.stories.insert(path.into(), text.into());
        self
    }
}

impl StoryLoader for InMemory {
    fn load_story_text(&self, path: &str) -> Result<String, LoadError> {
        self.stories
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound { path: path.to_owned() })
    }
}

/// [`StoryLoader`] reading story files relative to a root directory.
#[derive(Clone, Debug)]
pub struct FileSystem {
    /// Directory story paths are resolved against.
    root: PathBuf,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FileSystem {
    /// Creates a new [`FileSystem`] loader resolving paths against the given
    /// `root` directory.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the root directory of this [`FileSystem`] loader.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Finds the paths of story files matching the given glob `pattern`,
    /// relative to the root directory and sorted.
    ///
    /// # Errors
    ///
    /// If the `pattern` is malformed.
    pub fn find_paths(&self, pattern: &str) -> Result<Vec<String>, LoadError> {
        let walker = globwalk::GlobWalkerBuilder::new(&self.root, pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| LoadError::Io {
                path: pattern.to_owned(),
                source: Arc::new(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    e.to_string(),
                )),
            })?;

        let mut paths = walker
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.root)
                    .ok()
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
            })
            .collect::<Vec<_>>();
        paths.sort();
        Ok(paths)
    }
}

impl StoryLoader for FileSystem {
    fn load_story_text(&self, path: &str) -> Result<String, LoadError> {
        fs::read_to_string(self.root.join(path)).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound { path: path.to_owned() }
            } else {
                LoadError::Io {
                    path: path.to_owned(),
                    source: Arc::new(e),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn in_memory_serves_registered_stories() {
        let loader = InMemory::new().with_story("a/b.story", "Given x");

        assert_eq!(loader.load_story_text("a/b.story").unwrap(), "Given x");
        assert!(matches!(
            loader.load_story_text("missing"),
            Err(LoadError::NotFound { path }) if path == "missing",
        ));
    }

    #[test]
    fn file_system_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/one.story"), "Given one").unwrap();
        fs::write(dir.path().join("two.story"), "Given two").unwrap();
        fs::write(dir.path().join("notes.txt"), "nothing").unwrap();
        let loader = FileSystem::new(dir.path());

        assert_eq!(
            loader.load_story_text("nested/one.story").unwrap(),
            "Given one",
        );
        assert_eq!(
            loader.find_paths("**/*.story").unwrap(),
            ["nested/one.story", "two.story"],
        );
        assert_eq!(
            loader.load_story_text("absent.story").unwrap_err().path(),
            "absent.story",
        );
    }
}
