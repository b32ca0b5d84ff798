//! The patcher contract and the class loader boundary it sits behind.
//!
//! A patcher gets two chances to act on a unit: once when the loader resolves
//! which file to read ([`Patcher::locate_file`]) and once on the parsed tree
//! of that file ([`Patcher::transform`]).

pub mod rebase;

pub use rebase::Rebase;

use crate::node::Node;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A pluggable rewriter run by the [`Pipeline`](crate::pipeline::Pipeline).
pub trait Patcher: fmt::Debug + Send + Sync {
    /// Choose the file that is actually read for `class`.
    ///
    /// `file` is what the loader proposed. A patcher with no opinion returns
    /// it unchanged.
    fn locate_file(&self, loader: &dyn ClassLoader, class: &str, file: &Path) -> PathBuf {
        let _ = (loader, class);
        file.to_path_buf()
    }

    /// Rewrite eligible bodies of the tree parsed from `path`, in place.
    ///
    /// Running it again over its own output must change nothing.
    fn transform(&self, root: &mut Node, path: &Path);
}

/// Resolves fully-qualified class names to candidate source files.
pub trait ClassLoader {
    fn find_file(&self, class: &str) -> Option<PathBuf>;
}

/// Explicit class to file table.
///
/// Class names are matched without a leading namespace separator, so
/// `\App\Widget` and `App\Widget` resolve the same way.
#[derive(Debug, Clone, Default)]
pub struct ClassMap {
    entries: HashMap<String, PathBuf>,
}

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: &str, file: impl Into<PathBuf>) -> Option<PathBuf> {
        self.entries.insert(normalize_class(class).to_string(), file.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>, P: Into<PathBuf>> FromIterator<(S, P)> for ClassMap {
    fn from_iter<I: IntoIterator<Item = (S, P)>>(iter: I) -> Self {
        let mut map = ClassMap::new();
        for (class, file) in iter {
            map.insert(class.as_ref(), file);
        }
        map
    }
}

impl ClassLoader for ClassMap {
    fn find_file(&self, class: &str) -> Option<PathBuf> {
        self.entries.get(normalize_class(class)).cloned()
    }
}

fn normalize_class(class: &str) -> &str {
    class.trim_start_matches('\\')
}
