//! Source unit context: the path being patched and its literal renderings.

use std::path::{Path, PathBuf};

/// Delimiter of the string literals produced for substitution.
const QUOTE: char = '\'';

/// The absolute path of the unit being patched, fixed for one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    path: PathBuf,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parent directory, with `dirname(1)` semantics.
    ///
    /// `/a/b.src` gives `/a`, `/b.src` gives `/`, a bare file name gives `.`
    /// and the empty path stays empty.
    pub fn dirname(&self) -> PathBuf {
        if self.path.as_os_str().is_empty() {
            return PathBuf::new();
        }
        match self.path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
            Some(parent) => parent.to_path_buf(),
            None => self.path.clone(),
        }
    }

    /// Quoted literal for the file path.
    pub fn file_literal(&self) -> String {
        quote(&self.path.to_string_lossy())
    }

    /// Quoted literal for the parent directory.
    pub fn dir_literal(&self) -> String {
        quote(&self.dirname().to_string_lossy())
    }
}

/// Wrap `text` in single quotes, backslash-escaping each quote inside it.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(QUOTE);
    for ch in text.chars() {
        if ch == QUOTE {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push(QUOTE);
    out
}
