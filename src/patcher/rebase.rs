//! Rebase patcher: pins `__DIR__` and `__FILE__` to the original source path.
//!
//! Patched code is executed from somewhere other than the file it was read
//! from, so the location markers in code spans are replaced by string literals
//! of the original directory and file.
//!
//! Matching is lexical, not grammatical. A marker is free-standing unless the
//! byte before it (or before the whitespace run leading up to it) is one of
//! `:` `$` `>` `\`, an ASCII alphanumeric, `_`, or a byte of `0x7f` and above.
//! That rules out `Foo::__DIR__`, `$__DIR__`, `$this->__DIR__`, `ns\__DIR__`
//! and identifiers that merely end in the marker. String literals inside a
//! code span get no protection beyond that rule.

use super::Patcher;
use crate::node::Node;
use crate::source::SourceUnit;
use regex::Regex;
use std::path::Path;
use tracing::{debug, trace};

const DIR_MARKER: &str = "__DIR__";
const FILE_MARKER: &str = "__FILE__";

/// A marker token together with the pattern locating it and the whitespace
/// run that may precede it.
#[derive(Debug, Clone)]
struct Marker {
    token: &'static str,
    pattern: Regex,
}

impl Marker {
    fn new(token: &'static str) -> Self {
        let pattern = Regex::new(&format!(r"[\t\n\x0B\x0C\r ]*{}", regex::escape(token)))
            .expect("marker pattern is a valid regex");
        Self { token, pattern }
    }

    /// Replace every free-standing occurrence in `body` with `literal`.
    ///
    /// Returns `None` when nothing qualified, so untouched bodies are never
    /// reallocated.
    fn replace(&self, body: &str, literal: &str) -> Option<(String, usize)> {
        let bytes = body.as_bytes();
        let mut out = String::new();
        let mut last = 0;
        let mut count = 0;

        for found in self.pattern.find_iter(body) {
            let marker_start = found.end() - self.token.len();
            let Some(start) = replacement_start(bytes, found.start(), marker_start) else {
                continue;
            };
            if count == 0 {
                out.reserve(body.len() + literal.len());
            }
            out.push_str(&body[last..start]);
            out.push_str(literal);
            last = found.end();
            count += 1;
        }

        if count == 0 {
            return None;
        }
        out.push_str(&body[last..]);
        Some((out, count))
    }
}

/// Where the replacement of a match spanning `run_start..` begins, if at all.
///
/// The whitespace run is consumed when the byte before it is a boundary. When
/// it is not, the first whitespace byte itself serves as the boundary and only
/// the rest of the run is consumed.
fn replacement_start(bytes: &[u8], run_start: usize, marker_start: usize) -> Option<usize> {
    if is_boundary(bytes, run_start) {
        Some(run_start)
    } else if run_start < marker_start {
        Some(run_start + 1)
    } else {
        None
    }
}

fn is_boundary(bytes: &[u8], at: usize) -> bool {
    match at.checked_sub(1).map(|i| bytes[i]) {
        None => true,
        Some(prev) => !is_excluded_predecessor(prev),
    }
}

fn is_excluded_predecessor(byte: u8) -> bool {
    matches!(byte, b':' | b'$' | b'>' | b'\\' | b'_') || byte.is_ascii_alphanumeric() || byte >= 0x7f
}

/// Rewrites location markers in code spans to literal paths.
#[derive(Debug, Clone)]
pub struct Rebase {
    dir: Marker,
    file: Marker,
}

impl Default for Rebase {
    fn default() -> Self {
        Self::new()
    }
}

impl Rebase {
    pub fn new() -> Self {
        Self {
            dir: Marker::new(DIR_MARKER),
            file: Marker::new(FILE_MARKER),
        }
    }

    /// Rewrite one body: directory marker first, then file marker.
    ///
    /// Returns the number of markers replaced.
    pub fn rebase_body(&self, body: &mut String, unit: &SourceUnit) -> usize {
        let mut total = 0;
        for (marker, literal) in [
            (&self.dir, unit.dir_literal()),
            (&self.file, unit.file_literal()),
        ] {
            if let Some((rewritten, count)) = marker.replace(body, &literal) {
                *body = rewritten;
                total += count;
            }
        }
        total
    }
}

impl Patcher for Rebase {
    fn transform(&self, root: &mut Node, path: &Path) {
        let unit = SourceUnit::new(path);
        let mut rewritten = 0;
        root.visit_mut(&mut |node| {
            if !node.is_eligible() {
                return;
            }
            let count = self.rebase_body(&mut node.body, &unit);
            if count > 0 {
                trace!(count, "rebased markers in code span");
                rewritten += count;
            }
        });
        debug!(path = %path.display(), rewritten, "rebase pass complete");
    }
}
