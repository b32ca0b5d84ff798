//! Node tree: the span representation of one parsed source unit.
//!
//! A tree is built once per load by an external parser, mutated in place by
//! the patchers of a single pipeline pass and rendered back to text. Each tree
//! owns its nodes outright; patching only ever changes `body`, never the shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Classification of a span.
///
/// Only [`NodeKind::Code`] spans hold executable text and are candidates for
/// rewriting. Everything else is carried through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Root of a source unit
    File,
    /// Executable program text
    Code,
    /// Comment text
    Comment,
    /// String literal kept as opaque text
    String,
    /// Markup outside executable regions
    Plain,
    /// Opening tag of an executable region
    Open,
    /// Closing tag of an executable region
    Close,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::File => "file",
            NodeKind::Code => "code",
            NodeKind::Comment => "comment",
            NodeKind::String => "string",
            NodeKind::Plain => "plain",
            NodeKind::Open => "open",
            NodeKind::Close => "close",
        };
        f.write_str(name)
    }
}

/// One span of a parsed source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Current text of the span, including rewrites made so far
    #[serde(default)]
    pub body: String,
    /// When false the body is skipped even for code spans
    #[serde(default = "default_processable")]
    pub processable: bool,
    /// Child spans in source order
    #[serde(default)]
    pub children: Vec<Node>,
}

fn default_processable() -> bool {
    true
}

impl Node {
    pub fn new(kind: NodeKind, body: impl Into<String>) -> Self {
        Self {
            kind,
            body: body.into(),
            processable: true,
            children: Vec::new(),
        }
    }

    pub fn code(body: impl Into<String>) -> Self {
        Self::new(NodeKind::Code, body)
    }

    pub fn comment(body: impl Into<String>) -> Self {
        Self::new(NodeKind::Comment, body)
    }

    /// Empty root span for a whole source unit.
    pub fn file() -> Self {
        Self::new(NodeKind::File, "")
    }

    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Mark the span as excluded from rewriting.
    #[must_use]
    pub fn unprocessable(mut self) -> Self {
        self.processable = false;
        self
    }

    /// Whether patchers may rewrite this node's own body.
    pub fn is_eligible(&self) -> bool {
        self.kind == NodeKind::Code && self.processable
    }

    /// Visit every node of the subtree, parent before children.
    pub fn visit_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Node),
    {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    /// Visit every node of the subtree read-only, parent before children.
    pub fn visit<F>(&self, f: &mut F)
    where
        F: FnMut(&Node),
    {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Number of nodes in the subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Concatenate bodies in tree order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(&self.body);
        for child in &self.children {
            child.render_into(out);
        }
    }
}

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("failed to read node tree from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed node tree: {0}")]
    Json(#[source] serde_json::Error),

    #[error("malformed node tree in {path}: {source}")]
    JsonFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a tree from its JSON interchange form.
pub fn tree_from_str(input: &str) -> Result<Node, TreeError> {
    serde_json::from_str(input).map_err(TreeError::Json)
}

/// Read a tree from a JSON file.
pub fn tree_from_path(path: impl AsRef<Path>) -> Result<Node, TreeError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| TreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| TreeError::JsonFile {
        path: path.to_path_buf(),
        source,
    })
}
