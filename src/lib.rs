//! JIT Rebase: source patching for code loaded by a test runner
//!
//! Sources are parsed into a tree of typed spans by an external parser. Before
//! the tree is rendered back to text and executed, a [`Pipeline`] of
//! [`Patcher`]s may redirect which file is read and rewrite the bodies of code
//! spans in place.
//!
//! # Architecture
//!
//! - [`node`]: the span tree and its JSON interchange form
//! - [`patcher`]: the two-hook patcher contract and the [`Rebase`] patcher
//! - [`pipeline`]: ordered application of named patchers
//! - [`config`]: TOML configuration of the pipeline and reporter
//! - [`reporter`]: dot progress reporter for spec outcomes
//!
//! Patching never fails: a patcher that finds nothing to do leaves the tree
//! as it was.
//!
//! # Example
//!
//! ```
//! use jit_rebase::{Node, Pipeline, Rebase};
//! use std::path::Path;
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.add("rebase", Box::new(Rebase::new()));
//!
//! let mut tree = Node::file().with_child(Node::code("require __FILE__;"));
//! pipeline.process(&mut tree, Path::new("/srv/app/lib/widget.src"));
//!
//! assert_eq!(tree.render(), "require '/srv/app/lib/widget.src';");
//! ```

pub mod config;
pub mod node;
pub mod patcher;
pub mod pipeline;
pub mod reporter;
pub mod source;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, PipelineConfig, ValidationError};
pub use node::{tree_from_path, tree_from_str, Node, NodeKind, TreeError};
pub use patcher::{ClassLoader, ClassMap, Patcher, Rebase};
pub use pipeline::Pipeline;
pub use reporter::{DotReporter, Outcome, Report, Summary};
pub use source::SourceUnit;
