//! Patch pipeline: an ordered, named set of patchers applied during one load.
//!
//! Patchers run in insertion order. Each sees the path or tree exactly as the
//! previous one left it.

use crate::config::{PatcherKind, PipelineConfig};
use crate::node::Node;
use crate::patcher::{ClassLoader, Patcher, Rebase};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Default)]
pub struct Pipeline {
    patchers: Vec<(String, Box<dyn Patcher>)>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pipeline holding the configured patchers, in order.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut pipeline = Self::new();
        for entry in &config.patchers {
            let patcher: Box<dyn Patcher> = match entry.kind {
                PatcherKind::Rebase => Box::new(Rebase::new()),
            };
            pipeline.add(entry.name.clone(), patcher);
        }
        pipeline
    }

    /// Register `patcher` under `name`.
    ///
    /// Re-adding a known name swaps the patcher but keeps its position.
    pub fn add(&mut self, name: impl Into<String>, patcher: Box<dyn Patcher>) -> &mut Self {
        let name = name.into();
        match self.position(&name) {
            Some(index) => self.patchers[index].1 = patcher,
            None => self.patchers.push((name, patcher)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Patcher> {
        self.position(name).map(|index| self.patchers[index].1.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Patcher>> {
        self.position(name)
            .map(|index| self.patchers.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.patchers.clear();
    }

    pub fn len(&self) -> usize {
        self.patchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patchers.is_empty()
    }

    /// Registered names in application order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patchers.iter().map(|(name, _)| name.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.patchers.iter().position(|(known, _)| known == name)
    }

    /// Thread the candidate path through every patcher's file hook.
    pub fn find_file(&self, loader: &dyn ClassLoader, class: &str, file: &Path) -> PathBuf {
        let mut current = file.to_path_buf();
        for (name, patcher) in &self.patchers {
            let next = patcher.locate_file(loader, class, &current);
            if next != current {
                debug!(patcher = %name, class, from = %current.display(), to = %next.display(), "redirected source file");
            }
            current = next;
        }
        current
    }

    /// Ask `loader` for the file of `class`, then let the patchers redirect it.
    pub fn resolve(&self, loader: &dyn ClassLoader, class: &str) -> Option<PathBuf> {
        let candidate = loader.find_file(class)?;
        Some(self.find_file(loader, class, &candidate))
    }

    /// Apply every patcher's transform to the tree parsed from `path`.
    pub fn process<'a>(&self, root: &'a mut Node, path: &Path) -> &'a mut Node {
        for (name, patcher) in &self.patchers {
            debug!(patcher = %name, path = %path.display(), "applying patcher");
            patcher.transform(root, path);
        }
        root
    }
}
