use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

/// Glyphs per progress line when the config does not say otherwise.
pub const DEFAULT_REPORTER_WIDTH: usize = 80;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    #[serde(default = "default_patchers")]
    pub patchers: Vec<PatcherEntry>,
    #[serde(default)]
    pub reporter: ReporterConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            patchers: default_patchers(),
            reporter: ReporterConfig::default(),
        }
    }
}

fn default_patchers() -> Vec<PatcherEntry> {
    vec![PatcherEntry {
        name: "rebase".to_string(),
        kind: PatcherKind::Rebase,
    }]
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.patchers.is_empty() {
            issues.push(ValidationIssue::EmptyPatcherList);
        }

        let mut seen = HashSet::new();
        for (index, entry) in self.patchers.iter().enumerate() {
            if entry.name.trim().is_empty() {
                issues.push(ValidationIssue::MissingName { index });
            } else if !seen.insert(entry.name.as_str()) {
                issues.push(ValidationIssue::DuplicateName {
                    name: entry.name.clone(),
                });
            }
        }

        if self.reporter.width == 0 {
            issues.push(ValidationIssue::InvalidValue {
                field: "reporter.width",
                message: "must be at least 1".to_string(),
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PatcherEntry {
    pub name: String,
    pub kind: PatcherKind,
}

/// Built-in patcher implementations selectable from config.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PatcherKind {
    Rebase,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_colors")]
    pub colors: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_REPORTER_WIDTH,
            colors: true,
        }
    }
}

fn default_width() -> usize {
    DEFAULT_REPORTER_WIDTH
}

fn default_colors() -> bool {
    true
}

/// Every problem found in one config, in declaration order.
#[derive(Error, Debug, Clone)]
#[error("{}", render_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("pipeline config lists no patchers")]
    EmptyPatcherList,

    /// `index` is the position in the `[[patchers]]` array
    #[error("patcher #{index} has an empty name")]
    MissingName { index: usize },

    #[error("patcher '{name}' is declared more than once")]
    DuplicateName { name: String },

    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}
