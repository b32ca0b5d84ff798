//! Outcome sink used by the test runner that loads patched sources.
//!
//! The patching engine never depends on this module; it lives here so the
//! runner can report outcomes of specs executed from rewritten code.

pub mod dot;

pub use dot::DotReporter;

use colored::Color;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Exception,
    Skip,
    Incomplete,
}

impl Outcome {
    /// Progress glyph.
    pub fn glyph(self) -> &'static str {
        match self {
            Outcome::Pass => ".",
            Outcome::Fail => "F",
            Outcome::Exception => "E",
            Outcome::Skip => "S",
            Outcome::Incomplete => "I",
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Outcome::Pass => None,
            Outcome::Fail => Some(Color::Red),
            Outcome::Exception => Some(Color::Magenta),
            Outcome::Skip => Some(Color::Cyan),
            Outcome::Incomplete => Some(Color::Yellow),
        }
    }

    /// Whether the outcome is listed in detail after the progress lines.
    pub fn is_notable(self) -> bool {
        !matches!(self, Outcome::Pass | Outcome::Skip)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Pass => "pass",
            Outcome::Fail => "failure",
            Outcome::Exception => "exception",
            Outcome::Skip => "skipped",
            Outcome::Incomplete => "incomplete",
        };
        f.write_str(label)
    }
}

/// One spec outcome pushed by the runner.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Report {
    pub outcome: Outcome,
    pub description: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl Report {
    pub fn new(outcome: Outcome, description: impl Into<String>) -> Self {
        Self {
            outcome,
            description: description.into(),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Running outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
    pub incomplete: usize,
}

impl Summary {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail => self.failed += 1,
            Outcome::Exception => self.errored += 1,
            Outcome::Skip => self.skipped += 1,
            Outcome::Incomplete => self.incomplete += 1,
        }
    }

    /// Specs that actually ran.
    pub fn executed(&self) -> usize {
        self.passed + self.failed + self.errored + self.incomplete
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Passed {} of {} {}",
            self.passed,
            self.executed(),
            if self.is_success() { "PASS" } else { "FAIL" }
        )?;
        if !self.is_success() || self.incomplete > 0 {
            write!(
                f,
                " (FAILURE: {}, EXCEPTION: {}, INCOMPLETE: {})",
                self.failed, self.errored, self.incomplete
            )?;
        }
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}
