pub mod loader;
pub mod schema;

pub use loader::{load_from_path, load_from_str, load_or_default, ConfigError};
pub use schema::{
    PatcherEntry, PatcherKind, PipelineConfig, ReporterConfig, ValidationError, ValidationIssue,
    DEFAULT_REPORTER_WIDTH,
};
