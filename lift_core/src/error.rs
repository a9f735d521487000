//! Error types for the lift_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A template draft does not conform to the template shape.
    /// Each entry is prefixed with the path of the offending element.
    #[error("Template schema violation: {}", .0.join("; "))]
    Schema(Vec<String>),

    /// Start date could not be parsed as a calendar date
    #[error("Invalid start date: {0:?}")]
    InvalidStartDate(String),

    /// Plan has no template to schedule from
    #[error("Plan has no template")]
    MissingTemplate,

    /// Template has no day templates to rotate through
    #[error("Template pattern is empty")]
    EmptyPattern,

    /// Safety audit found violations; the template must not be persisted
    #[error("Template failed safety audit: {}", .0.join("; "))]
    UnsafeTemplate(Vec<String>),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the caller should treat this failure as "regeneration required"
    pub fn requires_regeneration(&self) -> bool {
        matches!(
            self,
            Error::Schema(_)
                | Error::InvalidStartDate(_)
                | Error::MissingTemplate
                | Error::EmptyPattern
                | Error::UnsafeTemplate(_)
        )
    }
}
