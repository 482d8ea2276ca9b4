//! Errors that make a single grading invocation impossible.
//!
//! Data-quality problems inside an otherwise readable export (unknown or
//! malformed edge ids) are not errors; the builder logs and skips them.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes used by the `er-grade` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every submission was graded (0)
    Success = 0,
    /// At least one submission could not be graded (1)
    Failure = 1,
    /// Bad flags or arguments (2)
    Usage = 2,
    /// The reference solution or the configuration could not be loaded (3)
    Input = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

#[derive(Error, Debug)]
pub enum GradingError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid graph export {path:?}: {reason}")]
    InvalidExport { path: PathBuf, reason: String },

    #[error("invalid point total {points} (expected a finite, non-negative number)")]
    InvalidPoints { points: f64 },

    #[error("invalid configuration {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl GradingError {
    /// Every variant is an input error: the file in question cannot be graded.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            GradingError::Io { .. }
            | GradingError::Json { .. }
            | GradingError::InvalidExport { .. }
            | GradingError::InvalidPoints { .. }
            | GradingError::Config { .. } => ExitCode::Input,
        }
    }

    /// Short machine-readable identifier of the error kind.
    pub fn error_type(&self) -> &'static str {
        match self {
            GradingError::Io { .. } => "io_error",
            GradingError::Json { .. } => "json_error",
            GradingError::InvalidExport { .. } => "invalid_export",
            GradingError::InvalidPoints { .. } => "invalid_points",
            GradingError::Config { .. } => "invalid_config",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

pub type Result<T> = std::result::Result<T, GradingError>;
