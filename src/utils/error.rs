use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HasherError {
    #[error("Input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("IO error on {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HasherError {
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HasherError::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            HasherError::InputNotFound { .. } => ErrorCategory::Input,
            HasherError::IoError { .. } | HasherError::Io(_) => ErrorCategory::Output,
            HasherError::SerializationError(_) => ErrorCategory::Data,
            HasherError::ConfigError { .. }
            | HasherError::ConfigValidationError { .. }
            | HasherError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HasherError::InputNotFound { .. } => ErrorSeverity::High,
            HasherError::IoError { .. } | HasherError::Io(_) => ErrorSeverity::Critical,
            HasherError::SerializationError(_) => ErrorSeverity::High,
            HasherError::ConfigError { .. }
            | HasherError::ConfigValidationError { .. }
            | HasherError::InvalidConfigValueError { .. } => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            HasherError::InputNotFound { path } => format!(
                "Check that '{}' exists and the path is spelled correctly",
                path.display()
            ),
            HasherError::IoError { path, .. } => format!(
                "Check permissions and free disk space for '{}'",
                path.display()
            ),
            HasherError::Io(_) => "Check file permissions and free disk space".to_string(),
            HasherError::SerializationError(_) => {
                "A record could not be re-encoded as JSON; please report the input line".to_string()
            }
            HasherError::ConfigError { .. } => {
                "Make sure the config file exists and is valid TOML".to_string()
            }
            HasherError::ConfigValidationError { field, .. }
            | HasherError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in your configuration", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HasherError::InputNotFound { path } => {
                format!("Input file not found: {}", path.display())
            }
            HasherError::IoError { path, source } => {
                format!("Could not read or write '{}': {}", path.display(), source)
            }
            HasherError::Io(e) => format!("File operation failed: {}", e),
            HasherError::SerializationError(e) => format!("Failed to encode record: {}", e),
            HasherError::ConfigError { message } => format!("Configuration problem: {}", message),
            HasherError::ConfigValidationError { field, message } => {
                format!("Invalid configuration ({}): {}", field, message)
            }
            HasherError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("Invalid value '{}' for {}: {}", value, field, reason),
        }
    }
}

pub type Result<T> = std::result::Result<T, HasherError>;
