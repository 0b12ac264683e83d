//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the application,
//! allowing for type-safe error handling throughout the codebase.

pub use crate::api::RecordApiError;
pub use crate::config::ConfigError;
pub use crate::form::FormError;
pub use crate::state::WizardError;

/// Main application error type.
///
/// This is the top-level error type that encompasses all error types
/// in the application. It uses `thiserror` for automatic error derivation
/// and conversion.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Record API-related errors
    #[error("Record API error: {0}")]
    RecordApi(#[from] RecordApiError),

    /// Wizard navigation and submission errors
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// Field and list errors
    #[error("Form error: {0}")]
    Form(#[from] FormError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Answers file could not be parsed
    #[error("Invalid answers file: {0}")]
    Answers(String),

    /// A section failed validation during replay
    #[error("Section '{section}' is invalid: {errors}")]
    SectionInvalid { section: String, errors: String },

    /// A section could not be saved during replay
    #[error("Failed to save section '{section}': {message}")]
    SyncFailed { section: String, message: String },

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
