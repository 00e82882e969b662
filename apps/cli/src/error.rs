//! # App Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Command Function ── Result<T, AppError>                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Settings problem? ─── ConfigError ────────────────┐                    │
//! │         │                                          │                    │
//! │         ▼                                          ▼                    │
//! │  Page problem? ─────── PageError ──────────────► AppError ──► stderr    │
//! │         │                                          ▲          + exit    │
//! │         ▼                                          │            code    │
//! │  Calculator problem? ─ CoreError ──────────────────┘                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Serialized, an error has the shape the extension UI expects:
//! ```json
//! { "code": "NO_PARTICIPANTS", "message": "No participants found on the page" }
//! ```

use serde::Serialize;
use tally_core::CoreError;
use tally_page::PageError;

use crate::state::ConfigError;

/// Error returned from CLI commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Order data or arguments failed validation
    ValidationError,

    /// Another calculation is still running
    CalculationInProgress,

    /// The page has no participants (yet)
    NoParticipants,

    /// The page content could not be read
    MalformedPage,

    /// Settings file or environment problem
    ConfigError,

    /// File system error
    IoError,

    /// Internal error
    Internal,
}

impl AppError {
    /// Creates a new app error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    /// Process exit code for this error.
    ///
    /// | Code | Meaning                         |
    /// |------|---------------------------------|
    /// | 2    | bad input (arguments or page)   |
    /// | 3    | calculation already in progress |
    /// | 4    | settings problem                |
    /// | 1    | anything else                   |
    pub fn exit_code(&self) -> u8 {
        match self.code {
            ErrorCode::ValidationError | ErrorCode::NoParticipants | ErrorCode::MalformedPage => 2,
            ErrorCode::CalculationInProgress => 3,
            ErrorCode::ConfigError => 4,
            ErrorCode::IoError | ErrorCode::Internal => 1,
        }
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(e) => AppError::validation(e.to_string()),
            CoreError::CalculationInProgress => AppError::new(
                ErrorCode::CalculationInProgress,
                CoreError::CalculationInProgress.to_string(),
            ),
        }
    }
}

/// Converts page errors to app errors.
impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        let code = match &err {
            PageError::InvalidOrder(_) => ErrorCode::ValidationError,
            e if e.is_malformed() => ErrorCode::MalformedPage,
            _ => ErrorCode::NoParticipants,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("Failed to render JSON: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!("Calculation task failed: {}", err);
        AppError::internal("Calculation task failed")
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
