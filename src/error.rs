//! Error types for meetsim
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI
//!
//! Errors raised by a single capability call never reach the caller of a
//! meeting operation; the orchestrator turns them into sentinel values.
//! Only configuration, roster and export failures surface here.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for meetsim operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Roster errors (3xx)
    RosterNotFound = 300,
    RosterMalformed = 301,

    // Capability errors (4xx)
    CapabilityUnavailable = 400,
    CapabilityFailed = 401,
    CapabilityTimeout = 402,

    // Export errors (5xx)
    NothingToExport = 500,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Roster errors
            400..=499 => 40, // Capability errors
            500..=599 => 50, // Export errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error(
        "Configuration validation failed: {message}{}",
        .field.as_ref().map(|f| format!(" [{}]", f)).unwrap_or_default()
    )]
    ConfigValidation { message: String, field: Option<String> },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Roster Errors
    // ─────────────────────────────────────────────────────────────

    /// Roster source missing
    #[error("Persona roster not found: {path}")]
    RosterNotFound { path: PathBuf },

    /// Roster source present but not a list of persona records
    #[error("Persona roster {path} is malformed: {message}")]
    RosterMalformed { path: PathBuf, message: String },

    // ─────────────────────────────────────────────────────────────
    // Capability Errors
    // ─────────────────────────────────────────────────────────────

    /// No generative capability could be constructed
    #[error("Generative capability unavailable: {reason}")]
    CapabilityUnavailable { reason: String },

    /// A single capability call failed
    #[error("Capability '{operation}' failed: {message}")]
    CapabilityFailed { operation: String, message: String },

    /// A single capability call exceeded its time budget
    #[error("Capability '{operation}' timed out after {timeout_secs}s")]
    CapabilityTimeout { operation: String, timeout_secs: u64 },

    // ─────────────────────────────────────────────────────────────
    // Export Errors
    // ─────────────────────────────────────────────────────────────

    /// Transcript has no entries to export
    #[error("Nothing to export: the meeting transcript is empty")]
    NothingToExport,

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::RosterNotFound { .. } => ErrorCode::RosterNotFound,
            Error::RosterMalformed { .. } => ErrorCode::RosterMalformed,

            Error::CapabilityUnavailable { .. } => ErrorCode::CapabilityUnavailable,
            Error::CapabilityFailed { .. } => ErrorCode::CapabilityFailed,
            Error::CapabilityTimeout { .. } => ErrorCode::CapabilityTimeout,

            Error::NothingToExport => ErrorCode::NothingToExport,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'meetsim config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'meetsim config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),
            Error::RosterNotFound { .. } | Error::RosterMalformed { .. } => Some(
                "The roster must be a JSON array of {\"name\", \"trait_code\"} records. Run 'meetsim personas' to check it."
            ),
            Error::CapabilityUnavailable { .. } => Some(
                "Set MEETSIM_API_KEY (or GOOGLE_API_KEY), or use '--provider mock' for an offline meeting."
            ),
            Error::IoWrite { .. } => Some(
                "Check that the export directory exists and is writable, or pass --output-dir."
            ),
            Error::NothingToExport => Some(
                "Start a meeting and say something before saving the log."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            self.code().as_str(),
            self
        );

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound { path: path.into() }
    }

    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a capability failure for the named operation
    pub fn capability_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::CapabilityFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a capability unavailable error
    pub fn capability_unavailable(reason: impl Into<String>) -> Self {
        Error::CapabilityUnavailable {
            reason: reason.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
