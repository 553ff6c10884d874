//! CLI-specific error types and exit codes.

use std::io;

use thiserror::Error;
use triumph_core::{SettingsError, SignatureError};
use triumph_introspect::CrawlError;

#[derive(Debug, Error)]
pub enum CliError {
    /// A signature given on the command line could not be decoded.
    #[error("Invalid signature: {0}")]
    Signature(String),

    /// A capture file could not be read as a capture.
    #[error("Invalid capture: {0}")]
    Capture(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The service could not be inspected.
    #[error("{0}")]
    Inspection(String),

    #[error("Interrupted")]
    Interrupted,
}

impl CliError {
    /// Map error to an exit code.
    ///
    /// Codes follow sysexits.h where a category fits.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Signature(_) | Self::Capture(_) => 65, // EX_DATAERR
            Self::Io(_) => 74,                           // EX_IOERR
            Self::Config(_) => 78,                       // EX_CONFIG
            Self::Inspection(_) => 69,                   // EX_UNAVAILABLE
            Self::Interrupted => 130,
        }
    }
}

impl From<SignatureError> for CliError {
    fn from(err: SignatureError) -> Self {
        Self::Signature(err.to_string())
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<CrawlError> for CliError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Settings(settings) => settings.into(),
            CrawlError::Cancelled => Self::Interrupted,
            other => Self::Inspection(other.user_message()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
