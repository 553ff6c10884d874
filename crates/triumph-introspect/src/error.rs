//! Crawl errors.
//!
//! [`BuildError`] describes what is wrong with one element while building
//! components. The crawler attaches the object path and reports it as a
//! [`CrawlError`].

use thiserror::Error;
use triumph_core::domain::argument::ParseDirectionError;
use triumph_core::{SettingsError, SignatureError};

/// Why a crawl produced no result.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The session could not deliver a readable document for `path`.
    #[error("Introspection failed for '{path}': {reason}")]
    IntrospectionFailed { path: String, reason: String },

    /// The document parsed but declares something that cannot be decoded.
    #[error("Malformed interface at '{path}': {reason}")]
    MalformedInterface { path: String, reason: String },

    #[error("Crawl cancelled")]
    Cancelled,

    #[error("Crawl exceeded the maximum depth of {max_depth} at '{path}'")]
    DepthExceeded { path: String, max_depth: u32 },

    #[error("Invalid crawl settings: {0}")]
    Settings(#[from] SettingsError),

    /// The blocking worker running an off-thread crawl died.
    #[error("Crawl worker failed: {0}")]
    Worker(String),
}

impl CrawlError {
    /// The sentence shown to a user instead of a partial tree.
    #[must_use]
    pub fn user_message(&self) -> String {
        format!("This service could not be inspected: {self}")
    }

    pub(crate) fn malformed(path: &str, error: &BuildError) -> Self {
        Self::MalformedInterface {
            path: path.to_string(),
            reason: error.to_string(),
        }
    }
}

/// A problem with a single introspection element.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("<{element}> is missing the '{attribute}' attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("{element} '{name}': {source}")]
    Signature {
        element: &'static str,
        name: String,
        #[source]
        source: SignatureError,
    },

    #[error(transparent)]
    Direction(#[from] ParseDirectionError),
}

pub type BuildResult<T> = Result<T, BuildError>;
