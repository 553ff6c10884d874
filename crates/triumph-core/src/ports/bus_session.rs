//! Bus session port definition.
//!
//! The crawler needs exactly two things from the bus binding: the raw
//! introspection document for an object path, and a way to register the
//! interfaces that document declares. Everything else about sessions and
//! transport stays behind this trait.

use thiserror::Error;

/// A transport-level failure while talking to the bus.
///
/// The core does not classify transport errors any further.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SessionError(pub String);

impl SessionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Outcome of registering a node's interfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationStatus {
    Registered,
    /// Every interface was already known to the bus.
    AlreadyExists,
    /// Registration failed; the crawl logs this and carries on.
    Failed(String),
}

/// Port for the bus session a crawl runs against.
///
/// Implementations are called synchronously from the crawl loop, which
/// callers run off any UI thread.
pub trait BusSessionPort: Send + Sync {
    /// Fetch the introspection document for `object_path`.
    fn introspect(&self, object_path: &str) -> Result<String, SessionError>;

    /// Register the interfaces declared by an introspection document.
    ///
    /// # Arguments
    ///
    /// * `object_path` - Path the document was fetched from
    /// * `document` - The introspection XML as returned by [`Self::introspect`]
    /// * `interfaces` - Names of the interfaces the document declares
    fn register_interfaces(
        &self,
        object_path: &str,
        document: &str,
        interfaces: &[String],
    ) -> RegistrationStatus;
}

/// A session with a single empty root object.
#[derive(Debug, Clone, Default)]
pub struct NoopBusSession;

impl BusSessionPort for NoopBusSession {
    fn introspect(&self, _object_path: &str) -> Result<String, SessionError> {
        Ok("<node/>".to_string())
    }

    fn register_interfaces(
        &self,
        _object_path: &str,
        _document: &str,
        _interfaces: &[String],
    ) -> RegistrationStatus {
        RegistrationStatus::Registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_session_returns_empty_node() {
        let session = NoopBusSession;
        assert_eq!(session.introspect("/any").unwrap(), "<node/>");
        assert_eq!(
            session.register_interfaces("/", "<node/>", &[]),
            RegistrationStatus::Registered
        );
    }

    #[test]
    fn test_session_error_display() {
        assert_eq!(SessionError::new("bus gone").to_string(), "bus gone");
    }
}
