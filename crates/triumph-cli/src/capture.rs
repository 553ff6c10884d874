//! Recorded introspection captures.
//!
//! A capture stands in for a live bus: it maps each object path of one
//! service to the introspection document that path returned.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;
use triumph_core::{BusSessionPort, RegistrationStatus, SessionError};

use crate::error::CliError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    /// Bus name the documents were recorded from.
    pub service: String,
    /// Introspection XML keyed by object path.
    #[serde(default)]
    pub objects: BTreeMap<String, String>,
}

impl Capture {
    /// Read a capture from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, CliError> {
        serde_json::from_str(text).map_err(|e| CliError::Capture(e.to_string()))
    }
}

/// A [`BusSessionPort`] answering from a capture.
///
/// Registration succeeds the first time an interface name is seen and
/// reports [`RegistrationStatus::AlreadyExists`] afterwards.
#[derive(Debug)]
pub struct CaptureSession {
    capture: Capture,
    registered: Mutex<HashSet<String>>,
}

impl CaptureSession {
    #[must_use]
    pub fn new(capture: Capture) -> Self {
        Self {
            capture,
            registered: Mutex::new(HashSet::new()),
        }
    }

    #[must_use]
    pub fn service(&self) -> &str {
        &self.capture.service
    }
}

impl BusSessionPort for CaptureSession {
    fn introspect(&self, object_path: &str) -> Result<String, SessionError> {
        debug!(path = object_path, "Reading captured document");
        self.capture
            .objects
            .get(object_path)
            .cloned()
            .ok_or_else(|| SessionError::new(format!("no object at '{object_path}' in capture")))
    }

    fn register_interfaces(
        &self,
        _object_path: &str,
        _document: &str,
        interfaces: &[String],
    ) -> RegistrationStatus {
        let mut registered = self
            .registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut fresh = false;
        for name in interfaces {
            fresh |= registered.insert(name.clone());
        }
        if fresh {
            RegistrationStatus::Registered
        } else {
            RegistrationStatus::AlreadyExists
        }
    }
}
