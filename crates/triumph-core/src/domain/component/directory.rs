//! Published service graphs.
//!
//! Readers hold an `Arc<Service>` snapshot; a re-crawl publishes a new graph
//! by swapping the pointer, so nobody ever observes a half-built service.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::Service;

/// The most recent complete graph for each service name.
#[derive(Debug, Default)]
pub struct ServiceDirectory {
    services: RwLock<HashMap<String, Arc<Service>>>,
}

impl ServiceDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a freshly crawled graph, returning the one it replaced.
    ///
    /// Callers that need the published snapshot pass an `Arc` they keep a
    /// clone of, rather than reading it back with [`Self::get`].
    pub fn publish(&self, service: impl Into<Arc<Service>>) -> Option<Arc<Service>> {
        let service = service.into();
        let mut services = self
            .services
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        services.insert(service.name().to_string(), service)
    }

    /// Snapshot of the current graph for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Service>> {
        let services = self.services.read().unwrap_or_else(PoisonError::into_inner);
        services.get(name).cloned()
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Service>> {
        let mut services = self
            .services
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        services.remove(name)
    }

    /// Published service names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let services = self.services.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = services.keys().cloned().collect();
        names.sort();
        names
    }
}
