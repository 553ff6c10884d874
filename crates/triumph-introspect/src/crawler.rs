//! Recursive introspection crawler.
//!
//! Starting at the root path, each visited object is introspected, its
//! interfaces are registered with the bus, the object is built if the node
//! qualifies as one, and every advertised child not yet discovered is
//! visited in turn.
//!
//! # Invariants
//!
//! - A path is marked discovered before it is visited, so each path is
//!   introspected at most once per crawl. Self-referential and cyclic child
//!   advertisements therefore terminate.
//! - Excluded paths are pre-seeded into the discovered set and never
//!   introspected.
//! - Any transport, XML or decoding error aborts the whole crawl. Only
//!   interface registration problems are recoverable.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use roxmltree::Node;
use tracing::{debug, info, warn};
use triumph_core::domain::component::path::normalize;
use triumph_core::{BusObject, BusSessionPort, CrawlSettings, RegistrationStatus, validate_settings};

use crate::builder;
use crate::error::CrawlError;
use crate::xml;

/// A registration failure that was logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationWarning {
    pub path: String,
    pub reason: String,
}

/// One crawl over one service.
///
/// A crawler owns its discovered set; concurrent crawls each need their own.
pub struct Crawler<'s> {
    session: &'s dyn BusSessionPort,
    settings: &'s CrawlSettings,
    discovered: HashSet<String>,
    cancel: Option<Arc<AtomicBool>>,
    warnings: Vec<RegistrationWarning>,
}

impl<'s> Crawler<'s> {
    pub fn new(session: &'s dyn BusSessionPort, settings: &'s CrawlSettings) -> Self {
        let discovered = settings
            .excluded_paths
            .iter()
            .map(|path| normalize(path))
            .collect();
        Self {
            session,
            settings,
            discovered,
            cancel: None,
            warnings: Vec::new(),
        }
    }

    /// Check `flag` between steps and fail with [`CrawlError::Cancelled`]
    /// once it is set.
    #[must_use]
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Registration problems seen so far.
    #[must_use]
    pub fn warnings(&self) -> &[RegistrationWarning] {
        &self.warnings
    }

    /// Paths introspected or excluded so far.
    #[must_use]
    pub const fn discovered(&self) -> &HashSet<String> {
        &self.discovered
    }

    /// Crawl from the configured root and return every object found.
    pub fn crawl(&mut self) -> Result<Vec<BusObject>, CrawlError> {
        validate_settings(self.settings)?;
        let root = normalize(self.settings.effective_root_path());
        if !self.discovered.insert(root.clone()) {
            debug!(path = %root, "Root path is excluded, nothing to crawl");
            return Ok(Vec::new());
        }
        self.visit(&root, 0)
    }

    fn visit(&mut self, path: &str, depth: u32) -> Result<Vec<BusObject>, CrawlError> {
        self.check_cancelled()?;
        let max_depth = self.settings.effective_max_depth();
        if depth > max_depth {
            return Err(CrawlError::DepthExceeded {
                path: path.to_string(),
                max_depth,
            });
        }

        debug!(path, depth, "Introspecting object");
        let raw = self
            .session
            .introspect(path)
            .map_err(|e| introspection_failed(path, e))?;
        let text = xml::strip_doctype(&raw);
        let doc = xml::parse(&text).map_err(|e| introspection_failed(path, e))?;
        let node = doc.root_element();
        if !node.has_tag_name(xml::NODE) {
            return Err(introspection_failed(
                path,
                format!("root element is <{}>, expected <node>", node.tag_name().name()),
            ));
        }

        if self.settings.effective_register_interfaces() {
            self.register(path, &raw, node);
        }

        let mut objects = Vec::new();
        if builder::is_object(node) {
            let object =
                builder::build_object(node, path).map_err(|e| CrawlError::malformed(path, &e))?;
            objects.push(object);
        }

        for child in builder::child_paths(node, path) {
            if !self.discovered.insert(child.clone()) {
                debug!(path = %child, "Skipping discovered or excluded path");
                continue;
            }
            objects.extend(self.visit(&child, depth + 1)?);
        }
        Ok(objects)
    }

    fn register(&mut self, path: &str, document: &str, node: Node<'_, '_>) {
        let interfaces = builder::interface_names(node);
        if interfaces.is_empty() {
            return;
        }
        match self.session.register_interfaces(path, document, &interfaces) {
            RegistrationStatus::Registered => {}
            RegistrationStatus::AlreadyExists => {
                info!(path, "Interfaces already registered");
            }
            RegistrationStatus::Failed(reason) => {
                warn!(path, %reason, "Unable to register interfaces");
                self.warnings.push(RegistrationWarning {
                    path: path.to_string(),
                    reason,
                });
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), CrawlError> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(CrawlError::Cancelled),
            _ => Ok(()),
        }
    }
}

fn introspection_failed(path: &str, reason: impl ToString) -> CrawlError {
    CrawlError::IntrospectionFailed {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
