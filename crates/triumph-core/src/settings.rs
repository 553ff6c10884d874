//! Crawl settings and validation.
//!
//! Pure configuration types; loading them from disk is the caller's job.

use serde::{Deserialize, Serialize};

use crate::domain::component::path::{ROOT_PATH, is_object_path, normalize};

/// Default recursion limit for a crawl.
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Settings for one introspection crawl.
///
/// Optional fields fall back to their defaults through the `effective_*`
/// accessors, so a partial JSON file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CrawlSettings {
    /// Object path the crawl starts from.
    pub root_path: Option<String>,

    /// Object paths that are never introspected.
    pub excluded_paths: Vec<String>,

    /// Whether interfaces found while crawling are registered with the bus.
    pub register_interfaces: Option<bool>,

    /// Maximum depth below the root before the crawl gives up.
    pub max_depth: Option<u32>,
}

impl CrawlSettings {
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            root_path: Some(ROOT_PATH.to_string()),
            excluded_paths: Vec::new(),
            register_interfaces: Some(true),
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }

    #[must_use]
    pub fn effective_root_path(&self) -> &str {
        self.root_path.as_deref().unwrap_or(ROOT_PATH)
    }

    #[must_use]
    pub fn effective_register_interfaces(&self) -> bool {
        self.register_interfaces.unwrap_or(true)
    }

    #[must_use]
    pub fn effective_max_depth(&self) -> u32 {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Merge an update into these settings, only touching fields it sets.
    pub fn merge(&mut self, other: &CrawlSettingsUpdate) {
        if let Some(ref root) = other.root_path {
            self.root_path.clone_from(root);
        }
        if let Some(ref excluded) = other.excluded_paths {
            self.excluded_paths.clone_from(excluded);
        }
        if let Some(register) = other.register_interfaces {
            self.register_interfaces = register;
        }
        if let Some(depth) = other.max_depth {
            self.max_depth = depth;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset the field to its default
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlSettingsUpdate {
    pub root_path: Option<Option<String>>,
    pub excluded_paths: Option<Vec<String>>,
    pub register_interfaces: Option<Option<bool>>,
    pub max_depth: Option<Option<u32>>,
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Root path must be an absolute object path, got '{0}'")]
    InvalidRootPath(String),

    #[error("Excluded path must be an absolute object path, got '{0}'")]
    InvalidExcludedPath(String),

    #[error("Max depth must be at least 1")]
    ZeroDepth,
}

/// Validate settings values.
pub fn validate_settings(settings: &CrawlSettings) -> Result<(), SettingsError> {
    if let Some(ref root) = settings.root_path {
        if !is_configured_path(root) {
            return Err(SettingsError::InvalidRootPath(root.clone()));
        }
    }

    if let Some(bad) = settings
        .excluded_paths
        .iter()
        .find(|path| !is_configured_path(path))
    {
        return Err(SettingsError::InvalidExcludedPath(bad.clone()));
    }

    if settings.max_depth == Some(0) {
        return Err(SettingsError::ZeroDepth);
    }

    Ok(())
}

/// Configured paths are checked the way the crawler uses them, after
/// trailing slashes are stripped.
fn is_configured_path(path: &str) -> bool {
    !path.is_empty() && is_object_path(&normalize(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = CrawlSettings::with_defaults();
        assert_eq!(settings.effective_root_path(), "/");
        assert!(settings.effective_register_interfaces());
        assert_eq!(settings.effective_max_depth(), DEFAULT_MAX_DEPTH);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_empty_settings_fall_back() {
        let settings = CrawlSettings::default();
        assert_eq!(settings.effective_root_path(), "/");
        assert_eq!(settings.effective_max_depth(), 64);
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_validate_rejects_relative_root() {
        let settings = CrawlSettings {
            root_path: Some("org/example".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidRootPath(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_exclusion_and_zero_depth() {
        let settings = CrawlSettings {
            excluded_paths: vec!["/ok".to_string(), "bad".to_string()],
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::InvalidExcludedPath("bad".to_string()))
        );

        let settings = CrawlSettings {
            max_depth: Some(0),
            ..Default::default()
        };
        assert_eq!(validate_settings(&settings), Err(SettingsError::ZeroDepth));
    }

    #[test]
    fn test_trailing_slashes_are_accepted() {
        let settings = CrawlSettings {
            root_path: Some("/org/example/".to_string()),
            excluded_paths: vec!["/skip/".to_string(), "//".to_string()],
            ..Default::default()
        };
        assert!(validate_settings(&settings).is_ok());

        let settings = CrawlSettings {
            excluded_paths: vec!["skip/".to_string()],
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::InvalidExcludedPath("skip/".to_string()))
        );

        let settings = CrawlSettings {
            root_path: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidRootPath(_))
        ));
    }

    #[test]
    fn test_merge_only_touches_set_fields() {
        let mut settings = CrawlSettings::with_defaults();
        settings.merge(&CrawlSettingsUpdate {
            max_depth: Some(Some(3)),
            register_interfaces: Some(None),
            ..Default::default()
        });
        assert_eq!(settings.max_depth, Some(3));
        assert_eq!(settings.register_interfaces, None);
        assert_eq!(settings.root_path.as_deref(), Some("/"));
    }

    #[test]
    fn test_partial_json() {
        let settings: CrawlSettings =
            serde_json::from_str(r#"{"excluded_paths": ["/org/skip"]}"#).unwrap();
        assert_eq!(settings.excluded_paths, vec!["/org/skip"]);
        assert_eq!(settings.effective_root_path(), "/");
    }
}
