//! CLI bootstrap: crawl settings from a config file and flags.
//!
//! Precedence is flags over the config file over built-in defaults. The
//! result is validated before any crawl starts.

use std::fs;
use std::path::Path;

use tracing::debug;
use triumph_core::{CrawlSettings, CrawlSettingsUpdate, validate_settings};

use crate::commands::InspectArgs;
use crate::error::CliError;

/// Command-line overrides for crawl settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub root: Option<String>,
    pub exclude: Vec<String>,
    pub max_depth: Option<u32>,
    pub no_register: bool,
}

impl SettingsOverrides {
    fn to_update(&self) -> CrawlSettingsUpdate {
        CrawlSettingsUpdate {
            root_path: self.root.clone().map(Some),
            excluded_paths: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            register_interfaces: self.no_register.then_some(Some(false)),
            max_depth: self.max_depth.map(Some),
        }
    }
}

impl From<&InspectArgs> for SettingsOverrides {
    fn from(args: &InspectArgs) -> Self {
        Self {
            root: args.root.clone(),
            exclude: args.exclude.clone(),
            max_depth: args.max_depth,
            no_register: args.no_register,
        }
    }
}

/// Load settings from `config`, or defaults when no file is given.
pub fn load_settings(config: Option<&Path>) -> Result<CrawlSettings, CliError> {
    let Some(path) = config else {
        return Ok(CrawlSettings::with_defaults());
    };
    debug!(path = %path.display(), "Loading crawl settings");
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
}

/// Resolve and validate the settings for one crawl.
pub fn resolve_settings(
    config: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<CrawlSettings, CliError> {
    let mut settings = load_settings(config)?;
    settings.merge(&overrides.to_update());
    validate_settings(&settings)?;
    Ok(settings)
}
