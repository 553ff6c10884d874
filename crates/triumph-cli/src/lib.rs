#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use tempfile as _;

// Used by the binary only
use tracing_subscriber as _;

pub mod bootstrap;
pub mod capture;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

pub use bootstrap::{SettingsOverrides, resolve_settings};
pub use capture::{Capture, CaptureSession};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
