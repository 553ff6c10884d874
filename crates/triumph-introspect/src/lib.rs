#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod builder;
pub mod crawler;
pub mod decode;
pub mod error;
pub mod inspector;
pub mod xml;

pub use crawler::{Crawler, RegistrationWarning};
pub use error::{BuildError, BuildResult, CrawlError};
pub use inspector::{inspect_off_thread, inspect_service, refresh_service};
