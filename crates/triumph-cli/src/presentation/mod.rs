//! Terminal rendering.
//!
//! Renderers return lines instead of printing, so handlers decide where the
//! output goes and tests can compare it directly.

pub mod tree;

pub use tree::{argument_lines, member_line, property_line, service_lines};
