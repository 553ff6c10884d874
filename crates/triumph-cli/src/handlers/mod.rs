//! Command handlers.
//!
//! Each handler validates its input, calls into the core or the crawler and
//! prints the result. Rendering lives in `presentation`.

pub mod decode;
pub mod inspect;
pub mod split;
