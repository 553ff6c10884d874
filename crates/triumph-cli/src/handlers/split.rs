//! Split command handler.

use anyhow::Result;
use triumph_core::split;

use crate::error::CliError;

/// Top-level complete types of `signature`, in order.
pub fn tokens(signature: &str) -> Result<Vec<String>, CliError> {
    Ok(split(signature)?.into_iter().map(str::to_string).collect())
}

pub fn execute(signature: &str) -> Result<()> {
    for token in tokens(signature)? {
        println!("{token}");
    }
    Ok(())
}
