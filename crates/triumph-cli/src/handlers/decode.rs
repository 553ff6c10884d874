//! Decode command handler.

use anyhow::Result;
use triumph_core::{Direction, decode};

use crate::error::CliError;
use crate::presentation::argument_lines;

/// Decode `signature` and render its argument tree.
pub fn render(signature: &str, name: &str, direction: Direction) -> Result<Vec<String>, CliError> {
    let argument = decode(signature, name, direction)?;
    Ok(argument_lines(&argument))
}

pub fn execute(signature: &str, name: &str, direction: Direction) -> Result<()> {
    for line in render(signature, name, direction)? {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_dictionary() {
        let lines = render("a{sv}", "props", Direction::Out).unwrap();
        assert_eq!(lines, vec!["{ string => variant } props  [a{sv}]"]);
    }

    #[test]
    fn test_multiple_types_rejected() {
        assert!(matches!(
            render("ii", "", Direction::In),
            Err(CliError::Signature(_))
        ));
    }
}
