//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Decode bus type signatures and inspect services.
#[derive(Parser)]
#[command(name = "triumph")]
#[command(about = "Decode bus type signatures and inspect services")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use triumph_core::Direction;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_verbose_after_subcommand() {
        let cli = Cli::parse_from(["triumph", "split", "ii", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Split { ref signature }) if signature == "ii"));
    }

    #[test]
    fn test_decode_direction_parses() {
        let cli = Cli::parse_from(["triumph", "decode", "a{sv}", "--direction", "out"]);
        let Some(Commands::Decode { direction, name, .. }) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(direction, Direction::Out);
        assert_eq!(name, "");
    }

    #[test]
    fn test_bad_direction_rejected() {
        assert!(Cli::try_parse_from(["triumph", "decode", "i", "--direction", "up"]).is_err());
    }

    #[test]
    fn test_inspect_repeated_excludes() {
        let cli = Cli::parse_from([
            "triumph",
            "inspect",
            "capture.json",
            "--exclude",
            "/a",
            "--exclude",
            "/b",
            "--no-register",
        ]);
        let Some(Commands::Inspect(args)) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.exclude, vec!["/a", "/b"]);
        assert!(args.no_register);
        assert!(!args.json);
    }
}
