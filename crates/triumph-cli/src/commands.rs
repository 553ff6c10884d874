//! Available commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use triumph_core::Direction;

#[derive(Subcommand)]
pub enum Commands {
    /// Split a signature into its top-level complete types
    Split {
        /// Type signature, e.g. "sa{sv}i"
        signature: String,
    },

    /// Decode one complete type into an argument tree
    Decode {
        /// Type signature holding exactly one complete type
        signature: String,
        /// Name of the decoded argument
        #[arg(long, default_value = "")]
        name: String,
        /// Argument direction: "in" or "out"
        #[arg(long, default_value = "in")]
        direction: Direction,
    },

    /// Crawl a recorded capture and print the service's objects
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Capture file mapping object paths to introspection XML
    pub capture: PathBuf,

    /// Service name to report instead of the one in the capture
    #[arg(long)]
    pub service: Option<String>,

    /// Crawl settings file (JSON)
    #[arg(long, env = "TRIUMPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Object path to start crawling from
    #[arg(long)]
    pub root: Option<String>,

    /// Object path never to introspect (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Maximum depth below the root
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Skip interface registration
    #[arg(long)]
    pub no_register: bool,

    /// Print the service as JSON
    #[arg(long)]
    pub json: bool,

    /// Only show members whose name starts with this prefix
    #[arg(long)]
    pub filter: Option<String>,
}
