//! Command-line argument definitions for the Nexy CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global options select the configuration file, the
//! project root and the logging verbosity; the [`Command`] picks what to do.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Nexy compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Project root, overriding the configured one
    #[arg(short = 'C', long, global = true)]
    pub root: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

/// What the CLI should do.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Compile every component of the project
    Build,

    /// Compile a single component
    Compile {
        /// Path to the `.nexy` or `.mdx` source
        input: String,
    },

    /// Print the route table
    Routes,

    /// Rebuild components whenever their sources change
    Watch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile_with_global_options() {
        let args = Args::parse_from([
            "nexy",
            "compile",
            "src/routes/index.nexy",
            "--log-level",
            "debug",
            "-C",
            "site",
        ]);

        assert_eq!(
            args.command,
            Command::Compile {
                input: "src/routes/index.nexy".to_string()
            }
        );
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.root.as_deref(), Some("site"));
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_parse_build() {
        let args = Args::parse_from(["nexy", "--config", "nexy.toml", "build"]);
        assert_eq!(args.command, Command::Build);
        assert_eq!(args.config.as_deref(), Some("nexy.toml"));
        assert_eq!(args.log_level, "info");
    }
}
