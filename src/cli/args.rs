//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// Incremental build watcher for C-like projects
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands (default: watch)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Subcommand to run, `watch` when none was given.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Watch)
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Build once, then rebuild on every change until interrupted
    #[command(visible_alias = "w")]
    Watch,

    /// Build once and exit
    #[command(visible_alias = "b")]
    Build,

    /// Remove cached objects
    Clean {
        /// Only remove objects compiled from this directory (e.g. `src/lib`)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        prefix: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_watch() {
        let cli = Cli::try_parse_from(["ccbuilder"]).unwrap();
        assert_eq!(cli.command(), Commands::Watch);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ccbuilder", "build", "-C", "other.json", "-v"]).unwrap();
        assert_eq!(cli.command(), Commands::Build);
        assert_eq!(cli.config, PathBuf::from("other.json"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_clean_prefix() {
        let cli = Cli::try_parse_from(["ccbuilder", "clean", "src/lib"]).unwrap();
        assert_eq!(
            cli.command(),
            Commands::Clean {
                prefix: Some(PathBuf::from("src/lib"))
            }
        );

        let cli = Cli::try_parse_from(["ccbuilder", "clean"]).unwrap();
        assert_eq!(cli.command(), Commands::Clean { prefix: None });
    }

    #[test]
    fn test_color_choice() {
        let cli = Cli::try_parse_from(["ccbuilder", "--color", "never"]).unwrap();
        assert_eq!(cli.color, ColorChoice::Never);
    }
}
