//! Command-line interface for clipscribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Batch voice-clip transcription for speech-synthesis datasets
#[derive(Parser, Debug)]
#[command(
    name = "clipscribe",
    version,
    about = "Batch voice-clip transcription for speech-synthesis datasets"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: print transcripts as they are recorded)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Input directory containing one subdirectory per speaker
    #[arg(long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Output manifest file (appended to, never rewritten)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Whisper model size tag (default: medium). Examples: tiny, small, large-v3
    #[arg(long, value_name = "TAG")]
    pub model: Option<String>,

    /// Active language set: CJE (Chinese+Japanese+English), CJ or C
    #[arg(long, value_name = "SET")]
    pub langs: Option<String>,

    /// Reprocess files already recorded in the manifest
    #[arg(long)]
    pub force: bool,

    /// Prevent automatic model download if the configured model is missing
    #[arg(long)]
    pub no_download: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage Whisper models
    Models {
        /// Action to perform
        #[command(subcommand)]
        action: ModelsAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Model management actions
#[derive(Subcommand, Debug)]
pub enum ModelsAction {
    /// List available models
    List,
    /// Download and install a model
    Install {
        /// Model size tag (e.g. medium, small, large-v3)
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_command() {
        let cli = Cli::try_parse_from(["clipscribe"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.input_dir.is_none());
        assert!(cli.output.is_none());
        assert!(cli.model.is_none());
        assert!(cli.langs.is_none());
        assert!(!cli.force);
        assert!(!cli.no_download);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_run_options() {
        let cli = Cli::try_parse_from([
            "clipscribe",
            "--input-dir",
            "clips",
            "--output",
            "manifest.txt",
            "--model",
            "small",
            "--langs",
            "CJ",
        ])
        .unwrap();

        assert_eq!(cli.input_dir, Some(PathBuf::from("clips")));
        assert_eq!(cli.output, Some(PathBuf::from("manifest.txt")));
        assert_eq!(cli.model.as_deref(), Some("small"));
        assert_eq!(cli.langs.as_deref(), Some("CJ"));
    }

    #[test]
    fn test_parse_force() {
        let cli = Cli::try_parse_from(["clipscribe", "--force"]).unwrap();
        assert!(cli.force);
    }

    #[test]
    fn test_parse_no_download() {
        let cli = Cli::try_parse_from(["clipscribe", "--no-download"]).unwrap();
        assert!(cli.no_download);
    }

    #[test]
    fn test_parse_quiet_short_flag() {
        let cli = Cli::try_parse_from(["clipscribe", "-q"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_verbose_levels() {
        let cli = Cli::try_parse_from(["clipscribe", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        let cli = Cli::try_parse_from(["clipscribe", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_global_config() {
        let cli = Cli::try_parse_from(["clipscribe", "--config", "/path/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/config.toml")));
    }

    #[test]
    fn test_parse_models_list() {
        let cli = Cli::try_parse_from(["clipscribe", "models", "list"]).unwrap();
        match cli.command {
            Some(Commands::Models { action }) => match action {
                ModelsAction::List => {}
                _ => panic!("Expected List action"),
            },
            _ => panic!("Expected Models command"),
        }
    }

    #[test]
    fn test_parse_models_install() {
        let cli = Cli::try_parse_from(["clipscribe", "models", "install", "medium"]).unwrap();
        match cli.command {
            Some(Commands::Models { action }) => match action {
                ModelsAction::Install { name } => assert_eq!(name, "medium"),
                _ => panic!("Expected Install action"),
            },
            _ => panic!("Expected Models command"),
        }
    }

    #[test]
    fn test_models_requires_subcommand() {
        let result = Cli::try_parse_from(["clipscribe", "models"]);
        let err = result.unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn test_models_install_requires_name() {
        let result = Cli::try_parse_from(["clipscribe", "models", "install"]);
        let err = result.unwrap_err();
        let msg = err.to_string();
        assert!(
            msg.contains("required") || msg.contains("name"),
            "Expected missing required argument error, got: {msg}"
        );
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli =
            Cli::try_parse_from(["clipscribe", "models", "list", "--config", "/tmp/c.toml"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_invalid_command_returns_error() {
        let result = Cli::try_parse_from(["clipscribe", "bogus"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_help_flag() {
        let result = Cli::try_parse_from(["clipscribe", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["clipscribe", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
