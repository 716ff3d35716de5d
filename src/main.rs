use anyhow::Result;
use clap::{CommandFactory, Parser};
use clipscribe::app::run_annotate_command;
use clipscribe::cli::{Cli, Commands, ModelsAction};
use clipscribe::config::Config;
use clipscribe::models::catalog::list_models;
use clipscribe::models::download::{download_model, format_model_info};
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref())?;
            let input_dir = require_arg(cli.input_dir, "--input-dir");
            let output = require_arg(cli.output, "--output");

            if let Err(e) = run_annotate_command(
                config,
                &input_dir,
                &output,
                cli.model,
                cli.langs,
                cli.force,
                cli.quiet,
                cli.verbose,
                cli.no_download,
            )
            .await
            {
                eprintln!("{}", format!("Error: {}", e).red());
                std::process::exit(1);
            }
        }
        Some(Commands::Models { action }) => {
            handle_models_command(action).await?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "clipscribe",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Resolve a required run argument or exit with a usage error.
fn require_arg(value: Option<PathBuf>, flag: &str) -> PathBuf {
    match value {
        Some(v) => v,
        None => {
            eprintln!("{}", format!("Error: {} is required", flag).red());
            eprintln!("Usage: clipscribe --input-dir <DIR> --output <FILE>");
            std::process::exit(1);
        }
    }
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/clipscribe/config.toml)
/// 3. Built-in defaults with environment variable overrides
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

/// Handle model management commands.
async fn handle_models_command(action: ModelsAction) -> Result<()> {
    match action {
        ModelsAction::List => {
            println!("Available models:");
            for model in list_models() {
                println!("  {}", format_model_info(model));
            }
        }
        ModelsAction::Install { name } => {
            let path = download_model(&name, true).await?;
            println!("{}", format!("Model '{}' installed successfully", name).green());
            println!("Location: {}", path.display());
        }
    }
    Ok(())
}
