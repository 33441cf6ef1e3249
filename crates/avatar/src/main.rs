// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Avatar - a conversational assistant with entity memory.
//!
//! This is the binary entry point.

mod shell;

use std::path::PathBuf;

use avatar_config::AvatarConfig;
use clap::{Parser, Subcommand};
use colored::Colorize;

/// Avatar - a conversational assistant that remembers the people, places and
/// things you talk about.
#[derive(Parser, Debug)]
#[command(name = "avatar", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Model used for the conversation (overrides openai.default_model).
    #[arg(long, global = true, value_name = "ID")]
    model: Option<String>,

    /// Number of recent turns kept verbatim (overrides memory.recency_window).
    #[arg(long, global = true, value_name = "K")]
    window: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive conversation (default).
    Shell,
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => avatar_config::load_and_validate_path(path),
        None => avatar_config::load_and_validate(),
    };
    let config = match loaded.and_then(|config| apply_overrides(config, &cli)) {
        Ok(config) => config,
        Err(errors) => {
            avatar_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            if let Err(e) = shell::run_shell(config).await {
                eprintln!("{}: {e}", "error".red());
                std::process::exit(1);
            }
        }
        Commands::Config => match config.to_redacted_toml() {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("{}: failed to render config: {e}", "error".red());
                std::process::exit(1);
            }
        },
    }
}

/// Applies command-line overrides and re-validates the result.
fn apply_overrides(
    mut config: AvatarConfig,
    cli: &Cli,
) -> Result<AvatarConfig, Vec<avatar_config::ConfigError>> {
    if let Some(model) = &cli.model {
        config.openai.default_model = model.clone();
    }
    if let Some(window) = cli.window {
        config.memory.recency_window = window;
    }
    avatar_config::validation::validate_config(&config)?;
    Ok(config)
}

/// Installs the global fmt subscriber. `RUST_LOG` wins over the config level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("avatar={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_is_the_default_command() {
        let cli = Cli::try_parse_from(["avatar"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::try_parse_from(["avatar", "--model", "text-davinci-003", "--window", "5"]).unwrap();
        let config = apply_overrides(AvatarConfig::default(), &cli).unwrap();
        assert_eq!(config.openai.default_model, "text-davinci-003");
        assert_eq!(config.memory.recency_window, 5);
    }

    #[test]
    fn zero_window_override_is_rejected() {
        let cli = Cli::try_parse_from(["avatar", "shell", "--window", "0"]).unwrap();
        assert!(apply_overrides(AvatarConfig::default(), &cli).is_err());
    }

    #[test]
    fn config_subcommand_parses() {
        let cli = Cli::try_parse_from(["avatar", "config"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config)));
    }
}
