// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `avatar shell` command implementation.
//!
//! Interactive REPL with colored prompt and readline history. Plain lines are
//! conversation turns; lines starting with `/` are shell commands.

use std::collections::BTreeMap;
use std::sync::Arc;

use avatar_agent::transcript::{download_text, exchange_lines};
use avatar_agent::{ManagerSettings, SessionConfig, SessionManager, Transcript, load_instructions};
use avatar_config::AvatarConfig;
use avatar_core::{AvatarError, LanguageModel, SessionId};
use avatar_memory::Turn;
use avatar_openai::{API_KEY_ENV, OpenAiModel};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

/// A line typed at the shell prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Say(String),
    New,
    Store,
    Buffer,
    History,
    Sessions,
    ClearSessions,
    /// Target path, and whether to write JSON instead of plain text.
    Download { path: String, json: bool },
    Help,
    Quit,
    Unknown(String),
}

impl ShellCommand {
    /// Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if !line.starts_with('/') {
            return Some(Self::Say(line.to_string()));
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };
        Some(match name {
            "/new" => Self::New,
            "/store" => Self::Store,
            "/buffer" => Self::Buffer,
            "/history" => Self::History,
            "/sessions" => Self::Sessions,
            "/clear-sessions" => Self::ClearSessions,
            "/download" => match arg.strip_prefix("--json") {
                Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                    Self::Download {
                        path: rest.trim().to_string(),
                        json: true,
                    }
                }
                _ => Self::Download {
                    path: arg.to_string(),
                    json: false,
                },
            },
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        })
    }
}

const HELP: &str = "\
/new              start a new conversation (the current one is archived)
/store            show what is remembered about each entity
/buffer           show the recent turns sent verbatim to the model
/history          show the current conversation, newest first
/sessions         show archived conversations
/clear-sessions   forget archived conversations
/download <path>  write the current conversation to a text file
/download --json <path>
                  write it as JSON with the session id and timestamp
/help             show this help
/quit             leave the shell";

/// Runs the `avatar shell` interactive REPL.
pub async fn run_shell(config: AvatarConfig) -> Result<(), AvatarError> {
    let model = Arc::new(OpenAiModel::from_config(&config.openai)?);
    model.validate_credentials().inspect_err(|_| {
        eprintln!(
            "error: an OpenAI API key is required. Set openai.api_key in avatar.toml or the {API_KEY_ENV} environment variable."
        );
    })?;
    let instructions = load_instructions(&config.agent).await;
    let manager = SessionManager::new(model, ManagerSettings::from_config(&config, instructions));

    let session = manager
        .start_session(SessionConfig::from_config(&config))
        .await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| AvatarError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "avatar shell".bold().green());
    println!(
        "model {} · remembering the last {} turns",
        config.openai.default_model.cyan(),
        config.memory.recency_window
    );
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());

    let prompt = format!("{}> ", "you".green());
    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };
        let Some(command) = ShellCommand::parse(&line) else {
            continue;
        };
        let _ = rl.add_history_entry(line.trim());

        if command == ShellCommand::Quit {
            break;
        }
        if let Err(e) = handle_command(&manager, &session, command).await {
            eprintln!("{}: {e}", "error".red());
        }
    }

    manager.end_session(&session).await?;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

async fn handle_command(
    manager: &SessionManager,
    session: &SessionId,
    command: ShellCommand,
) -> Result<(), AvatarError> {
    match command {
        ShellCommand::Say(input) => {
            let reply = manager.submit_turn(session, &input).await?;
            println!("{} {reply}\n", "avatar>".blue().bold());
        }
        ShellCommand::New => {
            let transcript = manager.reset_session(session).await?;
            info!(session_id = %session, archived_turns = transcript.len(), "conversation reset");
            println!("{}", format!("new conversation ({} turns archived)", transcript.len()).dimmed());
        }
        ShellCommand::Store => print_store(&manager.inspect_store(session).await?),
        ShellCommand::Buffer => print_turns(&manager.inspect_buffer(session).await?),
        ShellCommand::History => {
            let turns = manager.inspect_transcript(session).await?;
            print_lines(&exchange_lines(&turns, "User:", "Bot:"));
        }
        ShellCommand::Sessions => print_archive(&manager.archived_sessions().await),
        ShellCommand::ClearSessions => {
            manager.clear_archive().await;
            println!("{}", "archived conversations cleared".dimmed());
        }
        ShellCommand::Download { path, json } => {
            if path.is_empty() {
                return Err(AvatarError::InvalidInput(
                    "usage: /download [--json] <path>".to_string(),
                ));
            }
            let turns = manager.inspect_transcript(session).await?;
            let contents = if json {
                Transcript::capture(session.clone(), turns.clone()).to_json()?
            } else {
                download_text(&turns)
            };
            tokio::fs::write(&path, contents)
                .await
                .map_err(|e| AvatarError::Internal(format!("failed to write {path}: {e}")))?;
            println!("{}", format!("wrote {} turns to {path}", turns.len()).dimmed());
        }
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Unknown(name) => {
            println!("unknown command {}, try {}", name.yellow(), "/help".yellow());
        }
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn print_store(entities: &BTreeMap<String, String>) {
    if entities.is_empty() {
        println!("{}", "(no entities yet)".dimmed());
        return;
    }
    for (name, summary) in entities {
        println!("{}: {summary}", name.bold());
    }
}

fn print_turns(turns: &[Turn]) {
    if turns.is_empty() {
        println!("{}", "(buffer is empty)".dimmed());
        return;
    }
    for turn in turns {
        println!("{} {}", "Human:".green(), turn.input);
        println!("{} {}", "AI:".blue(), turn.output);
    }
}

fn print_lines(lines: &[String]) {
    if lines.is_empty() {
        println!("{}", "(nothing yet)".dimmed());
    }
    for line in lines {
        println!("{line}");
    }
}

fn render_archive(archive: &[Transcript]) -> Vec<String> {
    archive
        .iter()
        .enumerate()
        .flat_map(|(i, transcript)| {
            std::iter::once(format!("Conversation-Session:{i}")).chain(transcript.archive_lines())
        })
        .collect()
}

fn print_archive(archive: &[Transcript]) {
    if archive.is_empty() {
        println!("{}", "(no archived conversations)".dimmed());
        return;
    }
    for line in render_archive(archive) {
        if line.starts_with("Conversation-Session:") {
            println!("{}", line.bold());
        } else {
            println!("{line}");
        }
    }
}
