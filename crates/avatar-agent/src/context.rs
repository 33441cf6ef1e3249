// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Instructions placed at the top of every conversation prompt.

use avatar_config::model::AgentConfig;
use avatar_memory::prompt::default_instructions;
use tracing::{info, warn};

/// Loads the instructions following config priority: file > inline > default.
///
/// An unreadable or empty file falls through to the next source.
pub async fn load_instructions(config: &AgentConfig) -> String {
    if let Some(path) = &config.system_prompt_file {
        match tokio::fs::read_to_string(path).await {
            Ok(content) if !content.trim().is_empty() => {
                info!(path = path.as_str(), "loaded instructions from file");
                return content.trim().to_string();
            }
            Ok(_) => {
                warn!(path = path.as_str(), "instructions file is empty, falling back");
            }
            Err(e) => {
                warn!(
                    path = path.as_str(),
                    error = %e,
                    "failed to read instructions file, falling back"
                );
            }
        }
    }

    if let Some(prompt) = &config.system_prompt
        && !prompt.trim().is_empty()
    {
        return prompt.trim().to_string();
    }

    default_instructions(&config.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn default_mentions_agent_name() {
        let config = AgentConfig {
            name: "Nova".into(),
            ..AgentConfig::default()
        };
        assert!(load_instructions(&config).await.starts_with("You are Nova,"));
    }

    #[tokio::test]
    async fn inline_prompt_beats_default() {
        let config = AgentConfig {
            system_prompt: Some("  Answer in French.  ".into()),
            ..AgentConfig::default()
        };
        assert_eq!(load_instructions(&config).await, "Answer in French.");
    }

    #[tokio::test]
    async fn file_beats_inline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Answer like a pirate.").unwrap();
        let config = AgentConfig {
            system_prompt: Some("Answer in French.".into()),
            system_prompt_file: Some(file.path().display().to_string()),
            ..AgentConfig::default()
        };
        assert_eq!(load_instructions(&config).await, "Answer like a pirate.");
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_inline() {
        let config = AgentConfig {
            system_prompt: Some("Answer in French.".into()),
            system_prompt_file: Some("/nonexistent/avatar/prompt.txt".into()),
            ..AgentConfig::default()
        };
        assert_eq!(load_instructions(&config).await, "Answer in French.");
    }
}
