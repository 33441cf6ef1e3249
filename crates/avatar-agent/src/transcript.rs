// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Archived conversations.

use avatar_core::{AvatarError, SessionId};
use avatar_memory::Turn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every turn of one conversation, captured when the session was reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub session_id: SessionId,
    pub archived_at: DateTime<Utc>,
    /// Oldest first.
    pub turns: Vec<Turn>,
}

impl Transcript {
    /// Captures `turns` as of now.
    pub fn capture(session_id: SessionId, turns: Vec<Turn>) -> Self {
        Self {
            session_id,
            archived_at: Utc::now(),
            turns,
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// `User:`/`Bot:` lines, newest exchange first.
    pub fn archive_lines(&self) -> Vec<String> {
        exchange_lines(&self.turns, "User:", "Bot:")
    }

    /// Plain-text download: newest exchange first, input and output on
    /// alternating lines.
    pub fn download_text(&self) -> String {
        download_text(&self.turns)
    }

    pub fn to_json(&self) -> Result<String, AvatarError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AvatarError::Internal(format!("failed to serialize transcript: {e}")))
    }
}

/// Renders turns newest first with the given labels.
pub fn exchange_lines(turns: &[Turn], user_label: &str, bot_label: &str) -> Vec<String> {
    turns
        .iter()
        .rev()
        .flat_map(|turn| {
            [
                format!("{user_label}{}", turn.input),
                format!("{bot_label}{}", turn.output),
            ]
        })
        .collect()
}

/// Newest exchange first, one line per message, no labels.
pub fn download_text(turns: &[Turn]) -> String {
    turns
        .iter()
        .rev()
        .flat_map(|turn| [turn.input.as_str(), turn.output.as_str()])
        .collect::<Vec<_>>()
        .join("\n")
}
