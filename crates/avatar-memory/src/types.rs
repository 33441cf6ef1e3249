// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types for conversation memory.

use serde::{Deserialize, Serialize};

/// Speaker label for user lines in every prompt.
pub const HUMAN_PREFIX: &str = "Human";

/// Speaker label for assistant lines in every prompt.
pub const AI_PREFIX: &str = "AI";

/// One completed exchange. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub input: String,
    pub output: String,
}

impl Turn {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Accumulated knowledge about one named entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEntry {
    pub name: String,
    pub summary: String,
}

impl EntityEntry {
    pub fn new(name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
        }
    }
}

/// The exchange a summary update is based on.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    /// Buffer contents before the current turn is appended.
    pub recent_turns: &'a [Turn],
    pub input: &'a str,
    pub output: &'a str,
}

/// Collapses line breaks and whitespace runs into single spaces.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Renders turns as alternating `Human:`/`AI:` lines.
///
/// Returns an empty string for no turns; otherwise every line, including the
/// last, ends with a newline.
pub fn render_turns(turns: &[Turn]) -> String {
    let mut out = String::new();
    for turn in turns {
        out.push_str(HUMAN_PREFIX);
        out.push_str(": ");
        out.push_str(&turn.input);
        out.push('\n');
        out.push_str(AI_PREFIX);
        out.push_str(": ");
        out.push_str(&turn.output);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_turns_alternates_speakers() {
        let turns = vec![Turn::new("hi", "hello"), Turn::new("bye", "see you")];
        assert_eq!(
            render_turns(&turns),
            "Human: hi\nAI: hello\nHuman: bye\nAI: see you\n"
        );
    }

    #[test]
    fn single_line_collapses_breaks() {
        assert_eq!(single_line("  a\n\n b\t c \r\n"), "a b c");
        assert_eq!(single_line("plain"), "plain");
    }

    #[test]
    fn render_no_turns_is_empty() {
        assert_eq!(render_turns(&[]), "");
    }

    #[test]
    fn turn_serializes_with_field_names() {
        let json = serde_json::to_value(Turn::new("a", "b")).unwrap();
        assert_eq!(json, serde_json::json!({"input": "a", "output": "b"}));
    }
}
