// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity memory for Avatar conversations.
//!
//! A session keeps the last K turns verbatim in a [`TurnBuffer`] and a
//! rolling summary per named entity in an [`EntityStore`]. Each turn the
//! [`EntityExtractor`] names the entities in the new input, the
//! [`PromptAssembler`] folds their summaries and the recent turns into one
//! prompt, and after the reply the [`SummaryUpdater`] rewrites each
//! entity's summary.

pub mod buffer;
pub mod extractor;
pub mod prompt;
pub mod store;
pub mod summarizer;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use buffer::TurnBuffer;
pub use extractor::EntityExtractor;
pub use prompt::PromptAssembler;
pub use store::EntityStore;
pub use summarizer::SummaryUpdater;
pub use types::{EntityEntry, Turn, TurnContext, render_turns, single_line};
