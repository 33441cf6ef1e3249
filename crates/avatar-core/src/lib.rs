// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core trait definitions, error types, and common types for Avatar.
//!
//! Every other crate in the workspace talks to the language model through
//! the [`LanguageModel`] trait defined here and reports failures with
//! [`AvatarError`].

pub mod error;
pub mod traits;
pub mod types;

pub use error::AvatarError;
pub use traits::LanguageModel;
pub use types::{CallPurpose, CompletionRequest, CompletionResponse, SessionId, TokenUsage};
