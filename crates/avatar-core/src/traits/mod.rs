// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the language-model service boundary.

pub mod model;

pub use model::LanguageModel;
