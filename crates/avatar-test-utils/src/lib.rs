// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Avatar integration tests.
//!
//! Provides a scripted [`MockModel`] and a [`TestHarness`] that wires it into
//! a [`SessionManager`](avatar_agent::SessionManager) with one open session.

pub mod harness;
pub mod mock_model;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_model::{MockModel, MockReply};
