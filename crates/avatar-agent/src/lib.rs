// SPDX-FileCopyrightText: 2026 Avatar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestration for Avatar.
//!
//! A [`Session`] drives one conversation turn by turn over entity memory. The
//! [`SessionManager`] owns many sessions, serializes turns within each one,
//! and keeps the archive of conversations that were reset.

pub mod context;
pub mod guard;
pub mod manager;
pub mod session;
pub mod transcript;

pub use context::load_instructions;
pub use guard::TimeoutModel;
pub use manager::{ManagerSettings, SessionConfig, SessionManager};
pub use session::{Session, SessionSettings, SessionState};
pub use transcript::Transcript;
