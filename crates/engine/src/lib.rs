//! ClassQuest engine library.
//!
//! Orchestrates the progression and territory-contest rules from
//! `classquest-domain` over storage and task-generation ports.
//!
//! ## Structure
//!
//! - `infrastructure/` - port traits and the adapters the engine owns
//!   (clock, randomness, per-region locks)
//! - `use_cases/` - the player-facing operations
//! - `app` - application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures module for integration testing.
#[cfg(test)]
pub mod test_fixtures;

pub use app::{App, Repositories, UseCases};
