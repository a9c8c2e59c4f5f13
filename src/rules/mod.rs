//! Table rules: the game state engine and the archive validator.
//!
//! - `GameEngine` applies intents as pure snapshot transitions and owns
//!   every cross-slot rule (death derivation, exclusive toggles, synced
//!   switches).
//! - `validate_for_archive` decides whether a finished session may be
//!   recorded.

pub mod engine;
pub mod validator;

pub use engine::GameEngine;
pub use validator::{validate_for_archive, RejectReason};
