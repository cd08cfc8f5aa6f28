//! Domain model for study cards and authentication sessions.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep wire names stable for the UI host and persistence layer.
//!
//! # Invariants
//! - Every card is identified by a stable, non-nil `CardId`.
//! - Card status is a closed enum; unknown stored values surface as `None`.

pub mod card;
pub mod session;
