//! Session-gated navigation.
//!
//! # Responsibility
//! - Map the current session to exactly one navigation graph.
//! - Expose sign-out from the authenticated graph only.
//!
//! # Invariants
//! - A loading session never yields screens.
//! - Authenticated and anonymous screen sets are disjoint.
//! - The gate only reacts to session values; it never flips its own state.

pub mod gate;
pub mod screen;
