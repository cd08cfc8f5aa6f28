//! Read-only card triage.
//!
//! # Responsibility
//! - Partition a card snapshot into status columns.
//! - Select cards whose due date falls inside a look-ahead window.
//!
//! # Invariants
//! - Every function here is pure: no I/O, no mutation of input.
//! - Output order always follows input order (stable filters).

pub mod board;
pub mod due;
