//! Core domain logic for the study cards app.
//! This crate is the single source of truth for card and session invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod repo;
pub mod service;
pub mod triage;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::card::{parse_card_id, Card, CardDraft, CardId, CardStatus, CardValidationError};
pub use model::session::{Identity, Session, UserId};
pub use navigation::gate::{
    select_navigation_graph, GateTransition, NavigationError, NavigationGraph, SessionGate,
};
pub use navigation::screen::{HeaderAction, Screen};
pub use repo::card_repo::{CardRepository, RepoError, RepoResult, SqliteCardRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRecord, UserRepository};
pub use service::auth_service::{AuthError, AuthProvider, LocalAuthService};
pub use service::card_service::{
    BoardSnapshot, CardService, ConfirmationPrompt, PendingDeletion, DELETE_CARD_PROMPT,
};
pub use triage::board::{group_by_status, BoardSection, CardBoard};
pub use triage::due::{due_soon, parse_due_date, DEFAULT_DUE_SOON_HORIZON_DAYS};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
