//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose card, auth and navigation use-cases to Dart via FRB.
//! - Hold the process-wide session between calls.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported inside response envelopes, never thrown.

use chrono::Utc;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};
use studycards_core::db::open_db;
use studycards_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, parse_card_id,
    ping as ping_inner, AuthProvider, BoardSnapshot, Card, CardDraft,
    CardService, CardStatus, LocalAuthService, NavigationGraph, RepoResult, Session,
    SessionGate, SqliteCardRepository, SqliteUserRepository,
};

const DB_FILE_NAME: &str = "studycards.sqlite3";
const DB_PATH_ENV: &str = "STUDYCARDS_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static NAV_STATE: OnceLock<Mutex<NavState>> = OnceLock::new();

/// Session value and the gate observing it, shared by every FFI call.
struct NavState {
    session: Session,
    gate: SessionGate,
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Card fields as shown by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardItem {
    pub id: String,
    pub title: String,
    /// `backlog|in_progress|done`, or empty when unrecognised.
    pub status: String,
    pub due_date: String,
}

/// Status column with its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    pub status: String,
    pub title: String,
    pub cards: Vec<CardItem>,
}

/// Card list screen payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardResponse {
    pub ok: bool,
    /// Columns in display order.
    pub columns: Vec<BoardColumn>,
    pub due_soon: Vec<CardItem>,
    /// Upcoming-due button label.
    pub due_soon_badge: String,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Affected card or user id.
    pub id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Confirmation dialog content for a pending card deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePromptResponse {
    pub ok: bool,
    pub card_id: String,
    pub title: String,
    pub message: String,
    pub cancel_label: String,
    pub confirm_label: String,
    pub error: String,
}

/// Navigation graph the host should mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResponse {
    /// `blank|authenticated|anonymous`.
    pub graph: String,
    /// Entry route name, `None` while blank.
    pub entry_route: Option<String>,
    pub routes: Vec<String>,
}

/// Returns the navigation graph for the current session.
///
/// The first call also resolves the initial (anonymous) session.
#[flutter_rust_bridge::frb(sync)]
pub fn navigation_state() -> NavigationResponse {
    let mut state = nav_state().lock().unwrap_or_else(PoisonError::into_inner);
    if state.session.loading {
        state.session = Session::anonymous();
    }
    let session = state.session.clone();
    state.gate.observe(&session);
    to_navigation_response(state.gate.current())
}

/// Registers a new account and signs it in.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_register(email: String, password: String) -> ActionResponse {
    match with_auth_service(|auth, _| auth.register(&email, &password)) {
        Ok(Ok(identity)) => {
            ActionResponse::success("Account created.", Some(identity.user_id.to_string()))
        }
        Ok(Err(err)) => ActionResponse::failure(format!("auth_register failed: {err}")),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Signs in with email and password.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_login(email: String, password: String) -> ActionResponse {
    match with_auth_service(|auth, _| auth.login(&email, &password)) {
        Ok(Ok(identity)) => {
            ActionResponse::success("Signed in.", Some(identity.user_id.to_string()))
        }
        Ok(Err(err)) => ActionResponse::failure(format!("auth_login failed: {err}")),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Card list header sign-out.
///
/// Fails without touching the session when no user is signed in.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_logout() -> ActionResponse {
    match with_auth_service(|auth, gate| gate.sign_out(auth)) {
        Ok(Ok(_)) => ActionResponse::success("Signed out.", None),
        Ok(Err(err)) => ActionResponse::failure(format!("auth_logout failed: {err}")),
        Err(err) => ActionResponse::failure(err),
    }
}

/// Creates a card.
///
/// `status` must be `backlog|in_progress|done`.
#[flutter_rust_bridge::frb(sync)]
pub fn card_create(title: String, status: String, due_date: String) -> ActionResponse {
    let Some(status) = CardStatus::parse(&status) else {
        return ActionResponse::failure(format!("card_create failed: unknown status `{status}`"));
    };
    let draft = CardDraft::new(title, status, due_date);
    match with_card_service(|service| service.create_card(&draft)) {
        Ok(card) => ActionResponse::success("Card created.", Some(card.id.to_string())),
        Err(err) => ActionResponse::failure(format!("card_create failed: {err}")),
    }
}

/// Replaces the editable fields of a card.
#[flutter_rust_bridge::frb(sync)]
pub fn card_update(id: String, title: String, status: String, due_date: String) -> ActionResponse {
    let card_id = match parse_card_id(&id) {
        Ok(card_id) => card_id,
        Err(err) => return ActionResponse::failure(format!("card_update failed: {err}")),
    };
    let Some(status) = CardStatus::parse(&status) else {
        return ActionResponse::failure(format!("card_update failed: unknown status `{status}`"));
    };
    let draft = CardDraft::new(title, status, due_date);
    match with_card_service(|service| service.update_card(card_id, &draft)) {
        Ok(card) => ActionResponse::success("Card updated.", Some(card.id.to_string())),
        Err(err) => ActionResponse::failure(format!("card_update failed: {err}")),
    }
}

/// Loads the grouped board and due-soon list at the current time.
#[flutter_rust_bridge::frb(sync)]
pub fn card_list_board() -> BoardResponse {
    match with_card_service(|service| service.board(Utc::now())) {
        Ok(snapshot) => to_board_response(&snapshot),
        Err(err) => BoardResponse {
            ok: false,
            columns: Vec::new(),
            due_soon: Vec::new(),
            due_soon_badge: String::new(),
            message: format!("card_list_board failed: {err}"),
        },
    }
}

/// First step of deletion: returns the confirmation dialog content.
///
/// Nothing is deleted until `card_confirm_delete` is called.
#[flutter_rust_bridge::frb(sync)]
pub fn card_request_delete(id: String) -> DeletePromptResponse {
    let requested = parse_card_id(&id)
        .map_err(|err| err.to_string())
        .and_then(|card_id| {
            with_card_service(|service| {
                let pending = service.request_delete(card_id)?;
                Ok(*pending.prompt())
            })
        });

    match requested {
        Ok(prompt) => DeletePromptResponse {
            ok: true,
            card_id: id.trim().to_string(),
            title: prompt.title.to_string(),
            message: prompt.message.to_string(),
            cancel_label: prompt.cancel_label.to_string(),
            confirm_label: prompt.confirm_label.to_string(),
            error: String::new(),
        },
        Err(err) => DeletePromptResponse {
            ok: false,
            card_id: id.trim().to_string(),
            title: String::new(),
            message: String::new(),
            cancel_label: String::new(),
            confirm_label: String::new(),
            error: format!("card_request_delete failed: {err}"),
        },
    }
}

/// Second step of deletion, called after the user picked the destructive action.
#[flutter_rust_bridge::frb(sync)]
pub fn card_confirm_delete(id: String) -> ActionResponse {
    let card_id = match parse_card_id(&id) {
        Ok(card_id) => card_id,
        Err(err) => return ActionResponse::failure(format!("card_confirm_delete failed: {err}")),
    };
    let deleted = with_card_service(|service| {
        let pending = service.request_delete(card_id)?;
        service.confirm_delete(pending)
    });
    match deleted {
        Ok(()) => ActionResponse::success("Card deleted.", Some(card_id.to_string())),
        Err(err) => ActionResponse::failure(format!("card_confirm_delete failed: {err}")),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn nav_state() -> &'static Mutex<NavState> {
    NAV_STATE.get_or_init(|| {
        Mutex::new(NavState {
            session: Session::loading(),
            gate: SessionGate::new(),
        })
    })
}

fn open_store() -> Result<Connection, String> {
    open_db(resolve_db_path()).map_err(|err| format!("DB open failed: {err}"))
}

fn with_card_service<T>(
    f: impl FnOnce(&CardService<SqliteCardRepository<'_>>) -> RepoResult<T>,
) -> Result<T, String> {
    let conn = open_store()?;
    let service = CardService::new(SqliteCardRepository::new(&conn));
    f(&service).map_err(|err| err.to_string())
}

fn with_auth_service<T>(
    f: impl FnOnce(&mut LocalAuthService<SqliteUserRepository<'_>>, &mut SessionGate) -> T,
) -> Result<T, String> {
    let conn = open_store()?;
    let mut guard = nav_state().lock().unwrap_or_else(PoisonError::into_inner);
    let state = &mut *guard;
    let mut auth =
        LocalAuthService::with_session(SqliteUserRepository::new(&conn), state.session.clone());
    if state.session.loading {
        auth.resolve_initial_session(None)
            .map_err(|err| format!("session restore failed: {err}"))?;
    }
    state.gate.observe(&auth.session());
    let output = f(&mut auth, &mut state.gate);
    state.session = auth.session();
    state.gate.observe(&state.session);
    Ok(output)
}

fn to_card_item(card: &Card) -> CardItem {
    CardItem {
        id: card.id.to_string(),
        title: card.title.clone(),
        status: card
            .status
            .map(|status| status.as_str().to_string())
            .unwrap_or_default(),
        due_date: card.due_date.clone(),
    }
}

fn to_board_response(snapshot: &BoardSnapshot) -> BoardResponse {
    let board = snapshot.board();
    let columns = board
        .sections()
        .iter()
        .map(|section| BoardColumn {
            status: section.status.as_str().to_string(),
            title: section.title.to_string(),
            cards: section.cards.iter().map(|card| to_card_item(card)).collect(),
        })
        .collect();
    BoardResponse {
        ok: true,
        columns,
        due_soon: snapshot
            .due_soon()
            .into_iter()
            .map(to_card_item)
            .collect(),
        due_soon_badge: snapshot.due_soon_badge(),
        message: format!("Loaded {} card(s).", snapshot.cards.len()),
    }
}

fn to_navigation_response(graph: NavigationGraph) -> NavigationResponse {
    NavigationResponse {
        graph: graph.label().to_string(),
        entry_route: graph.entry().map(|screen| screen.route_name().to_string()),
        routes: graph
            .screens()
            .iter()
            .map(|screen| screen.route_name().to_string())
            .collect(),
    }
}
