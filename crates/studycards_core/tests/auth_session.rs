use studycards_core::db::open_db_in_memory;
use studycards_core::{
    select_navigation_graph, AuthError, AuthProvider, LocalAuthService, NavigationGraph, Screen,
    SessionGate, SqliteUserRepository,
};
use uuid::Uuid;

#[test]
fn provider_starts_loading_and_gate_stays_blank() {
    let conn = open_db_in_memory().unwrap();
    let mut auth = LocalAuthService::new(SqliteUserRepository::new(&conn));

    assert!(auth.session().loading);
    assert_eq!(
        select_navigation_graph(&auth.session()),
        NavigationGraph::Blank
    );
    let err = auth.login("ana@example.com", "secret1").unwrap_err();
    assert!(matches!(err, AuthError::StillLoading));
}

#[test]
fn register_login_logout_drive_the_gate() {
    let conn = open_db_in_memory().unwrap();
    let mut auth = LocalAuthService::new(SqliteUserRepository::new(&conn));
    let mut gate = SessionGate::new();

    auth.resolve_initial_session(None).unwrap();
    gate.observe(&auth.session());
    assert_eq!(gate.current().entry(), Some(Screen::Login));

    let identity = auth.register("Ana@Example.com", "secret1").unwrap();
    assert_eq!(identity.email, "ana@example.com");
    gate.observe(&auth.session());
    assert_eq!(gate.current().entry(), Some(Screen::CardList));

    gate.sign_out(&mut auth).unwrap();
    assert!(auth.session().user.is_none());
    assert_eq!(
        gate.current(),
        NavigationGraph::Anonymous {
            entry: Screen::Login
        }
    );

    let again = auth.login("ana@example.com", "secret1").unwrap();
    assert_eq!(again.user_id, identity.user_id);
    gate.observe(&auth.session());
    assert!(gate.current().contains(Screen::UpcomingDue));
}

#[test]
fn wrong_password_leaves_session_anonymous() {
    let conn = open_db_in_memory().unwrap();
    let mut auth = LocalAuthService::new(SqliteUserRepository::new(&conn));
    auth.resolve_initial_session(None).unwrap();
    auth.register("bia@example.com", "secret1").unwrap();
    auth.logout();

    let err = auth.login("bia@example.com", "not-it").unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(auth.session().user.is_none());

    let err = auth.login("nobody@example.com", "secret1").unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[test]
fn register_rejects_bad_input_and_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let mut auth = LocalAuthService::new(SqliteUserRepository::new(&conn));
    auth.resolve_initial_session(None).unwrap();

    assert!(matches!(
        auth.register("not-an-email", "secret1"),
        Err(AuthError::InvalidEmail)
    ));
    assert!(matches!(
        auth.register("cris@example.com", "123"),
        Err(AuthError::WeakPassword { min_chars: 6 })
    ));

    auth.register("cris@example.com", "secret1").unwrap();
    auth.logout();
    assert!(matches!(
        auth.register("CRIS@example.com", "another1"),
        Err(AuthError::EmailTaken)
    ));
}

#[test]
fn stored_password_is_hashed() {
    let conn = open_db_in_memory().unwrap();
    let mut auth = LocalAuthService::new(SqliteUserRepository::new(&conn));
    auth.resolve_initial_session(None).unwrap();
    auth.register("dani@example.com", "secret1").unwrap();

    let stored: String = conn
        .query_row(
            "SELECT password_hash FROM users WHERE email = 'dani@example.com';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_ne!(stored, "secret1");
    assert!(stored.starts_with("$argon2"));
}

#[test]
fn remembered_user_is_restored_only_if_present() {
    let conn = open_db_in_memory().unwrap();
    let mut auth = LocalAuthService::new(SqliteUserRepository::new(&conn));
    auth.resolve_initial_session(None).unwrap();
    let identity = auth.register("eva@example.com", "secret1").unwrap();

    let mut restored = LocalAuthService::new(SqliteUserRepository::new(&conn));
    restored
        .resolve_initial_session(Some(identity.user_id))
        .unwrap();
    assert_eq!(restored.session().user, Some(identity));

    let mut stale = LocalAuthService::new(SqliteUserRepository::new(&conn));
    stale.resolve_initial_session(Some(Uuid::new_v4())).unwrap();
    let session = stale.session();
    assert!(!session.loading);
    assert!(session.user.is_none());
}

#[test]
fn failed_login_while_signed_in_ends_the_current_session() {
    let conn = open_db_in_memory().unwrap();
    let mut auth = LocalAuthService::new(SqliteUserRepository::new(&conn));
    let mut gate = SessionGate::new();
    auth.resolve_initial_session(None).unwrap();
    auth.register("fabi@example.com", "secret1").unwrap();
    gate.observe(&auth.session());
    assert_eq!(gate.current().entry(), Some(Screen::CardList));

    let err = auth.login("fabi@example.com", "wrong-one").unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(auth.session().user.is_none());

    let transition = gate
        .observe(&auth.session())
        .expect("gate should leave the authenticated graph");
    assert_eq!(
        transition.to,
        NavigationGraph::Anonymous {
            entry: Screen::Login
        }
    );
}
