use rusqlite::Connection;
use studycards_core::db::migrations::latest_version;
use studycards_core::db::{open_db, open_db_in_memory, DbError};
use studycards_core::{CardRepository, CardStatus, SqliteCardRepository};
use uuid::Uuid;

const CARDS_SCHEMA_V1: &str = include_str!("../src/db/migrations/0001_cards.sql");

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn cards_only_database_is_upgraded_and_keeps_its_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.db");
    let legacy_id = Uuid::new_v4();

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(CARDS_SCHEMA_V1).unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();
    conn.execute(
        "INSERT INTO cards (id, title, status, due_date) VALUES (?1, 'Closures', 'done', '2026-10-20');",
        [legacy_id.to_string()],
    )
    .unwrap();
    drop(conn);

    let upgraded = open_db(&path).unwrap();
    assert_eq!(user_version(&upgraded), latest_version());

    let card = SqliteCardRepository::new(&upgraded)
        .get_card(legacy_id)
        .unwrap()
        .expect("v1 card should survive the upgrade");
    assert_eq!(card.title, "Closures");
    assert_eq!(card.status, Some(CardStatus::Done));

    let users: i64 = upgraded
        .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(users, 0);
}

#[test]
fn users_table_enforces_unique_email() {
    let conn = open_db_in_memory().unwrap();
    let insert = "INSERT INTO users (id, email, password_hash) VALUES (?1, 'ana@example.com', 'hash');";

    conn.execute(insert, [Uuid::new_v4().to_string()]).unwrap();
    let err = conn
        .execute(insert, [Uuid::new_v4().to_string()])
        .unwrap_err();
    assert_eq!(
        err.sqlite_error_code(),
        Some(rusqlite::ErrorCode::ConstraintViolation)
    );
}

#[test]
fn cards_table_defaults_timestamps() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO cards (id, title, status, due_date) VALUES (?1, 'Slices', 'backlog', '2026-11-01');",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();

    let (created_at, updated_at): (i64, i64) = conn
        .query_row("SELECT created_at, updated_at FROM cards;", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert!(created_at > 0);
    assert_eq!(created_at, updated_at);
}

#[test]
fn database_from_a_newer_build_is_refused_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newer.db");
    let newer = latest_version() + 1;

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {newer};"))
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { db_version, .. } if db_version == newer
    ));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(user_version(&conn), newer);
}
