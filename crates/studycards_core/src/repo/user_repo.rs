//! User account repository for local email/password auth.
//!
//! # Invariants
//! - Emails are stored normalized (trimmed, lowercase) and unique.
//! - Only password hashes are stored.

use crate::model::session::UserId;
use crate::repo::card_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use uuid::Uuid;

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// Repository interface for user accounts.
pub trait UserRepository {
    /// Inserts a user. Returns `Ok(false)` when the email is already taken.
    fn insert_user(&self, user: &UserRecord) -> RepoResult<bool>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>>;
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn find_one(&self, column: &str, value: String) -> RepoResult<Option<UserRecord>> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT id, email, password_hash FROM users WHERE {column} = ?1;"),
                [value],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        raw.map(|(id_text, email, password_hash)| {
            let id = Uuid::parse_str(&id_text).map_err(|_| {
                RepoError::InvalidData(format!("invalid uuid value `{id_text}` in users.id"))
            })?;
            Ok(UserRecord {
                id,
                email,
                password_hash,
            })
        })
        .transpose()
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user(&self, user: &UserRecord) -> RepoResult<bool> {
        let result = self.conn.execute(
            "INSERT INTO users (id, email, password_hash) VALUES (?1, ?2, ?3);",
            params![
                user.id.to_string(),
                user.email.as_str(),
                user.password_hash.as_str()
            ],
        );

        match result {
            Ok(_) => Ok(true),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRecord>> {
        self.find_one("email", email.to_string())
    }

    fn find_by_id(&self, id: UserId) -> RepoResult<Option<UserRecord>> {
        self.find_one("id", id.to_string())
    }
}
