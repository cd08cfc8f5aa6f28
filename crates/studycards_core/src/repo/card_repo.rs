//! Card repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `Card::validate()` before SQL mutations.
//! - Unrecognised stored status strings are read back as `None`, not
//!   rejected, so one bad row never hides the rest of the board.

use crate::db::DbError;
use crate::model::card::{Card, CardId, CardStatus, CardValidationError};
use log::warn;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CARD_SELECT_SQL: &str = "SELECT id, title, status, due_date FROM cards";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(CardValidationError),
    Db(DbError),
    NotFound(Uuid),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<CardValidationError> for RepoError {
    fn from(value: CardValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for card CRUD operations.
pub trait CardRepository {
    fn create_card(&self, card: &Card) -> RepoResult<CardId>;
    fn update_card(&self, card: &Card) -> RepoResult<()>;
    fn get_card(&self, id: CardId) -> RepoResult<Option<Card>>;
    /// Lists every card in creation order.
    fn list_cards(&self) -> RepoResult<Vec<Card>>;
    /// Hard-deletes one card.
    fn delete_card(&self, id: CardId) -> RepoResult<()>;
}

/// SQLite-backed card repository.
pub struct SqliteCardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCardRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CardRepository for SqliteCardRepository<'_> {
    fn create_card(&self, card: &Card) -> RepoResult<CardId> {
        card.validate()?;

        self.conn.execute(
            "INSERT INTO cards (id, title, status, due_date) VALUES (?1, ?2, ?3, ?4);",
            params![
                card.id.to_string(),
                card.title.as_str(),
                card.status.map(CardStatus::as_str),
                card.due_date.as_str(),
            ],
        )?;

        Ok(card.id)
    }

    fn update_card(&self, card: &Card) -> RepoResult<()> {
        card.validate()?;

        let changed = self.conn.execute(
            "UPDATE cards
             SET
                title = ?1,
                status = ?2,
                due_date = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                card.title.as_str(),
                card.status.map(CardStatus::as_str),
                card.due_date.as_str(),
                card.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(card.id));
        }

        Ok(())
    }

    fn get_card(&self, id: CardId) -> RepoResult<Option<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_card_row(row)?));
        }
        Ok(None)
    }

    fn list_cards(&self) -> RepoResult<Vec<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();

        while let Some(row) = rows.next()? {
            cards.push(parse_card_row(row)?);
        }

        Ok(cards)
    }

    fn delete_card(&self, id: CardId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM cards WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_card_row(row: &Row<'_>) -> RepoResult<Card> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in cards.id"))
    })?;

    let status_text: String = row.get("status")?;
    let status = CardStatus::parse(&status_text);
    if status.is_none() {
        warn!("event=card_read module=repo status=degraded reason=unknown_status card_id={id}");
    }

    Ok(Card {
        id,
        title: row.get("title")?,
        status,
        due_date: row.get("due_date")?,
    })
}
