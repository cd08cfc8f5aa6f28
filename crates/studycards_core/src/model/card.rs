//! Card domain model.
//!
//! # Responsibility
//! - Define the study card record shared by board, due-soon and edit views.
//! - Validate write-side invariants before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another card.
//! - `title` is never blank on write paths.
//! - `status == None` only for data written by an older or foreign client.

use crate::triage::due::parse_due_date;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a study card.
pub type CardId = Uuid;

/// Workflow column of a study card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    /// Planned, not started.
    Backlog,
    /// Currently being studied.
    InProgress,
    /// Finished.
    Done,
}

impl CardStatus {
    /// Stable string id used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Parses a stored status string. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "backlog" => Some(Self::Backlog),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl Display for CardStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for card write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    NilId,
    InvalidId(String),
    EmptyTitle,
    MissingStatus,
    InvalidDueDate(String),
}

impl Display for CardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "card id must not be nil"),
            Self::InvalidId(value) => write!(f, "invalid card id `{value}`"),
            Self::EmptyTitle => write!(f, "card title must not be empty"),
            Self::MissingStatus => write!(f, "card status must be backlog|in_progress|done"),
            Self::InvalidDueDate(value) => write!(f, "invalid due date `{value}`"),
        }
    }
}

impl Error for CardValidationError {}

/// Study card record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    /// `None` when the stored status string is not recognised.
    #[serde(deserialize_with = "deserialize_lenient_status")]
    pub status: Option<CardStatus>,
    /// Raw due date as supplied by the host; see `parse_due_date`.
    pub due_date: String,
}

impl Card {
    /// Creates a card with a freshly generated id.
    pub fn new(title: impl Into<String>, status: CardStatus, due_date: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            status: Some(status),
            due_date: due_date.into(),
        }
    }

    /// Checks the invariants enforced before any write.
    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.id.is_nil() {
            return Err(CardValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(CardValidationError::EmptyTitle);
        }
        if self.status.is_none() {
            return Err(CardValidationError::MissingStatus);
        }
        Ok(())
    }
}

/// User-editable card fields, used by create and edit flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub title: String,
    pub status: CardStatus,
    pub due_date: String,
}

impl CardDraft {
    pub fn new(title: impl Into<String>, status: CardStatus, due_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status,
            due_date: due_date.into(),
        }
    }

    /// Validates the draft and returns the normalized title and due date.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `InvalidDueDate` when the due date does not parse.
    pub fn validate(&self) -> Result<(String, String), CardValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CardValidationError::EmptyTitle);
        }
        let due_date = self.due_date.trim();
        if parse_due_date(due_date).is_none() {
            return Err(CardValidationError::InvalidDueDate(due_date.to_string()));
        }
        Ok((title.to_string(), due_date.to_string()))
    }
}

/// Parses a card id received from the UI host.
pub fn parse_card_id(raw: &str) -> Result<CardId, CardValidationError> {
    let value = raw.trim();
    match Uuid::parse_str(value) {
        Ok(id) if !id.is_nil() => Ok(id),
        Ok(_) => Err(CardValidationError::NilId),
        Err(_) => Err(CardValidationError::InvalidId(value.to_string())),
    }
}

fn deserialize_lenient_status<'de, D>(deserializer: D) -> Result<Option<CardStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(CardStatus::parse))
}
