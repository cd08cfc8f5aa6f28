//! Card use-case service.
//!
//! # Responsibility
//! - Create, edit and list cards through a repository.
//! - Build board snapshots for the list and upcoming-due screens.
//! - Guard deletion behind an explicit confirmation step.
//!
//! # Invariants
//! - Deletion only happens through `confirm_delete(PendingDeletion)`.
//! - A cancelled `PendingDeletion` never touches the repository.

use crate::model::card::{Card, CardDraft, CardId};
use crate::repo::card_repo::{CardRepository, RepoError, RepoResult};
use crate::triage::board::{group_by_status, CardBoard};
use crate::triage::due::{due_soon, DEFAULT_DUE_SOON_HORIZON_DAYS};
use chrono::{DateTime, Utc};
use log::info;

/// Yes/no prompt shown before a destructive card action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub title: &'static str,
    pub message: &'static str,
    pub cancel_label: &'static str,
    pub confirm_label: &'static str,
}

pub const DELETE_CARD_PROMPT: ConfirmationPrompt = ConfirmationPrompt {
    title: "Excluir Cartão",
    message: "Tem certeza que deseja excluir este cartão?",
    cancel_label: "Cancelar",
    confirm_label: "Excluir",
};

/// A deletion awaiting the user's answer.
///
/// Only `CardService::request_delete` creates one; it is consumed by either
/// `CardService::confirm_delete` or `cancel`.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending deletion must be confirmed or cancelled"]
pub struct PendingDeletion {
    card_id: CardId,
    prompt: ConfirmationPrompt,
}

impl PendingDeletion {
    pub fn card_id(&self) -> CardId {
        self.card_id
    }

    pub fn prompt(&self) -> &ConfirmationPrompt {
        &self.prompt
    }

    /// Drops the request. The collection is left untouched.
    pub fn cancel(self) {
        info!(
            "event=card_delete_cancel module=service status=ok card_id={}",
            self.card_id
        );
    }
}

/// Cards read at one instant, with triage views over them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub cards: Vec<Card>,
    pub now: DateTime<Utc>,
    pub horizon_days: u32,
}

impl BoardSnapshot {
    pub fn board(&self) -> CardBoard<'_> {
        group_by_status(&self.cards)
    }

    pub fn due_soon(&self) -> Vec<&Card> {
        due_soon(&self.cards, self.now, self.horizon_days)
    }

    /// Label of the upcoming-due button on the card list.
    pub fn due_soon_badge(&self) -> String {
        format!("Tarefas a Vencer: {}", self.due_soon().len())
    }
}

/// Use-case service wrapper for card operations.
pub struct CardService<R: CardRepository> {
    repo: R,
}

impl<R: CardRepository> CardService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a card from user input and returns the stored record.
    pub fn create_card(&self, draft: &CardDraft) -> RepoResult<Card> {
        let (title, due_date) = draft.validate()?;
        let card = Card::new(title, draft.status, due_date);
        self.repo.create_card(&card)?;
        info!(
            "event=card_create module=service status=ok card_id={} card_status={}",
            card.id, draft.status
        );
        Ok(card)
    }

    /// Replaces title, status and due date of an existing card.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist.
    /// - `Validation` when the draft is invalid.
    pub fn update_card(&self, id: CardId, draft: &CardDraft) -> RepoResult<Card> {
        let (title, due_date) = draft.validate()?;
        let mut card = self.repo.get_card(id)?.ok_or(RepoError::NotFound(id))?;
        card.title = title;
        card.status = Some(draft.status);
        card.due_date = due_date;
        self.repo.update_card(&card)?;
        info!(
            "event=card_update module=service status=ok card_id={} card_status={}",
            card.id, draft.status
        );
        Ok(card)
    }

    pub fn get_card(&self, id: CardId) -> RepoResult<Option<Card>> {
        self.repo.get_card(id)
    }

    pub fn list_cards(&self) -> RepoResult<Vec<Card>> {
        self.repo.list_cards()
    }

    /// Reads all cards and wraps them with the default due-soon horizon.
    pub fn board(&self, now: DateTime<Utc>) -> RepoResult<BoardSnapshot> {
        Ok(BoardSnapshot {
            cards: self.repo.list_cards()?,
            now,
            horizon_days: DEFAULT_DUE_SOON_HORIZON_DAYS,
        })
    }

    /// Starts the delete flow for `id`.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist.
    pub fn request_delete(&self, id: CardId) -> RepoResult<PendingDeletion> {
        if self.repo.get_card(id)?.is_none() {
            return Err(RepoError::NotFound(id));
        }
        info!("event=card_delete_request module=service status=ok card_id={id}");
        Ok(PendingDeletion {
            card_id: id,
            prompt: DELETE_CARD_PROMPT,
        })
    }

    /// Performs a confirmed deletion. Irreversible.
    pub fn confirm_delete(&self, pending: PendingDeletion) -> RepoResult<()> {
        self.repo.delete_card(pending.card_id)?;
        info!(
            "event=card_delete module=service status=ok card_id={}",
            pending.card_id
        );
        Ok(())
    }
}
