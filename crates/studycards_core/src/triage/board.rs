//! Status grouping for the card list screen.

use crate::model::card::{Card, CardStatus};

/// Cards partitioned by status, each column in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardBoard<'a> {
    pub backlog: Vec<&'a Card>,
    pub in_progress: Vec<&'a Card>,
    pub done: Vec<&'a Card>,
}

/// One titled board column in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSection<'b, 'a> {
    pub status: CardStatus,
    pub title: &'static str,
    pub cards: &'b [&'a Card],
}

impl<'a> CardBoard<'a> {
    /// Returns the column for `status`.
    pub fn column(&self, status: CardStatus) -> &[&'a Card] {
        match status {
            CardStatus::Backlog => &self.backlog,
            CardStatus::InProgress => &self.in_progress,
            CardStatus::Done => &self.done,
        }
    }

    /// Columns in list-screen order: in progress, done, backlog.
    pub fn sections(&self) -> [BoardSection<'_, 'a>; 3] {
        [CardStatus::InProgress, CardStatus::Done, CardStatus::Backlog].map(|status| {
            BoardSection {
                status,
                title: section_title(status),
                cards: self.column(status),
            }
        })
    }

    /// Number of classified cards.
    pub fn len(&self) -> usize {
        self.backlog.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Header shown above a status column.
pub fn section_title(status: CardStatus) -> &'static str {
    match status {
        CardStatus::InProgress => "Em Progresso",
        CardStatus::Done => "Concluído",
        CardStatus::Backlog => "Backlog",
    }
}

/// Partitions `cards` by status.
///
/// Cards whose status is unrecognised (`None`) land in no column.
pub fn group_by_status(cards: &[Card]) -> CardBoard<'_> {
    let mut board = CardBoard::default();
    for card in cards {
        match card.status {
            Some(CardStatus::Backlog) => board.backlog.push(card),
            Some(CardStatus::InProgress) => board.in_progress.push(card),
            Some(CardStatus::Done) => board.done.push(card),
            None => {}
        }
    }
    board
}
