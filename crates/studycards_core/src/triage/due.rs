//! Due-date parsing and the due-soon window filter.

use crate::model::card::Card;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Look-ahead window used by the card list badge and upcoming-due screen.
pub const DEFAULT_DUE_SOON_HORIZON_DAYS: u32 = 15;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Parses a raw due date.
///
/// Accepted shapes:
/// - RFC 3339 with offset (`2026-10-20T12:00:00Z`).
/// - Naive date-time (`2026-10-20T12:00:00`), read as UTC.
/// - Plain date (`2026-10-20`), read as UTC midnight.
///
/// Returns `None` for anything else.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Returns whether `card` is due within `[now, now + horizon_days]`.
///
/// Both window ends are inclusive. Cards with an unparseable due date are
/// never due soon. Status is not consulted.
pub fn is_due_soon(card: &Card, now: DateTime<Utc>, horizon_days: u32) -> bool {
    let Some(due_at) = parse_due_date(&card.due_date) else {
        return false;
    };
    let delta_ms = (due_at - now).num_milliseconds();
    delta_ms >= 0 && delta_ms <= i64::from(horizon_days) * MS_PER_DAY
}

/// Selects cards due within `horizon_days` of `now`, in input order.
pub fn due_soon(cards: &[Card], now: DateTime<Utc>, horizon_days: u32) -> Vec<&Card> {
    cards
        .iter()
        .filter(|card| is_due_soon(card, now, horizon_days))
        .collect()
}
