use studycards_core::db::open_db_in_memory;
use studycards_core::{
    Card, CardDraft, CardRepository, CardService, CardStatus, CardValidationError, RepoError,
    SqliteCardRepository,
};
use uuid::Uuid;

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&conn);

    let card = Card::new("Borrow checker", CardStatus::InProgress, "2026-10-20");
    let id = repo.create_card(&card).unwrap();

    let loaded = repo.get_card(id).unwrap().unwrap();
    assert_eq!(loaded, card);
}

#[test]
fn list_returns_cards_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&conn);

    let titles = ["first", "second", "third"];
    for title in titles {
        repo.create_card(&Card::new(title, CardStatus::Backlog, "2026-10-20"))
            .unwrap();
    }

    let listed: Vec<String> = repo
        .list_cards()
        .unwrap()
        .into_iter()
        .map(|card| card.title)
        .collect();
    assert_eq!(listed, titles);
}

#[test]
fn duplicate_id_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&conn);

    let card = Card::new("once", CardStatus::Done, "2026-10-20");
    repo.create_card(&card).unwrap();
    let err = repo.create_card(&card).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&conn);

    let card = Card::new("missing", CardStatus::Backlog, "2026-10-20");
    let err = repo.update_card(&card).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == card.id));
}

#[test]
fn unknown_stored_status_reads_back_as_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&conn);
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO cards (id, title, status, due_date) VALUES (?1, 'legacy', 'archived', '2026-10-20');",
        [id.to_string()],
    )
    .unwrap();

    let loaded = repo.get_card(id).unwrap().unwrap();
    assert_eq!(loaded.status, None);
    assert_eq!(repo.list_cards().unwrap().len(), 1);
}

#[test]
fn service_create_trims_and_validates_input() {
    let conn = open_db_in_memory().unwrap();
    let service = CardService::new(SqliteCardRepository::new(&conn));

    let card = service
        .create_card(&CardDraft::new("  Pattern matching ", CardStatus::Backlog, "2026-11-02"))
        .unwrap();
    assert_eq!(card.title, "Pattern matching");
    assert_eq!(service.get_card(card.id).unwrap(), Some(card));

    let err = service
        .create_card(&CardDraft::new("", CardStatus::Backlog, "2026-11-02"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(CardValidationError::EmptyTitle)
    ));

    let err = service
        .create_card(&CardDraft::new("Macros", CardStatus::Backlog, "soon"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(CardValidationError::InvalidDueDate(_))
    ));
    assert_eq!(service.list_cards().unwrap().len(), 1);
}

#[test]
fn service_update_replaces_fields_and_keeps_id() {
    let conn = open_db_in_memory().unwrap();
    let service = CardService::new(SqliteCardRepository::new(&conn));

    let created = service
        .create_card(&CardDraft::new("Iterators", CardStatus::Backlog, "2026-11-02"))
        .unwrap();
    let updated = service
        .update_card(
            created.id,
            &CardDraft::new("Iterators and closures", CardStatus::Done, "2026-11-05"),
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    let loaded = service.get_card(created.id).unwrap().unwrap();
    assert_eq!(loaded.title, "Iterators and closures");
    assert_eq!(loaded.status, Some(CardStatus::Done));
    assert_eq!(loaded.due_date, "2026-11-05");
}

#[test]
fn service_update_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = CardService::new(SqliteCardRepository::new(&conn));

    let id = Uuid::new_v4();
    let err = service
        .update_card(id, &CardDraft::new("ghost", CardStatus::Done, "2026-11-05"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
}

#[test]
fn card_serialization_maps_unknown_status_to_none() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "title": "legacy",
        "status": "blocked",
        "due_date": "2026-10-20"
    });
    let card: Card = serde_json::from_value(value).unwrap();
    assert_eq!(card.status, None);

    let mut known = card.clone();
    known.status = Some(CardStatus::InProgress);
    let json = serde_json::to_value(&known).unwrap();
    assert_eq!(json["status"], "in_progress");
}
