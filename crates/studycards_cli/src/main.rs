//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `studycards_core` linkage without the Flutter runtime.
//! - Print a board summary for the database named by `STUDYCARDS_DB_PATH`.

use chrono::Utc;
use studycards_core::db::open_db;
use studycards_core::{CardService, SqliteCardRepository};

fn main() {
    println!("studycards_core ping={}", studycards_core::ping());
    println!("studycards_core version={}", studycards_core::core_version());

    let Some(db_path) = std::env::var_os("STUDYCARDS_DB_PATH") else {
        return;
    };
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open {}: {err}", db_path.to_string_lossy());
            std::process::exit(1);
        }
    };
    let service = CardService::new(SqliteCardRepository::new(&conn));
    match service.board(Utc::now()) {
        Ok(snapshot) => {
            for section in snapshot.board().sections() {
                println!("{}: {}", section.title, section.cards.len());
            }
            println!("{}", snapshot.due_soon_badge());
        }
        Err(err) => {
            eprintln!("failed to load cards: {err}");
            std::process::exit(1);
        }
    }
}
