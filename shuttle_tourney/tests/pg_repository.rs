//! Integration tests for the PostgreSQL repository.
//!
//! These need a reachable database and are ignored by default:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use chrono::NaiveDate;
use shuttle_tourney::db::{Database, DatabaseConfig, PgTournamentRepository, TournamentRepository};
use shuttle_tourney::draw::DrawGenerator;
use shuttle_tourney::tournament::{
    DrawRequest, EventGender, EventType, NewEventCategory, NewPlayer, NewTournament,
    TournamentError, TournamentManager,
};
use std::sync::Arc;

/// Helper to connect and migrate the test database
async fn setup_repository() -> PgTournamentRepository {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost/shuttle_tourney_test".to_string());

    let db = Database::new(&DatabaseConfig::with_url(database_url))
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");
    db.tournament_repository()
}

fn tournament_request(name: &str) -> NewTournament {
    NewTournament {
        name: name.to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 9, 15).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 9, 20).unwrap(),
        venues: Vec::new(),
        organizer_name: "Badminton Club XYZ".to_string(),
        organizer_contact: None,
        level: None,
        entry_deadline: None,
        entry_fee: None,
        prize_money: None,
        organizer_logo_url: None,
        poster_url: None,
        website_url: None,
        social_media_url: None,
    }
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn test_pg_draw_lifecycle() {
    let repository = Arc::new(setup_repository().await);
    let manager =
        TournamentManager::with_generator(repository.clone(), DrawGenerator::with_seed(9));

    let tournament = manager
        .create_tournament(tournament_request("Pg Lifecycle Open"))
        .await
        .unwrap();
    let event = manager
        .add_event_category(
            &tournament.id,
            NewEventCategory {
                name: "Women's Singles".to_string(),
                event_type: EventType::Singles,
                gender: EventGender::Women,
                age_group: None,
            },
        )
        .await
        .unwrap();

    for name in ["Alice Doe", "Beth Smith", "Cara Jones"] {
        manager
            .add_player(
                &tournament.id,
                &event.id,
                NewPlayer {
                    name: name.to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let draw = manager
        .generate_draw(&tournament.id, &event.id, DrawRequest::default())
        .await
        .unwrap();
    assert_eq!(draw.byes, 1);

    let stored = repository
        .get_event_category(&tournament.id, &event.id)
        .await
        .unwrap();
    assert!(stored.draw_generated);
    assert_eq!(stored.matches, draw.matches);

    manager.delete_tournament(&tournament.id).await.unwrap();
    let gone = repository.get_event_category(&tournament.id, &event.id).await;
    assert!(matches!(gone, Err(TournamentError::TournamentNotFound(_))));
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn test_pg_rejected_mutation_rolls_back() {
    let repository = Arc::new(setup_repository().await);
    let manager = TournamentManager::new(repository.clone());

    let tournament = manager
        .create_tournament(tournament_request("Pg Rollback Open"))
        .await
        .unwrap();
    let event = manager
        .add_event_category(
            &tournament.id,
            NewEventCategory {
                name: "Mixed Doubles".to_string(),
                event_type: EventType::Doubles,
                gender: EventGender::Mixed,
                age_group: None,
            },
        )
        .await
        .unwrap();

    let result = manager
        .set_seeds(&tournament.id, &event.id, vec!["ghost".to_string()])
        .await;
    assert!(matches!(result, Err(TournamentError::InvalidSeedReference(_))));

    let stored = repository
        .get_event_category(&tournament.id, &event.id)
        .await
        .unwrap();
    assert!(stored.seeds.is_empty());

    manager.delete_tournament(&tournament.id).await.unwrap();
}
