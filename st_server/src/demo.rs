//! Demo data loaded on startup when `SEED_DEMO_DATA=true`.

use chrono::NaiveDate;
use shuttle_tourney::{
    TournamentError, TournamentManager, TournamentResult,
    tournament::{
        EventGender, EventType, NewEventCategory, NewPlayer, NewTournament, NewVenue, Tournament,
    },
};

const DEMO_PLAYERS: [&str; 4] = ["John Doe", "Mike Smith", "Peter Jones", "David Lee"];

fn demo_date(day: u32) -> TournamentResult<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 9, day)
        .ok_or_else(|| TournamentError::InvalidInput(format!("Invalid demo date 2024-09-{day}")))
}

/// Create the demo tournament with one singles event and four players.
///
/// The draw is left ungenerated so it can be tried from the API.
pub async fn seed(manager: &TournamentManager) -> TournamentResult<Tournament> {
    let tournament = manager
        .create_tournament(NewTournament {
            name: "Yonex Demo Open 2024".to_string(),
            start_date: demo_date(15)?,
            end_date: demo_date(20)?,
            venues: vec![NewVenue {
                name: "City Arena".to_string(),
                address: "123 Main St".to_string(),
                number_of_courts: 6,
            }],
            organizer_name: "Badminton Club XYZ".to_string(),
            organizer_contact: None,
            level: None,
            entry_deadline: None,
            entry_fee: None,
            prize_money: None,
            organizer_logo_url: None,
            poster_url: None,
            website_url: Some("https://badmintonclubxyz.example".to_string()),
            social_media_url: None,
        })
        .await?;

    let event = manager
        .add_event_category(
            &tournament.id,
            NewEventCategory {
                name: "Men's Singles".to_string(),
                event_type: EventType::Singles,
                gender: EventGender::Men,
                age_group: None,
            },
        )
        .await?;

    for name in DEMO_PLAYERS {
        let player = NewPlayer {
            name: name.to_string(),
            ..Default::default()
        };
        manager.add_player(&tournament.id, &event.id, player).await?;
    }

    tracing::info!(
        tournament_id = %tournament.id,
        event_id = %event.id,
        "Demo tournament loaded"
    );
    manager.get_tournament(&tournament.id).await
}
