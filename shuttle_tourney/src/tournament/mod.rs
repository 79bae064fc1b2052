//! Tournament module: event categories, rosters, seeds and first-round matches.
//!
//! This module provides:
//! - The tournament data model and request types
//! - Best-of-three scores and the winner rules derived from them
//! - [`TournamentManager`], which enforces roster, draw and result rules on top
//!   of any [`TournamentRepository`](crate::db::TournamentRepository)
//!
//! ## Example
//!
//! ```
//! use shuttle_tourney::db::InMemoryTournamentRepository;
//! use shuttle_tourney::tournament::{
//!     DrawRequest, EventGender, EventType, NewEventCategory, NewPlayer, NewTournament,
//!     TournamentManager,
//! };
//! use chrono::NaiveDate;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = TournamentManager::new(Arc::new(InMemoryTournamentRepository::new()));
//!
//!     let tournament = manager
//!         .create_tournament(NewTournament {
//!             name: "Club Championship".to_string(),
//!             start_date: NaiveDate::from_ymd_opt(2024, 9, 15).unwrap(),
//!             end_date: NaiveDate::from_ymd_opt(2024, 9, 16).unwrap(),
//!             venues: Vec::new(),
//!             organizer_name: "Badminton Club XYZ".to_string(),
//!             organizer_contact: None,
//!             level: None,
//!             entry_deadline: None,
//!             entry_fee: None,
//!             prize_money: None,
//!             organizer_logo_url: None,
//!             poster_url: None,
//!             website_url: None,
//!             social_media_url: None,
//!         })
//!         .await?;
//!
//!     let event = manager
//!         .add_event_category(
//!             &tournament.id,
//!             NewEventCategory {
//!                 name: "Men's Singles".to_string(),
//!                 event_type: EventType::Singles,
//!                 gender: EventGender::Men,
//!                 age_group: None,
//!             },
//!         )
//!         .await?;
//!
//!     for name in ["John Doe", "Mike Smith", "Peter Jones"] {
//!         let player = NewPlayer { name: name.to_string(), ..Default::default() };
//!         manager.add_player(&tournament.id, &event.id, player).await?;
//!     }
//!
//!     let draw = manager
//!         .generate_draw(&tournament.id, &event.id, DrawRequest::default())
//!         .await?;
//!     assert_eq!(draw.byes, 1);
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;
pub mod score;

pub use errors::{TournamentError, TournamentResult};
pub use manager::{MIN_PLAYER_NAME_LEN, TournamentManager};
pub use models::{
    BYE_ID_PREFIX, BYE_NAME, DrawRequest, Entrant, EventCategory, EventCategoryUpdate, EventGender,
    EventId, EventType, Match, MatchId, MatchSchedule, MatchStatus, NewEventCategory, NewPlayer,
    NewTournament, NewVenue, Player, PlayerGender, PlayerId, PlayerUpdate, Tournament,
    TournamentId, TournamentStatus, TournamentUpdate, Venue,
};
pub use score::{Score, Side};
