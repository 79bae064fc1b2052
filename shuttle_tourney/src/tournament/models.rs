//! Tournament data models: tournaments, event categories, players and matches.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::score::{Score, Side};

/// Tournament ID type
pub type TournamentId = String;
/// Event category ID type
pub type EventId = String;
/// Player ID type
pub type PlayerId = String;
/// Match ID type
pub type MatchId = String;

/// Prefix reserved for synthetic bye entrants.
pub const BYE_ID_PREFIX: &str = "bye-";
/// Display name of a bye entrant.
pub const BYE_NAME: &str = "BYE";

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Tournament lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TournamentStatus {
    /// Being set up, not visible to players
    #[default]
    Draft,
    /// Announced and open for entries
    Published,
    /// Matches are being played
    #[serde(rename = "In Progress")]
    InProgress,
    /// All events finished
    Completed,
    /// Called off
    Canceled,
}

impl TournamentStatus {
    /// Whether players can see the tournament. Drafts and canceled events stay hidden.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            TournamentStatus::Published | TournamentStatus::InProgress | TournamentStatus::Completed
        )
    }
}

/// Singles or doubles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Singles,
    Doubles,
}

/// Gender restriction of an event category. `Any` is used for age categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventGender {
    Men,
    Women,
    Mixed,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerGender {
    Male,
    Female,
    Other,
}

/// Match status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Completed,
    Walkover,
    Retired,
}

impl MatchStatus {
    /// Whether the match has a final result
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            MatchStatus::Completed | MatchStatus::Walkover | MatchStatus::Retired
        )
    }
}

/// Playing venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: String,
    pub number_of_courts: u32,
}

/// Registered player (or doubles pair) in an event category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub gender: Option<PlayerGender>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub club: Option<String>,
    /// Explicit seed rank (1 = top seed)
    #[serde(default)]
    pub seed_number: Option<u32>,
    /// Partner of a doubles pair registered together
    #[serde(default)]
    pub partner_name: Option<String>,
    /// National or federation ID
    #[serde(default)]
    pub external_id: Option<String>,
}

impl Player {
    /// Create a player with only an ID and a name
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gender: None,
            date_of_birth: None,
            club: None,
            seed_number: None,
            partner_name: None,
            external_id: None,
        }
    }

    /// Set an explicit seed rank
    pub fn with_seed(mut self, seed_number: u32) -> Self {
        self.seed_number = Some(seed_number);
        self
    }
}

/// One bracket slot: a real player or a bye placeholder.
///
/// Byes only exist while a draw is being built and are never stored as players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrant {
    pub id: PlayerId,
    pub name: String,
    bye: bool,
}

impl Entrant {
    /// Synthetic bye entrant `bye-<index>`
    pub fn bye(index: usize) -> Self {
        Self {
            id: format!("{BYE_ID_PREFIX}{index}"),
            name: BYE_NAME.to_string(),
            bye: true,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.bye
    }
}

impl From<&Player> for Entrant {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            bye: false,
        }
    }
}

/// A single match inside an event category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Round number (1-indexed)
    pub round: u32,
    /// Match number, unique within its round (1-indexed)
    pub match_number: u32,
    pub player1_id: Option<PlayerId>,
    pub player2_id: Option<PlayerId>,
    pub player1_name: Option<String>,
    pub player2_name: Option<String>,
    #[serde(default)]
    pub score: Option<Score>,
    #[serde(default)]
    pub winner_id: Option<PlayerId>,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    pub status: MatchStatus,
    #[serde(default)]
    pub is_bye: bool,
}

impl Match {
    /// Create an upcoming match between two entrants
    pub fn new(round: u32, match_number: u32, player1: &Entrant, player2: &Entrant) -> Self {
        Self {
            id: new_id(),
            round,
            match_number,
            player1_id: Some(player1.id.clone()),
            player2_id: Some(player2.id.clone()),
            player1_name: Some(player1.name.clone()),
            player2_name: Some(player2.name.clone()),
            score: None,
            winner_id: None,
            court: None,
            start_time: None,
            status: MatchStatus::Upcoming,
            is_bye: false,
        }
    }

    /// Entrant ID occupying the given side
    pub fn entrant_id(&self, side: Side) -> Option<&str> {
        match side {
            Side::Player1 => self.player1_id.as_deref(),
            Side::Player2 => self.player2_id.as_deref(),
        }
    }

    /// Whether the entrant occupies either slot of this match
    pub fn has_entrant(&self, entrant_id: &str) -> bool {
        self.player1_id.as_deref() == Some(entrant_id)
            || self.player2_id.as_deref() == Some(entrant_id)
    }
}

/// Event category (e.g. "Men's Singles", "U15 Women's Doubles")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCategory {
    pub id: EventId,
    pub name: String,
    pub event_type: EventType,
    pub gender: EventGender,
    #[serde(default)]
    pub age_group: Option<String>,
    /// Registered players in registration order
    #[serde(default)]
    pub players: Vec<Player>,
    /// Seeded player IDs in priority order
    #[serde(default)]
    pub seeds: Vec<PlayerId>,
    #[serde(default)]
    pub draw_generated: bool,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl EventCategory {
    /// Create an empty event category from a creation request
    pub fn new(request: NewEventCategory) -> Self {
        Self {
            id: new_id(),
            name: request.name,
            event_type: request.event_type,
            gender: request.gender,
            age_group: request.age_group,
            players: Vec::new(),
            seeds: Vec::new(),
            draw_generated: false,
            matches: Vec::new(),
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn find_match(&self, match_id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == match_id)
    }
}

/// Tournament with its event categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub venues: Vec<Venue>,
    pub organizer_name: String,
    #[serde(default)]
    pub organizer_contact: Option<String>,
    /// e.g. "Local Club", "Regional"
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub entry_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub entry_fee: Option<String>,
    #[serde(default)]
    pub prize_money: Option<String>,
    #[serde(default)]
    pub organizer_logo_url: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub social_media_url: Option<String>,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub event_categories: Vec<EventCategory>,
}

impl Tournament {
    /// Create a draft tournament from a creation request
    pub fn new(request: NewTournament) -> Self {
        let venues = request
            .venues
            .into_iter()
            .map(|v| Venue {
                id: new_id(),
                name: v.name,
                address: v.address,
                number_of_courts: v.number_of_courts,
            })
            .collect();

        Self {
            id: new_id(),
            name: request.name,
            start_date: request.start_date,
            end_date: request.end_date,
            venues,
            organizer_name: request.organizer_name,
            organizer_contact: request.organizer_contact,
            level: request.level,
            entry_deadline: request.entry_deadline,
            entry_fee: request.entry_fee,
            prize_money: request.prize_money,
            organizer_logo_url: request.organizer_logo_url,
            poster_url: request.poster_url,
            website_url: request.website_url,
            social_media_url: request.social_media_url,
            status: TournamentStatus::Draft,
            created_at: Utc::now(),
            event_categories: Vec::new(),
        }
    }

    pub fn event_category(&self, event_id: &str) -> Option<&EventCategory> {
        self.event_categories.iter().find(|e| e.id == event_id)
    }

    /// Check header fields for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Tournament name is required".to_string());
        }
        if self.organizer_name.trim().is_empty() {
            return Err("Organizer name is required".to_string());
        }
        if self.end_date < self.start_date {
            return Err(format!(
                "End date {} is before start date {}",
                self.end_date, self.start_date
            ));
        }
        Ok(())
    }
}

/// Venue in a tournament creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVenue {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub number_of_courts: u32,
}

/// Tournament creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub venues: Vec<NewVenue>,
    pub organizer_name: String,
    #[serde(default)]
    pub organizer_contact: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub entry_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub entry_fee: Option<String>,
    #[serde(default)]
    pub prize_money: Option<String>,
    #[serde(default)]
    pub organizer_logo_url: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub social_media_url: Option<String>,
}

/// Partial tournament update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentUpdate {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub organizer_name: Option<String>,
    pub organizer_contact: Option<String>,
    pub level: Option<String>,
    pub entry_deadline: Option<NaiveDate>,
    pub entry_fee: Option<String>,
    pub prize_money: Option<String>,
    pub organizer_logo_url: Option<String>,
    pub poster_url: Option<String>,
    pub website_url: Option<String>,
    pub social_media_url: Option<String>,
    pub status: Option<TournamentStatus>,
}

impl TournamentUpdate {
    pub fn apply(self, tournament: &mut Tournament) {
        if let Some(name) = self.name {
            tournament.name = name;
        }
        if let Some(start_date) = self.start_date {
            tournament.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            tournament.end_date = end_date;
        }
        if let Some(organizer_name) = self.organizer_name {
            tournament.organizer_name = organizer_name;
        }
        if self.organizer_contact.is_some() {
            tournament.organizer_contact = self.organizer_contact;
        }
        if self.level.is_some() {
            tournament.level = self.level;
        }
        if self.entry_deadline.is_some() {
            tournament.entry_deadline = self.entry_deadline;
        }
        if self.entry_fee.is_some() {
            tournament.entry_fee = self.entry_fee;
        }
        if self.prize_money.is_some() {
            tournament.prize_money = self.prize_money;
        }
        if self.organizer_logo_url.is_some() {
            tournament.organizer_logo_url = self.organizer_logo_url;
        }
        if self.poster_url.is_some() {
            tournament.poster_url = self.poster_url;
        }
        if self.website_url.is_some() {
            tournament.website_url = self.website_url;
        }
        if self.social_media_url.is_some() {
            tournament.social_media_url = self.social_media_url;
        }
        if let Some(status) = self.status {
            tournament.status = status;
        }
    }
}

/// Event category creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEventCategory {
    pub name: String,
    pub event_type: EventType,
    pub gender: EventGender,
    #[serde(default)]
    pub age_group: Option<String>,
}

/// Partial event category update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventCategoryUpdate {
    pub name: Option<String>,
    pub event_type: Option<EventType>,
    pub gender: Option<EventGender>,
    pub age_group: Option<String>,
}

impl EventCategoryUpdate {
    pub fn apply(self, event: &mut EventCategory) {
        if let Some(name) = self.name {
            event.name = name;
        }
        if let Some(event_type) = self.event_type {
            event.event_type = event_type;
        }
        if let Some(gender) = self.gender {
            event.gender = gender;
        }
        if self.age_group.is_some() {
            event.age_group = self.age_group;
        }
    }
}

/// Player registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    #[serde(default)]
    pub gender: Option<PlayerGender>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub club: Option<String>,
    /// Seed rank; 0 means unseeded
    #[serde(default)]
    pub seed_number: Option<u32>,
    #[serde(default)]
    pub partner_name: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
}

/// Partial player update. `seed_number: Some(0)` clears the seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub gender: Option<PlayerGender>,
    pub date_of_birth: Option<NaiveDate>,
    pub club: Option<String>,
    pub seed_number: Option<u32>,
    pub partner_name: Option<String>,
    pub external_id: Option<String>,
}

/// Draw generation request
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawRequest {
    /// Replace an already generated draw
    pub regenerate: bool,
}

/// Court and start time assignment for a match. `None` clears the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSchedule {
    pub court: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
}
