//! Tournament manager: business rules over a [`TournamentRepository`].

use log::{info, warn};
use std::sync::{Arc, Mutex};

use super::errors::{TournamentError, TournamentResult};
use super::models::{
    DrawRequest, EventCategory, EventCategoryUpdate, Match, MatchSchedule, MatchStatus,
    NewEventCategory, NewPlayer, NewTournament, Player, PlayerId, PlayerUpdate, Tournament,
    TournamentUpdate, new_id,
};
use super::score::Score;
use crate::db::{TournamentRepository, event_mutation};
use crate::draw::{DrawGenerator, KnockoutDraw};

/// Shortest accepted player name, in characters
pub const MIN_PLAYER_NAME_LEN: usize = 2;

fn validate_player_name(name: &str) -> TournamentResult<()> {
    if name.trim().chars().count() < MIN_PLAYER_NAME_LEN {
        return Err(TournamentError::InvalidInput(format!(
            "Player name must be at least {MIN_PLAYER_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_event_name(name: &str) -> TournamentResult<()> {
    if name.trim().is_empty() {
        return Err(TournamentError::InvalidInput(
            "Event category name is required".to_string(),
        ));
    }
    Ok(())
}

fn ensure_roster_open(event: &EventCategory) -> TournamentResult<()> {
    if event.draw_generated {
        return Err(TournamentError::RosterLocked(event.id.clone()));
    }
    Ok(())
}

/// Keep `seeds` in step with a player's seed number. 0 clears the seed.
fn sync_seed(event: &mut EventCategory, player_id: &str, seed_number: Option<u32>) {
    match seed_number {
        Some(n) if n > 0 => {
            if !event.seeds.iter().any(|s| s == player_id) {
                event.seeds.push(player_id.to_string());
            }
        }
        _ => event.seeds.retain(|s| s != player_id),
    }
}

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    repository: Arc<dyn TournamentRepository>,
    generator: Arc<Mutex<DrawGenerator>>,
}

impl TournamentManager {
    /// Create a manager whose draws are shuffled from OS entropy
    pub fn new(repository: Arc<dyn TournamentRepository>) -> Self {
        Self::with_generator(repository, DrawGenerator::new())
    }

    /// Create a manager with a specific generator, e.g. a seeded one for reproducible draws
    pub fn with_generator(
        repository: Arc<dyn TournamentRepository>,
        generator: DrawGenerator,
    ) -> Self {
        Self {
            repository,
            generator: Arc::new(Mutex::new(generator)),
        }
    }

    /// Check the backing store
    pub async fn health_check(&self) -> TournamentResult<()> {
        self.repository.health_check().await
    }

    /// Create a new draft tournament
    pub async fn create_tournament(&self, request: NewTournament) -> TournamentResult<Tournament> {
        let tournament = Tournament::new(request);
        tournament.validate().map_err(TournamentError::InvalidInput)?;

        self.repository.create_tournament(&tournament).await?;
        info!("Created tournament {} ({})", tournament.id, tournament.name);
        Ok(tournament)
    }

    pub async fn get_tournament(&self, tournament_id: &str) -> TournamentResult<Tournament> {
        self.repository.get_tournament(tournament_id).await
    }

    pub async fn list_tournaments(&self) -> TournamentResult<Vec<Tournament>> {
        self.repository.list_tournaments().await
    }

    /// Tournaments visible to players: published, in progress or completed
    pub async fn list_public_tournaments(&self) -> TournamentResult<Vec<Tournament>> {
        let mut tournaments = self.repository.list_tournaments().await?;
        tournaments.retain(|t| t.status.is_public());
        Ok(tournaments)
    }

    /// A tournament as players see it. Hidden tournaments are reported as not found.
    pub async fn get_public_tournament(&self, tournament_id: &str) -> TournamentResult<Tournament> {
        let tournament = self.repository.get_tournament(tournament_id).await?;
        if !tournament.status.is_public() {
            return Err(TournamentError::TournamentNotFound(tournament_id.to_string()));
        }
        Ok(tournament)
    }

    /// Update tournament header fields
    pub async fn update_tournament(
        &self,
        tournament_id: &str,
        update: TournamentUpdate,
    ) -> TournamentResult<Tournament> {
        let mut tournament = self.repository.get_tournament(tournament_id).await?;
        update.apply(&mut tournament);
        tournament.validate().map_err(TournamentError::InvalidInput)?;

        self.repository.update_tournament(&tournament).await?;
        Ok(tournament)
    }

    pub async fn delete_tournament(&self, tournament_id: &str) -> TournamentResult<()> {
        self.repository.delete_tournament(tournament_id).await?;
        info!("Deleted tournament {tournament_id}");
        Ok(())
    }

    /// Add an empty event category to a tournament
    pub async fn add_event_category(
        &self,
        tournament_id: &str,
        request: NewEventCategory,
    ) -> TournamentResult<EventCategory> {
        validate_event_name(&request.name)?;

        let event = EventCategory::new(request);
        self.repository.save_event_category(tournament_id, &event).await?;
        info!("Added event {} ({}) to tournament {tournament_id}", event.id, event.name);
        Ok(event)
    }

    pub async fn get_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
    ) -> TournamentResult<EventCategory> {
        self.repository.get_event_category(tournament_id, event_id).await
    }

    pub async fn update_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
        update: EventCategoryUpdate,
    ) -> TournamentResult<EventCategory> {
        if let Some(name) = &update.name {
            validate_event_name(name)?;
        }

        self.repository
            .update_event_category(
                tournament_id,
                event_id,
                event_mutation(move |event| {
                    update.apply(event);
                    Ok(())
                }),
            )
            .await
    }

    pub async fn delete_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
    ) -> TournamentResult<()> {
        self.repository.delete_event_category(tournament_id, event_id).await
    }

    /// Register a player. A positive seed number also adds the player to the seed list.
    pub async fn add_player(
        &self,
        tournament_id: &str,
        event_id: &str,
        request: NewPlayer,
    ) -> TournamentResult<Player> {
        validate_player_name(&request.name)?;

        let player = Player {
            id: new_id(),
            name: request.name.trim().to_string(),
            gender: request.gender,
            date_of_birth: request.date_of_birth,
            club: request.club,
            seed_number: request.seed_number.filter(|n| *n > 0),
            partner_name: request.partner_name,
            external_id: request.external_id,
        };

        let registered = player.clone();
        self.repository
            .update_event_category(
                tournament_id,
                event_id,
                event_mutation(move |event| {
                    ensure_roster_open(event)?;
                    sync_seed(event, &registered.id, registered.seed_number);
                    event.players.push(registered);
                    Ok(())
                }),
            )
            .await?;

        info!("Registered player {} ({}) in event {event_id}", player.id, player.name);
        Ok(player)
    }

    /// Update player details and keep the seed list in step with the seed number
    pub async fn update_player(
        &self,
        tournament_id: &str,
        event_id: &str,
        player_id: &str,
        update: PlayerUpdate,
    ) -> TournamentResult<Player> {
        if let Some(name) = &update.name {
            validate_player_name(name)?;
        }

        let target = player_id.to_string();
        let mutation = event_mutation(move |event| {
            let index = event
                .players
                .iter()
                .position(|p| p.id == target)
                .ok_or_else(|| TournamentError::PlayerNotFound(target.clone()))?;

            if let Some(seed_number) = update.seed_number {
                ensure_roster_open(event)?;
                let seed_number = Some(seed_number).filter(|n| *n > 0);
                event.players[index].seed_number = seed_number;
                sync_seed(event, &target, seed_number);
            }

            if let Some(name) = update.name {
                let name = name.trim().to_string();
                for m in &mut event.matches {
                    if m.player1_id.as_deref() == Some(target.as_str()) {
                        m.player1_name = Some(name.clone());
                    }
                    if m.player2_id.as_deref() == Some(target.as_str()) {
                        m.player2_name = Some(name.clone());
                    }
                }
                event.players[index].name = name;
            }

            let player = &mut event.players[index];
            if update.gender.is_some() {
                player.gender = update.gender;
            }
            if update.date_of_birth.is_some() {
                player.date_of_birth = update.date_of_birth;
            }
            if update.club.is_some() {
                player.club = update.club;
            }
            if update.partner_name.is_some() {
                player.partner_name = update.partner_name;
            }
            if update.external_id.is_some() {
                player.external_id = update.external_id;
            }
            Ok(())
        });

        let event = self
            .repository
            .update_event_category(tournament_id, event_id, mutation)
            .await?;
        event
            .player(player_id)
            .cloned()
            .ok_or_else(|| TournamentError::PlayerNotFound(player_id.to_string()))
    }

    /// Withdraw a player before the draw. The player is dropped from the seed list too.
    pub async fn remove_player(
        &self,
        tournament_id: &str,
        event_id: &str,
        player_id: &str,
    ) -> TournamentResult<()> {
        let target = player_id.to_string();
        self.repository
            .update_event_category(
                tournament_id,
                event_id,
                event_mutation(move |event| {
                    ensure_roster_open(event)?;
                    let index = event
                        .players
                        .iter()
                        .position(|p| p.id == target)
                        .ok_or_else(|| TournamentError::PlayerNotFound(target.clone()))?;
                    event.players.remove(index);
                    event.seeds.retain(|s| *s != target);
                    Ok(())
                }),
            )
            .await?;

        info!("Removed player {player_id} from event {event_id}");
        Ok(())
    }

    /// Replace the seed list.
    ///
    /// Every ID must be on the roster; repeated IDs keep their first position.
    /// Listed players are renumbered from 1 in list order and players left out
    /// lose their seed number.
    pub async fn set_seeds(
        &self,
        tournament_id: &str,
        event_id: &str,
        seeds: Vec<PlayerId>,
    ) -> TournamentResult<EventCategory> {
        self.repository
            .update_event_category(
                tournament_id,
                event_id,
                event_mutation(move |event| {
                    ensure_roster_open(event)?;

                    let mut ordered: Vec<PlayerId> = Vec::with_capacity(seeds.len());
                    for id in seeds {
                        if event.player(&id).is_none() {
                            return Err(TournamentError::InvalidSeedReference(id));
                        }
                        if !ordered.contains(&id) {
                            ordered.push(id);
                        }
                    }

                    for player in &mut event.players {
                        player.seed_number = ordered
                            .iter()
                            .position(|id| *id == player.id)
                            .and_then(|rank| u32::try_from(rank + 1).ok());
                    }
                    event.seeds = ordered;
                    Ok(())
                }),
            )
            .await
    }

    /// Generate the first round of the knockout draw and store it.
    ///
    /// The new match list replaces any previous one in full. An existing draw
    /// is only replaced when `request.regenerate` is set.
    pub async fn generate_draw(
        &self,
        tournament_id: &str,
        event_id: &str,
        request: DrawRequest,
    ) -> TournamentResult<KnockoutDraw> {
        let generator = Arc::clone(&self.generator);
        let mutation = event_mutation(move |event| {
            if event.draw_generated && !request.regenerate {
                return Err(TournamentError::AlreadyGenerated(event.id.clone()));
            }

            let draw = generator
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .generate(&event.players, &event.seeds)?;
            event.matches = draw.matches;
            event.draw_generated = true;
            Ok(())
        });

        // Roster check, generation and store happen under one event lock
        let event = match self
            .repository
            .update_event_category(tournament_id, event_id, mutation)
            .await
        {
            Ok(event) => event,
            Err(TournamentError::AlreadyGenerated(id)) => {
                warn!("Draw for event {event_id} already exists, regeneration not requested");
                return Err(TournamentError::AlreadyGenerated(id));
            }
            Err(e) => return Err(e),
        };

        let draw = KnockoutDraw::from_matches(event.matches);
        info!(
            "{} draw for event {event_id}: {} matches, {} byes",
            if request.regenerate { "Regenerated" } else { "Generated" },
            draw.matches.len(),
            draw.byes
        );
        Ok(draw)
    }

    /// Matches of an event ordered by round, then match number
    pub async fn list_matches(
        &self,
        tournament_id: &str,
        event_id: &str,
    ) -> TournamentResult<Vec<Match>> {
        let event = self
            .repository
            .get_event_category(tournament_id, event_id)
            .await?;

        let mut matches = event.matches;
        matches.sort_by_key(|m| (m.round, m.match_number));
        Ok(matches)
    }

    /// Assign a court and start time. Blank courts are stored as unset.
    pub async fn schedule_match(
        &self,
        tournament_id: &str,
        event_id: &str,
        match_id: &str,
        schedule: MatchSchedule,
    ) -> TournamentResult<Match> {
        self.update_match(tournament_id, event_id, match_id, move |m| {
            m.court = schedule
                .court
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty());
            m.start_time = schedule.start_time;
            Ok(())
        })
        .await
    }

    /// Change the status of a match.
    ///
    /// A finished status needs a recorded winner. Moving a finished match back
    /// to `Upcoming` or `Live` clears its result.
    pub async fn update_match_status(
        &self,
        tournament_id: &str,
        event_id: &str,
        match_id: &str,
        status: MatchStatus,
    ) -> TournamentResult<Match> {
        self.update_match(tournament_id, event_id, match_id, move |m| {
            if status.is_finished() && m.winner_id.is_none() {
                return Err(TournamentError::InvalidInput(format!(
                    "Match {} has no winner; record a result before marking it {status:?}",
                    m.id
                )));
            }
            if !status.is_finished() {
                m.score = None;
                m.winner_id = None;
            }
            m.status = status;
            Ok(())
        })
        .await
    }

    /// Record a result and complete the match.
    ///
    /// The winner must be one of the two entrants, and must agree with the
    /// score when the score names a side with more sets won.
    pub async fn set_match_score(
        &self,
        tournament_id: &str,
        event_id: &str,
        match_id: &str,
        score: Score,
        winner_id: PlayerId,
    ) -> TournamentResult<Match> {
        let updated = self
            .update_match(tournament_id, event_id, match_id, move |m| {
                if !m.has_entrant(&winner_id) {
                    return Err(TournamentError::InvalidWinner(winner_id));
                }
                if let Some(side) = score.implied_winner() {
                    if m.entrant_id(side) != Some(winner_id.as_str()) {
                        return Err(TournamentError::ScoreMismatch);
                    }
                }

                m.score = (!score.is_empty()).then_some(score);
                m.winner_id = Some(winner_id);
                m.status = MatchStatus::Completed;
                Ok(())
            })
            .await?;

        info!(
            "Match {match_id} completed, winner {}",
            updated.winner_id.as_deref().unwrap_or_default()
        );
        Ok(updated)
    }

    /// Apply a change to one non-bye match of an event
    async fn update_match<F>(
        &self,
        tournament_id: &str,
        event_id: &str,
        match_id: &str,
        change: F,
    ) -> TournamentResult<Match>
    where
        F: FnOnce(&mut Match) -> TournamentResult<()> + Send + 'static,
    {
        let target = match_id.to_string();
        let mutation = event_mutation(move |event| {
            let m = event
                .matches
                .iter_mut()
                .find(|m| m.id == target)
                .ok_or_else(|| TournamentError::MatchNotFound(target.clone()))?;
            if m.is_bye {
                return Err(TournamentError::ByeMatch(target));
            }
            change(m)
        });

        let event = self
            .repository
            .update_event_category(tournament_id, event_id, mutation)
            .await?;
        event
            .find_match(match_id)
            .cloned()
            .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryTournamentRepository;
    use crate::tournament::models::{EventGender, EventType};
    use chrono::NaiveDate;

    async fn setup() -> (TournamentManager, String, String) {
        let manager = TournamentManager::with_generator(
            Arc::new(InMemoryTournamentRepository::new()),
            DrawGenerator::with_seed(7),
        );
        let tournament = manager
            .create_tournament(NewTournament {
                name: "Club Championship".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 9, 15).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 9, 15).unwrap(),
                venues: Vec::new(),
                organizer_name: "Club".to_string(),
                organizer_contact: None,
                level: None,
                entry_deadline: None,
                entry_fee: None,
                prize_money: None,
                organizer_logo_url: None,
                poster_url: None,
                website_url: None,
                social_media_url: None,
            })
            .await
            .unwrap();
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
            .await
            .unwrap();
        (manager, tournament.id, event.id)
    }

    fn new_player(name: &str, seed_number: Option<u32>) -> NewPlayer {
        NewPlayer {
            name: name.to_string(),
            seed_number,
            ..Default::default()
        }
    }

    #[test]
    fn test_player_name_length() {
        assert!(validate_player_name("Al").is_ok());
        assert!(validate_player_name(" A ").is_err());
        assert!(validate_player_name("").is_err());
    }

    #[tokio::test]
    async fn test_seed_number_syncs_seed_list() {
        let (manager, tid, eid) = setup().await;
        let seeded = manager
            .add_player(&tid, &eid, new_player("John Doe", Some(1)))
            .await
            .unwrap();
        let unseeded = manager
            .add_player(&tid, &eid, new_player("Mike Smith", Some(0)))
            .await
            .unwrap();
        assert_eq!(unseeded.seed_number, None);

        let event = manager.get_event_category(&tid, &eid).await.unwrap();
        assert_eq!(event.seeds, vec![seeded.id.clone()]);

        manager
            .update_player(
                &tid,
                &eid,
                &seeded.id,
                PlayerUpdate {
                    seed_number: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let event = manager.get_event_category(&tid, &eid).await.unwrap();
        assert!(event.seeds.is_empty());
        assert_eq!(event.player(&seeded.id).unwrap().seed_number, None);
    }

    #[tokio::test]
    async fn test_draw_twice_requires_regenerate() {
        let (manager, tid, eid) = setup().await;
        for name in ["John Doe", "Mike Smith", "Peter Jones"] {
            manager.add_player(&tid, &eid, new_player(name, None)).await.unwrap();
        }

        manager.generate_draw(&tid, &eid, DrawRequest::default()).await.unwrap();
        let again = manager.generate_draw(&tid, &eid, DrawRequest::default()).await;
        assert!(matches!(again, Err(TournamentError::AlreadyGenerated(_))));

        let regenerated = manager
            .generate_draw(&tid, &eid, DrawRequest { regenerate: true })
            .await
            .unwrap();
        let stored = manager.list_matches(&tid, &eid).await.unwrap();
        assert_eq!(stored, regenerated.matches);
    }

    #[tokio::test]
    async fn test_bye_match_cannot_be_scheduled() {
        let (manager, tid, eid) = setup().await;
        for name in ["John Doe", "Mike Smith", "Peter Jones"] {
            manager.add_player(&tid, &eid, new_player(name, None)).await.unwrap();
        }
        let draw = manager.generate_draw(&tid, &eid, DrawRequest::default()).await.unwrap();
        let bye = draw.bye_matches().next().unwrap();

        let result = manager
            .schedule_match(&tid, &eid, &bye.id, MatchSchedule::default())
            .await;
        assert!(matches!(result, Err(TournamentError::ByeMatch(_))));
    }
}
