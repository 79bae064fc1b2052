//! In-memory tournament store.
//!
//! Used by tests and by the server when no database is configured. Every
//! mutation runs under a single write lock, so each operation is atomic.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::repository::{EventMutation, TournamentRepository};
use crate::tournament::{
    EventCategory, Match, Tournament, TournamentError, TournamentId, TournamentResult,
};

#[derive(Default)]
struct Store {
    next_seq: u64,
    /// Tournament keyed by ID, with its insertion sequence for stable listing
    tournaments: HashMap<TournamentId, (u64, Tournament)>,
}

impl Store {
    fn tournament(&self, tournament_id: &str) -> TournamentResult<&Tournament> {
        self.tournaments
            .get(tournament_id)
            .map(|(_, t)| t)
            .ok_or_else(|| TournamentError::TournamentNotFound(tournament_id.to_string()))
    }

    fn tournament_mut(&mut self, tournament_id: &str) -> TournamentResult<&mut Tournament> {
        self.tournaments
            .get_mut(tournament_id)
            .map(|(_, t)| t)
            .ok_or_else(|| TournamentError::TournamentNotFound(tournament_id.to_string()))
    }

    fn event_mut(
        &mut self,
        tournament_id: &str,
        event_id: &str,
    ) -> TournamentResult<&mut EventCategory> {
        self.tournament_mut(tournament_id)?
            .event_categories
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| TournamentError::EventNotFound(event_id.to_string()))
    }
}

/// `TournamentRepository` backed by a `HashMap` behind a tokio `RwLock`
#[derive(Default)]
pub struct InMemoryTournamentRepository {
    store: RwLock<Store>,
}

impl InMemoryTournamentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TournamentRepository for InMemoryTournamentRepository {
    async fn health_check(&self) -> TournamentResult<()> {
        Ok(())
    }

    async fn create_tournament(&self, tournament: &Tournament) -> TournamentResult<()> {
        let mut store = self.store.write().await;
        if store.tournaments.contains_key(&tournament.id) {
            return Err(TournamentError::InvalidInput(format!(
                "Tournament {} already exists",
                tournament.id
            )));
        }

        let seq = store.next_seq;
        store.next_seq += 1;
        store
            .tournaments
            .insert(tournament.id.clone(), (seq, tournament.clone()));
        Ok(())
    }

    async fn get_tournament(&self, tournament_id: &str) -> TournamentResult<Tournament> {
        let store = self.store.read().await;
        store.tournament(tournament_id).cloned()
    }

    async fn list_tournaments(&self) -> TournamentResult<Vec<Tournament>> {
        let store = self.store.read().await;
        let mut entries: Vec<&(u64, Tournament)> = store.tournaments.values().collect();
        entries.sort_by_key(|(seq, _)| *seq);
        Ok(entries.into_iter().map(|(_, t)| t.clone()).collect())
    }

    async fn update_tournament(&self, tournament: &Tournament) -> TournamentResult<()> {
        let mut store = self.store.write().await;
        let stored = store.tournament_mut(&tournament.id)?;

        let event_categories = std::mem::take(&mut stored.event_categories);
        *stored = Tournament {
            event_categories,
            ..tournament.clone()
        };
        Ok(())
    }

    async fn delete_tournament(&self, tournament_id: &str) -> TournamentResult<()> {
        let mut store = self.store.write().await;
        store
            .tournaments
            .remove(tournament_id)
            .map(|_| ())
            .ok_or_else(|| TournamentError::TournamentNotFound(tournament_id.to_string()))
    }

    async fn get_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
    ) -> TournamentResult<EventCategory> {
        let store = self.store.read().await;
        store
            .tournament(tournament_id)?
            .event_category(event_id)
            .cloned()
            .ok_or_else(|| TournamentError::EventNotFound(event_id.to_string()))
    }

    async fn save_event_category(
        &self,
        tournament_id: &str,
        event: &EventCategory,
    ) -> TournamentResult<()> {
        let mut store = self.store.write().await;
        let tournament = store.tournament_mut(tournament_id)?;

        match tournament
            .event_categories
            .iter()
            .position(|e| e.id == event.id)
        {
            Some(index) => tournament.event_categories[index] = event.clone(),
            None => tournament.event_categories.push(event.clone()),
        }
        Ok(())
    }

    async fn update_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
        mutation: EventMutation,
    ) -> TournamentResult<EventCategory> {
        let mut store = self.store.write().await;
        let stored = store.event_mut(tournament_id, event_id)?;

        // Work on a copy so a rejected mutation leaves no partial change behind
        let mut event = stored.clone();
        mutation(&mut event)?;
        *stored = event.clone();
        Ok(event)
    }

    async fn delete_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
    ) -> TournamentResult<()> {
        let mut store = self.store.write().await;
        let tournament = store.tournament_mut(tournament_id)?;

        let before = tournament.event_categories.len();
        tournament.event_categories.retain(|e| e.id != event_id);
        if tournament.event_categories.len() == before {
            return Err(TournamentError::EventNotFound(event_id.to_string()));
        }
        Ok(())
    }

    async fn replace_matches(
        &self,
        tournament_id: &str,
        event_id: &str,
        matches: &[Match],
        draw_generated: bool,
    ) -> TournamentResult<()> {
        let mut store = self.store.write().await;
        let event = store.event_mut(tournament_id, event_id)?;
        event.matches = matches.to_vec();
        event.draw_generated = draw_generated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::event_mutation;
    use crate::tournament::{
        Entrant, EventGender, EventType, NewEventCategory, NewTournament, Player,
    };
    use chrono::NaiveDate;

    fn tournament(name: &str) -> Tournament {
        Tournament::new(NewTournament {
            name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 9, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 9, 20).unwrap(),
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
    }

    fn event() -> EventCategory {
        EventCategory::new(NewEventCategory {
            name: "Men's Singles".to_string(),
            event_type: EventType::Singles,
            gender: EventGender::Men,
            age_group: None,
        })
    }

    #[tokio::test]
    async fn test_list_keeps_creation_order() {
        let repo = InMemoryTournamentRepository::new();
        for name in ["First", "Second", "Third"] {
            repo.create_tournament(&tournament(name)).await.unwrap();
        }

        let names: Vec<String> = repo
            .list_tournaments()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_update_tournament_keeps_events() {
        let repo = InMemoryTournamentRepository::new();
        let mut t = tournament("Open");
        repo.create_tournament(&t).await.unwrap();
        repo.save_event_category(&t.id, &event()).await.unwrap();

        t.name = "Renamed Open".to_string();
        repo.update_tournament(&t).await.unwrap();

        let stored = repo.get_tournament(&t.id).await.unwrap();
        assert_eq!(stored.name, "Renamed Open");
        assert_eq!(stored.event_categories.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_lookups() {
        let repo = InMemoryTournamentRepository::new();
        let t = tournament("Open");
        repo.create_tournament(&t).await.unwrap();

        assert!(matches!(
            repo.get_tournament("nope").await,
            Err(TournamentError::TournamentNotFound(_))
        ));
        assert!(matches!(
            repo.get_event_category(&t.id, "nope").await,
            Err(TournamentError::EventNotFound(_))
        ));
        assert!(matches!(
            repo.delete_event_category(&t.id, "nope").await,
            Err(TournamentError::EventNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_replace_matches_is_full_replacement() {
        let repo = InMemoryTournamentRepository::new();
        let t = tournament("Open");
        let e = event();
        repo.create_tournament(&t).await.unwrap();
        repo.save_event_category(&t.id, &e).await.unwrap();

        let a = Entrant::from(&Player::new("a", "A"));
        let b = Entrant::from(&Player::new("b", "B"));
        let first = vec![Match::new(1, 1, &a, &b), Match::new(1, 2, &a, &b)];
        repo.replace_matches(&t.id, &e.id, &first, true).await.unwrap();

        let second = vec![Match::new(1, 1, &b, &a)];
        repo.replace_matches(&t.id, &e.id, &second, true).await.unwrap();

        let stored = repo.get_event_category(&t.id, &e.id).await.unwrap();
        assert!(stored.draw_generated);
        assert_eq!(stored.matches, second);
    }

    #[tokio::test]
    async fn test_rejected_mutation_leaves_event_unchanged() {
        let repo = InMemoryTournamentRepository::new();
        let t = tournament("Open");
        let e = event();
        repo.create_tournament(&t).await.unwrap();
        repo.save_event_category(&t.id, &e).await.unwrap();

        let result = repo
            .update_event_category(
                &t.id,
                &e.id,
                event_mutation(|event| {
                    event.players.push(Player::new("p1", "John Doe"));
                    Err(TournamentError::InvalidInput("rejected".to_string()))
                }),
            )
            .await;

        assert!(result.is_err());
        let stored = repo.get_event_category(&t.id, &e.id).await.unwrap();
        assert!(stored.players.is_empty());
    }
}
