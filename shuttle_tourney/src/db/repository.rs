//! Repository trait definitions for testability and dependency injection.
//!
//! The tournament manager only talks to storage through
//! [`TournamentRepository`], so tests run against the in-memory store and the
//! server can switch to PostgreSQL without touching business rules.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::time::Duration;

use super::timeouts::{DEFAULT_QUERY_TIMEOUT, DEFAULT_TRANSACTION_TIMEOUT, with_timeout};
use crate::tournament::{EventCategory, Match, Tournament, TournamentError, TournamentResult};

/// In-place change applied to a stored event category under the store's lock.
///
/// Returning an error aborts the change and leaves the stored category untouched.
pub type EventMutation = Box<dyn FnOnce(&mut EventCategory) -> TournamentResult<()> + Send>;

/// Box a closure as an [`EventMutation`]
pub fn event_mutation<F>(mutation: F) -> EventMutation
where
    F: FnOnce(&mut EventCategory) -> TournamentResult<()> + Send + 'static,
{
    Box::new(mutation)
}

/// Trait for tournament storage operations
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    /// Check that the backing store is reachable
    async fn health_check(&self) -> TournamentResult<()>;

    /// Store a new tournament together with any event categories it carries
    async fn create_tournament(&self, tournament: &Tournament) -> TournamentResult<()>;

    /// Get a tournament with all its event categories
    async fn get_tournament(&self, tournament_id: &str) -> TournamentResult<Tournament>;

    /// All tournaments in creation order
    async fn list_tournaments(&self) -> TournamentResult<Vec<Tournament>>;

    /// Overwrite tournament header fields. Stored event categories are kept.
    async fn update_tournament(&self, tournament: &Tournament) -> TournamentResult<()>;

    /// Delete a tournament and all its event categories
    async fn delete_tournament(&self, tournament_id: &str) -> TournamentResult<()>;

    /// Get one event category of a tournament
    async fn get_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
    ) -> TournamentResult<EventCategory>;

    /// Insert or overwrite an event category as given, matches included
    async fn save_event_category(
        &self,
        tournament_id: &str,
        event: &EventCategory,
    ) -> TournamentResult<()>;

    /// Apply a mutation to a stored event category atomically and return the result
    async fn update_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
        mutation: EventMutation,
    ) -> TournamentResult<EventCategory>;

    /// Delete one event category
    async fn delete_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
    ) -> TournamentResult<()>;

    /// Replace the whole match list of an event category and set its draw flag
    async fn replace_matches(
        &self,
        tournament_id: &str,
        event_id: &str,
        matches: &[Match],
        draw_generated: bool,
    ) -> TournamentResult<()>;
}

/// Tournament header as stored: event categories live in their own table.
fn header_of(tournament: &Tournament) -> Tournament {
    Tournament {
        event_categories: Vec::new(),
        ..tournament.clone()
    }
}

fn decode_tournament(row: &PgRow) -> TournamentResult<Tournament> {
    let Json(tournament): Json<Tournament> = row.try_get("payload")?;
    Ok(tournament)
}

fn decode_event(row: &PgRow) -> TournamentResult<EventCategory> {
    let Json(event): Json<EventCategory> = row.try_get("payload")?;
    Ok(event)
}

/// PostgreSQL implementation of `TournamentRepository`.
///
/// Tournament headers and event categories are stored as JSONB documents.
/// Every read-modify-write runs in one transaction holding a row lock.
pub struct PgTournamentRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgTournamentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Override the per-query deadline. Transactions get twice this value.
    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    fn transaction_timeout(&self) -> Duration {
        if self.query_timeout == DEFAULT_QUERY_TIMEOUT {
            DEFAULT_TRANSACTION_TIMEOUT
        } else {
            self.query_timeout * 2
        }
    }

    async fn tournament_exists(
        tx: &mut Transaction<'_, Postgres>,
        tournament_id: &str,
    ) -> TournamentResult<bool> {
        let row = sqlx::query("SELECT 1 FROM tournaments WHERE id = $1")
            .bind(tournament_id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row.is_some())
    }

    /// Lock an event row for the rest of the transaction
    async fn lock_event(
        tx: &mut Transaction<'_, Postgres>,
        tournament_id: &str,
        event_id: &str,
    ) -> TournamentResult<EventCategory> {
        let row = sqlx::query(
            "SELECT payload FROM event_categories
             WHERE tournament_id = $1 AND id = $2
             FOR UPDATE",
        )
        .bind(tournament_id)
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await?;

        if let Some(row) = row {
            return decode_event(&row);
        }
        if Self::tournament_exists(tx, tournament_id).await? {
            Err(TournamentError::EventNotFound(event_id.to_string()))
        } else {
            Err(TournamentError::TournamentNotFound(tournament_id.to_string()))
        }
    }

    async fn write_event(
        tx: &mut Transaction<'_, Postgres>,
        tournament_id: &str,
        event: &EventCategory,
    ) -> TournamentResult<()> {
        sqlx::query(
            "INSERT INTO event_categories (tournament_id, id, payload, draw_generated)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (tournament_id, id)
             DO UPDATE SET payload = EXCLUDED.payload,
                           draw_generated = EXCLUDED.draw_generated,
                           updated_at = NOW()",
        )
        .bind(tournament_id)
        .bind(&event.id)
        .bind(Json(event))
        .bind(event.draw_generated)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn load_events(&self, tournament_id: &str) -> TournamentResult<Vec<EventCategory>> {
        let rows = sqlx::query(
            "SELECT payload FROM event_categories
             WHERE tournament_id = $1
             ORDER BY position",
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_event).collect()
    }
}

#[async_trait]
impl TournamentRepository for PgTournamentRepository {
    async fn health_check(&self) -> TournamentResult<()> {
        with_timeout(self.query_timeout, async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
        .await
    }

    async fn create_tournament(&self, tournament: &Tournament) -> TournamentResult<()> {
        with_timeout(self.transaction_timeout(), async {
            let mut tx = self.pool.begin().await?;

            let inserted = sqlx::query(
                "INSERT INTO tournaments (id, payload, created_at)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(&tournament.id)
            .bind(Json(header_of(tournament)))
            .bind(tournament.created_at)
            .execute(&mut *tx)
            .await?;

            if inserted.rows_affected() == 0 {
                return Err(TournamentError::InvalidInput(format!(
                    "Tournament {} already exists",
                    tournament.id
                )));
            }

            for event in &tournament.event_categories {
                Self::write_event(&mut tx, &tournament.id, event).await?;
            }

            tx.commit().await?;
            Ok(())
        })
        .await
    }

    async fn get_tournament(&self, tournament_id: &str) -> TournamentResult<Tournament> {
        with_timeout(self.query_timeout, async {
            let row = sqlx::query("SELECT payload FROM tournaments WHERE id = $1")
                .bind(tournament_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| TournamentError::TournamentNotFound(tournament_id.to_string()))?;

            let mut tournament = decode_tournament(&row)?;
            tournament.event_categories = self.load_events(tournament_id).await?;
            Ok(tournament)
        })
        .await
    }

    async fn list_tournaments(&self) -> TournamentResult<Vec<Tournament>> {
        with_timeout(self.query_timeout, async {
            let rows = sqlx::query("SELECT id, payload FROM tournaments ORDER BY created_at, id")
                .fetch_all(&self.pool)
                .await?;

            let mut tournaments = Vec::with_capacity(rows.len());
            for row in &rows {
                let mut tournament = decode_tournament(row)?;
                let id: String = row.try_get("id")?;
                tournament.event_categories = self.load_events(&id).await?;
                tournaments.push(tournament);
            }
            Ok(tournaments)
        })
        .await
    }

    async fn update_tournament(&self, tournament: &Tournament) -> TournamentResult<()> {
        with_timeout(self.query_timeout, async {
            let result = sqlx::query(
                "UPDATE tournaments SET payload = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(&tournament.id)
            .bind(Json(header_of(tournament)))
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(TournamentError::TournamentNotFound(tournament.id.clone()));
            }
            Ok(())
        })
        .await
    }

    async fn delete_tournament(&self, tournament_id: &str) -> TournamentResult<()> {
        with_timeout(self.query_timeout, async {
            let result = sqlx::query("DELETE FROM tournaments WHERE id = $1")
                .bind(tournament_id)
                .execute(&self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(TournamentError::TournamentNotFound(tournament_id.to_string()));
            }
            Ok(())
        })
        .await
    }

    async fn get_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
    ) -> TournamentResult<EventCategory> {
        with_timeout(self.query_timeout, async {
            let row = sqlx::query(
                "SELECT payload FROM event_categories WHERE tournament_id = $1 AND id = $2",
            )
            .bind(tournament_id)
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;

            if let Some(row) = row {
                return decode_event(&row);
            }

            let tournament = sqlx::query("SELECT 1 FROM tournaments WHERE id = $1")
                .bind(tournament_id)
                .fetch_optional(&self.pool)
                .await?;
            match tournament {
                Some(_) => Err(TournamentError::EventNotFound(event_id.to_string())),
                None => Err(TournamentError::TournamentNotFound(tournament_id.to_string())),
            }
        })
        .await
    }

    async fn save_event_category(
        &self,
        tournament_id: &str,
        event: &EventCategory,
    ) -> TournamentResult<()> {
        with_timeout(self.transaction_timeout(), async {
            let mut tx = self.pool.begin().await?;

            let locked = sqlx::query("SELECT 1 FROM tournaments WHERE id = $1 FOR UPDATE")
                .bind(tournament_id)
                .fetch_optional(&mut *tx)
                .await?;
            if locked.is_none() {
                return Err(TournamentError::TournamentNotFound(tournament_id.to_string()));
            }

            Self::write_event(&mut tx, tournament_id, event).await?;
            tx.commit().await?;
            Ok(())
        })
        .await
    }

    async fn update_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
        mutation: EventMutation,
    ) -> TournamentResult<EventCategory> {
        with_timeout(self.transaction_timeout(), async {
            let mut tx = self.pool.begin().await?;
            let mut event = Self::lock_event(&mut tx, tournament_id, event_id).await?;

            // Dropping the transaction on error rolls it back
            mutation(&mut event)?;

            Self::write_event(&mut tx, tournament_id, &event).await?;
            tx.commit().await?;
            Ok(event)
        })
        .await
    }

    async fn delete_event_category(
        &self,
        tournament_id: &str,
        event_id: &str,
    ) -> TournamentResult<()> {
        with_timeout(self.transaction_timeout(), async {
            let mut tx = self.pool.begin().await?;
            Self::lock_event(&mut tx, tournament_id, event_id).await?;

            sqlx::query("DELETE FROM event_categories WHERE tournament_id = $1 AND id = $2")
                .bind(tournament_id)
                .bind(event_id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok(())
        })
        .await
    }

    async fn replace_matches(
        &self,
        tournament_id: &str,
        event_id: &str,
        matches: &[Match],
        draw_generated: bool,
    ) -> TournamentResult<()> {
        with_timeout(self.transaction_timeout(), async {
            let mut tx = self.pool.begin().await?;
            let mut event = Self::lock_event(&mut tx, tournament_id, event_id).await?;

            event.matches = matches.to_vec();
            event.draw_generated = draw_generated;

            Self::write_event(&mut tx, tournament_id, &event).await?;
            tx.commit().await?;
            Ok(())
        })
        .await
    }
}
