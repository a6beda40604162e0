//! Repositorio de fixture sobre PostgreSQL

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::fixture::{RestRecord, StoredMatch};
use crate::models::slot::TimeSlot;
use crate::models::team::Team;
use crate::models::tournament::Tournament;
use crate::models::venue::Venue;
use crate::repositories::{AssignmentUpdate, FixtureStore};
use crate::scheduling::pairing::RoundProposal;
use crate::utils::errors::{not_found_error, AppError};

pub struct PgFixtureStore {
    pool: PgPool,
}

impl PgFixtureStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FixtureStore for PgFixtureStore {
    async fn tournament(&self, tournament_id: Uuid) -> Result<Tournament, AppError> {
        let tournament = sqlx::query_as::<_, Tournament>(
            "SELECT * FROM tournaments WHERE id = $1",
        )
        .bind(tournament_id)
        .fetch_optional(&self.pool)
        .await?;

        tournament.ok_or_else(|| not_found_error("Tournament", &tournament_id.to_string()))
    }

    async fn teams(&self, tournament_id: Uuid) -> Result<Vec<Team>, AppError> {
        let teams = sqlx::query_as::<_, Team>(
            "SELECT * FROM teams WHERE tournament_id = $1 ORDER BY name",
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    async fn rest_history(&self, tournament_id: Uuid) -> Result<Vec<RestRecord>, AppError> {
        let rests = sqlx::query_as::<_, RestRecord>(
            "SELECT * FROM rest_records WHERE tournament_id = $1 ORDER BY round_number",
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rests)
    }

    async fn match_history(&self, tournament_id: Uuid) -> Result<Vec<StoredMatch>, AppError> {
        let matches = sqlx::query_as::<_, StoredMatch>(
            "SELECT * FROM matches WHERE tournament_id = $1 ORDER BY round_number",
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(matches)
    }

    async fn available_slots(&self, category_id: Uuid) -> Result<Vec<TimeSlot>, AppError> {
        let slots = sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE category_id = $1 ORDER BY display_order",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    async fn available_venues(&self, category_id: Uuid) -> Result<Vec<Venue>, AppError> {
        let venues = sqlx::query_as::<_, Venue>(
            "SELECT * FROM venues WHERE category_id = $1 AND active = true ORDER BY name",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(venues)
    }

    async fn insert_round(
        &self,
        tournament_id: Uuid,
        proposal: &RoundProposal,
    ) -> Result<Vec<StoredMatch>, AppError> {
        let mut tx = self.pool.begin().await?;

        // La unicidad de jornada por torneo se verifica dentro de la
        // transacción: dos confirmaciones concurrentes no pueden crear
        // la misma jornada dos veces
        let existing: Option<(i32,)> = sqlx::query_as(
            "SELECT round_number FROM matches WHERE tournament_id = $1 AND round_number = $2 LIMIT 1",
        )
        .bind(tournament_id)
        .bind(proposal.round_number)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "La jornada {} ya existe en el torneo",
                proposal.round_number
            )));
        }

        let mut inserted: Vec<StoredMatch> = Vec::with_capacity(proposal.matches.len());
        for m in &proposal.matches {
            let stored = sqlx::query_as::<_, StoredMatch>(
                r#"
                INSERT INTO matches (id, tournament_id, round_number, home_team_id, away_team_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(tournament_id)
            .bind(proposal.round_number)
            .bind(m.home_team_id)
            .bind(m.away_team_id)
            .fetch_one(&mut *tx)
            .await?;

            inserted.push(stored);
        }

        for team_id in &proposal.resting {
            sqlx::query(
                "INSERT INTO rest_records (tournament_id, round_number, team_id) VALUES ($1, $2, $3)",
            )
            .bind(tournament_id)
            .bind(proposal.round_number)
            .bind(team_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        log::info!(
            "✅ Jornada {} confirmada: {} encuentros, {} descansos",
            proposal.round_number,
            inserted.len(),
            proposal.resting.len()
        );

        Ok(inserted)
    }

    async fn update_assignments(&self, updates: &[AssignmentUpdate]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut updated: u64 = 0;
        for update in updates {
            let result = sqlx::query(
                "UPDATE matches SET slot_id = $2, venue_id = $3 WHERE id = $1",
            )
            .bind(update.match_id)
            .bind(update.slot_id)
            .bind(update.venue_id)
            .execute(&mut *tx)
            .await?;

            updated += result.rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_round(&self, tournament_id: Uuid, round_number: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Una jornada con resultados cargados está cerrada y no se borra
        let played: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM matches
            WHERE tournament_id = $1 AND round_number = $2
              AND home_score IS NOT NULL AND away_score IS NOT NULL
            LIMIT 1
            "#,
        )
        .bind(tournament_id)
        .bind(round_number)
        .fetch_optional(&mut *tx)
        .await?;

        if played.is_some() {
            return Err(AppError::Conflict(format!(
                "La jornada {} ya tiene resultados cargados y no puede borrarse",
                round_number
            )));
        }

        let deleted = sqlx::query(
            "DELETE FROM matches WHERE tournament_id = $1 AND round_number = $2",
        )
        .bind(tournament_id)
        .bind(round_number)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM rest_records WHERE tournament_id = $1 AND round_number = $2",
        )
        .bind(tournament_id)
        .bind(round_number)
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            return Err(not_found_error("Round", &round_number.to_string()));
        }

        tx.commit().await?;

        log::info!("🗑️ Jornada {} eliminada del torneo {}", round_number, tournament_id);
        Ok(())
    }
}
