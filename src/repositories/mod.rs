//! Repositorios
//!
//! El motor de fixture accede a la persistencia únicamente a través del
//! trait `FixtureStore`: el snapshot se lee completo antes de ejecutar el
//! algoritmo y las escrituras ocurren recién cuando el que llama confirma
//! un resultado. `PgFixtureStore` es la implementación productiva sobre
//! PostgreSQL.

pub mod fixture_repository;

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::fixture::{RestRecord, StoredMatch};
use crate::models::slot::TimeSlot;
use crate::models::team::Team;
use crate::models::tournament::Tournament;
use crate::models::venue::Venue;
use crate::scheduling::pair_key;
use crate::scheduling::pairing::RoundProposal;
use crate::utils::errors::AppError;

pub use fixture_repository::PgFixtureStore;

/// Actualización de horario y cancha de un encuentro
#[derive(Debug, Clone)]
pub struct AssignmentUpdate {
    pub match_id: Uuid,
    pub slot_id: Uuid,
    pub venue_id: Uuid,
}

/// Colaborador de persistencia del motor de fixture
#[async_trait]
pub trait FixtureStore: Send + Sync {
    async fn tournament(&self, tournament_id: Uuid) -> Result<Tournament, AppError>;

    async fn teams(&self, tournament_id: Uuid) -> Result<Vec<Team>, AppError>;

    /// La historia faltante es historia vacía: un torneo nuevo
    /// legítimamente no tiene descansos ni encuentros
    async fn rest_history(&self, tournament_id: Uuid) -> Result<Vec<RestRecord>, AppError>;

    async fn match_history(&self, tournament_id: Uuid) -> Result<Vec<StoredMatch>, AppError>;

    async fn available_slots(&self, category_id: Uuid) -> Result<Vec<TimeSlot>, AppError>;

    async fn available_venues(&self, category_id: Uuid) -> Result<Vec<Venue>, AppError>;

    /// Persiste una jornada confirmada: sus encuentros y sus descansos
    async fn insert_round(
        &self,
        tournament_id: Uuid,
        proposal: &RoundProposal,
    ) -> Result<Vec<StoredMatch>, AppError>;

    async fn update_assignments(&self, updates: &[AssignmentUpdate]) -> Result<u64, AppError>;

    /// Borra una jornada no cerrada con sus encuentros y descansos
    async fn delete_round(&self, tournament_id: Uuid, round_number: i32) -> Result<(), AppError>;

    /// Cuántas veces se cruzó ya cada par de equipos, derivado de la
    /// historia de encuentros
    async fn played_pairs(
        &self,
        tournament_id: Uuid,
    ) -> Result<HashMap<(Uuid, Uuid), u32>, AppError> {
        let matches = self.match_history(tournament_id).await?;
        let mut counts: HashMap<(Uuid, Uuid), u32> = HashMap::new();
        for m in &matches {
            *counts
                .entry(pair_key(m.home_team_id, m.away_team_id))
                .or_insert(0) += 1;
        }
        Ok(counts)
    }
}
