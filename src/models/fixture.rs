//! Modelos de fixture
//!
//! Un encuentro pertenece a exactamente una jornada. El horario y la
//! cancha son opcionales hasta que el optimizador los asigna. Una jornada
//! se considera cerrada cuando alguno de sus encuentros tiene resultado
//! cargado; las jornadas cerradas no pueden borrarse.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Encuentro - mapea a la tabla matches
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredMatch {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub round_number: i32,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub slot_id: Option<Uuid>,
    pub venue_id: Option<Uuid>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

impl StoredMatch {
    /// Un encuentro está jugado cuando tiene resultado cargado
    pub fn is_played(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }
}

/// Descanso - mapea a la tabla rest_records
///
/// Registra que un equipo no jugó en una jornada. Solo existe cuando la
/// cantidad de equipos jugables es impar.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RestRecord {
    pub tournament_id: Uuid,
    pub round_number: i32,
    pub team_id: Uuid,
}
