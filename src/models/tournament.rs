//! Modelo de Tournament
//!
//! Un torneo pertenece a una categoría (que define sus horarios y canchas
//! disponibles) y declara cuántas jornadas están planificadas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Torneo principal - mapea a la tabla tournaments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tournament {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    /// Revancha: si está activa, cada par de equipos juega dos veces
    pub rematch_enabled: bool,
    /// Jornadas planificadas del torneo, usadas para el objetivo de
    /// distribución equitativa (jornadas / horarios)
    pub planned_rounds: i32,
    pub created_at: DateTime<Utc>,
}
