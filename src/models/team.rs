//! Modelo de Team
//!
//! Un equipo inscrito en un torneo. Para el motor de fixture el equipo
//! es inmutable: solo importan su id y su nombre para mostrar.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Equipo - mapea a la tabla teams
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub name: String,
}
