//! Modelo de Venue
//!
//! Una cancha puede marcarse inactiva sin borrarla; el motor solo
//! considera canchas activas.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Cancha - mapea a la tabla venues
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Venue {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub active: bool,
}
