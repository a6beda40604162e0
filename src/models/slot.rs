//! Modelo de TimeSlot
//!
//! Un horario es un par (día de la semana, hora de inicio) compartido por
//! todas las jornadas de una categoría. El conjunto es pequeño (<= ~10).

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Día de la semana - mapea al ENUM day_of_week
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "day_of_week", rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Posición dentro de la semana, lunes = 0 .. domingo = 6
    pub fn rank(&self) -> i64 {
        match self {
            DayOfWeek::Monday => 0,
            DayOfWeek::Tuesday => 1,
            DayOfWeek::Wednesday => 2,
            DayOfWeek::Thursday => 3,
            DayOfWeek::Friday => 4,
            DayOfWeek::Saturday => 5,
            DayOfWeek::Sunday => 6,
        }
    }
}

/// Horario - mapea a la tabla time_slots
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeSlot {
    pub id: Uuid,
    pub category_id: Uuid,
    pub weekday: DayOfWeek,
    pub start_time: NaiveTime,
    /// Orden de presentación; también es el desempate determinista del
    /// optimizador cuando dos horarios puntúan igual
    pub display_order: i32,
}
