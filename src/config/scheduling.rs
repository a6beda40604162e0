//! Configuración del motor de fixture
//!
//! Agrupa las perillas del generador: cantidad de intentos del
//! refinador, tope de usos por horario y la tabla de pesos del
//! puntuador. Los valores por defecto reproducen el comportamiento de
//! referencia; todos son ajustables por invocación.

use uuid::Uuid;

use crate::scheduling::scorer::ScoreWeights;

/// Configuración de una corrida del motor
#[derive(Debug, Clone)]
pub struct SchedulingConfig {
    /// Intentos máximos del refinador antes de quedarse con el mejor
    pub max_attempts: u32,
    /// Tope de usos de un mismo horario/cancha por equipo
    pub usage_cap: u32,
    /// Semilla base; cada intento usa base + número de intento
    pub base_seed: u64,
    /// Preferir días más tardíos de la semana (domingo sobre sábado)
    pub prefer_late_days: bool,
    /// Cancha que recibe los primeros encuentros de cada jornada
    pub priority_venue: Option<Uuid>,
    pub weights: ScoreWeights,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 12,
            usage_cap: 3,
            base_seed: 0,
            prefer_late_days: true,
            priority_venue: None,
            weights: ScoreWeights::default(),
        }
    }
}
