//! Motor de fixture y asignación de recursos
//!
//! Este módulo contiene el núcleo algorítmico del sistema: la generación
//! de jornadas (emparejamientos round-robin con descansos equitativos) y
//! la asignación de horarios y canchas mediante puntuación ponderada con
//! refinamiento iterativo.
//!
//! Todo el motor es puro y síncrono: trabaja sobre un snapshot inmutable
//! del torneo y nunca toca la base de datos. El que llama decide si
//! confirma el resultado.

pub mod ledgers;
pub mod pairing;
pub mod scorer;
pub mod optimizer;
pub mod refiner;
pub mod reporter;

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use uuid::Uuid;

use crate::models::fixture::{RestRecord, StoredMatch};
use crate::models::slot::TimeSlot;
use crate::models::team::Team;
use crate::models::tournament::Tournament;
use crate::models::venue::Venue;

/// Errores del motor de fixture
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("No se puede generar la jornada: {0}")]
    InfeasiblePairing(String),

    #[error("La categoría no tiene horarios disponibles")]
    NoSlotsAvailable,

    #[error("La categoría no tiene canchas activas")]
    NoVenuesAvailable,

    #[error("Configuración inválida: {0}")]
    InvalidConfiguration(String),
}

/// Clave canónica de un cruce: el par ordenado (menor, mayor)
///
/// Un encuentro es un par no ordenado de equipos; esta clave permite
/// contar cuántas veces se enfrentaron sin importar quién fue local.
pub fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Snapshot inmutable del estado de un torneo
///
/// Se construye una vez por invocación a partir de la historia persistida;
/// los libros de uso se derivan de él y no tienen ciclo de vida propio.
#[derive(Debug, Clone)]
pub struct TournamentSnapshot {
    pub tournament: Tournament,
    pub teams: Vec<Team>,
    pub matches: Vec<StoredMatch>,
    pub rests: Vec<RestRecord>,
    pub slots: Vec<TimeSlot>,
    pub venues: Vec<Venue>,
}

impl TournamentSnapshot {
    /// Número de la última jornada registrada (0 si no hay ninguna)
    pub fn last_round_number(&self) -> i32 {
        self.matches
            .iter()
            .map(|m| m.round_number)
            .chain(self.rests.iter().map(|r| r.round_number))
            .max()
            .unwrap_or(0)
    }

    /// Cuántas veces se enfrentó cada par de equipos
    pub fn meeting_counts(&self) -> HashMap<(Uuid, Uuid), u32> {
        let mut counts: HashMap<(Uuid, Uuid), u32> = HashMap::new();
        for m in &self.matches {
            *counts
                .entry(pair_key(m.home_team_id, m.away_team_id))
                .or_insert(0) += 1;
        }
        counts
    }

    /// Cruces de una jornada concreta
    pub fn pairs_of_round(&self, round_number: i32) -> HashSet<(Uuid, Uuid)> {
        self.matches
            .iter()
            .filter(|m| m.round_number == round_number)
            .map(|m| pair_key(m.home_team_id, m.away_team_id))
            .collect()
    }

    /// Cuántas veces puede cruzarse cada par según el modo del torneo
    pub fn max_meetings(&self) -> u32 {
        if self.tournament.rematch_enabled {
            2
        } else {
            1
        }
    }
}
