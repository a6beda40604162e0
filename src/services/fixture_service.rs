//! Servicio de fixture
//!
//! Orquesta el ciclo completo: arma el snapshot desde la persistencia,
//! ejecuta el motor y, solo cuando el administrador confirma, escribe el
//! resultado. Entre la propuesta y la confirmación no se persiste nada,
//! así descartar un diálogo de propuesta no deja estado a medias.

use std::collections::HashSet;

use uuid::Uuid;

use crate::config::scheduling::SchedulingConfig;
use crate::models::fixture::StoredMatch;
use crate::repositories::{AssignmentUpdate, FixtureStore};
use crate::scheduling::pair_key;
use crate::scheduling::pairing::RoundProposal;
use crate::scheduling::refiner::{self, RefinedAssignment, RefinedRound};
use crate::scheduling::reporter::{self, DistributionReport};
use crate::scheduling::TournamentSnapshot;
use crate::utils::errors::{bad_request_error, AppError};

/// Opciones de una propuesta de jornada
#[derive(Debug, Clone, Default)]
pub struct ProposeOptions {
    pub forced_rests: Vec<Uuid>,
    pub config: SchedulingConfig,
}

pub struct FixtureService<S: FixtureStore> {
    store: S,
}

impl<S: FixtureStore> FixtureService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lee el estado completo del torneo de una sola vez; el motor
    /// trabaja después sin volver a tocar la persistencia
    async fn snapshot(&self, tournament_id: Uuid) -> Result<TournamentSnapshot, AppError> {
        let tournament = self.store.tournament(tournament_id).await?;
        let teams = self.store.teams(tournament_id).await?;
        let rests = self.store.rest_history(tournament_id).await?;
        let matches = self.store.match_history(tournament_id).await?;
        let slots = self.store.available_slots(tournament.category_id).await?;
        let venues = self.store.available_venues(tournament.category_id).await?;

        Ok(TournamentSnapshot {
            tournament,
            teams,
            matches,
            rests,
            slots,
            venues,
        })
    }

    /// Propone la próxima jornada con horarios y canchas sugeridos
    pub async fn propose_round(
        &self,
        tournament_id: Uuid,
        options: &ProposeOptions,
    ) -> Result<RefinedRound, AppError> {
        let snapshot = self.snapshot(tournament_id).await?;

        log::info!(
            "🎲 Generando jornada {} para el torneo '{}' ({} equipos)",
            snapshot.last_round_number() + 1,
            snapshot.tournament.name,
            snapshot.teams.len()
        );

        let refined = refiner::refine(&snapshot, &options.forced_rests, &options.config)?;

        log::info!(
            "✅ Propuesta lista en {} intentos con puntuación global {}",
            refined.attempts_run,
            refined.global_score
        );

        Ok(refined)
    }

    /// Persiste una jornada revisada por el administrador
    pub async fn confirm_round(
        &self,
        tournament_id: Uuid,
        proposal: &RoundProposal,
    ) -> Result<Vec<StoredMatch>, AppError> {
        let snapshot = self.snapshot(tournament_id).await?;

        let expected = snapshot.last_round_number() + 1;
        if proposal.round_number != expected {
            return Err(bad_request_error(&format!(
                "La jornada a confirmar debe ser la {}, se recibió la {}",
                expected, proposal.round_number
            )));
        }

        let team_ids: HashSet<Uuid> = snapshot.teams.iter().map(|t| t.id).collect();
        let mut seen: HashSet<Uuid> = HashSet::new();

        for m in &proposal.matches {
            if m.home_team_id == m.away_team_id {
                return Err(bad_request_error(
                    "Un encuentro no puede enfrentar a un equipo consigo mismo",
                ));
            }
            for team_id in [m.home_team_id, m.away_team_id] {
                if !team_ids.contains(&team_id) {
                    return Err(bad_request_error(&format!(
                        "El equipo {} no pertenece al torneo",
                        team_id
                    )));
                }
                if !seen.insert(team_id) {
                    return Err(bad_request_error(&format!(
                        "El equipo {} aparece más de una vez en la jornada",
                        team_id
                    )));
                }
            }
        }

        for team_id in &proposal.resting {
            if !team_ids.contains(team_id) {
                return Err(bad_request_error(&format!(
                    "El equipo {} no pertenece al torneo",
                    team_id
                )));
            }
            if seen.contains(team_id) {
                return Err(bad_request_error(&format!(
                    "El equipo {} no puede jugar y descansar en la misma jornada",
                    team_id
                )));
            }
        }

        // Un administrador puede editar la propuesta antes de confirmar:
        // los cruces ya agotados se rechazan acá
        let played = self.store.played_pairs(tournament_id).await?;
        let max_meetings = snapshot.max_meetings();
        for m in &proposal.matches {
            let met = played
                .get(&pair_key(m.home_team_id, m.away_team_id))
                .copied()
                .unwrap_or(0);
            if met >= max_meetings {
                return Err(AppError::Conflict(format!(
                    "Los equipos {} y {} ya agotaron sus cruces en este torneo",
                    m.home_team_id, m.away_team_id
                )));
            }
        }

        self.store.insert_round(tournament_id, proposal).await
    }

    /// Asigna horarios y canchas a los encuentros pendientes de una
    /// jornada y persiste el mejor intento
    pub async fn assign_slots_automatically(
        &self,
        tournament_id: Uuid,
        round_number: Option<i32>,
        config: &SchedulingConfig,
    ) -> Result<RefinedAssignment, AppError> {
        let snapshot = self.snapshot(tournament_id).await?;

        let round = round_number.unwrap_or_else(|| snapshot.last_round_number());
        let pending: Vec<StoredMatch> = snapshot
            .matches
            .iter()
            .filter(|m| {
                m.round_number == round && (m.slot_id.is_none() || m.venue_id.is_none())
            })
            .cloned()
            .collect();

        if pending.is_empty() {
            return Err(bad_request_error(&format!(
                "La jornada {} no tiene encuentros pendientes de asignación",
                round
            )));
        }

        let refined = refiner::refine_assignments(&snapshot, &pending, config)?;

        let updates: Vec<AssignmentUpdate> = refined
            .assignments
            .iter()
            .map(|a| AssignmentUpdate {
                match_id: a.match_id,
                slot_id: a.slot_id,
                venue_id: a.venue_id,
            })
            .collect();

        let updated = self.store.update_assignments(&updates).await?;
        log::info!(
            "✅ {} asignaciones aplicadas a la jornada {} (puntuación {})",
            updated,
            round,
            refined.global_score
        );

        Ok(refined)
    }

    /// Reporte de distribución sobre el estado confirmado
    pub async fn distribution_report(
        &self,
        tournament_id: Uuid,
    ) -> Result<DistributionReport, AppError> {
        let snapshot = self.snapshot(tournament_id).await?;
        Ok(reporter::report(&snapshot))
    }

    /// Borra una jornada todavía no cerrada
    pub async fn delete_round(
        &self,
        tournament_id: Uuid,
        round_number: i32,
    ) -> Result<(), AppError> {
        self.store.delete_round(tournament_id, round_number).await
    }
}
