//! DTOs del fixture
//!
//! Los ids llegan como strings y se validan en el controller; las
//! responses exponen los ids ya tipados.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::fixture::StoredMatch;
use crate::scheduling::refiner::{RefinedAssignment, RefinedRound};

// Request para proponer una jornada
#[derive(Debug, Deserialize, Default)]
pub struct ProposeRoundRequest {
    /// Equipos que deben descansar esta jornada
    pub forced_rests: Option<Vec<String>>,
    pub max_attempts: Option<u32>,
    pub seed: Option<u64>,
}

// Un cruce propuesto con su horario y cancha sugeridos
#[derive(Debug, Serialize)]
pub struct ProposedMatchResponse {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub suggested_slot_id: Uuid,
    pub suggested_venue_id: Uuid,
}

// Response de una propuesta de jornada
#[derive(Debug, Serialize)]
pub struct RoundProposalResponse {
    pub round_number: i32,
    pub matches: Vec<ProposedMatchResponse>,
    pub resting: Vec<Uuid>,
    pub warnings: Vec<String>,
    pub global_score: i64,
    pub attempts_run: u32,
}

impl From<RefinedRound> for RoundProposalResponse {
    fn from(refined: RefinedRound) -> Self {
        let matches = refined
            .proposal
            .matches
            .iter()
            .enumerate()
            .map(|(i, m)| ProposedMatchResponse {
                home_team_id: m.home_team_id,
                away_team_id: m.away_team_id,
                suggested_slot_id: refined.slot_assignments[i],
                suggested_venue_id: refined.venue_assignments[i],
            })
            .collect();

        Self {
            round_number: refined.proposal.round_number,
            matches,
            resting: refined.proposal.resting,
            warnings: refined.proposal.warnings,
            global_score: refined.global_score,
            attempts_run: refined.attempts_run,
        }
    }
}

// Request para confirmar una jornada revisada por el administrador
#[derive(Debug, Deserialize)]
pub struct ConfirmRoundRequest {
    pub round_number: i32,
    pub matches: Vec<ConfirmMatchRequest>,
    pub resting: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmMatchRequest {
    pub home_team_id: String,
    pub away_team_id: String,
}

// Response de encuentro persistido
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub id: Uuid,
    pub round_number: i32,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub slot_id: Option<Uuid>,
    pub venue_id: Option<Uuid>,
}

impl From<StoredMatch> for MatchResponse {
    fn from(m: StoredMatch) -> Self {
        Self {
            id: m.id,
            round_number: m.round_number,
            home_team_id: m.home_team_id,
            away_team_id: m.away_team_id,
            slot_id: m.slot_id,
            venue_id: m.venue_id,
        }
    }
}

// Response de jornada confirmada
#[derive(Debug, Serialize)]
pub struct ConfirmedRoundResponse {
    pub round_number: i32,
    pub matches: Vec<MatchResponse>,
}

// Request de asignación automática de horarios y canchas
#[derive(Debug, Deserialize, Default)]
pub struct AssignSlotsRequest {
    /// Jornada a asignar; por defecto la última con encuentros pendientes
    pub round_number: Option<i32>,
    pub priority_venue: Option<String>,
    pub max_attempts: Option<u32>,
    pub prefer_late_days: Option<bool>,
    pub seed: Option<u64>,
}

// Response de asignación automática
#[derive(Debug, Serialize)]
pub struct AssignmentsResponse {
    pub assignments_made: usize,
    pub best_score: i64,
    pub attempts_run: u32,
    pub warnings: Vec<String>,
}

impl From<&RefinedAssignment> for AssignmentsResponse {
    fn from(refined: &RefinedAssignment) -> Self {
        Self {
            assignments_made: refined.assignments.len(),
            best_score: refined.global_score,
            attempts_run: refined.attempts_run,
            warnings: refined.warnings.clone(),
        }
    }
}

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
