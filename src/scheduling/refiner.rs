//! Refinamiento iterativo del fixture
//!
//! Corre la tubería completa (emparejamiento → horarios → canchas) hasta
//! `max_attempts` veces, audita cada resultado con una puntuación global
//! sobre el estado final que quedaría persistido y conserva el intento de
//! menor puntuación, cortando antes si alguno llega a cero. No tiene
//! efectos colaterales: el que llama decide si confirma el ganador.
//!
//! Cada intento se siembra con base_seed + número de intento, así una
//! corrida es reproducible de punta a punta y los intentos podrían
//! evaluarse en paralelo sin sincronización adicional.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use uuid::Uuid;

use crate::config::scheduling::SchedulingConfig;
use crate::models::fixture::StoredMatch;
use crate::models::team::Team;
use crate::scheduling::ledgers::{RestLedger, UsageLedger};
use crate::scheduling::optimizer::{assign_round, assign_venues, AssignmentParams};
use crate::scheduling::pairing::{propose_round, PairedMatch, RoundContext, RoundProposal};
use crate::scheduling::scorer::{ResourceOption, ScoreWeights};
use crate::scheduling::{SchedulingError, TournamentSnapshot};

/// Resultado de refinar una jornada completa
#[derive(Debug, Clone)]
pub struct RefinedRound {
    pub proposal: RoundProposal,
    /// Horario por encuentro, paralelo a proposal.matches
    pub slot_assignments: Vec<Uuid>,
    /// Cancha por encuentro, paralelo a proposal.matches
    pub venue_assignments: Vec<Uuid>,
    pub global_score: i64,
    pub attempts_run: u32,
}

/// Asignación refinada para encuentros ya persistidos
#[derive(Debug, Clone)]
pub struct RefinedAssignment {
    pub assignments: Vec<MatchAssignment>,
    pub global_score: i64,
    pub attempts_run: u32,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchAssignment {
    pub match_id: Uuid,
    pub slot_id: Uuid,
    pub venue_id: Uuid,
}

/// Refina la próxima jornada del torneo: emparejamiento más asignación
pub fn refine(
    snapshot: &TournamentSnapshot,
    forced_rests: &[Uuid],
    config: &SchedulingConfig,
) -> Result<RefinedRound, SchedulingError> {
    let slot_options = slot_options(snapshot, config)?;
    let venue_options = venue_options(snapshot)?;

    let rest_ledger = RestLedger::from_records(&snapshot.rests);
    let slot_ledger = UsageLedger::from_matches(&snapshot.matches, |m| m.slot_id);
    let venue_ledger = UsageLedger::from_matches(&snapshot.matches, |m| m.venue_id);
    let meetings = snapshot.meeting_counts();
    let round_number = snapshot.last_round_number() + 1;
    let previous_pairs = snapshot.pairs_of_round(round_number - 1);

    let ctx = RoundContext {
        round_number,
        teams: &snapshot.teams,
        meetings: &meetings,
        max_meetings: snapshot.max_meetings(),
        rest_ledger: &rest_ledger,
        previous_pairs: &previous_pairs,
        forced_rests,
    };

    let planned = snapshot.tournament.planned_rounds;
    let mut best: Option<RefinedRound> = None;
    let mut executed: u32 = 0;

    for attempt in 0..config.max_attempts.max(1) {
        executed = attempt + 1;
        let mut rng = StdRng::seed_from_u64(config.base_seed.wrapping_add(attempt as u64));
        let explore = if attempt == 0 { None } else { Some(&mut rng) };

        let mut proposal = propose_round(&ctx, explore)?;

        let slot_params = AssignmentParams {
            ledger: &slot_ledger,
            round_number,
            target: planned as f64 / slot_options.len() as f64,
            usage_cap: config.usage_cap,
            weights: &config.weights,
        };
        let slots = assign_round(&proposal.matches, &slot_options, &slot_params);

        let venue_params = AssignmentParams {
            ledger: &venue_ledger,
            round_number,
            target: planned as f64 / venue_options.len() as f64,
            usage_cap: config.usage_cap,
            weights: &config.weights,
        };
        let (venues, venue_warnings) = assign_venues(
            &proposal.matches,
            &venue_options,
            config.priority_venue,
            slot_options.len(),
            &venue_params,
        );
        proposal.warnings.extend(venue_warnings);

        let score = audit_after_assignment(
            snapshot,
            &proposal.matches,
            &slots,
            &venues,
            &slot_ledger,
            &venue_ledger,
            round_number,
            config,
        );

        log::debug!(
            "Intento {} de la jornada {}: puntuación global {}",
            attempt + 1,
            round_number,
            score
        );

        let improves = best.as_ref().map(|b| score < b.global_score).unwrap_or(true);
        if improves {
            best = Some(RefinedRound {
                proposal,
                slot_assignments: slots,
                venue_assignments: venues,
                global_score: score,
                attempts_run: 0,
            });
        }

        if let Some(current) = &best {
            if current.global_score == 0 {
                break;
            }
        }
    }

    // Siempre hay al menos un intento: best no puede estar vacío
    best.map(|mut refined| {
        refined.attempts_run = executed;
        refined
    })
    .ok_or_else(|| {
        SchedulingError::InvalidConfiguration("el refinador no produjo ningún intento".to_string())
    })
}

/// Refina horarios y canchas para encuentros ya persistidos de una
/// jornada. Los intentos varían el orden de procesamiento, que es lo que
/// diferencia una pasada voraz de otra.
pub fn refine_assignments(
    snapshot: &TournamentSnapshot,
    pending: &[StoredMatch],
    config: &SchedulingConfig,
) -> Result<RefinedAssignment, SchedulingError> {
    if pending.is_empty() {
        return Err(SchedulingError::InvalidConfiguration(
            "no hay encuentros pendientes de asignación".to_string(),
        ));
    }

    let slot_options = slot_options(snapshot, config)?;
    let venue_options = venue_options(snapshot)?;

    let round_number = pending[0].round_number;
    if pending.iter().any(|m| m.round_number != round_number) {
        return Err(SchedulingError::InvalidConfiguration(
            "los encuentros pendientes pertenecen a jornadas distintas".to_string(),
        ));
    }

    // La historia excluye los encuentros que se van a reasignar para no
    // contar sus asignaciones viejas
    let pending_ids: Vec<Uuid> = pending.iter().map(|m| m.id).collect();
    let history: Vec<StoredMatch> = snapshot
        .matches
        .iter()
        .filter(|m| !pending_ids.contains(&m.id))
        .cloned()
        .collect();

    let slot_ledger = UsageLedger::from_matches(&history, |m| m.slot_id);
    let venue_ledger = UsageLedger::from_matches(&history, |m| m.venue_id);
    let planned = snapshot.tournament.planned_rounds;

    let mut best: Option<RefinedAssignment> = None;
    let mut executed: u32 = 0;

    for attempt in 0..config.max_attempts.max(1) {
        executed = attempt + 1;
        let mut ordered: Vec<&StoredMatch> = pending.iter().collect();
        if attempt > 0 {
            let mut rng = StdRng::seed_from_u64(config.base_seed.wrapping_add(attempt as u64));
            ordered.shuffle(&mut rng);
        }

        let pairs: Vec<PairedMatch> = ordered
            .iter()
            .map(|m| PairedMatch {
                home_team_id: m.home_team_id,
                away_team_id: m.away_team_id,
            })
            .collect();

        let slot_params = AssignmentParams {
            ledger: &slot_ledger,
            round_number,
            target: planned as f64 / slot_options.len() as f64,
            usage_cap: config.usage_cap,
            weights: &config.weights,
        };
        let slots = assign_round(&pairs, &slot_options, &slot_params);

        let venue_params = AssignmentParams {
            ledger: &venue_ledger,
            round_number,
            target: planned as f64 / venue_options.len() as f64,
            usage_cap: config.usage_cap,
            weights: &config.weights,
        };
        let (venues, warnings) = assign_venues(
            &pairs,
            &venue_options,
            config.priority_venue,
            slot_options.len(),
            &venue_params,
        );

        let score = audit_after_assignment(
            snapshot,
            &pairs,
            &slots,
            &venues,
            &slot_ledger,
            &venue_ledger,
            round_number,
            config,
        );

        let improves = best.as_ref().map(|b| score < b.global_score).unwrap_or(true);
        if improves {
            best = Some(RefinedAssignment {
                assignments: ordered
                    .iter()
                    .zip(slots.iter().zip(venues.iter()))
                    .map(|(m, (slot_id, venue_id))| MatchAssignment {
                        match_id: m.id,
                        slot_id: *slot_id,
                        venue_id: *venue_id,
                    })
                    .collect(),
                global_score: score,
                attempts_run: 0,
                warnings,
            });
        }

        if let Some(current) = &best {
            if current.global_score == 0 {
                break;
            }
        }
    }

    best.map(|mut refined| {
        refined.attempts_run = executed;
        refined
    })
    .ok_or_else(|| {
        SchedulingError::InvalidConfiguration("el refinador no produjo ningún intento".to_string())
    })
}

fn slot_options(
    snapshot: &TournamentSnapshot,
    config: &SchedulingConfig,
) -> Result<Vec<ResourceOption>, SchedulingError> {
    let mut slots = snapshot.slots.clone();
    if slots.is_empty() {
        return Err(SchedulingError::NoSlotsAvailable);
    }
    slots.sort_by_key(|s| s.display_order);

    Ok(slots
        .iter()
        .map(|s| ResourceOption {
            id: s.id,
            preference_rank: if config.prefer_late_days {
                s.weekday.rank()
            } else {
                0
            },
        })
        .collect())
}

fn venue_options(snapshot: &TournamentSnapshot) -> Result<Vec<ResourceOption>, SchedulingError> {
    let mut venues: Vec<_> = snapshot.venues.iter().filter(|v| v.active).collect();
    if venues.is_empty() {
        return Err(SchedulingError::NoVenuesAvailable);
    }
    venues.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    Ok(venues
        .iter()
        .map(|v| ResourceOption {
            id: v.id,
            preference_rank: 0,
        })
        .collect())
}

/// Auditoría de estado final: suma las mismas familias de penalización
/// del puntuador, pero evaluadas sobre los conteos que quedarían
/// persistidos si se confirmara el intento. Cero significa reparto
/// perfecto.
#[allow(clippy::too_many_arguments)]
fn audit_after_assignment(
    snapshot: &TournamentSnapshot,
    matches: &[PairedMatch],
    slots: &[Uuid],
    venues: &[Uuid],
    slot_ledger: &UsageLedger,
    venue_ledger: &UsageLedger,
    round_number: i32,
    config: &SchedulingConfig,
) -> i64 {
    let mut slot_after = slot_ledger.clone();
    let mut venue_after = venue_ledger.clone();
    for (m, (slot_id, venue_id)) in matches.iter().zip(slots.iter().zip(venues.iter())) {
        slot_after.record(m.home_team_id, *slot_id, round_number);
        slot_after.record(m.away_team_id, *slot_id, round_number);
        venue_after.record(m.home_team_id, *venue_id, round_number);
        venue_after.record(m.away_team_id, *venue_id, round_number);
    }

    let slot_ids: Vec<Uuid> = snapshot.slots.iter().map(|s| s.id).collect();
    let venue_ids: Vec<Uuid> = snapshot
        .venues
        .iter()
        .filter(|v| v.active)
        .map(|v| v.id)
        .collect();

    audit_ledger(
        &snapshot.teams,
        &slot_ids,
        &slot_after,
        round_number,
        snapshot.tournament.planned_rounds,
        config.usage_cap,
        &config.weights,
    ) + audit_ledger(
        &snapshot.teams,
        &venue_ids,
        &venue_after,
        round_number,
        snapshot.tournament.planned_rounds,
        config.usage_cap,
        &config.weights,
    )
}

fn audit_ledger(
    teams: &[Team],
    resource_ids: &[Uuid],
    ledger: &UsageLedger,
    rounds_scheduled: i32,
    planned_rounds: i32,
    usage_cap: u32,
    weights: &ScoreWeights,
) -> i64 {
    if resource_ids.is_empty() {
        return 0;
    }

    let per_resource = rounds_scheduled as f64 / resource_ids.len() as f64;
    let floor = per_resource.floor() as i64;
    let ceil = per_resource.ceil() as i64;
    let remaining = planned_rounds - rounds_scheduled;

    let mut total: i64 = 0;
    for team in teams {
        for resource_id in resource_ids {
            let count = ledger.usage_count(team.id, *resource_id) as i64;

            if count > usage_cap as i64 {
                total += (count - usage_cap as i64) * weights.hard_cap;
            } else if count == 1 && remaining >= 2 {
                // Un conteo que quede en 1 con jornadas por delante es el
                // estado que el moldeado quiere evitar
                total += weights.near_cap;
            }

            let deviation = if count < floor {
                floor - count
            } else if count > ceil {
                count - ceil
            } else {
                0
            };
            total += deviation * weights.balance_step;
        }
    }

    total
}
