//! Asignación de horarios y canchas a los encuentros de una jornada
//!
//! Procesa los encuentros en el orden recibido (el orden es una entrada
//! explícita, no un efecto de inserción). Para cada encuentro filtra los
//! recursos donde algún equipo ya llegó al tope, puntúa el resto y se
//! queda con el mejor; si el filtro vaciara la lista se vuelve a la lista
//! completa. El recurso elegido se marca como usado antes de evaluar el
//! siguiente encuentro, así la unicidad dentro de la jornada sale del
//! propio estado de avance.
//!
//! Ante empate exacto gana el primero en el orden del slice de candidatos
//! (horarios por display_order, canchas por nombre): desempate
//! determinista y documentado.

use std::collections::HashSet;

use uuid::Uuid;

use crate::scheduling::ledgers::UsageLedger;
use crate::scheduling::pairing::PairedMatch;
use crate::scheduling::scorer::{score, ResourceOption, ScoreContext, ScoreWeights};

/// Parámetros compartidos de una pasada de asignación
pub struct AssignmentParams<'a> {
    pub ledger: &'a UsageLedger,
    pub round_number: i32,
    /// Objetivo equitativo continuo: jornadas planificadas / recursos
    pub target: f64,
    pub usage_cap: u32,
    pub weights: &'a ScoreWeights,
}

/// Asigna un recurso a cada encuentro de la jornada, en orden
pub fn assign_round(
    matches: &[PairedMatch],
    options: &[ResourceOption],
    params: &AssignmentParams,
) -> Vec<Uuid> {
    assign_with_state(matches, options, params, HashSet::new())
}

/// Asignación de canchas: idéntica a la de horarios, con la opción de una
/// cancha prioritaria que recibe los primeros encuentros (tantos como
/// horarios haya) antes de repartir equitativamente el resto
pub fn assign_venues(
    matches: &[PairedMatch],
    venues: &[ResourceOption],
    priority_venue: Option<Uuid>,
    slot_count: usize,
    params: &AssignmentParams,
) -> (Vec<Uuid>, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if let Some(priority) = priority_venue {
        if venues.iter().any(|v| v.id == priority) {
            let preferred = slot_count.min(matches.len());
            let mut assigned: Vec<Uuid> = vec![priority; preferred];

            let mut used = HashSet::new();
            used.insert(priority);
            assigned.extend(assign_with_state(
                &matches[preferred..],
                venues,
                params,
                used,
            ));
            return (assigned, warnings);
        }

        warnings.push(format!(
            "La cancha prioritaria {} no está disponible en la categoría; se reparte sin prioridad",
            priority
        ));
    }

    (assign_round(matches, venues, params), warnings)
}

fn assign_with_state(
    matches: &[PairedMatch],
    options: &[ResourceOption],
    params: &AssignmentParams,
    mut used: HashSet<Uuid>,
) -> Vec<Uuid> {
    let mut assigned: Vec<Uuid> = Vec::with_capacity(matches.len());

    for m in matches {
        let under_cap: Vec<&ResourceOption> = options
            .iter()
            .filter(|o| {
                params.ledger.usage_count(m.home_team_id, o.id) < params.usage_cap
                    && params.ledger.usage_count(m.away_team_id, o.id) < params.usage_cap
            })
            .collect();

        // Si todo está al tope no queda más remedio que reincidir
        let candidates: Vec<&ResourceOption> = if under_cap.is_empty() {
            options.iter().collect()
        } else {
            under_cap
        };

        let ctx = ScoreContext {
            ledger: params.ledger,
            round_number: params.round_number,
            target: params.target,
            usage_cap: params.usage_cap,
            used_this_round: &used,
            weights: params.weights,
        };

        let mut best = candidates[0];
        let mut best_score = score(&ctx, m.home_team_id, m.away_team_id, best);
        for candidate in candidates.iter().skip(1) {
            let value = score(&ctx, m.home_team_id, m.away_team_id, candidate);
            if value < best_score {
                best = candidate;
                best_score = value;
            }
        }

        used.insert(best.id);
        assigned.push(best.id);
    }

    assigned
}
