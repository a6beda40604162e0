//! Generación de jornadas
//!
//! Propone los cruces de una jornada: elige los descansos minimizando el
//! acumulado histórico y busca un emparejamiento perfecto del resto por
//! backtracking, evitando cruces agotados y la repetición inmediata de la
//! jornada anterior. Las relajaciones de restricciones blandas se
//! informan como advertencias en la propuesta, nunca se ocultan.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::team::Team;
use crate::scheduling::ledgers::RestLedger;
use crate::scheduling::{pair_key, SchedulingError};

/// Cruce propuesto, todavía sin horario ni cancha
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairedMatch {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
}

/// Propuesta de jornada: cruces ordenados más los equipos que descansan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundProposal {
    pub round_number: i32,
    pub matches: Vec<PairedMatch>,
    pub resting: Vec<Uuid>,
    pub warnings: Vec<String>,
}

/// Contexto inmutable para proponer una jornada
pub struct RoundContext<'a> {
    pub round_number: i32,
    pub teams: &'a [Team],
    /// Cuántas veces se cruzó ya cada par (clave canónica)
    pub meetings: &'a HashMap<(Uuid, Uuid), u32>,
    /// 1 sin revancha, 2 con revancha
    pub max_meetings: u32,
    pub rest_ledger: &'a RestLedger,
    /// Cruces de la jornada inmediatamente anterior
    pub previous_pairs: &'a HashSet<(Uuid, Uuid)>,
    /// Equipos que el administrador obliga a descansar esta jornada
    pub forced_rests: &'a [Uuid],
}

/// Propone los cruces de una jornada
///
/// Sin `explore` la exploración es determinista: equipos ordenados por id
/// y backtracking primero-que-encaja, de modo que la misma entrada
/// produce siempre la misma jornada. El refinador pasa un rng para
/// barajar el orden de exploración y diversificar sus intentos; cada
/// semilla sigue siendo reproducible.
pub fn propose_round(
    ctx: &RoundContext,
    explore: Option<&mut StdRng>,
) -> Result<RoundProposal, SchedulingError> {
    if ctx.teams.len() < 2 {
        return Err(SchedulingError::InvalidConfiguration(
            "se necesitan al menos dos equipos para generar una jornada".to_string(),
        ));
    }

    let team_ids: HashSet<Uuid> = ctx.teams.iter().map(|t| t.id).collect();
    for forced in ctx.forced_rests {
        if !team_ids.contains(forced) {
            return Err(SchedulingError::InvalidConfiguration(format!(
                "el equipo forzado a descansar {} no pertenece al torneo",
                forced
            )));
        }
    }

    let mut resting: Vec<Uuid> = Vec::new();
    for forced in ctx.forced_rests {
        if !resting.contains(forced) {
            resting.push(*forced);
        }
    }

    let mut playable: Vec<Uuid> = ctx
        .teams
        .iter()
        .map(|t| t.id)
        .filter(|id| !resting.contains(id))
        .collect();
    playable.sort();

    // Con cantidad impar descansa el equipo menos descansado
    if playable.len() % 2 == 1 {
        let candidate = ctx.rest_ledger.least_rested(&playable)[0];
        playable.retain(|id| *id != candidate);
        resting.push(candidate);
    }

    if playable.len() < 2 {
        return Err(SchedulingError::InfeasiblePairing(
            "los descansos forzados no dejan equipos suficientes para jugar".to_string(),
        ));
    }

    if let Some(rng) = explore {
        playable.shuffle(rng);
    }

    let exhausted = |a: Uuid, b: Uuid| {
        ctx.meetings.get(&pair_key(a, b)).copied().unwrap_or(0) >= ctx.max_meetings
    };
    let repeats_previous = |a: Uuid, b: Uuid| ctx.previous_pairs.contains(&pair_key(a, b));

    let mut warnings: Vec<String> = Vec::new();

    // Primero el intento estricto; si falla se relaja la restricción de
    // no repetir la jornada anterior antes que la de cruces agotados
    let pairs = match find_matching(&playable, &|a, b| exhausted(a, b) || repeats_previous(a, b)) {
        Some(pairs) => pairs,
        None => match find_matching(&playable, &|a, b| exhausted(a, b)) {
            Some(pairs) => {
                warnings.push(
                    "Se repite al menos un cruce de la jornada anterior por falta de alternativas"
                        .to_string(),
                );
                pairs
            }
            None => {
                return Err(SchedulingError::InfeasiblePairing(
                    "no quedan cruces disponibles entre los equipos que deben jugar".to_string(),
                ));
            }
        },
    };

    // Con revancha se invierte la localía del primer cruce
    let matches = pairs
        .into_iter()
        .map(|(a, b)| {
            let already_met = ctx.meetings.get(&pair_key(a, b)).copied().unwrap_or(0);
            if already_met % 2 == 1 {
                PairedMatch {
                    home_team_id: b,
                    away_team_id: a,
                }
            } else {
                PairedMatch {
                    home_team_id: a,
                    away_team_id: b,
                }
            }
        })
        .collect();

    Ok(RoundProposal {
        round_number: ctx.round_number,
        matches,
        resting,
        warnings,
    })
}

/// Emparejamiento perfecto por backtracking
///
/// Toma el primer equipo sin cruce y prueba cada compañero permitido;
/// si la rama no cierra, retrocede. Devuelve None cuando no existe
/// ningún emparejamiento completo bajo `banned`.
fn find_matching(
    pool: &[Uuid],
    banned: &dyn Fn(Uuid, Uuid) -> bool,
) -> Option<Vec<(Uuid, Uuid)>> {
    if pool.is_empty() {
        return Some(Vec::new());
    }

    let first = pool[0];
    for i in 1..pool.len() {
        let partner = pool[i];
        if banned(first, partner) {
            continue;
        }

        let mut rest: Vec<Uuid> = Vec::with_capacity(pool.len() - 2);
        rest.extend_from_slice(&pool[1..i]);
        rest.extend_from_slice(&pool[i + 1..]);

        if let Some(mut tail) = find_matching(&rest, banned) {
            tail.insert(0, (first, partner));
            return Some(tail);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn teams(n: u128) -> Vec<Team> {
        (1..=n)
            .map(|i| Team {
                id: Uuid::from_u128(i),
                tournament_id: Uuid::from_u128(999),
                name: format!("Equipo {}", i),
            })
            .collect()
    }

    fn context<'a>(
        teams: &'a [Team],
        meetings: &'a HashMap<(Uuid, Uuid), u32>,
        rest_ledger: &'a RestLedger,
        previous: &'a HashSet<(Uuid, Uuid)>,
        forced: &'a [Uuid],
    ) -> RoundContext<'a> {
        RoundContext {
            round_number: 1,
            teams,
            meetings,
            max_meetings: 1,
            rest_ledger,
            previous_pairs: previous,
            forced_rests: forced,
        }
    }

    fn ids_in_matches(proposal: &RoundProposal) -> Vec<Uuid> {
        proposal
            .matches
            .iter()
            .flat_map(|m| [m.home_team_id, m.away_team_id])
            .collect()
    }

    #[test]
    fn test_even_team_count_plays_everyone() {
        let teams = teams(6);
        let meetings = HashMap::new();
        let rests = RestLedger::from_records(&[]);
        let previous = HashSet::new();

        let proposal =
            propose_round(&context(&teams, &meetings, &rests, &previous, &[]), None).unwrap();

        assert_eq!(proposal.matches.len(), 3);
        assert!(proposal.resting.is_empty());
        assert!(proposal.warnings.is_empty());

        // Ningún equipo aparece dos veces
        let mut ids = ids_in_matches(&proposal);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_deterministic_without_explore() {
        let teams = teams(8);
        let meetings = HashMap::new();
        let rests = RestLedger::from_records(&[]);
        let previous = HashSet::new();

        let first =
            propose_round(&context(&teams, &meetings, &rests, &previous, &[]), None).unwrap();
        let second =
            propose_round(&context(&teams, &meetings, &rests, &previous, &[]), None).unwrap();
        assert_eq!(first.matches, second.matches);
    }

    #[test]
    fn test_shuffled_exploration_still_valid() {
        let teams = teams(6);
        let meetings = HashMap::new();
        let rests = RestLedger::from_records(&[]);
        let previous = HashSet::new();
        let mut rng = StdRng::seed_from_u64(7);

        let proposal = propose_round(
            &context(&teams, &meetings, &rests, &previous, &[]),
            Some(&mut rng),
        )
        .unwrap();

        assert_eq!(proposal.matches.len(), 3);
        let mut ids = ids_in_matches(&proposal);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_odd_team_count_rests_least_rested() {
        let teams = teams(5);
        let meetings = HashMap::new();
        let previous = HashSet::new();

        // Todos descansaron una vez menos el equipo 3
        let rest_records: Vec<_> = [1u128, 2, 4, 5]
            .iter()
            .map(|i| crate::models::fixture::RestRecord {
                tournament_id: Uuid::from_u128(999),
                round_number: 1,
                team_id: Uuid::from_u128(*i),
            })
            .collect();
        let rests = RestLedger::from_records(&rest_records);

        let proposal =
            propose_round(&context(&teams, &meetings, &rests, &previous, &[]), None).unwrap();

        assert_eq!(proposal.matches.len(), 2);
        assert_eq!(proposal.resting, vec![Uuid::from_u128(3)]);
    }

    #[test]
    fn test_forced_rest_is_respected() {
        let teams = teams(6);
        let meetings = HashMap::new();
        let rests = RestLedger::from_records(&[]);
        let previous = HashSet::new();
        let forced = [Uuid::from_u128(2)];

        let proposal =
            propose_round(&context(&teams, &meetings, &rests, &previous, &forced), None).unwrap();

        // 6 equipos con uno forzado: queda impar, descansa otro más
        assert_eq!(proposal.matches.len(), 2);
        assert_eq!(proposal.resting.len(), 2);
        assert_eq!(proposal.resting[0], Uuid::from_u128(2));
        assert!(!ids_in_matches(&proposal).contains(&Uuid::from_u128(2)));
    }

    #[test]
    fn test_unknown_forced_rest_is_rejected() {
        let teams = teams(4);
        let meetings = HashMap::new();
        let rests = RestLedger::from_records(&[]);
        let previous = HashSet::new();
        let forced = [Uuid::from_u128(77)];

        let result = propose_round(&context(&teams, &meetings, &rests, &previous, &forced), None);
        assert!(matches!(
            result,
            Err(SchedulingError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_too_many_forced_rests_is_infeasible() {
        let teams = teams(3);
        let meetings = HashMap::new();
        let rests = RestLedger::from_records(&[]);
        let previous = HashSet::new();
        let forced = [Uuid::from_u128(1), Uuid::from_u128(2)];

        let result = propose_round(&context(&teams, &meetings, &rests, &previous, &forced), None);
        assert!(matches!(result, Err(SchedulingError::InfeasiblePairing(_))));
    }

    #[test]
    fn test_avoids_played_pairs() {
        let teams = teams(4);
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let c = Uuid::from_u128(3);
        let d = Uuid::from_u128(4);

        // Ya se jugaron a-b y c-d: la única jornada válida cruza de otra forma
        let mut meetings = HashMap::new();
        meetings.insert(pair_key(a, b), 1);
        meetings.insert(pair_key(c, d), 1);
        let rests = RestLedger::from_records(&[]);
        let previous = HashSet::new();

        let proposal =
            propose_round(&context(&teams, &meetings, &rests, &previous, &[]), None).unwrap();

        for m in &proposal.matches {
            let key = pair_key(m.home_team_id, m.away_team_id);
            assert_ne!(key, pair_key(a, b));
            assert_ne!(key, pair_key(c, d));
        }
    }

    #[test]
    fn test_all_pairs_played_is_infeasible() {
        let teams = teams(4);
        let mut meetings = HashMap::new();
        for i in 1..=4u128 {
            for j in (i + 1)..=4u128 {
                meetings.insert(pair_key(Uuid::from_u128(i), Uuid::from_u128(j)), 1);
            }
        }
        let rests = RestLedger::from_records(&[]);
        let previous = HashSet::new();

        let result = propose_round(&context(&teams, &meetings, &rests, &previous, &[]), None);
        assert!(matches!(result, Err(SchedulingError::InfeasiblePairing(_))));
    }

    #[test]
    fn test_previous_round_repeat_relaxed_with_warning() {
        let teams = teams(4);
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let c = Uuid::from_u128(3);
        let d = Uuid::from_u128(4);

        // Con revancha habilitada: a-c, a-d, b-c y b-d agotados; solo
        // quedan a-b y c-d, que fueron justo los cruces de la jornada
        // anterior. Debe relajar y avisar.
        let mut meetings = HashMap::new();
        meetings.insert(pair_key(a, c), 2);
        meetings.insert(pair_key(a, d), 2);
        meetings.insert(pair_key(b, c), 2);
        meetings.insert(pair_key(b, d), 2);
        meetings.insert(pair_key(a, b), 1);
        meetings.insert(pair_key(c, d), 1);

        let mut previous = HashSet::new();
        previous.insert(pair_key(a, b));
        previous.insert(pair_key(c, d));

        let rests = RestLedger::from_records(&[]);

        let mut ctx = context(&teams, &meetings, &rests, &previous, &[]);
        ctx.max_meetings = 2;
        let proposal = propose_round(&ctx, None).unwrap();

        assert_eq!(proposal.matches.len(), 2);
        assert_eq!(proposal.warnings.len(), 1);
    }

    #[test]
    fn test_rematch_swaps_home_and_away() {
        let teams = teams(2);
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        let mut meetings = HashMap::new();
        meetings.insert(pair_key(a, b), 1);
        let rests = RestLedger::from_records(&[]);
        let previous = HashSet::new();

        let mut ctx = context(&teams, &meetings, &rests, &previous, &[]);
        ctx.max_meetings = 2;
        let proposal = propose_round(&ctx, None).unwrap();

        assert_eq!(proposal.matches.len(), 1);
        // En el primer cruce el local fue el de menor id: la revancha invierte
        assert_eq!(proposal.matches[0].home_team_id, b);
        assert_eq!(proposal.matches[0].away_team_id, a);
    }

    #[test]
    fn test_full_single_round_robin_six_teams() {
        // 6 equipos, una rueda: 5 jornadas de 3 cruces, sin descansos,
        // y la sexta jornada es infactible
        let teams = teams(6);
        let rests = RestLedger::from_records(&[]);
        let mut meetings: HashMap<(Uuid, Uuid), u32> = HashMap::new();
        let mut previous: HashSet<(Uuid, Uuid)> = HashSet::new();

        for round in 1..=5 {
            let mut ctx = context(&teams, &meetings, &rests, &previous, &[]);
            ctx.round_number = round;
            let proposal = propose_round(&ctx, None).unwrap();

            assert_eq!(proposal.matches.len(), 3, "jornada {}", round);
            assert!(proposal.resting.is_empty());

            previous = proposal
                .matches
                .iter()
                .map(|m| pair_key(m.home_team_id, m.away_team_id))
                .collect();
            for key in &previous {
                *meetings.entry(*key).or_insert(0) += 1;
            }
        }

        assert_eq!(meetings.len(), 15);
        let ctx = context(&teams, &meetings, &rests, &previous, &[]);
        assert!(matches!(
            propose_round(&ctx, None),
            Err(SchedulingError::InfeasiblePairing(_))
        ));
    }

    #[test]
    fn test_five_teams_each_rests_once_over_five_rounds() {
        let teams = teams(5);
        let mut meetings: HashMap<(Uuid, Uuid), u32> = HashMap::new();
        let mut previous: HashSet<(Uuid, Uuid)> = HashSet::new();
        let mut rest_records: Vec<crate::models::fixture::RestRecord> = Vec::new();

        for round in 1..=5 {
            let rests = RestLedger::from_records(&rest_records);
            let mut ctx = context(&teams, &meetings, &rests, &previous, &[]);
            ctx.round_number = round;
            let proposal = propose_round(&ctx, None).unwrap();

            assert_eq!(proposal.matches.len(), 2, "jornada {}", round);
            assert_eq!(proposal.resting.len(), 1, "jornada {}", round);

            rest_records.push(crate::models::fixture::RestRecord {
                tournament_id: Uuid::from_u128(999),
                round_number: round,
                team_id: proposal.resting[0],
            });
            previous = proposal
                .matches
                .iter()
                .map(|m| pair_key(m.home_team_id, m.away_team_id))
                .collect();
            for key in &previous {
                *meetings.entry(*key).or_insert(0) += 1;
            }
        }

        // Cada equipo descansó exactamente una vez
        let final_ledger = RestLedger::from_records(&rest_records);
        for team in &teams {
            assert_eq!(final_ledger.rest_count(team.id), 1, "equipo {}", team.name);
        }
    }
}
