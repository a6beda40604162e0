//! Libros de uso derivados de la historia del torneo
//!
//! Ambos libros son agregaciones de solo lectura que se reconstruyen en
//! cada invocación del motor: no guardan estado entre llamadas. El
//! `UsageLedger` es genérico sobre el recurso (horario o cancha) porque
//! ambos contratos son idénticos.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::fixture::{RestRecord, StoredMatch};

/// Libro de descansos: cuántas veces descansó cada equipo
#[derive(Debug, Clone, Default)]
pub struct RestLedger {
    counts: HashMap<Uuid, u32>,
}

impl RestLedger {
    pub fn from_records(records: &[RestRecord]) -> Self {
        let mut counts: HashMap<Uuid, u32> = HashMap::new();
        for record in records {
            *counts.entry(record.team_id).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn rest_count(&self, team_id: Uuid) -> u32 {
        self.counts.get(&team_id).copied().unwrap_or(0)
    }

    /// Candidatos ordenados de menos a más descansado, desempatando por id
    pub fn least_rested(&self, candidates: &[Uuid]) -> Vec<Uuid> {
        let mut ordered: Vec<Uuid> = candidates.to_vec();
        ordered.sort_by_key(|id| (self.rest_count(*id), *id));
        ordered
    }
}

/// Libro de uso de un recurso (horario o cancha) por equipo
///
/// Mantiene el conteo total por (equipo, recurso) y la secuencia de uso
/// por jornada para detectar repeticiones consecutivas.
#[derive(Debug, Clone, Default)]
pub struct UsageLedger {
    counts: HashMap<(Uuid, Uuid), u32>,
    history: HashMap<Uuid, Vec<(i32, Uuid)>>,
}

impl UsageLedger {
    /// Construye el libro desde la historia de encuentros, ordenada por
    /// jornada. `resource` extrae el recurso que interesa (horario o
    /// cancha); los encuentros sin asignación se ignoran.
    pub fn from_matches(
        matches: &[StoredMatch],
        resource: impl Fn(&StoredMatch) -> Option<Uuid>,
    ) -> Self {
        let mut ordered: Vec<&StoredMatch> = matches.iter().collect();
        ordered.sort_by_key(|m| m.round_number);

        let mut ledger = Self::default();
        for m in ordered {
            if let Some(resource_id) = resource(m) {
                ledger.record(m.home_team_id, resource_id, m.round_number);
                ledger.record(m.away_team_id, resource_id, m.round_number);
            }
        }
        ledger
    }

    /// Registra un uso. También lo usa el refinador para superponer una
    /// asignación hipotética sobre una copia del libro.
    pub fn record(&mut self, team_id: Uuid, resource_id: Uuid, round_number: i32) {
        *self.counts.entry((team_id, resource_id)).or_insert(0) += 1;
        let sequence = self.history.entry(team_id).or_default();
        sequence.push((round_number, resource_id));
        sequence.sort_by_key(|(round, _)| *round);
    }

    pub fn usage_count(&self, team_id: Uuid, resource_id: Uuid) -> u32 {
        self.counts.get(&(team_id, resource_id)).copied().unwrap_or(0)
    }

    /// Último recurso usado por el equipo, si jugó alguna vez
    pub fn last_used(&self, team_id: Uuid) -> Option<Uuid> {
        self.history
            .get(&team_id)
            .and_then(|seq| seq.last())
            .map(|(_, resource)| *resource)
    }

    /// Anteúltimo recurso usado por el equipo
    pub fn second_to_last_used(&self, team_id: Uuid) -> Option<Uuid> {
        self.history
            .get(&team_id)
            .and_then(|seq| seq.len().checked_sub(2).and_then(|i| seq.get(i)))
            .map(|(_, resource)| *resource)
    }

    /// ¿El equipo usó el recurso en la jornada indicada?
    pub fn used_in_round(&self, team_id: Uuid, resource_id: Uuid, round_number: i32) -> bool {
        self.history
            .get(&team_id)
            .map(|seq| {
                seq.iter()
                    .any(|(round, resource)| *round == round_number && *resource == resource_id)
            })
            .unwrap_or(false)
    }

    /// ¿El equipo usó el recurso en alguna de las `n` jornadas anteriores
    /// a `current_round`?
    pub fn used_in_last_n_rounds(
        &self,
        team_id: Uuid,
        resource_id: Uuid,
        current_round: i32,
        n: i32,
    ) -> bool {
        self.history
            .get(&team_id)
            .map(|seq| {
                seq.iter().any(|(round, resource)| {
                    *resource == resource_id
                        && *round < current_round
                        && *round >= current_round - n
                })
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn rest(team_id: Uuid, round_number: i32) -> RestRecord {
        RestRecord {
            tournament_id: Uuid::from_u128(99),
            round_number,
            team_id,
        }
    }

    fn played(round_number: i32, home: Uuid, away: Uuid, slot: Uuid) -> StoredMatch {
        StoredMatch {
            id: Uuid::new_v4(),
            tournament_id: Uuid::from_u128(99),
            round_number,
            home_team_id: home,
            away_team_id: away,
            slot_id: Some(slot),
            venue_id: None,
            home_score: None,
            away_score: None,
        }
    }

    #[test]
    fn test_rest_ledger_counts_and_ordering() {
        let a = team(1);
        let b = team(2);
        let c = team(3);
        let ledger = RestLedger::from_records(&[rest(a, 1), rest(a, 3), rest(b, 2)]);

        assert_eq!(ledger.rest_count(a), 2);
        assert_eq!(ledger.rest_count(b), 1);
        assert_eq!(ledger.rest_count(c), 0);

        // c nunca descansó, debe ir primero; a va último
        assert_eq!(ledger.least_rested(&[a, b, c]), vec![c, b, a]);
    }

    #[test]
    fn test_rest_ledger_tie_break_by_id() {
        let a = team(1);
        let b = team(2);
        let ledger = RestLedger::from_records(&[]);
        assert_eq!(ledger.least_rested(&[b, a]), vec![a, b]);
    }

    #[test]
    fn test_usage_ledger_counts() {
        let a = team(1);
        let b = team(2);
        let s1 = Uuid::from_u128(10);
        let s2 = Uuid::from_u128(20);

        let ledger = UsageLedger::from_matches(
            &[played(1, a, b, s1), played(2, a, b, s2), played(3, a, b, s1)],
            |m| m.slot_id,
        );

        assert_eq!(ledger.usage_count(a, s1), 2);
        assert_eq!(ledger.usage_count(a, s2), 1);
        assert_eq!(ledger.usage_count(b, s1), 2);
        assert_eq!(ledger.usage_count(team(9), s1), 0);
    }

    #[test]
    fn test_usage_ledger_last_and_second_to_last() {
        let a = team(1);
        let b = team(2);
        let s1 = Uuid::from_u128(10);
        let s2 = Uuid::from_u128(20);

        // historia desordenada a propósito: el libro ordena por jornada
        let ledger = UsageLedger::from_matches(
            &[played(3, a, b, s1), played(1, a, b, s1), played(2, a, b, s2)],
            |m| m.slot_id,
        );

        assert_eq!(ledger.last_used(a), Some(s1));
        assert_eq!(ledger.second_to_last_used(a), Some(s2));
        assert_eq!(ledger.last_used(team(9)), None);
        assert_eq!(ledger.second_to_last_used(team(9)), None);
    }

    #[test]
    fn test_usage_ledger_round_lookups() {
        let a = team(1);
        let b = team(2);
        let s1 = Uuid::from_u128(10);
        let s2 = Uuid::from_u128(20);

        let ledger = UsageLedger::from_matches(
            &[played(1, a, b, s1), played(2, a, b, s2)],
            |m| m.slot_id,
        );

        assert!(ledger.used_in_round(a, s2, 2));
        assert!(!ledger.used_in_round(a, s1, 2));

        // mirando desde la jornada 3: s2 se usó en la anterior, s1 no
        assert!(ledger.used_in_last_n_rounds(a, s2, 3, 1));
        assert!(!ledger.used_in_last_n_rounds(a, s1, 3, 1));
        assert!(ledger.used_in_last_n_rounds(a, s1, 3, 2));
    }

    #[test]
    fn test_usage_ledger_ignores_unassigned_matches() {
        let a = team(1);
        let b = team(2);
        let mut m = played(1, a, b, Uuid::from_u128(10));
        m.slot_id = None;

        let ledger = UsageLedger::from_matches(&[m], |m| m.slot_id);
        assert_eq!(ledger.last_used(a), None);
    }
}
