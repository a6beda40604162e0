//! Reporte de distribución de horarios y canchas
//!
//! Agregación de solo lectura sobre el estado confirmado: cuántas veces
//! usó cada equipo cada horario y cada cancha, el rango equitativo
//! esperado y qué equipos quedaron fuera. Dos llamadas sobre el mismo
//! estado producen exactamente el mismo reporte.

use serde::Serialize;
use uuid::Uuid;

use crate::scheduling::ledgers::UsageLedger;
use crate::scheduling::TournamentSnapshot;

/// Conteo de usos de un recurso por un equipo
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResourceCount {
    pub resource_id: Uuid,
    pub count: u32,
}

/// Distribución de un equipo sobre horarios y canchas
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TeamDistribution {
    pub team_id: Uuid,
    pub team_name: String,
    pub slot_counts: Vec<ResourceCount>,
    pub venue_counts: Vec<ResourceCount>,
    /// true cuando todos los conteos de horario caen en el rango equitativo
    pub within_range: bool,
}

/// Reporte de distribución del torneo
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DistributionReport {
    pub rounds_played: i32,
    /// Rango equitativo de usos por horario: [floor, ceil] de jornadas/horarios
    pub slot_range: (u32, u32),
    /// Rango equitativo de usos por cancha
    pub venue_range: (u32, u32),
    pub teams: Vec<TeamDistribution>,
    pub teams_within_range: usize,
}

/// Genera el reporte de distribución sobre el estado confirmado
pub fn report(snapshot: &TournamentSnapshot) -> DistributionReport {
    let slot_ledger = UsageLedger::from_matches(&snapshot.matches, |m| m.slot_id);
    let venue_ledger = UsageLedger::from_matches(&snapshot.matches, |m| m.venue_id);

    let rounds_played = snapshot.last_round_number();
    let slot_range = equitable_range(rounds_played, snapshot.slots.len());
    let venue_range = equitable_range(
        rounds_played,
        snapshot.venues.iter().filter(|v| v.active).count(),
    );

    let mut slots = snapshot.slots.clone();
    slots.sort_by_key(|s| s.display_order);
    let mut venues: Vec<_> = snapshot.venues.iter().filter(|v| v.active).collect();
    venues.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let mut teams = snapshot.teams.clone();
    teams.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let team_rows: Vec<TeamDistribution> = teams
        .iter()
        .map(|team| {
            let slot_counts: Vec<ResourceCount> = slots
                .iter()
                .map(|s| ResourceCount {
                    resource_id: s.id,
                    count: slot_ledger.usage_count(team.id, s.id),
                })
                .collect();
            let venue_counts: Vec<ResourceCount> = venues
                .iter()
                .map(|v| ResourceCount {
                    resource_id: v.id,
                    count: venue_ledger.usage_count(team.id, v.id),
                })
                .collect();

            let within_range = slot_counts
                .iter()
                .all(|c| c.count >= slot_range.0 && c.count <= slot_range.1);

            TeamDistribution {
                team_id: team.id,
                team_name: team.name.clone(),
                slot_counts,
                venue_counts,
                within_range,
            }
        })
        .collect();

    let teams_within_range = team_rows.iter().filter(|t| t.within_range).count();

    DistributionReport {
        rounds_played,
        slot_range,
        venue_range,
        teams: team_rows,
        teams_within_range,
    }
}

fn equitable_range(rounds_played: i32, resource_count: usize) -> (u32, u32) {
    if resource_count == 0 || rounds_played <= 0 {
        return (0, 0);
    }
    let ratio = rounds_played as f64 / resource_count as f64;
    (ratio.floor() as u32, ratio.ceil() as u32)
}
