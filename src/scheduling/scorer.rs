//! Puntuación de candidatos horario/cancha
//!
//! La puntuación es una suma ponderada de penalizaciones y bonificaciones
//! donde menor es mejor. Es una función pura del contexto: no muta ningún
//! contador compartido, así cada término puede verificarse en aislamiento
//! y el refinador puede re-evaluar un estado sin efectos colaterales.
//!
//! Los pesos exactos son ajustables; el contrato es su orden relativo:
//! tope duro > repetición en la jornada > jornada anterior > dos jornadas
//! consecutivas > patrón reciente > moldeado de conteos > distribución
//! fina > preferencia de día.

use std::collections::HashSet;

use uuid::Uuid;

use crate::scheduling::ledgers::UsageLedger;

/// Tabla de pesos del puntuador
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    /// Un equipo ya llegó al tope de usos del recurso
    pub hard_cap: i64,
    /// El recurso ya lo usa otro encuentro de la misma jornada
    pub round_duplicate: i64,
    /// Alguno de los equipos usó el recurso en la jornada anterior
    pub previous_round: i64,
    /// Alguno de los equipos lo usó en las dos jornadas anteriores seguidas
    pub consecutive_rounds: i64,
    /// El recurso es el último que usó el equipo
    pub last_used: i64,
    /// El recurso es el anteúltimo que usó el equipo
    pub second_to_last_used: i64,
    /// Bonificación para despegar un conteo clavado en exactamente 1
    pub stuck_at_one_bonus: i64,
    /// Bonificación de primer uso para el local
    pub first_use_home_bonus: i64,
    /// Bonificación de primer uso para el visitante
    pub first_use_away_bonus: i64,
    /// Penalización suave cuando el conteo ya está en 2
    pub near_cap: i64,
    /// Paso del moldeado fino hacia el objetivo equitativo
    pub balance_step: i64,
    /// Peso de la preferencia de día (más débil que todo lo anterior)
    pub day_preference: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            hard_cap: 20_000,
            round_duplicate: 10_000,
            previous_round: 5_000,
            consecutive_rounds: 2_000,
            last_used: 1_000,
            second_to_last_used: 500,
            stuck_at_one_bonus: -15_000,
            first_use_home_bonus: -12_000,
            first_use_away_bonus: -8_000,
            near_cap: 1_000,
            balance_step: 20,
            day_preference: 10,
        }
    }
}

/// Candidato a asignar: un horario o una cancha
///
/// `preference_rank` ordena la preferencia opcional de día (0 cuando no
/// aplica); el orden del slice de candidatos es el desempate determinista.
#[derive(Debug, Clone)]
pub struct ResourceOption {
    pub id: Uuid,
    pub preference_rank: i64,
}

/// Contexto inmutable de puntuación
pub struct ScoreContext<'a> {
    pub ledger: &'a UsageLedger,
    pub round_number: i32,
    /// Objetivo equitativo continuo: jornadas planificadas / recursos
    pub target: f64,
    /// Tope de usos por (equipo, recurso)
    pub usage_cap: u32,
    /// Recursos ya asignados a otros encuentros de esta jornada
    pub used_this_round: &'a HashSet<Uuid>,
    pub weights: &'a ScoreWeights,
}

/// Puntúa asignar `option` al cruce (local, visitante). Menor es mejor.
pub fn score(ctx: &ScoreContext, home: Uuid, away: Uuid, option: &ResourceOption) -> i64 {
    let w = ctx.weights;
    let mut total: i64 = 0;

    if ctx.used_this_round.contains(&option.id) {
        total += w.round_duplicate;
    }

    for team in [home, away] {
        let count = ctx.ledger.usage_count(team, option.id);

        if count >= ctx.usage_cap {
            total += w.hard_cap;
        }

        if ctx
            .ledger
            .used_in_last_n_rounds(team, option.id, ctx.round_number, 1)
        {
            total += w.previous_round;
        }

        if ctx.ledger.used_in_round(team, option.id, ctx.round_number - 1)
            && ctx.ledger.used_in_round(team, option.id, ctx.round_number - 2)
        {
            total += w.consecutive_rounds;
        }

        // Evita repetir el patrón reciente aunque no sea consecutivo
        if ctx.ledger.last_used(team) == Some(option.id) {
            total += w.last_used;
        }
        if ctx.ledger.second_to_last_used(team) == Some(option.id) {
            total += w.second_to_last_used;
        }

        // Moldeado de conteos: 1 es el peor estado estable, ni "sin usar"
        // ni "equilibrado"; se lo empuja hacia 2. El 0 se premia para
        // estrenar el recurso y el 2 se frena para no pasarse a 3.
        match count {
            1 => total += w.stuck_at_one_bonus,
            2 => total += w.near_cap,
            _ => {}
        }
    }

    if ctx.ledger.usage_count(home, option.id) == 0 {
        total += w.first_use_home_bonus;
    }
    if ctx.ledger.usage_count(away, option.id) == 0 {
        total += w.first_use_away_bonus;
    }

    // Moldeado fino hacia el reparto matemáticamente equitativo
    let home_dev = (ctx.ledger.usage_count(home, option.id) as f64 - ctx.target).abs();
    let away_dev = (ctx.ledger.usage_count(away, option.id) as f64 - ctx.target).abs();
    total += ((home_dev + away_dev) * w.balance_step as f64) as i64;

    // Preferencia de día: desempata, nunca domina
    total -= option.preference_rank * w.day_preference;

    total
}
