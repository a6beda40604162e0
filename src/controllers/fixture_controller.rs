//! Controller de fixture

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::scheduling::SchedulingConfig;
use crate::dto::fixture_dto::{
    ApiResponse, AssignSlotsRequest, AssignmentsResponse, ConfirmRoundRequest,
    ConfirmedRoundResponse, MatchResponse, ProposeRoundRequest, RoundProposalResponse,
};
use crate::repositories::PgFixtureStore;
use crate::scheduling::pairing::{PairedMatch, RoundProposal};
use crate::scheduling::reporter::DistributionReport;
use crate::services::fixture_service::{FixtureService, ProposeOptions};
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::validation::{validate_positive, validate_range, validate_uuid};

pub struct FixtureController {
    service: FixtureService<PgFixtureStore>,
}

impl FixtureController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            service: FixtureService::new(PgFixtureStore::new(pool)),
        }
    }

    pub async fn propose_round(
        &self,
        tournament_id: Uuid,
        request: ProposeRoundRequest,
    ) -> Result<RoundProposalResponse, AppError> {
        let forced_rests = parse_uuid_list(request.forced_rests.as_deref())?;
        let config = build_config(request.max_attempts, request.seed, None, None)?;

        let options = ProposeOptions {
            forced_rests,
            config,
        };
        let refined = self.service.propose_round(tournament_id, &options).await?;

        Ok(RoundProposalResponse::from(refined))
    }

    pub async fn confirm_round(
        &self,
        tournament_id: Uuid,
        request: ConfirmRoundRequest,
    ) -> Result<ApiResponse<ConfirmedRoundResponse>, AppError> {
        validate_positive(request.round_number)
            .map_err(|_| bad_request_error("El número de jornada debe ser positivo"))?;

        if request.matches.is_empty() {
            return Err(bad_request_error(
                "Una jornada necesita al menos un encuentro",
            ));
        }

        let mut matches = Vec::with_capacity(request.matches.len());
        for m in &request.matches {
            matches.push(PairedMatch {
                home_team_id: parse_uuid(&m.home_team_id)?,
                away_team_id: parse_uuid(&m.away_team_id)?,
            });
        }

        let proposal = RoundProposal {
            round_number: request.round_number,
            matches,
            resting: parse_uuid_list(request.resting.as_deref())?,
            warnings: Vec::new(),
        };

        let stored = self.service.confirm_round(tournament_id, &proposal).await?;

        let response = ConfirmedRoundResponse {
            round_number: request.round_number,
            matches: stored.into_iter().map(MatchResponse::from).collect(),
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Jornada confirmada exitosamente".to_string(),
        ))
    }

    pub async fn assign_slots(
        &self,
        tournament_id: Uuid,
        request: AssignSlotsRequest,
    ) -> Result<ApiResponse<AssignmentsResponse>, AppError> {
        if let Some(round_number) = request.round_number {
            validate_positive(round_number)
                .map_err(|_| bad_request_error("El número de jornada debe ser positivo"))?;
        }

        let priority_venue = match &request.priority_venue {
            Some(id) => Some(parse_uuid(id)?),
            None => None,
        };
        let config = build_config(
            request.max_attempts,
            request.seed,
            request.prefer_late_days,
            priority_venue,
        )?;

        let refined = self
            .service
            .assign_slots_automatically(tournament_id, request.round_number, &config)
            .await?;

        Ok(ApiResponse::success_with_message(
            AssignmentsResponse::from(&refined),
            "Horarios y canchas asignados exitosamente".to_string(),
        ))
    }

    pub async fn distribution_report(
        &self,
        tournament_id: Uuid,
    ) -> Result<DistributionReport, AppError> {
        self.service.distribution_report(tournament_id).await
    }

    pub async fn delete_round(
        &self,
        tournament_id: Uuid,
        round_number: i32,
    ) -> Result<(), AppError> {
        validate_positive(round_number)
            .map_err(|_| bad_request_error("El número de jornada debe ser positivo"))?;
        self.service.delete_round(tournament_id, round_number).await
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, AppError> {
    validate_uuid(value)
        .map_err(|_| bad_request_error(&format!("'{}' no es un identificador válido", value)))
}

fn parse_uuid_list(values: Option<&[String]>) -> Result<Vec<Uuid>, AppError> {
    values
        .unwrap_or_default()
        .iter()
        .map(|v| parse_uuid(v))
        .collect()
}

fn build_config(
    max_attempts: Option<u32>,
    seed: Option<u64>,
    prefer_late_days: Option<bool>,
    priority_venue: Option<Uuid>,
) -> Result<SchedulingConfig, AppError> {
    let mut config = SchedulingConfig::default();

    if let Some(attempts) = max_attempts {
        validate_range(attempts, 1, 50)
            .map_err(|_| bad_request_error("max_attempts debe estar entre 1 y 50"))?;
        config.max_attempts = attempts;
    }
    if let Some(seed) = seed {
        config.base_seed = seed;
    }
    if let Some(prefer) = prefer_late_days {
        config.prefer_late_days = prefer;
    }
    config.priority_venue = priority_venue;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid_list_rejects_garbage() {
        let values = vec!["no-es-un-uuid".to_string()];
        assert!(parse_uuid_list(Some(&values)).is_err());
        assert!(parse_uuid_list(None).unwrap().is_empty());
    }

    #[test]
    fn test_build_config_bounds_attempts() {
        assert!(build_config(Some(0), None, None, None).is_err());
        assert!(build_config(Some(51), None, None, None).is_err());

        let config = build_config(Some(5), Some(42), Some(false), None).unwrap();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.base_seed, 42);
        assert!(!config.prefer_late_days);
    }
}
