use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::fixture_controller::FixtureController;
use crate::dto::fixture_dto::{
    ApiResponse, AssignSlotsRequest, AssignmentsResponse, ConfirmRoundRequest,
    ConfirmedRoundResponse, ProposeRoundRequest, RoundProposalResponse,
};
use crate::scheduling::reporter::DistributionReport;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fixture_router() -> Router<AppState> {
    Router::new()
        .route("/:id/rounds/propose", post(propose_round))
        .route("/:id/rounds/confirm", post(confirm_round))
        .route("/:id/rounds/:round_number", delete(delete_round))
        .route("/:id/assignments/automatic", post(assign_slots))
        .route("/:id/distribution", get(distribution_report))
}

async fn propose_round(
    State(state): State<AppState>,
    Path(tournament_id): Path<Uuid>,
    Json(request): Json<ProposeRoundRequest>,
) -> Result<Json<RoundProposalResponse>, AppError> {
    let controller = FixtureController::new(state.pool.clone());
    let response = controller.propose_round(tournament_id, request).await?;
    Ok(Json(response))
}

async fn confirm_round(
    State(state): State<AppState>,
    Path(tournament_id): Path<Uuid>,
    Json(request): Json<ConfirmRoundRequest>,
) -> Result<Json<ApiResponse<ConfirmedRoundResponse>>, AppError> {
    let controller = FixtureController::new(state.pool.clone());
    let response = controller.confirm_round(tournament_id, request).await?;
    Ok(Json(response))
}

async fn delete_round(
    State(state): State<AppState>,
    Path((tournament_id, round_number)): Path<(Uuid, i32)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = FixtureController::new(state.pool.clone());
    controller.delete_round(tournament_id, round_number).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Jornada eliminada exitosamente"
    })))
}

async fn assign_slots(
    State(state): State<AppState>,
    Path(tournament_id): Path<Uuid>,
    Json(request): Json<AssignSlotsRequest>,
) -> Result<Json<ApiResponse<AssignmentsResponse>>, AppError> {
    let controller = FixtureController::new(state.pool.clone());
    let response = controller.assign_slots(tournament_id, request).await?;
    Ok(Json(response))
}

async fn distribution_report(
    State(state): State<AppState>,
    Path(tournament_id): Path<Uuid>,
) -> Result<Json<DistributionReport>, AppError> {
    let controller = FixtureController::new(state.pool.clone());
    let response = controller.distribution_report(tournament_id).await?;
    Ok(Json(response))
}
