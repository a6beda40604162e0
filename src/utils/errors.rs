//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::scheduling::SchedulingError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                eprintln!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                eprintln!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                eprintln!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Conflict(msg) => {
                eprintln!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONFLICT".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                eprintln!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                eprintln!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }

            AppError::Scheduling(e) => scheduling_error_response(e),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Los errores del motor se traducen a códigos HTTP propios: la
/// infactibilidad es un conflicto del estado del torneo, la falta de
/// horarios o canchas es un problema de configuración de la categoría
fn scheduling_error_response(error: SchedulingError) -> (StatusCode, ErrorResponse) {
    eprintln!("Scheduling error: {}", error);
    match &error {
        SchedulingError::InfeasiblePairing(msg) => (
            StatusCode::CONFLICT,
            ErrorResponse {
                error: "Infeasible Pairing".to_string(),
                message: msg.clone(),
                details: None,
                code: Some("INFEASIBLE_PAIRING".to_string()),
            },
        ),
        SchedulingError::NoSlotsAvailable => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse {
                error: "No Slots Available".to_string(),
                message: error.to_string(),
                details: None,
                code: Some("NO_SLOTS_AVAILABLE".to_string()),
            },
        ),
        SchedulingError::NoVenuesAvailable => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ErrorResponse {
                error: "No Venues Available".to_string(),
                message: error.to_string(),
                details: None,
                code: Some("NO_VENUES_AVAILABLE".to_string()),
            },
        ),
        SchedulingError::InvalidConfiguration(msg) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse {
                error: "Invalid Configuration".to_string(),
                message: msg.clone(),
                details: None,
                code: Some("INVALID_CONFIGURATION".to_string()),
            },
        ),
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
