use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog::CatalogError;
use logbook::LogbookError;
use macrocycle::MacrocycleError;
use replanner::ReplanError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("State document error: {0}")]
    StateDocument(#[from] serde_json::Error),

    #[error(transparent)]
    Assessment(#[from] assessment::AssessmentError),

    #[error(transparent)]
    Macrocycle(#[from] MacrocycleError),

    #[error(transparent)]
    Replan(#[from] ReplanError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Logbook(#[from] LogbookError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Assessment(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Macrocycle(MacrocycleError::WeekOutOfRange { .. }) => StatusCode::NOT_FOUND,
            AppError::Macrocycle(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Replan(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Catalog(CatalogError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Logbook(LogbookError::InvalidEntry(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Logbook(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database(_) | AppError::StateDocument(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {self:?}");
            "An unexpected error occurred. Please try again later.".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
