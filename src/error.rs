use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::leave::validation::{FieldError, ValidationErrors};
use crate::model::leave_request::TransitionError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum LeaveError {
    #[error("Validation failed")]
    Validation(ValidationErrors),
    #[error("Failed to submit leave request")]
    SubmissionFailed(#[source] StoreError),
    #[error("Failed to load leave requests")]
    QueryFailed(#[source] StoreError),
    #[error("Leave request {0} not found")]
    NotFound(u64),
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
}

impl From<ValidationErrors> for LeaveError {
    fn from(errors: ValidationErrors) -> Self {
        LeaveError::Validation(errors)
    }
}

impl LeaveError {
    pub fn code(&self) -> &'static str {
        match self {
            LeaveError::Validation(_) => "VALIDATION_ERROR",
            LeaveError::SubmissionFailed(_) => "SUBMISSION_FAILED",
            LeaveError::QueryFailed(_) => "QUERY_FAILED",
            LeaveError::NotFound(_) => "NOT_FOUND",
            LeaveError::Forbidden(_) => "FORBIDDEN",
            LeaveError::InvalidTransition(_) => "INVALID_TRANSITION",
        }
    }
}

/// Body of every error response. `errors` is only present for field validation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "message": "Validation failed",
    "code": "VALIDATION_ERROR",
    "errors": [
        { "field": "endDate", "code": "EndDateBeforeStart", "message": "End date must be after start date" }
    ]
}))]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>, code: &str) -> Self {
        Self {
            message: message.into(),
            code: code.to_string(),
            errors: Vec::new(),
        }
    }
}

impl ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeaveError::Validation(_) => StatusCode::BAD_REQUEST,
            LeaveError::SubmissionFailed(_) | LeaveError::QueryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LeaveError::NotFound(_) => StatusCode::NOT_FOUND,
            LeaveError::Forbidden(_) => StatusCode::FORBIDDEN,
            LeaveError::InvalidTransition(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = ErrorBody::new(self.to_string(), self.code());
        if let LeaveError::Validation(errors) = self {
            body.errors = errors.iter().cloned().collect();
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}
