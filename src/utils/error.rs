use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustomError {
    /// Malformed input: empty or over-length text, invalid status value.
    #[error("Validation Error: {0}")]
    ValidationError(String),

    /// The post's moderation state does not allow the operation.
    #[error("State Error: {0}")]
    StateError(String),

    /// The operation was already done (double like, unlike without like).
    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Not Found: {0}")]
    NotFoundError(String),

    #[error("Unauthorized: {0}")]
    UnauthorizedError(String),

    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    /// Persistence or blob storage failed; never interpreted by the core.
    #[error("Infrastructure Error: {0}")]
    InfrastructureError(String),
}

impl CustomError {
    pub fn tag(&self) -> &'static str {
        match self {
            CustomError::ValidationError(..) => "VALIDATION_ERROR",
            CustomError::StateError(..) => "STATE_ERROR",
            CustomError::ConflictError(..) => "CONFLICT_ERROR",
            CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
            CustomError::UnauthorizedError(..) => "UNAUTHORIZED_ERROR",
            CustomError::ForbiddenError(..) => "FORBIDDEN_ERROR",
            CustomError::InfrastructureError(..) => "INFRASTRUCTURE_ERROR",
        }
    }
}

impl From<mongodb::error::Error> for CustomError {
    fn from(err: mongodb::error::Error) -> Self {
        CustomError::InfrastructureError(format!("Database error: {}", err))
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::ValidationError(..) => StatusCode::BAD_REQUEST,
            CustomError::StateError(..) => StatusCode::CONFLICT,
            CustomError::ConflictError(..) => StatusCode::CONFLICT,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::UnauthorizedError(..) => StatusCode::UNAUTHORIZED,
            CustomError::ForbiddenError(..) => StatusCode::FORBIDDEN,
            CustomError::InfrastructureError(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = json!({
            "success": false,
            "message": self.to_string(),
            "httpStatusCode": self.status_code().as_u16(),
            "error": self.tag(),
            "service": super::helpers::service_name(),
        });

        HttpResponse::build(self.status_code()).json(error_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_and_conflict_share_status_but_not_tag() {
        let state = CustomError::StateError("post is pending".into());
        let conflict = CustomError::ConflictError("already liked".into());

        assert_eq!(state.status_code(), StatusCode::CONFLICT);
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_ne!(state.tag(), conflict.tag());
    }

    #[test]
    fn infrastructure_errors_are_server_errors() {
        let err = CustomError::InfrastructureError("connection reset".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.tag(), "INFRASTRUCTURE_ERROR");
    }
}
