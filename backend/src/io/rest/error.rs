//! Translation of domain errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;

use crate::domain::ZooError;

/// A [`ZooError`] on its way out of a handler
#[derive(Debug)]
pub struct ApiError(pub ZooError);

impl From<ZooError> for ApiError {
    fn from(err: ZooError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ZooError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ZooError::Constraint(_) => StatusCode::CONFLICT,
            ZooError::NotFound { .. } => StatusCode::NOT_FOUND,
            ZooError::Remote(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.0 {
            ZooError::Validation(errors) => ErrorResponse {
                error: "Validation failed".to_string(),
                field_errors: errors.into_field_errors(),
            },
            // Store internals stay in the logs
            ZooError::Remote(_) => ErrorResponse {
                error: "Internal server error".to_string(),
                field_errors: Vec::new(),
            },
            other => ErrorResponse {
                error: other.to_string(),
                field_errors: Vec::new(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::ValidationErrors;

    #[test]
    fn test_status_codes() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name is required");
        assert_eq!(ApiError(errors.into()).status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError(ZooError::Constraint("in use".into())).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError(ZooError::not_found("animal", "a1")).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError(ZooError::Remote("disk".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
