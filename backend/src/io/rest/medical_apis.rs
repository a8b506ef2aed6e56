//! # REST API for Medical Checks

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::io::rest::error::ApiError;
use crate::AppState;
use shared::{
    DeleteResponse, MedicalCheckForm, MedicalCheckListResponse, MedicalCheckResponse,
    MedicalCheckUpdateForm,
};

/// GET /api/medical-checks
pub async fn list_medical_checks(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/medical-checks");

    match state.medical_service.list_medical_checks().await {
        Ok(medical_checks) => {
            (StatusCode::OK, Json(MedicalCheckListResponse { medical_checks })).into_response()
        }
        Err(e) => {
            error!("Failed to list medical checks: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// POST /api/medical-checks
pub async fn create_medical_check(
    State(state): State<AppState>,
    Json(form): Json<MedicalCheckForm>,
) -> impl IntoResponse {
    info!("POST /api/medical-checks - request: {:?}", form);

    match state.medical_service.create_medical_check(&form).await {
        Ok(medical_check) => {
            let response = MedicalCheckResponse {
                medical_check,
                success_message: "Medical check has been recorded".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to create medical check: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// PUT /api/medical-checks/:id
pub async fn update_medical_check(
    State(state): State<AppState>,
    Path(check_id): Path<String>,
    Json(form): Json<MedicalCheckUpdateForm>,
) -> impl IntoResponse {
    info!("PUT /api/medical-checks/{} - request: {:?}", check_id, form);

    match state.medical_service.update_medical_check(&check_id, &form).await {
        Ok(medical_check) => {
            let response = MedicalCheckResponse {
                medical_check,
                success_message: "Medical check has been updated".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to update medical check {}: {}", check_id, e);
            ApiError(e).into_response()
        }
    }
}

/// DELETE /api/medical-checks/:id
pub async fn delete_medical_check(
    State(state): State<AppState>,
    Path(check_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/medical-checks/{}", check_id);

    match state.medical_service.delete_medical_check(&check_id).await {
        Ok(_) => {
            let response = DeleteResponse {
                success_message: "Medical check has been removed".to_string(),
                warning: None,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete medical check {}: {}", check_id, e);
            ApiError(e).into_response()
        }
    }
}
