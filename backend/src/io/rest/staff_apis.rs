//! # REST API for Staff
//!
//! Staff deletes deactivate the employee. A spouse record that could not be
//! kept in step is reported through the `warning` field, not as an error.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info, warn};

use crate::domain::StaffWrite;
use crate::io::rest::error::ApiError;
use crate::AppState;
use shared::{DeleteResponse, StaffForm, StaffListResponse, StaffResponse, StaffUpdateForm};

fn staff_response(write: StaffWrite, verb: &str) -> StaffResponse {
    let warning = write.warning();
    if let Some(message) = &warning {
        warn!("{}", message);
    }
    StaffResponse {
        success_message: format!("{} has been {}", write.staff.full_name(), verb),
        staff: write.staff,
        warning,
    }
}

/// GET /api/staff
pub async fn list_staff(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/staff");

    match state.staff_service.list_staff().await {
        Ok(staff) => (StatusCode::OK, Json(StaffListResponse { staff })).into_response(),
        Err(e) => {
            error!("Failed to list staff: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// POST /api/staff
pub async fn create_staff(
    State(state): State<AppState>,
    Json(form): Json<StaffForm>,
) -> impl IntoResponse {
    info!("POST /api/staff - request: {:?}", form);

    match state.staff_service.create_staff(&form).await {
        Ok(write) => (StatusCode::CREATED, Json(staff_response(write, "added"))).into_response(),
        Err(e) => {
            error!("Failed to create staff: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// PUT /api/staff/:id
pub async fn update_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    Json(form): Json<StaffUpdateForm>,
) -> impl IntoResponse {
    info!("PUT /api/staff/{} - request: {:?}", staff_id, form);

    match state.staff_service.update_staff(&staff_id, &form).await {
        Ok(write) => (StatusCode::OK, Json(staff_response(write, "updated"))).into_response(),
        Err(e) => {
            error!("Failed to update staff {}: {}", staff_id, e);
            ApiError(e).into_response()
        }
    }
}

/// DELETE /api/staff/:id
pub async fn delete_staff(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/staff/{}", staff_id);

    match state.staff_service.delete_staff(&staff_id).await {
        Ok(write) => {
            let response = staff_response(write, "removed");
            let body = DeleteResponse {
                success_message: response.success_message,
                warning: response.warning,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            error!("Failed to delete staff {}: {}", staff_id, e);
            ApiError(e).into_response()
        }
    }
}
