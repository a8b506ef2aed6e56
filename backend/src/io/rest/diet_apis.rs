//! # REST API for Diet Types and Diets

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::io::rest::error::ApiError;
use crate::AppState;
use shared::{
    DeleteResponse, DietForm, DietListResponse, DietResponse, DietTypeForm, DietTypeListResponse,
    DietTypeResponse, DietTypeUpdateForm, DietUpdateForm,
};

/// GET /api/diet-types
pub async fn list_diet_types(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/diet-types");

    match state.diet_service.list_diet_types().await {
        Ok(diet_types) => {
            (StatusCode::OK, Json(DietTypeListResponse { diet_types })).into_response()
        }
        Err(e) => {
            error!("Failed to list diet types: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// POST /api/diet-types
pub async fn create_diet_type(
    State(state): State<AppState>,
    Json(form): Json<DietTypeForm>,
) -> impl IntoResponse {
    info!("POST /api/diet-types - request: {:?}", form);

    match state.diet_service.create_diet_type(&form).await {
        Ok(diet_type) => {
            let response = DietTypeResponse {
                success_message: format!("Diet type {} has been added", diet_type.name),
                diet_type,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to create diet type: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// PUT /api/diet-types/:id
pub async fn update_diet_type(
    State(state): State<AppState>,
    Path(diet_type_id): Path<String>,
    Json(form): Json<DietTypeUpdateForm>,
) -> impl IntoResponse {
    info!("PUT /api/diet-types/{} - request: {:?}", diet_type_id, form);

    match state.diet_service.update_diet_type(&diet_type_id, &form).await {
        Ok(diet_type) => {
            let response = DietTypeResponse {
                success_message: format!("Diet type {} has been updated", diet_type.name),
                diet_type,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to update diet type {}: {}", diet_type_id, e);
            ApiError(e).into_response()
        }
    }
}

/// DELETE /api/diet-types/:id
pub async fn delete_diet_type(
    State(state): State<AppState>,
    Path(diet_type_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/diet-types/{}", diet_type_id);

    match state.diet_service.delete_diet_type(&diet_type_id).await {
        Ok(diet_type) => {
            let response = DeleteResponse {
                success_message: format!("Diet type {} has been removed", diet_type.name),
                warning: None,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete diet type {}: {}", diet_type_id, e);
            ApiError(e).into_response()
        }
    }
}

/// GET /api/diets
pub async fn list_diets(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/diets");

    match state.diet_service.list_diets().await {
        Ok(diets) => (StatusCode::OK, Json(DietListResponse { diets })).into_response(),
        Err(e) => {
            error!("Failed to list diets: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// POST /api/diets
pub async fn create_diet(
    State(state): State<AppState>,
    Json(form): Json<DietForm>,
) -> impl IntoResponse {
    info!("POST /api/diets - request: {:?}", form);

    match state.diet_service.create_diet(&form).await {
        Ok(diet) => {
            let response = DietResponse {
                success_message: format!("Diet {} has been added", diet.food_name),
                diet,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to create diet: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// PUT /api/diets/:id
pub async fn update_diet(
    State(state): State<AppState>,
    Path(diet_id): Path<String>,
    Json(form): Json<DietUpdateForm>,
) -> impl IntoResponse {
    info!("PUT /api/diets/{} - request: {:?}", diet_id, form);

    match state.diet_service.update_diet(&diet_id, &form).await {
        Ok(diet) => {
            let response = DietResponse {
                success_message: format!("Diet {} has been updated", diet.food_name),
                diet,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to update diet {}: {}", diet_id, e);
            ApiError(e).into_response()
        }
    }
}

/// DELETE /api/diets/:id
pub async fn delete_diet(
    State(state): State<AppState>,
    Path(diet_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/diets/{}", diet_id);

    match state.diet_service.delete_diet(&diet_id).await {
        Ok(diet) => {
            let response = DeleteResponse {
                success_message: format!("Diet {} has been removed", diet.food_name),
                warning: None,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete diet {}: {}", diet_id, e);
            ApiError(e).into_response()
        }
    }
}
