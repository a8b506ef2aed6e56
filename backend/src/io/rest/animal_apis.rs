//! # REST API for Animals

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::io::rest::error::ApiError;
use crate::AppState;
use shared::{AnimalForm, AnimalListResponse, AnimalResponse, AnimalUpdateForm, DeleteResponse};

/// GET /api/animals
pub async fn list_animals(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/animals");

    match state.animal_service.list_animals().await {
        Ok(animals) => (StatusCode::OK, Json(AnimalListResponse { animals })).into_response(),
        Err(e) => {
            error!("Failed to list animals: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// POST /api/animals
pub async fn create_animal(
    State(state): State<AppState>,
    Json(form): Json<AnimalForm>,
) -> impl IntoResponse {
    info!("POST /api/animals - request: {:?}", form);

    match state.animal_service.create_animal(&form).await {
        Ok(animal) => {
            let response = AnimalResponse {
                success_message: format!("{} has been added", animal.name),
                animal,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to create animal: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// PUT /api/animals/:id
pub async fn update_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
    Json(form): Json<AnimalUpdateForm>,
) -> impl IntoResponse {
    info!("PUT /api/animals/{} - request: {:?}", animal_id, form);

    match state.animal_service.update_animal(&animal_id, &form).await {
        Ok(animal) => {
            let response = AnimalResponse {
                success_message: format!("{} has been updated", animal.name),
                animal,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to update animal {}: {}", animal_id, e);
            ApiError(e).into_response()
        }
    }
}

/// DELETE /api/animals/:id
pub async fn delete_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/animals/{}", animal_id);

    match state.animal_service.delete_animal(&animal_id).await {
        Ok(animal) => {
            let response = DeleteResponse {
                success_message: format!("{} has been removed", animal.name),
                warning: None,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to delete animal {}: {}", animal_id, e);
            ApiError(e).into_response()
        }
    }
}
