//! # REST API for Reports and the Dashboard

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{error, info};

use crate::io::rest::error::ApiError;
use crate::AppState;
use shared::{AnimalFullInfoResponse, AnimalsWithDietsResponse, MarriedCouplesResponse};

#[derive(Deserialize, Debug, Default)]
pub struct FullInfoQuery {
    pub search: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct DietRowsQuery {
    pub diet_type_id: Option<String>,
}

/// GET /api/reports/animal-full-info
pub async fn animal_full_info(
    State(state): State<AppState>,
    Query(query): Query<FullInfoQuery>,
) -> impl IntoResponse {
    info!("GET /api/reports/animal-full-info - query: {:?}", query);

    match state.report_service.animal_full_info(query.search.as_deref()).await {
        Ok(animals) => (StatusCode::OK, Json(AnimalFullInfoResponse { animals })).into_response(),
        Err(e) => {
            error!("Failed to build animal report: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// GET /api/reports/married-couples
pub async fn married_couples(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/reports/married-couples");

    match state.report_service.married_couples().await {
        Ok(couples) => (StatusCode::OK, Json(MarriedCouplesResponse { couples })).into_response(),
        Err(e) => {
            error!("Failed to list married couples: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// GET /api/reports/animals-with-diets
pub async fn animals_with_diets(
    State(state): State<AppState>,
    Query(query): Query<DietRowsQuery>,
) -> impl IntoResponse {
    info!("GET /api/reports/animals-with-diets - query: {:?}", query);

    let result = match query.diet_type_id.as_deref() {
        Some(id) if !id.is_empty() => state.report_service.animals_on_diet_type(id).await,
        _ => state.report_service.animals_with_diets().await,
    };

    match result {
        Ok(rows) => (StatusCode::OK, Json(AnimalsWithDietsResponse { rows })).into_response(),
        Err(e) => {
            error!("Failed to list animals with diets: {}", e);
            ApiError(e).into_response()
        }
    }
}

/// GET /api/dashboard
pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/dashboard");

    match state.report_service.dashboard().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!("Failed to build dashboard: {}", e);
            ApiError(e).into_response()
        }
    }
}
