//! # REST API Interface Layer
//!
//! JSON endpoints under `/api` for every entity plus the report views.
//! Handlers only translate: they call a domain service, wrap the result in
//! a response DTO from `shared`, and map [`crate::domain::ZooError`] onto a
//! status code through [`error::ApiError`].

pub mod animal_apis;
pub mod diet_apis;
pub mod error;
pub mod medical_apis;
pub mod report_apis;
pub mod staff_apis;

use axum::{
    routing::{get, put},
    Router,
};

use crate::AppState;

/// Routes relative to `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/animals", get(animal_apis::list_animals).post(animal_apis::create_animal))
        .route(
            "/animals/:id",
            put(animal_apis::update_animal).delete(animal_apis::delete_animal),
        )
        .route("/staff", get(staff_apis::list_staff).post(staff_apis::create_staff))
        .route(
            "/staff/:id",
            put(staff_apis::update_staff).delete(staff_apis::delete_staff),
        )
        .route(
            "/diet-types",
            get(diet_apis::list_diet_types).post(diet_apis::create_diet_type),
        )
        .route(
            "/diet-types/:id",
            put(diet_apis::update_diet_type).delete(diet_apis::delete_diet_type),
        )
        .route("/diets", get(diet_apis::list_diets).post(diet_apis::create_diet))
        .route(
            "/diets/:id",
            put(diet_apis::update_diet).delete(diet_apis::delete_diet),
        )
        .route(
            "/medical-checks",
            get(medical_apis::list_medical_checks).post(medical_apis::create_medical_check),
        )
        .route(
            "/medical-checks/:id",
            put(medical_apis::update_medical_check).delete(medical_apis::delete_medical_check),
        )
        .route("/reports/animal-full-info", get(report_apis::animal_full_info))
        .route("/reports/married-couples", get(report_apis::married_couples))
        .route("/reports/animals-with-diets", get(report_apis::animals_with_diets))
        .route("/dashboard", get(report_apis::dashboard))
}
