//! # Zoo Records Backend
//!
//! Record management for a zoo: animals, staff, diets and medical checks.
//!
//! ```text
//! IO layer (REST handlers)      Page controllers
//!            \                   /
//!          Domain (validation, reports, cache, services)
//!                      |
//!          Storage (ZooStore: memory | sqlite)
//! ```
//!
//! Reads go store → cache → derived view. Writes go form → validator →
//! store → cache invalidation, so the next read fetches fresh data.

pub mod config;
pub mod domain;
pub mod io;
pub mod pages;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::domain::{
    AnimalService, DietService, MedicalService, QueryCache, ReportService, StaffService,
};
use crate::pages::{AnimalsPage, DashboardPage, DietsPage, MedicalPage, ReportsPage, StaffPage};
use crate::storage::memory::fixture::demo_state;
use crate::storage::{DbConnection, InMemoryStore, SqliteStore, ZooStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub animal_service: AnimalService,
    pub staff_service: StaffService,
    pub diet_service: DietService,
    pub medical_service: MedicalService,
    pub report_service: ReportService,
    pub cache: QueryCache,
}

impl AppState {
    /// Wire every service to one store and one shared cache
    pub fn new(store: Arc<dyn ZooStore>) -> Self {
        let cache = QueryCache::new();
        Self {
            animal_service: AnimalService::new(Arc::clone(&store), cache.clone()),
            staff_service: StaffService::new(Arc::clone(&store), cache.clone()),
            diet_service: DietService::new(Arc::clone(&store), cache.clone()),
            medical_service: MedicalService::new(Arc::clone(&store), cache.clone()),
            report_service: ReportService::new(store, cache.clone()),
            cache,
        }
    }

    pub fn dashboard_page(&self) -> DashboardPage {
        DashboardPage::new(self.report_service.clone())
    }

    pub fn animals_page(&self) -> AnimalsPage {
        AnimalsPage::new(self.animal_service.clone())
    }

    pub fn staff_page(&self) -> StaffPage {
        StaffPage::new(self.staff_service.clone())
    }

    pub fn diets_page(&self) -> DietsPage {
        DietsPage::new(self.diet_service.clone(), self.animal_service.clone())
    }

    pub fn medical_page(&self) -> MedicalPage {
        MedicalPage::new(
            self.medical_service.clone(),
            self.animal_service.clone(),
            self.staff_service.clone(),
        )
    }

    pub fn reports_page(&self) -> ReportsPage {
        ReportsPage::new(self.report_service.clone())
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    let store: Arc<dyn ZooStore> = match config.backend {
        StoreBackend::Memory => {
            if config.seed_demo_data {
                info!("Setting up in-memory store with demo data");
                Arc::new(InMemoryStore::with_state(demo_state()))
            } else {
                info!("Setting up empty in-memory store");
                Arc::new(InMemoryStore::new())
            }
        }
        StoreBackend::Sqlite => {
            info!("Setting up database");
            let db = DbConnection::new(&config.database_url)
                .await
                .context("opening the SQLite store")?;
            if config.seed_demo_data {
                tracing::warn!("--seed-demo-data only applies to the memory backend, ignoring");
            }
            Arc::new(SqliteStore::new(db))
        }
    };

    info!("Setting up application state");
    Ok(AppState::new(store))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid CORS origin {}", cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", io::rest::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
