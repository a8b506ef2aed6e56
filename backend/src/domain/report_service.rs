use std::sync::Arc;

use shared::{Animal, AnimalDietRow, AnimalFullInfo, DashboardSummary, DietType, MarriedCouple, MedicalCheck, Staff};
use tracing::info;

use crate::domain::cache::{CacheKey, QueryCache};
use crate::domain::errors::ZooResult;
use crate::domain::reports;
use crate::storage::ZooStore;

/// Number of entries in the dashboard activity feed
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Read-only report views. The joined views come from the store's aggregate
/// calls; the dashboard is assembled from the cached entity lists.
#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn ZooStore>,
    cache: QueryCache,
}

fn normalize_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_ascii_lowercase)
}

impl ReportService {
    pub fn new(store: Arc<dyn ZooStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    pub async fn animal_full_info(&self, search: Option<&str>) -> ZooResult<Vec<AnimalFullInfo>> {
        let term = normalize_search(search);
        info!("Building full animal info (search={:?})", term);

        let store = Arc::clone(&self.store);
        let variant = term.clone().unwrap_or_default();
        let rows = self
            .cache
            .get_or_fetch(CacheKey::AnimalFullInfo, &variant, || async move {
                store.animal_full_info(term.as_deref()).await
            })
            .await?;

        info!("Full animal info has {} rows", rows.len());
        Ok(rows.as_ref().clone())
    }

    pub async fn married_couples(&self) -> ZooResult<Vec<MarriedCouple>> {
        info!("Listing married couples");

        let store = Arc::clone(&self.store);
        let couples = self
            .cache
            .get_or_fetch(CacheKey::MarriedCouples, "", || async move {
                store.married_couples().await
            })
            .await?;

        info!("Found {} married couples", couples.len());
        Ok(couples.as_ref().clone())
    }

    /// One row per active diet
    pub async fn animals_with_diets(&self) -> ZooResult<Vec<AnimalDietRow>> {
        info!("Listing animals with active diets");

        let store = Arc::clone(&self.store);
        let rows = self
            .cache
            .get_or_fetch(CacheKey::AnimalsWithDiets, "", || async move {
                store.animals_with_diets().await
            })
            .await?;

        Ok(rows.as_ref().clone())
    }

    pub async fn animals_on_diet_type(&self, diet_type_id: &str) -> ZooResult<Vec<AnimalDietRow>> {
        info!("Listing animals on diet type {}", diet_type_id);
        let rows = self.animals_with_diets().await?;
        Ok(reports::animals_on_diet_type(&rows, diet_type_id))
    }

    pub async fn dashboard(&self) -> ZooResult<DashboardSummary> {
        info!("Building dashboard summary");

        let (animals, staff, diet_types, checks) = tokio::try_join!(
            self.cached_animals(),
            self.cached_staff(),
            self.cached_diet_types(),
            self.cached_medical_checks(),
        )?;
        let active: Vec<Staff> = staff.iter().filter(|s| s.is_active).cloned().collect();

        Ok(reports::dashboard_summary(
            &animals,
            &active,
            &diet_types,
            &checks,
            RECENT_ACTIVITY_LIMIT,
        ))
    }

    // The dashboard shares cache entries with the entity services

    async fn cached_animals(&self) -> ZooResult<Arc<Vec<Animal>>> {
        let store = Arc::clone(&self.store);
        Ok(self
            .cache
            .get_or_fetch(CacheKey::Animals, "", || async move { store.list_animals().await })
            .await?)
    }

    async fn cached_staff(&self) -> ZooResult<Arc<Vec<Staff>>> {
        let store = Arc::clone(&self.store);
        Ok(self
            .cache
            .get_or_fetch(CacheKey::Staff, "", || async move { store.list_staff().await })
            .await?)
    }

    async fn cached_diet_types(&self) -> ZooResult<Arc<Vec<DietType>>> {
        let store = Arc::clone(&self.store);
        Ok(self
            .cache
            .get_or_fetch(CacheKey::DietTypes, "", || async move { store.list_diet_types().await })
            .await?)
    }

    async fn cached_medical_checks(&self) -> ZooResult<Arc<Vec<MedicalCheck>>> {
        let store = Arc::clone(&self.store);
        Ok(self
            .cache
            .get_or_fetch(CacheKey::MedicalChecks, "", || async move {
                store.list_medical_checks().await
            })
            .await?)
    }
}
