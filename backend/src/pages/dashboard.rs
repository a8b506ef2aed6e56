use shared::{DashboardSummary, SpeciesType};

use crate::domain::ReportService;
use crate::pages::state::Loadable;

/// Landing screen with headline counts and recent activity
pub struct DashboardPage {
    service: ReportService,
    pub summary: Loadable<Option<DashboardSummary>>,
}

impl DashboardPage {
    pub fn new(service: ReportService) -> Self {
        Self { service, summary: Loadable::default() }
    }

    pub async fn refresh(&mut self) {
        self.summary.set_loading();
        let result = self.service.dashboard().await.map(Some);
        self.summary.settle("dashboard", result);
    }

    pub fn count_of(&self, species_type: SpeciesType) -> usize {
        self.summary
            .data
            .as_ref()
            .and_then(|s| {
                s.animals_by_species_type
                    .iter()
                    .find(|c| c.species_type == species_type)
            })
            .map_or(0, |c| c.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnimalService, QueryCache};
    use crate::storage::memory::fixture::demo_state;
    use crate::storage::InMemoryStore;
    use shared::AnimalForm;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_dashboard_follows_mutations() {
        let store = Arc::new(InMemoryStore::with_state(demo_state()));
        let cache = QueryCache::new();
        let animals = AnimalService::new(store.clone(), cache.clone());
        let mut page = DashboardPage::new(ReportService::new(store, cache));

        page.refresh().await;
        let summary = page.summary.data.clone().unwrap();
        assert_eq!(summary.total_animals, 5);
        assert_eq!(page.count_of(SpeciesType::Mammal), 2);

        animals
            .create_animal(&AnimalForm {
                name: "Kito".to_string(),
                species: "African Lion".to_string(),
                species_type: "Mammal".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        page.refresh().await;
        let summary = page.summary.data.clone().unwrap();
        assert_eq!(summary.total_animals, 6);
        assert_eq!(page.count_of(SpeciesType::Mammal), 3);
        assert_eq!(summary.recent_activity[0].title, "Kito the African Lion joined the zoo");
    }
}
