//! Reports screen: full animal info with a search box, married couples and
//! the animals currently on each diet type.

use shared::{AnimalDietRow, AnimalFullInfo, MarriedCouple};

use crate::domain::ReportService;
use crate::domain::reports::animals_on_diet_type;
use crate::pages::state::Loadable;

pub struct ReportsPage {
    service: ReportService,
    pub search: String,
    pub full_info: Loadable<Vec<AnimalFullInfo>>,
    pub couples: Loadable<Vec<MarriedCouple>>,
    pub diet_rows: Loadable<Vec<AnimalDietRow>>,
    /// Narrows `diet_rows` to one diet type
    pub selected_diet_type: Option<String>,
}

impl ReportsPage {
    pub fn new(service: ReportService) -> Self {
        Self {
            service,
            search: String::new(),
            full_info: Loadable::default(),
            couples: Loadable::default(),
            diet_rows: Loadable::default(),
            selected_diet_type: None,
        }
    }

    pub async fn refresh(&mut self) {
        self.full_info.set_loading();
        self.couples.set_loading();
        self.diet_rows.set_loading();

        let search = Some(self.search.as_str());
        let (full_info, couples, diet_rows) = tokio::join!(
            self.service.animal_full_info(search),
            self.service.married_couples(),
            self.service.animals_with_diets(),
        );
        self.full_info.settle("animal report", full_info);
        self.couples.settle("married couples", couples);
        self.diet_rows.settle("current diets", diet_rows);
    }

    /// Re-runs only the full info view
    pub async fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.full_info.set_loading();
        let result = self.service.animal_full_info(Some(term)).await;
        self.full_info.settle("animal report", result);
    }

    pub fn select_diet_type(&mut self, diet_type_id: Option<&str>) {
        self.selected_diet_type = diet_type_id.map(str::to_string);
    }

    pub fn visible_diet_rows(&self) -> Vec<AnimalDietRow> {
        match self.selected_diet_type.as_deref() {
            Some(id) => animals_on_diet_type(&self.diet_rows.data, id),
            None => self.diet_rows.data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QueryCache;
    use crate::storage::memory::fixture::demo_state;
    use crate::storage::InMemoryStore;
    use std::sync::Arc;

    async fn setup_test() -> ReportsPage {
        let store = Arc::new(InMemoryStore::with_state(demo_state()));
        let mut page = ReportsPage::new(ReportService::new(store, QueryCache::new()));
        page.refresh().await;
        page
    }

    #[tokio::test]
    async fn test_refresh_loads_every_view() {
        let page = setup_test().await;
        assert_eq!(page.full_info.data.len(), demo_state().animals.len());
        assert_eq!(page.couples.data.len(), 1);
        assert!(!page.diet_rows.data.is_empty());
        assert!(page.full_info.error.is_none());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_blank_shows_all() {
        let mut page = setup_test().await;

        page.set_search("  LION ").await;
        assert_eq!(page.full_info.data.len(), 1);
        assert_eq!(page.full_info.data[0].name, "Leo");

        page.set_search("").await;
        assert_eq!(page.full_info.data.len(), demo_state().animals.len());
    }

    #[tokio::test]
    async fn test_diet_type_filter_narrows_rows() {
        let mut page = setup_test().await;
        let type_id = page.diet_rows.data[0].diet_type_id.clone();

        page.select_diet_type(Some(&type_id));
        let rows = page.visible_diet_rows();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.diet_type_id == type_id));

        page.select_diet_type(None);
        assert_eq!(page.visible_diet_rows().len(), page.diet_rows.data.len());
    }
}
