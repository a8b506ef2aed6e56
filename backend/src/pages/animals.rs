//! Animals screen: the animal list with create, edit and delete dialogs.

use shared::{Animal, AnimalForm, AnimalUpdateForm};
use tracing::info;

use crate::domain::AnimalService;
use crate::pages::state::{reject, FormState, Loadable, Notifications, SubmitOutcome};

/// How the list is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Table,
    Grid,
}

pub struct AnimalsPage {
    service: AnimalService,
    pub animals: Loadable<Vec<Animal>>,
    pub form: FormState,
    pub view_mode: ViewMode,
    pub notifications: Notifications,
}

impl AnimalsPage {
    pub fn new(service: AnimalService) -> Self {
        Self {
            service,
            animals: Loadable::default(),
            form: FormState::default(),
            view_mode: ViewMode::default(),
            notifications: Notifications::default(),
        }
    }

    pub async fn refresh(&mut self) {
        self.animals.set_loading();
        let result = self.service.list_animals().await;
        self.animals.settle("animals", result);
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Table => ViewMode::Grid,
            ViewMode::Grid => ViewMode::Table,
        };
    }

    pub fn find(&self, id: &str) -> Option<&Animal> {
        self.animals.data.iter().find(|a| a.id == id)
    }

    /// The animal whose edit dialog is open
    pub fn editing(&self) -> Option<&Animal> {
        self.form.editing().and_then(|id| self.find(id))
    }

    pub fn open_create(&mut self) {
        self.form.open_create();
    }

    pub fn open_edit(&mut self, id: &str) {
        self.form.open_edit(id);
    }

    pub fn open_delete(&mut self, id: &str) {
        self.form.open_delete(id);
    }

    pub fn close_dialog(&mut self) {
        self.form.close();
    }

    pub async fn submit_create(&mut self, form: &AnimalForm) -> SubmitOutcome {
        self.form.submitting = true;
        match self.service.create_animal(form).await {
            Ok(animal) => {
                info!("Animal page added {}", animal.id);
                self.notifications.success(format!("{} has been added", animal.name));
                self.form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.form, &mut self.notifications, "add animal", e),
        }
    }

    pub async fn submit_update(&mut self, form: &AnimalUpdateForm) -> SubmitOutcome {
        let Some(id) = self.form.editing().map(str::to_string) else {
            return SubmitOutcome::Ignored;
        };
        self.form.submitting = true;
        match self.service.update_animal(&id, form).await {
            Ok(animal) => {
                self.notifications.success(format!("{} has been updated", animal.name));
                self.form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.form, &mut self.notifications, "update animal", e),
        }
    }

    pub async fn confirm_delete(&mut self) -> SubmitOutcome {
        let Some(id) = self.form.deleting().map(str::to_string) else {
            return SubmitOutcome::Ignored;
        };
        self.form.submitting = true;
        match self.service.delete_animal(&id).await {
            Ok(animal) => {
                self.notifications.success(format!("{} has been removed", animal.name));
                self.form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.form, &mut self.notifications, "delete animal", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QueryCache;
    use crate::pages::state::NotificationLevel;
    use crate::storage::InMemoryStore;
    use shared::HealthStatus;
    use std::sync::Arc;

    fn setup_test() -> AnimalsPage {
        let store = Arc::new(InMemoryStore::new());
        AnimalsPage::new(AnimalService::new(store, QueryCache::new()))
    }

    fn lion(name: &str) -> AnimalForm {
        AnimalForm {
            name: name.to_string(),
            species: "Lion".to_string(),
            species_type: "Mammal".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_shows_the_new_animal_once_with_defaults() {
        let mut page = setup_test();
        page.refresh().await;
        page.open_create();

        let outcome = page.submit_create(&lion("Leo")).await;

        assert_eq!(outcome, SubmitOutcome::Saved);
        assert!(!page.form.is_open());
        assert_eq!(page.animals.data.len(), 1);
        let leo = &page.animals.data[0];
        assert_eq!(leo.gender, "Unknown");
        assert_eq!(leo.health_status, HealthStatus::Healthy);
        assert_eq!(page.notifications.last().unwrap().level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_invalid_create_keeps_dialog_open_with_field_errors() {
        let mut page = setup_test();
        page.open_create();

        let outcome = page.submit_create(&lion("")).await;

        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert!(page.form.is_open());
        assert_eq!(page.form.error_for("name"), Some("Name is required"));
        assert!(page.notifications.pending().is_empty());
    }

    #[tokio::test]
    async fn test_edit_and_delete_flow() {
        let mut page = setup_test();
        page.submit_create(&lion("Leo")).await;
        let id = page.animals.data[0].id.clone();

        page.open_edit(&id);
        assert_eq!(page.editing().map(|a| a.name.as_str()), Some("Leo"));
        let update = AnimalUpdateForm { name: Some("Leonard".to_string()), ..Default::default() };
        assert_eq!(page.submit_update(&update).await, SubmitOutcome::Saved);
        assert_eq!(page.animals.data[0].name, "Leonard");

        page.open_delete(&id);
        assert_eq!(page.confirm_delete().await, SubmitOutcome::Saved);
        assert!(page.animals.data.is_empty());
    }

    #[tokio::test]
    async fn test_delete_of_vanished_animal_notifies_and_keeps_list() {
        let mut page = setup_test();
        page.submit_create(&lion("Leo")).await;

        page.open_delete("missing");
        let outcome = page.confirm_delete().await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(page.animals.data.len(), 1);
        assert_eq!(
            page.notifications.last().unwrap().message,
            "Failed to delete animal. Please try again."
        );
    }

    #[tokio::test]
    async fn test_submit_without_dialog_is_ignored() {
        let mut page = setup_test();
        assert_eq!(page.submit_update(&AnimalUpdateForm::default()).await, SubmitOutcome::Ignored);
        assert_eq!(page.confirm_delete().await, SubmitOutcome::Ignored);
    }

    #[test]
    fn test_view_mode_toggles() {
        let mut page = setup_test();
        assert_eq!(page.view_mode, ViewMode::Table);
        page.toggle_view_mode();
        assert_eq!(page.view_mode, ViewMode::Grid);
    }
}
