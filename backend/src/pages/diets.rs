//! Diets screen: the diet type catalogue and the per-animal diets, each
//! with its own dialogs.

use shared::{
    Animal, Diet, DietForm, DietType, DietTypeForm, DietTypeUpdateForm, DietUpdateForm,
};

use crate::domain::{AnimalService, DietService};
use crate::pages::state::{reject, FormState, Loadable, Notifications, SubmitOutcome};

pub struct DietsPage {
    diets_service: DietService,
    animal_service: AnimalService,
    pub diet_types: Loadable<Vec<DietType>>,
    pub diets: Loadable<Vec<Diet>>,
    /// Animal choices for the diet form
    pub animals: Loadable<Vec<Animal>>,
    pub type_form: FormState,
    pub diet_form: FormState,
    pub notifications: Notifications,
}

impl DietsPage {
    pub fn new(diets_service: DietService, animal_service: AnimalService) -> Self {
        Self {
            diets_service,
            animal_service,
            diet_types: Loadable::default(),
            diets: Loadable::default(),
            animals: Loadable::default(),
            type_form: FormState::default(),
            diet_form: FormState::default(),
            notifications: Notifications::default(),
        }
    }

    pub async fn refresh(&mut self) {
        self.diet_types.set_loading();
        self.diets.set_loading();
        self.animals.set_loading();

        let (types, diets, animals) = tokio::join!(
            self.diets_service.list_diet_types(),
            self.diets_service.list_diets(),
            self.animal_service.list_animals(),
        );
        self.diet_types.settle("diet types", types);
        self.diets.settle("diets", diets);
        self.animals.settle("animals", animals);
    }

    pub fn diet_type_name(&self, id: &str) -> Option<&str> {
        self.diet_types
            .data
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
    }

    pub fn animal_name(&self, id: &str) -> Option<&str> {
        self.animals
            .data
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.name.as_str())
    }

    /// Diets without an end date
    pub fn current_diets(&self) -> Vec<&Diet> {
        self.diets.data.iter().filter(|d| d.is_current()).collect()
    }

    pub async fn submit_create_diet_type(&mut self, form: &DietTypeForm) -> SubmitOutcome {
        self.type_form.submitting = true;
        match self.diets_service.create_diet_type(form).await {
            Ok(diet_type) => {
                self.notifications
                    .success(format!("Diet type {} has been added", diet_type.name));
                self.type_form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.type_form, &mut self.notifications, "add diet type", e),
        }
    }

    pub async fn submit_update_diet_type(&mut self, form: &DietTypeUpdateForm) -> SubmitOutcome {
        let Some(id) = self.type_form.editing().map(str::to_string) else {
            return SubmitOutcome::Ignored;
        };
        self.type_form.submitting = true;
        match self.diets_service.update_diet_type(&id, form).await {
            Ok(diet_type) => {
                self.notifications
                    .success(format!("Diet type {} has been updated", diet_type.name));
                self.type_form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.type_form, &mut self.notifications, "update diet type", e),
        }
    }

    pub async fn confirm_delete_diet_type(&mut self) -> SubmitOutcome {
        let Some(id) = self.type_form.deleting().map(str::to_string) else {
            return SubmitOutcome::Ignored;
        };
        self.type_form.submitting = true;
        match self.diets_service.delete_diet_type(&id).await {
            Ok(diet_type) => {
                self.notifications
                    .success(format!("Diet type {} has been removed", diet_type.name));
                self.type_form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.type_form, &mut self.notifications, "delete diet type", e),
        }
    }

    pub async fn submit_create_diet(&mut self, form: &DietForm) -> SubmitOutcome {
        self.diet_form.submitting = true;
        match self.diets_service.create_diet(form).await {
            Ok(diet) => {
                self.notifications.success(format!("Diet {} has been added", diet.food_name));
                self.diet_form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.diet_form, &mut self.notifications, "add diet", e),
        }
    }

    pub async fn submit_update_diet(&mut self, form: &DietUpdateForm) -> SubmitOutcome {
        let Some(id) = self.diet_form.editing().map(str::to_string) else {
            return SubmitOutcome::Ignored;
        };
        self.diet_form.submitting = true;
        match self.diets_service.update_diet(&id, form).await {
            Ok(diet) => {
                self.notifications.success(format!("Diet {} has been updated", diet.food_name));
                self.diet_form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.diet_form, &mut self.notifications, "update diet", e),
        }
    }

    pub async fn confirm_delete_diet(&mut self) -> SubmitOutcome {
        let Some(id) = self.diet_form.deleting().map(str::to_string) else {
            return SubmitOutcome::Ignored;
        };
        self.diet_form.submitting = true;
        match self.diets_service.delete_diet(&id).await {
            Ok(diet) => {
                self.notifications.success(format!("Diet {} has been removed", diet.food_name));
                self.diet_form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.diet_form, &mut self.notifications, "delete diet", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QueryCache;
    use crate::storage::InMemoryStore;
    use shared::AnimalForm;
    use std::sync::Arc;

    async fn setup_test() -> DietsPage {
        let store = Arc::new(InMemoryStore::new());
        let cache = QueryCache::new();
        let animals = AnimalService::new(store.clone(), cache.clone());
        animals
            .create_animal(&AnimalForm {
                name: "Leo".to_string(),
                species: "Lion".to_string(),
                species_type: "Mammal".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let mut page = DietsPage::new(DietService::new(store, cache), animals);
        page.refresh().await;
        page
    }

    fn raw_meat() -> DietTypeForm {
        DietTypeForm {
            name: "Raw meat".to_string(),
            category: "Carnivore".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_diet_lifecycle_resolves_names() {
        let mut page = setup_test().await;
        let leo_id = page.animals.data[0].id.clone();

        page.type_form.open_create();
        assert_eq!(page.submit_create_diet_type(&raw_meat()).await, SubmitOutcome::Saved);
        let type_id = page.diet_types.data[0].id.clone();

        page.diet_form.open_create();
        let form = DietForm {
            animal_id: leo_id.clone(),
            diet_type_id: type_id.clone(),
            food_name: "Beef".to_string(),
            start_date: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert_eq!(page.submit_create_diet(&form).await, SubmitOutcome::Saved);

        let diet = page.current_diets()[0];
        assert_eq!(page.animal_name(&diet.animal_id), Some("Leo"));
        assert_eq!(page.diet_type_name(&diet.diet_type_id), Some("Raw meat"));

        let diet_id = diet.id.clone();
        page.diet_form.open_edit(&diet_id);
        let end = DietUpdateForm { end_date: Some("2024-02-01".to_string()), ..Default::default() };
        assert_eq!(page.submit_update_diet(&end).await, SubmitOutcome::Saved);
        assert!(page.current_diets().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_a_referenced_diet_type_fails_and_keeps_both() {
        let mut page = setup_test().await;
        let leo_id = page.animals.data[0].id.clone();
        page.submit_create_diet_type(&raw_meat()).await;
        let type_id = page.diet_types.data[0].id.clone();
        let form = DietForm {
            animal_id: leo_id,
            diet_type_id: type_id.clone(),
            food_name: "Beef".to_string(),
            ..Default::default()
        };
        page.submit_create_diet(&form).await;

        page.type_form.open_delete(&type_id);
        let outcome = page.confirm_delete_diet_type().await;
        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(
            page.notifications.last().unwrap().message,
            "Failed to delete diet type. Please try again."
        );

        page.refresh().await;
        assert_eq!(page.diet_types.data.len(), 1);
        assert_eq!(page.diets.data.len(), 1);
    }

    #[tokio::test]
    async fn test_end_before_start_is_a_field_error() {
        let mut page = setup_test().await;
        let leo_id = page.animals.data[0].id.clone();
        page.submit_create_diet_type(&raw_meat()).await;
        let type_id = page.diet_types.data[0].id.clone();

        page.diet_form.open_create();
        let form = DietForm {
            animal_id: leo_id,
            diet_type_id: type_id,
            food_name: "Beef".to_string(),
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("2024-02-01".to_string()),
            ..Default::default()
        };
        assert_eq!(page.submit_create_diet(&form).await, SubmitOutcome::Rejected);
        assert!(page.diet_form.error_for("end_date").is_some());
        assert!(!page.type_form.is_open());
    }
}
