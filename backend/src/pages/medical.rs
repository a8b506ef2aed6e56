//! Medical screen: checkups with animal and veterinarian choices.

use shared::{
    Animal, MedicalCheck, MedicalCheckForm, MedicalCheckUpdateForm, Staff, StaffRole,
};

use crate::domain::{AnimalService, MedicalService, StaffService};
use crate::pages::state::{reject, FormState, Loadable, Notifications, SubmitOutcome};

pub struct MedicalPage {
    medical_service: MedicalService,
    animal_service: AnimalService,
    staff_service: StaffService,
    pub checks: Loadable<Vec<MedicalCheck>>,
    pub animals: Loadable<Vec<Animal>>,
    pub staff: Loadable<Vec<Staff>>,
    pub form: FormState,
    pub notifications: Notifications,
}

impl MedicalPage {
    pub fn new(
        medical_service: MedicalService,
        animal_service: AnimalService,
        staff_service: StaffService,
    ) -> Self {
        Self {
            medical_service,
            animal_service,
            staff_service,
            checks: Loadable::default(),
            animals: Loadable::default(),
            staff: Loadable::default(),
            form: FormState::default(),
            notifications: Notifications::default(),
        }
    }

    pub async fn refresh(&mut self) {
        self.checks.set_loading();
        self.animals.set_loading();
        self.staff.set_loading();

        let (checks, animals, staff) = tokio::join!(
            self.medical_service.list_medical_checks(),
            self.animal_service.list_animals(),
            self.staff_service.list_staff(),
        );
        self.checks.settle("medical checks", checks);
        self.animals.settle("animals", animals);
        self.staff.settle("staff", staff);
    }

    /// Active veterinarians
    pub fn vet_choices(&self) -> Vec<&Staff> {
        self.staff
            .data
            .iter()
            .filter(|s| s.role == StaffRole::Veterinarian)
            .collect()
    }

    pub fn animal_name(&self, id: &str) -> Option<&str> {
        self.animals
            .data
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.name.as_str())
    }

    /// Former vets are no longer listed, so this falls back to None for them
    pub fn vet_name(&self, id: &str) -> Option<String> {
        self.staff.data.iter().find(|s| s.id == id).map(Staff::full_name)
    }

    pub fn checks_for(&self, animal_id: &str) -> Vec<&MedicalCheck> {
        self.checks
            .data
            .iter()
            .filter(|c| c.animal_id == animal_id)
            .collect()
    }

    pub async fn submit_create(&mut self, form: &MedicalCheckForm) -> SubmitOutcome {
        self.form.submitting = true;
        match self.medical_service.create_medical_check(form).await {
            Ok(_) => {
                self.notifications.success("Medical check has been recorded");
                self.form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.form, &mut self.notifications, "record medical check", e),
        }
    }

    pub async fn submit_update(&mut self, form: &MedicalCheckUpdateForm) -> SubmitOutcome {
        let Some(id) = self.form.editing().map(str::to_string) else {
            return SubmitOutcome::Ignored;
        };
        self.form.submitting = true;
        match self.medical_service.update_medical_check(&id, form).await {
            Ok(_) => {
                self.notifications.success("Medical check has been updated");
                self.form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.form, &mut self.notifications, "update medical check", e),
        }
    }

    pub async fn confirm_delete(&mut self) -> SubmitOutcome {
        let Some(id) = self.form.deleting().map(str::to_string) else {
            return SubmitOutcome::Ignored;
        };
        self.form.submitting = true;
        match self.medical_service.delete_medical_check(&id).await {
            Ok(_) => {
                self.notifications.success("Medical check has been removed");
                self.form.close();
                self.refresh().await;
                SubmitOutcome::Saved
            }
            Err(e) => reject(&mut self.form, &mut self.notifications, "delete medical check", e),
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

    async fn setup_test() -> MedicalPage {
        let store = Arc::new(InMemoryStore::with_state(demo_state()));
        let cache = QueryCache::new();
        let mut page = MedicalPage::new(
            MedicalService::new(store.clone(), cache.clone()),
            AnimalService::new(store.clone(), cache.clone()),
            StaffService::new(store, cache),
        );
        page.refresh().await;
        page
    }

    #[tokio::test]
    async fn test_vet_choices_only_list_veterinarians() {
        let page = setup_test().await;
        let vets = page.vet_choices();
        assert!(!vets.is_empty());
        assert!(vets.iter().all(|s| s.role == StaffRole::Veterinarian));
        assert!(vets.len() < page.staff.data.len());
    }

    #[tokio::test]
    async fn test_recording_a_check_refreshes_the_list() {
        let mut page = setup_test().await;
        let before = page.checks.data.len();
        let animal_id = page.animals.data[0].id.clone();
        let vet_id = page.vet_choices()[0].id.clone();

        page.form.open_create();
        let form = MedicalCheckForm {
            animal_id: animal_id.clone(),
            vet_id,
            check_date: "2024-05-01".to_string(),
            diagnosis: "Routine checkup".to_string(),
            ..Default::default()
        };
        assert_eq!(page.submit_create(&form).await, SubmitOutcome::Saved);
        assert_eq!(page.checks.data.len(), before + 1);
        assert_eq!(page.checks.data[0].diagnosis, "Routine checkup");
        assert!(!page.checks_for(&animal_id).is_empty());
    }

    #[tokio::test]
    async fn test_future_check_date_is_rejected() {
        let mut page = setup_test().await;
        let animal_id = page.animals.data[0].id.clone();
        let vet_id = page.vet_choices()[0].id.clone();

        page.form.open_create();
        let form = MedicalCheckForm {
            animal_id,
            vet_id,
            check_date: "2999-01-01".to_string(),
            diagnosis: "Too early".to_string(),
            ..Default::default()
        };
        assert_eq!(page.submit_create(&form).await, SubmitOutcome::Rejected);
        assert_eq!(page.form.error_for("check_date"), Some("Check date cannot be in the future"));
    }

    #[tokio::test]
    async fn test_delete_removes_the_check() {
        let mut page = setup_test().await;
        let before = page.checks.data.len();
        let id = page.checks.data[0].id.clone();

        page.form.open_delete(&id);
        assert_eq!(page.confirm_delete().await, SubmitOutcome::Saved);
        assert_eq!(page.checks.data.len(), before - 1);
    }
}
