//! Staff screen: keepers and veterinarians side by side, each row showing
//! the resolved spouse name.

use shared::{Staff, StaffForm, StaffRole, StaffUpdateForm};

use crate::domain::{StaffService, StaffWrite};
use crate::pages::state::{reject, FormState, Loadable, Notifications, SubmitOutcome};

pub struct StaffPage {
    service: StaffService,
    pub staff: Loadable<Vec<Staff>>,
    pub form: FormState,
    pub notifications: Notifications,
}

impl StaffPage {
    pub fn new(service: StaffService) -> Self {
        Self {
            service,
            staff: Loadable::default(),
            form: FormState::default(),
            notifications: Notifications::default(),
        }
    }

    pub async fn refresh(&mut self) {
        self.staff.set_loading();
        let result = self.service.list_staff().await;
        self.staff.settle("staff", result);
    }

    fn with_role(&self, role: StaffRole) -> Vec<&Staff> {
        self.staff.data.iter().filter(|s| s.role == role).collect()
    }

    pub fn keepers(&self) -> Vec<&Staff> {
        self.with_role(StaffRole::Keeper)
    }

    pub fn vets(&self) -> Vec<&Staff> {
        self.with_role(StaffRole::Veterinarian)
    }

    /// Resolves a spouse link against the loaded (active) staff
    pub fn spouse_of(&self, staff: &Staff) -> Option<&Staff> {
        let spouse_id = staff.spouse_id.as_deref()?;
        self.staff.data.iter().find(|s| s.id == spouse_id)
    }

    /// Spouse choices for the open form: everyone but the person edited
    pub fn spouse_choices(&self) -> Vec<&Staff> {
        let editing = self.form.editing();
        self.staff
            .data
            .iter()
            .filter(|s| Some(s.id.as_str()) != editing)
            .collect()
    }

    pub fn editing(&self) -> Option<&Staff> {
        let id = self.form.editing()?;
        self.staff.data.iter().find(|s| s.id == id)
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

    async fn saved(&mut self, write: StaffWrite, verb: &str) -> SubmitOutcome {
        self.notifications
            .success(format!("{} has been {}", write.staff.full_name(), verb));
        if let Some(warning) = write.warning() {
            self.notifications.warning(warning);
        }
        self.form.close();
        self.refresh().await;
        SubmitOutcome::Saved
    }

    pub async fn submit_create(&mut self, form: &StaffForm) -> SubmitOutcome {
        self.form.submitting = true;
        match self.service.create_staff(form).await {
            Ok(write) => self.saved(write, "added").await,
            Err(e) => reject(&mut self.form, &mut self.notifications, "add employee", e),
        }
    }

    pub async fn submit_update(&mut self, form: &StaffUpdateForm) -> SubmitOutcome {
        let Some(id) = self.form.editing().map(str::to_string) else {
            return SubmitOutcome::Ignored;
        };
        self.form.submitting = true;
        match self.service.update_staff(&id, form).await {
            Ok(write) => self.saved(write, "updated").await,
            Err(e) => reject(&mut self.form, &mut self.notifications, "update employee", e),
        }
    }

    pub async fn confirm_delete(&mut self) -> SubmitOutcome {
        let Some(id) = self.form.deleting().map(str::to_string) else {
            return SubmitOutcome::Ignored;
        };
        self.form.submitting = true;
        match self.service.delete_staff(&id).await {
            Ok(write) => self.saved(write, "removed").await,
            Err(e) => reject(&mut self.form, &mut self.notifications, "remove employee", e),
        }
    }
}
