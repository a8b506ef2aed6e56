use std::sync::Arc;

use shared::{MedicalCheck, MedicalCheckForm, MedicalCheckUpdateForm, StaffRole};
use tracing::{info, warn};

use crate::domain::cache::{invalidated_by, CacheKey, EntityKind, QueryCache};
use crate::domain::errors::{ZooError, ZooResult};
use crate::domain::validation::{
    validate_medical_check_form, validate_medical_check_update, ValidationErrors,
};
use crate::domain::{new_id, now, today};
use crate::storage::ZooStore;

#[derive(Clone)]
pub struct MedicalService {
    store: Arc<dyn ZooStore>,
    cache: QueryCache,
}

impl MedicalService {
    pub fn new(store: Arc<dyn ZooStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    pub async fn list_medical_checks(&self) -> ZooResult<Vec<MedicalCheck>> {
        info!("Listing medical checks");

        let store = Arc::clone(&self.store);
        let checks = self
            .cache
            .get_or_fetch(CacheKey::MedicalChecks, "", || async move {
                store.list_medical_checks().await
            })
            .await?;

        info!("Found {} medical checks", checks.len());
        Ok(checks.as_ref().clone())
    }

    pub async fn create_medical_check(&self, form: &MedicalCheckForm) -> ZooResult<MedicalCheck> {
        info!("Recording medical check: animal={}, vet={}", form.animal_id, form.vet_id);

        let check = validate_medical_check_form(form, today())?.into_medical_check(new_id(), now());
        self.check_vet(&check.vet_id).await?;
        self.store.insert_medical_check(&check).await?;
        self.cache.invalidate_all(invalidated_by(EntityKind::MedicalCheck));

        info!("Recorded medical check {} for animal {}", check.id, check.animal_id);
        Ok(check)
    }

    pub async fn update_medical_check(
        &self,
        id: &str,
        form: &MedicalCheckUpdateForm,
    ) -> ZooResult<MedicalCheck> {
        info!("Updating medical check: {}", id);

        let changes = validate_medical_check_update(form, today())?;
        if let Some(vet_id) = changes.vet_id.as_deref() {
            self.check_vet(vet_id).await?;
        }
        let mut check = self
            .store
            .get_medical_check(id)
            .await?
            .ok_or_else(|| ZooError::not_found("medical check", id))?;

        changes.apply(&mut check);
        self.store.update_medical_check(&check).await?;
        self.cache.invalidate_all(invalidated_by(EntityKind::MedicalCheck));

        info!("Updated medical check {}", check.id);
        Ok(check)
    }

    pub async fn delete_medical_check(&self, id: &str) -> ZooResult<MedicalCheck> {
        info!("Deleting medical check: {}", id);

        let check = self
            .store
            .get_medical_check(id)
            .await?
            .ok_or_else(|| ZooError::not_found("medical check", id))?;
        self.store.delete_medical_check(id).await?;
        self.cache.invalidate_all(invalidated_by(EntityKind::MedicalCheck));

        info!("Deleted medical check {}", check.id);
        Ok(check)
    }

    /// The vet must be an active veterinarian. Unknown ids are left to the
    /// store's reference check.
    async fn check_vet(&self, vet_id: &str) -> ZooResult<()> {
        match self.store.get_staff(vet_id).await? {
            Some(vet) if !vet.is_active || vet.role != StaffRole::Veterinarian => {
                warn!("Rejected vet {} for medical check", vet_id);
                let mut errors = ValidationErrors::new();
                errors.add("vet_id", "Selected staff member is not an active veterinarian");
                Err(ZooError::Validation(errors))
            }
            _ => Ok(()),
        }
    }
}
