//! Staff management, including the two-step spouse link.
//!
//! A spouse link lives on both records. The primary write happens first;
//! the spouse's record is updated by a second, separate store call. When
//! that second call fails the primary write stands and the result carries
//! [`SpouseLink::Failed`] so callers can warn instead of failing.

use std::sync::Arc;

use shared::{Staff, StaffForm, StaffUpdateForm};
use tracing::{info, warn};

use crate::domain::cache::{invalidated_by, CacheKey, EntityKind, QueryCache};
use crate::domain::errors::{ZooError, ZooResult};
use crate::domain::validation::{validate_staff_form, validate_staff_update};
use crate::domain::{new_id, now, today};
use crate::storage::ZooStore;

/// Outcome of the follow-up write on the spouse's record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpouseLink {
    /// No spouse record needed touching
    NotRequested,
    Linked,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffWrite {
    pub staff: Staff,
    pub spouse_link: SpouseLink,
}

impl StaffWrite {
    pub fn warning(&self) -> Option<String> {
        match &self.spouse_link {
            SpouseLink::Failed(reason) => Some(format!(
                "Saved {}, but the spouse's record could not be updated: {}",
                self.staff.full_name(),
                reason
            )),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct StaffService {
    store: Arc<dyn ZooStore>,
    cache: QueryCache,
}

impl StaffService {
    pub fn new(store: Arc<dyn ZooStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    /// Active employees, newest first
    pub async fn list_staff(&self) -> ZooResult<Vec<Staff>> {
        info!("Listing staff");

        let store = Arc::clone(&self.store);
        let staff = self
            .cache
            .get_or_fetch(CacheKey::Staff, "", || async move { store.list_staff().await })
            .await?;
        let active: Vec<Staff> = staff.iter().filter(|s| s.is_active).cloned().collect();

        info!("Found {} active staff", active.len());
        Ok(active)
    }

    pub async fn create_staff(&self, form: &StaffForm) -> ZooResult<StaffWrite> {
        info!("Creating staff: {} {}", form.first_name, form.last_name);

        let staff = validate_staff_form(form, today())?.into_staff(new_id(), now());
        self.store.insert_staff(&staff).await?;

        let spouse_link = match staff.spouse_id.as_deref() {
            Some(spouse_id) => self.link_back(spouse_id, &staff.id).await,
            None => SpouseLink::NotRequested,
        };
        self.cache.invalidate_all(invalidated_by(EntityKind::Staff));

        info!("Created staff: {} with ID: {}", staff.full_name(), staff.id);
        Ok(StaffWrite { staff, spouse_link })
    }

    pub async fn update_staff(&self, id: &str, form: &StaffUpdateForm) -> ZooResult<StaffWrite> {
        info!("Updating staff: {}", id);

        let changes = validate_staff_update(form, id, today())?;
        let mut staff = self
            .store
            .get_staff(id)
            .await?
            .ok_or_else(|| ZooError::not_found("staff", id))?;
        if !staff.is_active && changes.is_active != Some(true) {
            warn!("Active staff not found: {}", id);
            return Err(ZooError::not_found("staff", id));
        }
        let was_active = staff.is_active;
        let previous_spouse = staff.spouse_id.clone();

        changes.apply(&mut staff);
        // Deactivation through an edit drops the marriage like a delete does
        if was_active && !staff.is_active {
            staff.spouse_id = None;
        }
        staff.updated_at = now();
        self.store.update_staff(&staff).await?;

        let spouse_link = if staff.spouse_id != previous_spouse {
            let mut outcomes = Vec::new();
            if let Some(old) = previous_spouse.as_deref() {
                outcomes.push(self.unlink_back(old, id).await);
            }
            if let Some(new) = staff.spouse_id.as_deref() {
                outcomes.push(self.link_back(new, id).await);
            }
            merge_outcomes(outcomes)
        } else {
            SpouseLink::NotRequested
        };
        self.cache.invalidate_all(invalidated_by(EntityKind::Staff));

        info!("Updated staff: {} with ID: {}", staff.full_name(), staff.id);
        Ok(StaffWrite { staff, spouse_link })
    }

    /// Deactivates the employee. Staff records are never physically removed.
    pub async fn delete_staff(&self, id: &str) -> ZooResult<StaffWrite> {
        info!("Deactivating staff: {}", id);

        let mut staff = match self.store.get_staff(id).await? {
            Some(staff) if staff.is_active => staff,
            _ => {
                warn!("Active staff not found: {}", id);
                return Err(ZooError::not_found("staff", id));
            }
        };

        self.store.deactivate_staff(id).await?;
        let spouse_link = match staff.spouse_id.take() {
            Some(spouse_id) => self.unlink_back(&spouse_id, id).await,
            None => SpouseLink::NotRequested,
        };
        staff.is_active = false;
        self.cache.invalidate_all(invalidated_by(EntityKind::Staff));

        info!("Deactivated staff: {} with ID: {}", staff.full_name(), staff.id);
        Ok(StaffWrite { staff, spouse_link })
    }

    /// Points `spouse_id` back at `staff_id`
    async fn link_back(&self, spouse_id: &str, staff_id: &str) -> SpouseLink {
        match self.store.set_spouse(spouse_id, Some(staff_id)).await {
            Ok(()) => SpouseLink::Linked,
            Err(err) => {
                warn!(
                    "Spouse link left one-sided: {} -> {} ({})",
                    staff_id, spouse_id, err
                );
                SpouseLink::Failed(err.to_string())
            }
        }
    }

    /// Clears the spouse's link, but only while it still points at `staff_id`
    async fn unlink_back(&self, spouse_id: &str, staff_id: &str) -> SpouseLink {
        let spouse = match self.store.get_staff(spouse_id).await {
            Ok(Some(spouse)) => spouse,
            Ok(None) => return SpouseLink::NotRequested,
            Err(err) => {
                warn!("Could not load spouse {} of {}: {}", spouse_id, staff_id, err);
                return SpouseLink::Failed(err.to_string());
            }
        };
        if spouse.spouse_id.as_deref() != Some(staff_id) || !spouse.is_active {
            return SpouseLink::NotRequested;
        }

        match self.store.set_spouse(spouse_id, None).await {
            Ok(()) => SpouseLink::Linked,
            Err(err) => {
                warn!("Stale spouse link left on {}: {}", spouse_id, err);
                SpouseLink::Failed(err.to_string())
            }
        }
    }
}

fn merge_outcomes(outcomes: Vec<SpouseLink>) -> SpouseLink {
    let failures: Vec<String> = outcomes
        .iter()
        .filter_map(|o| match o {
            SpouseLink::Failed(reason) => Some(reason.clone()),
            _ => None,
        })
        .collect();
    if !failures.is_empty() {
        SpouseLink::Failed(failures.join("; "))
    } else if outcomes.contains(&SpouseLink::Linked) {
        SpouseLink::Linked
    } else {
        SpouseLink::NotRequested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reports::married_couples;
    use crate::storage::InMemoryStore;

    fn setup_test() -> (StaffService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let service = StaffService::new(store.clone(), QueryCache::new());
        (service, store)
    }

    fn form(first: &str, role: &str, spouse_id: Option<&str>) -> StaffForm {
        StaffForm {
            first_name: first.to_string(),
            last_name: "Smith".to_string(),
            email: format!("{}@zoo.test", first.to_lowercase()),
            role: role.to_string(),
            hire_date: "2020-01-01".to_string(),
            spouse_id: spouse_id.map(str::to_string),
            ..StaffForm::default()
        }
    }

    #[tokio::test]
    async fn test_marriage_scenario() {
        let (service, store) = setup_test();

        let dana = service.create_staff(&form("Dana", "Veterinarian", None)).await.unwrap();
        assert_eq!(dana.spouse_link, SpouseLink::NotRequested);

        let lee = service
            .create_staff(&form("Lee", "Keeper", Some(dana.staff.id.as_str())))
            .await
            .unwrap();
        assert_eq!(lee.spouse_link, SpouseLink::Linked);

        let staff = store.list_staff().await.unwrap();
        let couples = married_couples(&staff);
        assert_eq!(couples.len(), 1);
        assert!(couples[0].contains(&dana.staff.id) && couples[0].contains(&lee.staff.id));

        // Removing Dana clears Lee's side of the link
        let removed = service.delete_staff(&dana.staff.id).await.unwrap();
        assert!(!removed.staff.is_active);
        let lee_now = store.get_staff(&lee.staff.id).await.unwrap().unwrap();
        assert!(lee_now.spouse_id.is_none());

        let active = service.list_staff().await.unwrap();
        assert_eq!(active.len(), 1);
        assert!(married_couples(&store.list_staff().await.unwrap()).is_empty());
    }

    #[tokio::test]
    async fn test_deactivating_through_update_clears_both_spouse_links() {
        let (service, store) = setup_test();
        let dana = service.create_staff(&form("Dana", "Veterinarian", None)).await.unwrap();
        let lee = service
            .create_staff(&form("Lee", "Keeper", Some(dana.staff.id.as_str())))
            .await
            .unwrap();

        let update = StaffUpdateForm {
            is_active: Some(false),
            ..StaffUpdateForm::default()
        };
        let result = service.update_staff(&dana.staff.id, &update).await.unwrap();
        assert!(!result.staff.is_active);
        assert!(result.staff.spouse_id.is_none());
        assert_eq!(result.spouse_link, SpouseLink::Linked);

        let dana_now = store.get_staff(&dana.staff.id).await.unwrap().unwrap();
        let lee_now = store.get_staff(&lee.staff.id).await.unwrap().unwrap();
        assert!(!dana_now.is_active);
        assert!(dana_now.spouse_id.is_none());
        assert!(lee_now.spouse_id.is_none());
        assert!(married_couples(&store.list_staff().await.unwrap()).is_empty());
    }

    #[tokio::test]
    async fn test_updating_inactive_staff_is_not_found_unless_reactivated() {
        let (service, store) = setup_test();
        let dana = service.create_staff(&form("Dana", "Veterinarian", None)).await.unwrap();
        let lee = service.create_staff(&form("Lee", "Keeper", None)).await.unwrap();
        service.delete_staff(&dana.staff.id).await.unwrap();

        let relink = StaffUpdateForm {
            spouse_id: Some(lee.staff.id.clone()),
            ..StaffUpdateForm::default()
        };
        assert!(matches!(
            service.update_staff(&dana.staff.id, &relink).await,
            Err(ZooError::NotFound { .. })
        ));
        let lee_now = store.get_staff(&lee.staff.id).await.unwrap().unwrap();
        assert!(lee_now.spouse_id.is_none());

        let reactivate = StaffUpdateForm {
            is_active: Some(true),
            ..StaffUpdateForm::default()
        };
        let result = service.update_staff(&dana.staff.id, &reactivate).await.unwrap();
        assert!(result.staff.is_active);
        assert_eq!(service.list_staff().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_back_link_is_a_warning_not_an_error() {
        let (service, store) = setup_test();
        let dana = service.create_staff(&form("Dana", "Veterinarian", None)).await.unwrap();
        service.delete_staff(&dana.staff.id).await.unwrap();

        // Dana is inactive, so her record refuses the back link
        let lee = service
            .create_staff(&form("Lee", "Keeper", Some(dana.staff.id.as_str())))
            .await
            .unwrap();
        assert!(matches!(lee.spouse_link, SpouseLink::Failed(_)));
        assert!(lee.warning().is_some());

        let stored = store.get_staff(&lee.staff.id).await.unwrap().unwrap();
        assert_eq!(stored.spouse_id.as_deref(), Some(dana.staff.id.as_str()));
        assert!(married_couples(&store.list_staff().await.unwrap()).is_empty());
    }

    #[tokio::test]
    async fn test_changing_spouse_moves_the_back_link() {
        let (service, store) = setup_test();
        let dana = service.create_staff(&form("Dana", "Veterinarian", None)).await.unwrap();
        let kim = service.create_staff(&form("Kim", "Keeper", None)).await.unwrap();
        let lee = service
            .create_staff(&form("Lee", "Keeper", Some(dana.staff.id.as_str())))
            .await
            .unwrap();

        let update = StaffUpdateForm {
            spouse_id: Some(kim.staff.id.clone()),
            ..StaffUpdateForm::default()
        };
        let result = service.update_staff(&lee.staff.id, &update).await.unwrap();
        assert_eq!(result.spouse_link, SpouseLink::Linked);

        let dana_now = store.get_staff(&dana.staff.id).await.unwrap().unwrap();
        let kim_now = store.get_staff(&kim.staff.id).await.unwrap().unwrap();
        assert!(dana_now.spouse_id.is_none());
        assert_eq!(kim_now.spouse_id.as_deref(), Some(lee.staff.id.as_str()));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_constraint_error() {
        let (service, _) = setup_test();
        service.create_staff(&form("Dana", "Veterinarian", None)).await.unwrap();
        let err = service
            .create_staff(&form("Dana", "Keeper", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ZooError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_deleting_inactive_staff_is_not_found() {
        let (service, _) = setup_test();
        let dana = service.create_staff(&form("Dana", "Veterinarian", None)).await.unwrap();
        service.delete_staff(&dana.staff.id).await.unwrap();
        assert!(matches!(
            service.delete_staff(&dana.staff.id).await,
            Err(ZooError::NotFound { .. })
        ));
    }
}
