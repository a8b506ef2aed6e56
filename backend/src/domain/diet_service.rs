use std::sync::Arc;

use shared::{Diet, DietForm, DietType, DietTypeForm, DietTypeUpdateForm, DietUpdateForm};
use tracing::{info, warn};

use crate::domain::cache::{invalidated_by, CacheKey, EntityKind, QueryCache};
use crate::domain::errors::{ZooError, ZooResult};
use crate::domain::validation::{
    validate_diet_form, validate_diet_type_form, validate_diet_type_update, validate_diet_update,
};
use crate::domain::{new_id, now};
use crate::storage::ZooStore;

/// Diet types and the diets assigned to animals
#[derive(Clone)]
pub struct DietService {
    store: Arc<dyn ZooStore>,
    cache: QueryCache,
}

impl DietService {
    pub fn new(store: Arc<dyn ZooStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    /// Diet types in alphabetical order
    pub async fn list_diet_types(&self) -> ZooResult<Vec<DietType>> {
        info!("Listing diet types");

        let store = Arc::clone(&self.store);
        let diet_types = self
            .cache
            .get_or_fetch(CacheKey::DietTypes, "", || async move { store.list_diet_types().await })
            .await?;

        info!("Found {} diet types", diet_types.len());
        Ok(diet_types.as_ref().clone())
    }

    pub async fn create_diet_type(&self, form: &DietTypeForm) -> ZooResult<DietType> {
        info!("Creating diet type: {}", form.name);

        let diet_type = validate_diet_type_form(form)?.into_diet_type(new_id(), now());
        self.store.insert_diet_type(&diet_type).await?;
        self.cache.invalidate_all(invalidated_by(EntityKind::DietType));

        info!("Created diet type: {} with ID: {}", diet_type.name, diet_type.id);
        Ok(diet_type)
    }

    pub async fn update_diet_type(&self, id: &str, form: &DietTypeUpdateForm) -> ZooResult<DietType> {
        info!("Updating diet type: {}", id);

        let changes = validate_diet_type_update(form)?;
        let mut diet_type = self
            .store
            .get_diet_type(id)
            .await?
            .ok_or_else(|| ZooError::not_found("diet type", id))?;

        changes.apply(&mut diet_type);
        self.store.update_diet_type(&diet_type).await?;
        self.cache.invalidate_all(invalidated_by(EntityKind::DietType));

        info!("Updated diet type: {} with ID: {}", diet_type.name, diet_type.id);
        Ok(diet_type)
    }

    /// Fails with [`ZooError::Constraint`] while any diet still uses the type
    pub async fn delete_diet_type(&self, id: &str) -> ZooResult<DietType> {
        info!("Deleting diet type: {}", id);

        let diet_type = self
            .store
            .get_diet_type(id)
            .await?
            .ok_or_else(|| ZooError::not_found("diet type", id))?;

        if let Err(err) = self.store.delete_diet_type(id).await {
            warn!("Diet type {} not deleted: {}", id, err);
            return Err(err.into());
        }
        self.cache.invalidate_all(invalidated_by(EntityKind::DietType));

        info!("Deleted diet type: {} with ID: {}", diet_type.name, diet_type.id);
        Ok(diet_type)
    }

    /// All diets, newest first
    pub async fn list_diets(&self) -> ZooResult<Vec<Diet>> {
        info!("Listing diets");

        let store = Arc::clone(&self.store);
        let diets = self
            .cache
            .get_or_fetch(CacheKey::Diets, "", || async move { store.list_diets().await })
            .await?;

        info!("Found {} diets", diets.len());
        Ok(diets.as_ref().clone())
    }

    pub async fn create_diet(&self, form: &DietForm) -> ZooResult<Diet> {
        info!("Creating diet: animal={}, food={}", form.animal_id, form.food_name);

        let diet = validate_diet_form(form)?.into_diet(new_id(), now());
        self.store.insert_diet(&diet).await?;
        self.cache.invalidate_all(invalidated_by(EntityKind::Diet));

        info!("Created diet: {} with ID: {}", diet.food_name, diet.id);
        Ok(diet)
    }

    pub async fn update_diet(&self, id: &str, form: &DietUpdateForm) -> ZooResult<Diet> {
        info!("Updating diet: {}", id);

        let changes = validate_diet_update(form)?;
        let mut diet = self
            .store
            .get_diet(id)
            .await?
            .ok_or_else(|| ZooError::not_found("diet", id))?;

        changes.apply(&mut diet)?;
        diet.updated_at = now();
        self.store.update_diet(&diet).await?;
        self.cache.invalidate_all(invalidated_by(EntityKind::Diet));

        info!("Updated diet: {} with ID: {}", diet.food_name, diet.id);
        Ok(diet)
    }

    pub async fn delete_diet(&self, id: &str) -> ZooResult<Diet> {
        info!("Deleting diet: {}", id);

        let diet = self
            .store
            .get_diet(id)
            .await?
            .ok_or_else(|| ZooError::not_found("diet", id))?;
        self.store.delete_diet(id).await?;
        self.cache.invalidate_all(invalidated_by(EntityKind::Diet));

        info!("Deleted diet: {} with ID: {}", diet.food_name, diet.id);
        Ok(diet)
    }
}
