use std::sync::Arc;

use shared::{Animal, AnimalForm, AnimalUpdateForm};
use tracing::{info, warn};

use crate::domain::cache::{invalidated_by, CacheKey, EntityKind, QueryCache};
use crate::domain::errors::{ZooError, ZooResult};
use crate::domain::validation::{validate_animal_form, validate_animal_update};
use crate::domain::{new_id, now, today};
use crate::storage::ZooStore;

/// Service for the animal register
#[derive(Clone)]
pub struct AnimalService {
    store: Arc<dyn ZooStore>,
    cache: QueryCache,
}

impl AnimalService {
    pub fn new(store: Arc<dyn ZooStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    /// All animals, newest first
    pub async fn list_animals(&self) -> ZooResult<Vec<Animal>> {
        info!("Listing animals");

        let store = Arc::clone(&self.store);
        let animals = self
            .cache
            .get_or_fetch(CacheKey::Animals, "", || async move { store.list_animals().await })
            .await?;

        info!("Found {} animals", animals.len());
        Ok(animals.as_ref().clone())
    }

    pub async fn create_animal(&self, form: &AnimalForm) -> ZooResult<Animal> {
        info!("Creating animal: name={}, species={}", form.name, form.species);

        let animal = validate_animal_form(form, today())?.into_animal(new_id(), now());
        self.store.insert_animal(&animal).await?;
        self.cache.invalidate_all(invalidated_by(EntityKind::Animal));

        info!("Created animal: {} with ID: {}", animal.name, animal.id);
        Ok(animal)
    }

    pub async fn update_animal(&self, id: &str, form: &AnimalUpdateForm) -> ZooResult<Animal> {
        info!("Updating animal: {}", id);

        let changes = validate_animal_update(form, today())?;
        let mut animal = self
            .store
            .get_animal(id)
            .await?
            .ok_or_else(|| ZooError::not_found("animal", id))?;

        changes.apply(&mut animal)?;
        animal.updated_at = now();
        self.store.update_animal(&animal).await?;
        self.cache.invalidate_all(invalidated_by(EntityKind::Animal));

        info!("Updated animal: {} with ID: {}", animal.name, animal.id);
        Ok(animal)
    }

    /// Deletes the animal together with its diets and medical checks
    pub async fn delete_animal(&self, id: &str) -> ZooResult<Animal> {
        info!("Deleting animal: {}", id);

        let animal = match self.store.get_animal(id).await? {
            Some(animal) => animal,
            None => {
                warn!("Animal not found: {}", id);
                return Err(ZooError::not_found("animal", id));
            }
        };

        self.store.delete_animal(id).await?;
        self.cache.invalidate_all(invalidated_by(EntityKind::Animal));
        self.cache
            .invalidate_all(&[CacheKey::Diets, CacheKey::MedicalChecks]);

        info!("Deleted animal: {} with ID: {}", animal.name, animal.id);
        Ok(animal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use shared::{HealthStatus, SpeciesType};

    fn setup_test() -> (AnimalService, QueryCache) {
        let cache = QueryCache::new();
        let service = AnimalService::new(Arc::new(InMemoryStore::new()), cache.clone());
        (service, cache)
    }

    fn form(name: &str) -> AnimalForm {
        AnimalForm {
            name: name.to_string(),
            species: "Lion".to_string(),
            species_type: "Mammal".to_string(),
            ..AnimalForm::default()
        }
    }

    #[tokio::test]
    async fn test_created_animal_appears_once_with_defaults() {
        let (service, _) = setup_test();
        assert!(service.list_animals().await.unwrap().is_empty());

        let created = service.create_animal(&form("Leo")).await.unwrap();
        let animals = service.list_animals().await.unwrap();

        assert_eq!(animals.len(), 1);
        assert_eq!(animals[0].id, created.id);
        assert_eq!(animals[0].gender, "Unknown");
        assert_eq!(animals[0].health_status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_store() {
        let (service, cache) = setup_test();
        service.list_animals().await.unwrap();

        let err = service.create_animal(&form("")).await.unwrap_err();
        assert!(err.is_validation());
        // Cache untouched, nothing was written
        assert!(cache.is_cached(CacheKey::Animals, ""));
        assert!(service.list_animals().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_invalidate_dependent_keys() {
        let (service, cache) = setup_test();
        service.list_animals().await.unwrap();
        let mut rx = cache.subscribe(CacheKey::AnimalsWithDiets);

        service.create_animal(&form("Leo")).await.unwrap();

        assert!(!cache.is_cached(CacheKey::Animals, ""));
        assert!(rx.has_changed().unwrap());
        assert_eq!(cache.generation(CacheKey::AnimalFullInfo), 1);
        assert_eq!(cache.generation(CacheKey::MedicalChecks), 0);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (service, _) = setup_test();
        let created = service.create_animal(&form("Pip")).await.unwrap();

        let update = AnimalUpdateForm {
            species_type: Some("Bird".to_string()),
            wintering_location: Some("Nile delta".to_string()),
            ..AnimalUpdateForm::default()
        };
        let updated = service.update_animal(&created.id, &update).await.unwrap();
        assert_eq!(updated.species_type, SpeciesType::Bird);
        assert_eq!(updated.wintering_location.as_deref(), Some("Nile delta"));
        assert_eq!(updated.created_at, created.created_at);

        service.delete_animal(&created.id).await.unwrap();
        assert!(service.list_animals().await.unwrap().is_empty());
        assert!(matches!(
            service.delete_animal(&created.id).await,
            Err(ZooError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_missing_animal_is_not_found() {
        let (service, _) = setup_test();
        let err = service
            .update_animal("nope", &AnimalUpdateForm::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ZooError::NotFound { entity: "animal", .. }));
    }
}
