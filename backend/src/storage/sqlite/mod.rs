//! # SQLite Store
//!
//! The live [`ZooStore`]: one repository per table group over a shared
//! [`DbConnection`]. Referential rules (cascade on animal delete, blocked
//! delete of a referenced diet type, unique email) are enforced by the
//! schema and surface as [`crate::storage::StoreError::Constraint`].

pub mod codec;
pub mod connection;
pub mod repositories;

pub use connection::DbConnection;

use async_trait::async_trait;

use crate::storage::traits::{StoreResult, ZooStore};
use repositories::{
    AnimalRepository, DietRepository, MedicalRepository, ReportRepository, StaffRepository,
};
use shared::{
    Animal, AnimalDietRow, AnimalFullInfo, Diet, DietType, MarriedCouple, MedicalCheck, Staff,
};

#[derive(Clone)]
pub struct SqliteStore {
    animals: AnimalRepository,
    staff: StaffRepository,
    diets: DietRepository,
    medical: MedicalRepository,
    reports: ReportRepository,
}

impl SqliteStore {
    pub fn new(db: DbConnection) -> Self {
        Self {
            animals: AnimalRepository::new(db.clone()),
            staff: StaffRepository::new(db.clone()),
            diets: DietRepository::new(db.clone()),
            medical: MedicalRepository::new(db.clone()),
            reports: ReportRepository::new(db),
        }
    }
}

#[async_trait]
impl ZooStore for SqliteStore {
    async fn list_animals(&self) -> StoreResult<Vec<Animal>> {
        self.animals.list_animals().await
    }

    async fn get_animal(&self, id: &str) -> StoreResult<Option<Animal>> {
        self.animals.get_animal(id).await
    }

    async fn insert_animal(&self, animal: &Animal) -> StoreResult<()> {
        self.animals.store_animal(animal).await
    }

    async fn update_animal(&self, animal: &Animal) -> StoreResult<()> {
        self.animals.update_animal(animal).await
    }

    async fn delete_animal(&self, id: &str) -> StoreResult<()> {
        self.animals.delete_animal(id).await
    }

    async fn list_staff(&self) -> StoreResult<Vec<Staff>> {
        self.staff.list_staff().await
    }

    async fn get_staff(&self, id: &str) -> StoreResult<Option<Staff>> {
        self.staff.get_staff(id).await
    }

    async fn insert_staff(&self, staff: &Staff) -> StoreResult<()> {
        self.staff.store_staff(staff).await
    }

    async fn update_staff(&self, staff: &Staff) -> StoreResult<()> {
        self.staff.update_staff(staff).await
    }

    async fn deactivate_staff(&self, id: &str) -> StoreResult<()> {
        self.staff.deactivate_staff(id).await
    }

    async fn set_spouse(&self, id: &str, spouse_id: Option<&str>) -> StoreResult<()> {
        self.staff.set_spouse(id, spouse_id).await
    }

    async fn list_diet_types(&self) -> StoreResult<Vec<DietType>> {
        self.diets.list_diet_types().await
    }

    async fn get_diet_type(&self, id: &str) -> StoreResult<Option<DietType>> {
        self.diets.get_diet_type(id).await
    }

    async fn insert_diet_type(&self, diet_type: &DietType) -> StoreResult<()> {
        self.diets.store_diet_type(diet_type).await
    }

    async fn update_diet_type(&self, diet_type: &DietType) -> StoreResult<()> {
        self.diets.update_diet_type(diet_type).await
    }

    async fn delete_diet_type(&self, id: &str) -> StoreResult<()> {
        self.diets.delete_diet_type(id).await
    }

    async fn list_diets(&self) -> StoreResult<Vec<Diet>> {
        self.diets.list_diets().await
    }

    async fn get_diet(&self, id: &str) -> StoreResult<Option<Diet>> {
        self.diets.get_diet(id).await
    }

    async fn insert_diet(&self, diet: &Diet) -> StoreResult<()> {
        self.diets.store_diet(diet).await
    }

    async fn update_diet(&self, diet: &Diet) -> StoreResult<()> {
        self.diets.update_diet(diet).await
    }

    async fn delete_diet(&self, id: &str) -> StoreResult<()> {
        self.diets.delete_diet(id).await
    }

    async fn list_medical_checks(&self) -> StoreResult<Vec<MedicalCheck>> {
        self.medical.list_medical_checks().await
    }

    async fn get_medical_check(&self, id: &str) -> StoreResult<Option<MedicalCheck>> {
        self.medical.get_medical_check(id).await
    }

    async fn insert_medical_check(&self, check: &MedicalCheck) -> StoreResult<()> {
        self.medical.store_medical_check(check).await
    }

    async fn update_medical_check(&self, check: &MedicalCheck) -> StoreResult<()> {
        self.medical.update_medical_check(check).await
    }

    async fn delete_medical_check(&self, id: &str) -> StoreResult<()> {
        self.medical.delete_medical_check(id).await
    }

    async fn animal_full_info(&self, search: Option<&str>) -> StoreResult<Vec<AnimalFullInfo>> {
        self.reports.animal_full_info(search).await
    }

    async fn married_couples(&self) -> StoreResult<Vec<MarriedCouple>> {
        self.reports.married_couples().await
    }

    async fn animals_with_diets(&self) -> StoreResult<Vec<AnimalDietRow>> {
        self.reports.animals_with_diets().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reports::fixtures::{animal, at, check, diet, diet_type, staff};
    use crate::storage::memory::InMemoryStore;
    use crate::storage::traits::StoreError;
    use shared::StaffRole;

    async fn setup_test() -> SqliteStore {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        SqliteStore::new(db)
    }

    /// Same rows into any store, in dependency order
    async fn seed(store: &dyn ZooStore) {
        store.insert_animal(&animal("a1", "Leo", "Lion", 1)).await.unwrap();
        store.insert_animal(&animal("a2", "Zia", "Zebra", 2)).await.unwrap();
        store.insert_animal(&animal("a3", "Lea", "Lion", 2)).await.unwrap();

        store.insert_staff(&staff("v1", "Dana", StaffRole::Veterinarian, None, 1)).await.unwrap();
        store.insert_staff(&staff("k1", "Lee", StaffRole::Keeper, Some("v1"), 2)).await.unwrap();
        store.set_spouse("v1", Some("k1")).await.unwrap();
        store.insert_staff(&staff("k2", "Kim", StaffRole::Keeper, Some("k1"), 3)).await.unwrap();

        store.insert_diet_type(&diet_type("t1", "Raw meat")).await.unwrap();
        store.insert_diet_type(&diet_type("t2", "Grazing")).await.unwrap();

        store.insert_diet(&diet("d1", "a1", "t1", Some("2024-01-01"), None, 1)).await.unwrap();
        store.insert_diet(&diet("d2", "a1", "t1", None, None, 5)).await.unwrap();
        store.insert_diet(&diet("d3", "a2", "t2", Some("2024-01-01"), Some("2024-02-01"), 2)).await.unwrap();
        store.insert_diet(&diet("d4", "a3", "t1", Some("2024-03-01"), None, 3)).await.unwrap();

        store.insert_medical_check(&check("m1", "a1", "v1", "2024-02-01", 4)).await.unwrap();
        store.insert_medical_check(&check("m2", "a1", "v1", "2024-03-01", 3)).await.unwrap();
        store.insert_medical_check(&check("m3", "a2", "v1", "2024-03-01", 5)).await.unwrap();
    }

    #[tokio::test]
    async fn test_animal_round_trip_and_newest_first() {
        let store = setup_test().await;
        store.insert_animal(&animal("a1", "Leo", "Lion", 1)).await.unwrap();
        store.insert_animal(&animal("a2", "Zia", "Zebra", 2)).await.unwrap();

        let listed = store.list_animals().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a1"]);

        let loaded = store.get_animal("a1").await.unwrap().unwrap();
        assert_eq!(loaded, animal("a1", "Leo", "Lion", 1));
        assert!(store.get_animal("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let store = setup_test().await;
        let result = store.update_animal(&animal("ghost", "Nobody", "None", 1)).await;
        assert!(matches!(result, Err(StoreError::NotFound { entity: "animal", .. })));
    }

    #[tokio::test]
    async fn test_delete_animal_cascades_to_diets_and_checks() {
        let store = setup_test().await;
        seed(&store).await;

        store.delete_animal("a1").await.unwrap();

        let diets = store.list_diets().await.unwrap();
        assert!(diets.iter().all(|d| d.animal_id != "a1"));
        let checks = store.list_medical_checks().await.unwrap();
        assert!(checks.iter().all(|c| c.animal_id != "a1"));
        assert_eq!(checks.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_referenced_diet_type_is_a_constraint_error() {
        let store = setup_test().await;
        seed(&store).await;

        let result = store.delete_diet_type("t1").await;
        assert!(matches!(result, Err(StoreError::Constraint(_))));

        store.delete_diet("d3").await.unwrap();
        store.delete_diet_type("t2").await.unwrap();
        assert!(store.get_diet_type("t2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_constraint_error() {
        let store = setup_test().await;
        store.insert_staff(&staff("v1", "Dana", StaffRole::Veterinarian, None, 1)).await.unwrap();

        let mut twin = staff("v2", "Dani", StaffRole::Veterinarian, None, 2);
        twin.email = "V1@ZOO.TEST".to_string();
        let result = store.insert_staff(&twin).await;
        assert!(matches!(result, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_deactivate_staff_clears_spouse_and_hides_from_couples() {
        let store = setup_test().await;
        seed(&store).await;
        assert_eq!(store.married_couples().await.unwrap().len(), 1);

        store.deactivate_staff("k1").await.unwrap();

        let lee = store.get_staff("k1").await.unwrap().unwrap();
        assert!(!lee.is_active);
        assert_eq!(lee.spouse_id, None);
        assert!(store.married_couples().await.unwrap().is_empty());

        let again = store.deactivate_staff("k1").await;
        assert!(matches!(again, Err(StoreError::NotFound { .. })));
        let link = store.set_spouse("k1", Some("v1")).await;
        assert!(matches!(link, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_timestamps_survive_storage() {
        let store = setup_test().await;
        let mut leo = animal("a1", "Leo", "Lion", 1);
        leo.updated_at = at(90);
        store.insert_animal(&leo).await.unwrap();

        let loaded = store.get_animal("a1").await.unwrap().unwrap();
        assert_eq!(loaded.created_at, at(1));
        assert_eq!(loaded.updated_at, at(90));
    }

    #[tokio::test]
    async fn test_aggregates_match_in_memory_store() {
        let sqlite = setup_test().await;
        let memory = InMemoryStore::new();
        seed(&sqlite).await;
        seed(&memory).await;

        assert_eq!(
            sqlite.animal_full_info(None).await.unwrap(),
            memory.animal_full_info(None).await.unwrap()
        );
        assert_eq!(
            sqlite.animal_full_info(Some("LION")).await.unwrap(),
            memory.animal_full_info(Some("LION")).await.unwrap()
        );
        assert_eq!(
            sqlite.married_couples().await.unwrap(),
            memory.married_couples().await.unwrap()
        );
        assert_eq!(
            sqlite.animals_with_diets().await.unwrap(),
            memory.animals_with_diets().await.unwrap()
        );
        assert_eq!(sqlite.list_diet_types().await.unwrap(), memory.list_diet_types().await.unwrap());
    }

    #[tokio::test]
    async fn test_full_info_picks_current_diet_and_latest_check() {
        let store = setup_test().await;
        seed(&store).await;

        let rows = store.animal_full_info(None).await.unwrap();
        let leo = rows.iter().find(|r| r.id == "a1").unwrap();
        assert_eq!(leo.current_diet.as_deref(), Some("Raw meat"));
        assert_eq!(leo.last_diagnosis.as_deref(), Some("diagnosis-m2"));
        assert_eq!(leo.last_vet.as_deref(), Some("Dana Smith"));

        let zia = rows.iter().find(|r| r.id == "a2").unwrap();
        assert_eq!(zia.current_diet, None);
    }
}
