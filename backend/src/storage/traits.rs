//! # Storage Traits
//!
//! Defines the data store boundary. The domain layer only talks to
//! [`ZooStore`], so the in-memory fixture and the SQLite store can be
//! swapped at startup without touching services or pages.

use async_trait::async_trait;
use shared::{
    Animal, AnimalDietRow, AnimalFullInfo, Diet, DietType, MarriedCouple, MedicalCheck, Staff,
};
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a data store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the write because of a live reference or a
    /// uniqueness rule
    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A stored value could not be decoded
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        StoreError::NotFound { entity, id: id.to_string() }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation()
                || db_err.is_unique_violation()
                || db_err.is_check_violation()
            {
                return StoreError::Constraint(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

/// Entity CRUD plus the named aggregate calls the report views use.
///
/// Lists come back newest first (creation time), except diet types which
/// are ordered by name. `list_staff` returns inactive staff as well.
#[async_trait]
pub trait ZooStore: Send + Sync {
    // Animals
    async fn list_animals(&self) -> StoreResult<Vec<Animal>>;
    async fn get_animal(&self, id: &str) -> StoreResult<Option<Animal>>;
    async fn insert_animal(&self, animal: &Animal) -> StoreResult<()>;
    async fn update_animal(&self, animal: &Animal) -> StoreResult<()>;
    /// Also removes the animal's diets and medical checks
    async fn delete_animal(&self, id: &str) -> StoreResult<()>;

    // Staff
    async fn list_staff(&self) -> StoreResult<Vec<Staff>>;
    async fn get_staff(&self, id: &str) -> StoreResult<Option<Staff>>;
    async fn insert_staff(&self, staff: &Staff) -> StoreResult<()>;
    async fn update_staff(&self, staff: &Staff) -> StoreResult<()>;
    /// Marks the employee inactive and clears their own spouse link
    async fn deactivate_staff(&self, id: &str) -> StoreResult<()>;
    /// Sets or clears the spouse link of one active employee
    async fn set_spouse(&self, id: &str, spouse_id: Option<&str>) -> StoreResult<()>;

    // Diet types
    async fn list_diet_types(&self) -> StoreResult<Vec<DietType>>;
    async fn get_diet_type(&self, id: &str) -> StoreResult<Option<DietType>>;
    async fn insert_diet_type(&self, diet_type: &DietType) -> StoreResult<()>;
    async fn update_diet_type(&self, diet_type: &DietType) -> StoreResult<()>;
    /// Fails with [`StoreError::Constraint`] while any diet references it
    async fn delete_diet_type(&self, id: &str) -> StoreResult<()>;

    // Diets
    async fn list_diets(&self) -> StoreResult<Vec<Diet>>;
    async fn get_diet(&self, id: &str) -> StoreResult<Option<Diet>>;
    async fn insert_diet(&self, diet: &Diet) -> StoreResult<()>;
    async fn update_diet(&self, diet: &Diet) -> StoreResult<()>;
    async fn delete_diet(&self, id: &str) -> StoreResult<()>;

    // Medical checks
    async fn list_medical_checks(&self) -> StoreResult<Vec<MedicalCheck>>;
    async fn get_medical_check(&self, id: &str) -> StoreResult<Option<MedicalCheck>>;
    async fn insert_medical_check(&self, check: &MedicalCheck) -> StoreResult<()>;
    async fn update_medical_check(&self, check: &MedicalCheck) -> StoreResult<()>;
    async fn delete_medical_check(&self, id: &str) -> StoreResult<()>;

    // Aggregate calls
    /// Search matches name or species, case-insensitively
    async fn animal_full_info(&self, search: Option<&str>) -> StoreResult<Vec<AnimalFullInfo>>;
    async fn married_couples(&self) -> StoreResult<Vec<MarriedCouple>>;
    async fn animals_with_diets(&self) -> StoreResult<Vec<AnimalDietRow>>;
}
