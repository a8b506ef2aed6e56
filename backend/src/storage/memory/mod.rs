//! # In-Memory Store
//!
//! A [`ZooStore`] held entirely in process memory. Used for development,
//! demos (see [`fixture`]) and tests. It enforces the same referential
//! rules as the SQLite schema so both backings behave alike.

pub mod fixture;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::reports;
use crate::storage::traits::{StoreError, StoreResult, ZooStore};
use shared::{
    Animal, AnimalDietRow, AnimalFullInfo, Diet, DietType, MarriedCouple, MedicalCheck, Staff,
};

/// Rows are kept in insertion order
#[derive(Debug, Default, Clone)]
pub struct MemoryState {
    pub animals: Vec<Animal>,
    pub staff: Vec<Staff>,
    pub diet_types: Vec<DietType>,
    pub diets: Vec<Diet>,
    pub medical_checks: Vec<MedicalCheck>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

/// Newest first, insertion order breaking ties on equal timestamps
fn newest_first<T: Clone, K: Ord>(rows: &[T], created_at: impl Fn(&T) -> K) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

fn replace<T>(rows: &mut [T], entity: &'static str, id: &str, key: impl Fn(&T) -> &str, value: T) -> StoreResult<()> {
    let slot = rows
        .iter_mut()
        .find(|row| key(row) == id)
        .ok_or_else(|| StoreError::not_found(entity, id))?;
    *slot = value;
    Ok(())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: MemoryState) -> Self {
        Self { state: RwLock::new(state) }
    }

    fn sorted_animals(state: &MemoryState) -> Vec<Animal> {
        newest_first(&state.animals, |a| a.created_at)
    }

    fn sorted_staff(state: &MemoryState) -> Vec<Staff> {
        newest_first(&state.staff, |s| s.created_at)
    }

    fn sorted_diet_types(state: &MemoryState) -> Vec<DietType> {
        let mut types = state.diet_types.clone();
        types.sort_by(|a, b| {
            (a.name.to_ascii_lowercase(), &a.id).cmp(&(b.name.to_ascii_lowercase(), &b.id))
        });
        types
    }

    fn sorted_diets(state: &MemoryState) -> Vec<Diet> {
        newest_first(&state.diets, |d| d.created_at)
    }

    fn sorted_checks(state: &MemoryState) -> Vec<MedicalCheck> {
        newest_first(&state.medical_checks, |c| c.created_at)
    }

    fn email_taken(state: &MemoryState, email: &str, except_id: Option<&str>) -> bool {
        state
            .staff
            .iter()
            .any(|s| s.email.eq_ignore_ascii_case(email) && Some(s.id.as_str()) != except_id)
    }

    fn check_spouse_reference(state: &MemoryState, staff: &Staff) -> StoreResult<()> {
        match staff.spouse_id.as_deref() {
            Some(spouse_id) if !state.staff.iter().any(|s| s.id == spouse_id) && spouse_id != staff.id => {
                Err(StoreError::Constraint(format!("spouse {} does not exist", spouse_id)))
            }
            _ => Ok(()),
        }
    }

    fn check_diet_references(state: &MemoryState, diet: &Diet) -> StoreResult<()> {
        if !state.animals.iter().any(|a| a.id == diet.animal_id) {
            return Err(StoreError::Constraint(format!("animal {} does not exist", diet.animal_id)));
        }
        if !state.diet_types.iter().any(|t| t.id == diet.diet_type_id) {
            return Err(StoreError::Constraint(format!(
                "diet type {} does not exist",
                diet.diet_type_id
            )));
        }
        Ok(())
    }

    fn check_medical_references(state: &MemoryState, check: &MedicalCheck) -> StoreResult<()> {
        if !state.animals.iter().any(|a| a.id == check.animal_id) {
            return Err(StoreError::Constraint(format!("animal {} does not exist", check.animal_id)));
        }
        if !state.staff.iter().any(|s| s.id == check.vet_id) {
            return Err(StoreError::Constraint(format!("vet {} does not exist", check.vet_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl ZooStore for InMemoryStore {
    async fn list_animals(&self) -> StoreResult<Vec<Animal>> {
        Ok(Self::sorted_animals(&*self.state.read().await))
    }

    async fn get_animal(&self, id: &str) -> StoreResult<Option<Animal>> {
        Ok(self.state.read().await.animals.iter().find(|a| a.id == id).cloned())
    }

    async fn insert_animal(&self, animal: &Animal) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.animals.iter().any(|a| a.id == animal.id) {
            return Err(StoreError::Constraint(format!("duplicate animal id {}", animal.id)));
        }
        state.animals.push(animal.clone());
        Ok(())
    }

    async fn update_animal(&self, animal: &Animal) -> StoreResult<()> {
        let mut state = self.state.write().await;
        replace(&mut state.animals, "animal", &animal.id, |a| &a.id, animal.clone())
    }

    async fn delete_animal(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let before = state.animals.len();
        state.animals.retain(|a| a.id != id);
        if state.animals.len() == before {
            return Err(StoreError::not_found("animal", id));
        }
        state.diets.retain(|d| d.animal_id != id);
        state.medical_checks.retain(|c| c.animal_id != id);
        debug!("Removed animal {} with its diets and medical checks", id);
        Ok(())
    }

    async fn list_staff(&self) -> StoreResult<Vec<Staff>> {
        Ok(Self::sorted_staff(&*self.state.read().await))
    }

    async fn get_staff(&self, id: &str) -> StoreResult<Option<Staff>> {
        Ok(self.state.read().await.staff.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_staff(&self, staff: &Staff) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.staff.iter().any(|s| s.id == staff.id) {
            return Err(StoreError::Constraint(format!("duplicate staff id {}", staff.id)));
        }
        if Self::email_taken(&state, &staff.email, None) {
            return Err(StoreError::Constraint(format!("email {} is already in use", staff.email)));
        }
        Self::check_spouse_reference(&state, staff)?;
        state.staff.push(staff.clone());
        Ok(())
    }

    async fn update_staff(&self, staff: &Staff) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if Self::email_taken(&state, &staff.email, Some(&staff.id)) {
            return Err(StoreError::Constraint(format!("email {} is already in use", staff.email)));
        }
        Self::check_spouse_reference(&state, staff)?;
        replace(&mut state.staff, "staff", &staff.id, |s| &s.id, staff.clone())
    }

    async fn deactivate_staff(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let staff = state
            .staff
            .iter_mut()
            .find(|s| s.id == id && s.is_active)
            .ok_or_else(|| StoreError::not_found("staff", id))?;
        staff.is_active = false;
        staff.spouse_id = None;
        Ok(())
    }

    async fn set_spouse(&self, id: &str, spouse_id: Option<&str>) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if let Some(spouse_id) = spouse_id {
            if !state.staff.iter().any(|s| s.id == spouse_id) {
                return Err(StoreError::Constraint(format!("spouse {} does not exist", spouse_id)));
            }
        }
        let staff = state
            .staff
            .iter_mut()
            .find(|s| s.id == id && s.is_active)
            .ok_or_else(|| StoreError::not_found("staff", id))?;
        staff.spouse_id = spouse_id.map(str::to_string);
        Ok(())
    }

    async fn list_diet_types(&self) -> StoreResult<Vec<DietType>> {
        Ok(Self::sorted_diet_types(&*self.state.read().await))
    }

    async fn get_diet_type(&self, id: &str) -> StoreResult<Option<DietType>> {
        Ok(self.state.read().await.diet_types.iter().find(|t| t.id == id).cloned())
    }

    async fn insert_diet_type(&self, diet_type: &DietType) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.diet_types.iter().any(|t| t.id == diet_type.id) {
            return Err(StoreError::Constraint(format!("duplicate diet type id {}", diet_type.id)));
        }
        state.diet_types.push(diet_type.clone());
        Ok(())
    }

    async fn update_diet_type(&self, diet_type: &DietType) -> StoreResult<()> {
        let mut state = self.state.write().await;
        replace(&mut state.diet_types, "diet type", &diet_type.id, |t| &t.id, diet_type.clone())
    }

    async fn delete_diet_type(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if !state.diet_types.iter().any(|t| t.id == id) {
            return Err(StoreError::not_found("diet type", id));
        }
        let in_use = state.diets.iter().filter(|d| d.diet_type_id == id).count();
        if in_use > 0 {
            return Err(StoreError::Constraint(format!(
                "diet type {} is still used by {} diet(s)",
                id, in_use
            )));
        }
        state.diet_types.retain(|t| t.id != id);
        Ok(())
    }

    async fn list_diets(&self) -> StoreResult<Vec<Diet>> {
        Ok(Self::sorted_diets(&*self.state.read().await))
    }

    async fn get_diet(&self, id: &str) -> StoreResult<Option<Diet>> {
        Ok(self.state.read().await.diets.iter().find(|d| d.id == id).cloned())
    }

    async fn insert_diet(&self, diet: &Diet) -> StoreResult<()> {
        let mut state = self.state.write().await;
        Self::check_diet_references(&state, diet)?;
        state.diets.push(diet.clone());
        Ok(())
    }

    async fn update_diet(&self, diet: &Diet) -> StoreResult<()> {
        let mut state = self.state.write().await;
        Self::check_diet_references(&state, diet)?;
        replace(&mut state.diets, "diet", &diet.id, |d| &d.id, diet.clone())
    }

    async fn delete_diet(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let before = state.diets.len();
        state.diets.retain(|d| d.id != id);
        if state.diets.len() == before {
            return Err(StoreError::not_found("diet", id));
        }
        Ok(())
    }

    async fn list_medical_checks(&self) -> StoreResult<Vec<MedicalCheck>> {
        Ok(Self::sorted_checks(&*self.state.read().await))
    }

    async fn get_medical_check(&self, id: &str) -> StoreResult<Option<MedicalCheck>> {
        Ok(self.state.read().await.medical_checks.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_medical_check(&self, check: &MedicalCheck) -> StoreResult<()> {
        let mut state = self.state.write().await;
        Self::check_medical_references(&state, check)?;
        state.medical_checks.push(check.clone());
        Ok(())
    }

    async fn update_medical_check(&self, check: &MedicalCheck) -> StoreResult<()> {
        let mut state = self.state.write().await;
        Self::check_medical_references(&state, check)?;
        replace(&mut state.medical_checks, "medical check", &check.id, |c| &c.id, check.clone())
    }

    async fn delete_medical_check(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let before = state.medical_checks.len();
        state.medical_checks.retain(|c| c.id != id);
        if state.medical_checks.len() == before {
            return Err(StoreError::not_found("medical check", id));
        }
        Ok(())
    }

    async fn animal_full_info(&self, search: Option<&str>) -> StoreResult<Vec<AnimalFullInfo>> {
        let state = self.state.read().await;
        Ok(reports::animal_full_info(
            &Self::sorted_animals(&state),
            &Self::sorted_diets(&state),
            &state.diet_types,
            &state.medical_checks,
            &state.staff,
            search,
        ))
    }

    async fn married_couples(&self) -> StoreResult<Vec<MarriedCouple>> {
        let state = self.state.read().await;
        Ok(reports::married_couples(&Self::sorted_staff(&state)))
    }

    async fn animals_with_diets(&self) -> StoreResult<Vec<AnimalDietRow>> {
        let state = self.state.read().await;
        Ok(reports::animals_with_active_diet(
            &Self::sorted_animals(&state),
            &Self::sorted_diets(&state),
            &state.diet_types,
        ))
    }
}
