//! Demo records for running without a database

use chrono::{DateTime, Duration, NaiveDate, SubsecRound, Utc};
use uuid::Uuid;

use super::MemoryState;
use shared::{
    Animal, Diet, DietCategory, DietType, HealthStatus, MedicalCheck, SpeciesType, Staff,
    StaffRole,
};

fn id() -> String {
    Uuid::new_v4().to_string()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

struct Clock {
    base: DateTime<Utc>,
    step: i64,
}

impl Clock {
    /// Each call is one minute later than the last
    fn tick(&mut self) -> DateTime<Utc> {
        self.step += 1;
        self.base + Duration::minutes(self.step)
    }
}

#[allow(clippy::too_many_arguments)]
fn animal(
    clock: &mut Clock,
    name: &str,
    species: &str,
    species_type: SpeciesType,
    gender: &str,
    weight: f64,
    health_status: HealthStatus,
    enclosure: &str,
) -> Animal {
    let now = clock.tick();
    Animal {
        id: id(),
        name: name.to_string(),
        species: species.to_string(),
        species_type,
        date_of_birth: Some(day(2018, 4, 12)),
        gender: gender.to_string(),
        weight: Some(weight),
        health_status,
        enclosure: Some(enclosure.to_string()),
        wintering_location: None,
        hibernation_start: None,
        hibernation_end: None,
        hibernation_temperature: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

fn employee(clock: &mut Clock, first: &str, last: &str, role: StaffRole, specialization: Option<&str>) -> Staff {
    let now = clock.tick();
    Staff {
        id: id(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@zoo.example", first.to_lowercase(), last.to_lowercase()),
        phone: Some("+1 555 0100".to_string()),
        role,
        hire_date: day(2019, 9, 1),
        specialization: specialization.map(str::to_string),
        spouse_id: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn diet_type(clock: &mut Clock, name: &str, description: &str, category: DietCategory) -> DietType {
    DietType {
        id: id(),
        name: name.to_string(),
        description: Some(description.to_string()),
        category,
        created_at: clock.tick(),
    }
}

#[allow(clippy::too_many_arguments)]
fn diet(
    clock: &mut Clock,
    animal: &Animal,
    diet_type: &DietType,
    food_name: &str,
    quantity: &str,
    feeding_time: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Diet {
    let now = clock.tick();
    Diet {
        id: id(),
        animal_id: animal.id.clone(),
        diet_type_id: diet_type.id.clone(),
        food_name: food_name.to_string(),
        quantity: Some(quantity.to_string()),
        feeding_time: Some(feeding_time.to_string()),
        start_date,
        end_date,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

fn checkup(
    clock: &mut Clock,
    animal: &Animal,
    vet: &Staff,
    check_date: NaiveDate,
    diagnosis: &str,
    treatment: Option<&str>,
) -> MedicalCheck {
    MedicalCheck {
        id: id(),
        animal_id: animal.id.clone(),
        vet_id: vet.id.clone(),
        check_date,
        diagnosis: diagnosis.to_string(),
        treatment: treatment.map(str::to_string),
        medications: None,
        next_check_date: None,
        notes: None,
        created_at: clock.tick(),
    }
}

/// A small zoo: five animals, four employees (one married couple), three
/// diet types, current and ended diets, and a few medical checks
pub fn demo_state() -> MemoryState {
    let mut clock = Clock {
        base: (Utc::now() - Duration::days(30)).trunc_subsecs(6),
        step: 0,
    };

    let leo = animal(&mut clock, "Leo", "African Lion", SpeciesType::Mammal, "Male", 190.0, HealthStatus::Healthy, "Savannah");
    let zia = animal(&mut clock, "Zia", "Plains Zebra", SpeciesType::Mammal, "Female", 320.0, HealthStatus::Recovering, "Savannah");
    let mut pip = animal(&mut clock, "Pip", "White Stork", SpeciesType::Bird, "Female", 3.4, HealthStatus::Healthy, "Aviary");
    pip.wintering_location = Some("Nile delta".to_string());
    let mut shelly = animal(&mut clock, "Shelly", "Hermann's Tortoise", SpeciesType::Reptile, "Unknown", 1.2, HealthStatus::Healthy, "Reptile House");
    shelly.hibernation_start = Some(day(2024, 11, 1));
    shelly.hibernation_end = Some(day(2025, 3, 15));
    shelly.hibernation_temperature = Some(5.0);
    let nemo = animal(&mut clock, "Nemo", "Clownfish", SpeciesType::Fish, "Male", 0.02, HealthStatus::Sick, "Reef Tank");

    let mut dana = employee(&mut clock, "Dana", "Okafor", StaffRole::Veterinarian, Some("Large mammals"));
    let mut lee = employee(&mut clock, "Lee", "Okafor", StaffRole::Keeper, Some("Savannah"));
    dana.spouse_id = Some(lee.id.clone());
    lee.spouse_id = Some(dana.id.clone());
    let kim = employee(&mut clock, "Kim", "Larsen", StaffRole::Keeper, Some("Birds"));
    let ravi = employee(&mut clock, "Ravi", "Menon", StaffRole::Veterinarian, Some("Exotics"));

    let meat = diet_type(&mut clock, "Raw meat", "Whole prey and muscle meat", DietCategory::Carnivore);
    let grazing = diet_type(&mut clock, "Grazing", "Hay, grass and browse", DietCategory::Herbivore);
    let insects = diet_type(&mut clock, "Live insects", "Crickets and mealworms", DietCategory::Insectivore);

    let diets = vec![
        diet(&mut clock, &leo, &meat, "Beef", "7 kg", "16:00", Some(day(2023, 1, 1)), Some(day(2023, 12, 31))),
        diet(&mut clock, &leo, &meat, "Whole rabbit", "5 kg", "16:00", Some(day(2024, 1, 1)), None),
        diet(&mut clock, &zia, &grazing, "Timothy hay", "9 kg", "08:00", Some(day(2022, 6, 1)), None),
        diet(&mut clock, &pip, &insects, "Mealworms", "80 g", "09:30", Some(day(2024, 4, 1)), None),
    ];

    let medical_checks = vec![
        checkup(&mut clock, &leo, &dana, day(2024, 2, 10), "Annual check, healthy", None),
        checkup(&mut clock, &zia, &dana, day(2024, 5, 3), "Hoof abscess", Some("Drained and bandaged")),
        checkup(&mut clock, &nemo, &ravi, day(2024, 6, 20), "White spot disease", Some("Copper treatment")),
    ];

    MemoryState {
        animals: vec![leo, zia, pip, shelly, nemo],
        staff: vec![dana, lee, kim, ravi],
        diet_types: vec![meat, grazing, insects],
        diets,
        medical_checks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reports;
    use crate::storage::{InMemoryStore, ZooStore};

    #[tokio::test]
    async fn test_demo_state_is_consistent() {
        let store = InMemoryStore::with_state(demo_state());

        let couples = store.married_couples().await.unwrap();
        assert_eq!(couples.len(), 1);

        let rows = store.animal_full_info(None).await.unwrap();
        assert_eq!(rows.len(), 5);
        let leo = rows.iter().find(|r| r.name == "Leo").unwrap();
        assert_eq!(leo.current_diet.as_deref(), Some("Raw meat"));
        assert_eq!(leo.last_vet.as_deref(), Some("Dana Okafor"));

        let diets = store.list_diets().await.unwrap();
        assert_eq!(diets.iter().filter(|d| d.is_current()).count(), 3);
        assert_eq!(
            reports::animals_with_active_diet(
                &store.list_animals().await.unwrap(),
                &diets,
                &store.list_diet_types().await.unwrap()
            )
            .len(),
            3
        );
    }
}
