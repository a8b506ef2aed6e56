//! # Report Views
//!
//! Pure builders for the derived, read-only shapes shown on the reports
//! and dashboard screens. They take entity collections in list order and
//! never touch the store, so the in-memory store answers its aggregate
//! calls with them and the SQLite store must produce identical rows.
//!
//! ## Tie-breaks
//!
//! - Current diet: latest `start_date` (missing start loses), then latest
//!   `created_at`, then greatest id.
//! - Latest medical check: latest `check_date`, then `created_at`, then id.

use std::collections::{HashMap, HashSet};

use shared::{
    ActivityItem, ActivityKind, Animal, AnimalDietRow, AnimalFullInfo, CoupleMember,
    DashboardSummary, Diet, DietType, HealthStatus, MarriedCouple, MedicalCheck, SpeciesType,
    SpeciesTypeCount, Staff, StaffRole,
};

/// The active diet of an animal, if it has one
pub fn current_diet<'a>(animal_id: &str, diets: &'a [Diet]) -> Option<&'a Diet> {
    diets
        .iter()
        .filter(|d| d.animal_id == animal_id && d.is_current())
        .max_by(|a, b| {
            (a.start_date.is_some(), a.start_date, a.created_at, &a.id).cmp(&(
                b.start_date.is_some(),
                b.start_date,
                b.created_at,
                &b.id,
            ))
        })
}

/// The most recent medical check of an animal
pub fn latest_medical_check<'a>(
    animal_id: &str,
    checks: &'a [MedicalCheck],
) -> Option<&'a MedicalCheck> {
    checks
        .iter()
        .filter(|c| c.animal_id == animal_id)
        .max_by(|a, b| (a.check_date, a.created_at, &a.id).cmp(&(b.check_date, b.created_at, &b.id)))
}

/// Case-insensitive match on name or species. Blank terms match everything.
pub fn matches_search(animal: &Animal, search: Option<&str>) -> bool {
    let term = match search.map(str::trim) {
        Some(term) if !term.is_empty() => term.to_ascii_lowercase(),
        _ => return true,
    };
    animal.name.to_ascii_lowercase().contains(&term)
        || animal.species.to_ascii_lowercase().contains(&term)
}

/// One row per animal with current diet, latest check and that check's vet
pub fn animal_full_info(
    animals: &[Animal],
    diets: &[Diet],
    diet_types: &[DietType],
    checks: &[MedicalCheck],
    staff: &[Staff],
    search: Option<&str>,
) -> Vec<AnimalFullInfo> {
    let type_names: HashMap<&str, &str> = diet_types
        .iter()
        .map(|t| (t.id.as_str(), t.name.as_str()))
        .collect();
    let staff_by_id: HashMap<&str, &Staff> = staff.iter().map(|s| (s.id.as_str(), s)).collect();

    animals
        .iter()
        .filter(|animal| matches_search(animal, search))
        .map(|animal| {
            let diet_name = current_diet(&animal.id, diets).map(|diet| {
                type_names
                    .get(diet.diet_type_id.as_str())
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| diet.food_name.clone())
            });
            let check = latest_medical_check(&animal.id, checks);
            let vet = check.and_then(|c| staff_by_id.get(c.vet_id.as_str()));

            AnimalFullInfo {
                id: animal.id.clone(),
                name: animal.name.clone(),
                species: animal.species.clone(),
                species_type: animal.species_type,
                date_of_birth: animal.date_of_birth,
                gender: animal.gender.clone(),
                weight: animal.weight,
                health_status: animal.health_status,
                enclosure: animal.enclosure.clone(),
                wintering_location: animal.wintering_location.clone(),
                hibernation_start: animal.hibernation_start,
                hibernation_end: animal.hibernation_end,
                hibernation_temperature: animal.hibernation_temperature,
                notes: animal.notes.clone(),
                current_diet: diet_name,
                last_medical_check: check.map(|c| c.check_date),
                last_diagnosis: check.map(|c| c.diagnosis.clone()),
                last_vet: vet.map(|v| v.full_name()),
            }
        })
        .collect()
}

fn couple_member(staff: &Staff) -> CoupleMember {
    CoupleMember {
        id: staff.id.clone(),
        name: staff.full_name(),
        role: staff.role,
    }
}

/// Unique pairs of mutually linked, active employees.
///
/// One-sided or dangling links are skipped. The first member of each pair
/// is whoever appears first in `staff`.
pub fn married_couples(staff: &[Staff]) -> Vec<MarriedCouple> {
    let active: HashMap<&str, &Staff> = staff
        .iter()
        .filter(|s| s.is_active)
        .map(|s| (s.id.as_str(), s))
        .collect();
    let mut paired: HashSet<&str> = HashSet::new();
    let mut couples = Vec::new();

    for employee in staff.iter().filter(|s| s.is_active) {
        if paired.contains(employee.id.as_str()) {
            continue;
        }
        let Some(spouse_id) = employee.spouse_id.as_deref() else {
            continue;
        };
        if spouse_id == employee.id {
            continue;
        }
        let Some(spouse) = active.get(spouse_id) else {
            continue;
        };
        if spouse.spouse_id.as_deref() != Some(employee.id.as_str()) {
            continue;
        }

        paired.insert(employee.id.as_str());
        paired.insert(spouse.id.as_str());
        couples.push(MarriedCouple {
            first: couple_member(employee),
            second: couple_member(spouse),
        });
    }

    couples
}

/// Inner join of animals, their active diets and the diets' types
pub fn animals_with_active_diet(
    animals: &[Animal],
    diets: &[Diet],
    diet_types: &[DietType],
) -> Vec<AnimalDietRow> {
    let types: HashMap<&str, &DietType> =
        diet_types.iter().map(|t| (t.id.as_str(), t)).collect();
    let types = &types;

    animals
        .iter()
        .flat_map(move |animal| {
            diets
                .iter()
                .filter(move |d| d.animal_id == animal.id && d.is_current())
                .filter_map(move |diet| {
                    let diet_type = types.get(diet.diet_type_id.as_str())?;
                    Some(AnimalDietRow {
                        animal_id: animal.id.clone(),
                        animal_name: animal.name.clone(),
                        species: animal.species.clone(),
                        diet_id: diet.id.clone(),
                        diet_type_id: diet_type.id.clone(),
                        diet_type: diet_type.name.clone(),
                        food_name: diet.food_name.clone(),
                        quantity: diet.quantity.clone(),
                        feeding_time: diet.feeding_time.clone(),
                    })
                })
        })
        .collect()
}

/// Active-diet rows restricted to one diet type
pub fn animals_on_diet_type(rows: &[AnimalDietRow], diet_type_id: &str) -> Vec<AnimalDietRow> {
    rows.iter()
        .filter(|row| row.diet_type_id == diet_type_id)
        .cloned()
        .collect()
}

/// Counts and recent activity for the dashboard. `staff` should already be
/// limited to active employees.
pub fn dashboard_summary(
    animals: &[Animal],
    staff: &[Staff],
    diet_types: &[DietType],
    checks: &[MedicalCheck],
    recent_limit: usize,
) -> DashboardSummary {
    let healthy_animals = animals
        .iter()
        .filter(|a| a.health_status == HealthStatus::Healthy)
        .count();
    let needs_attention = animals
        .iter()
        .filter(|a| a.health_status.needs_attention())
        .count();

    let animals_by_species_type = SpeciesType::ALL
        .iter()
        .map(|species_type| SpeciesTypeCount {
            species_type: *species_type,
            count: animals.iter().filter(|a| a.species_type == *species_type).count(),
        })
        .filter(|entry| entry.count > 0)
        .collect();

    let names: HashMap<&str, &str> = animals
        .iter()
        .map(|a| (a.id.as_str(), a.name.as_str()))
        .collect();

    let mut recent_activity: Vec<ActivityItem> = animals
        .iter()
        .map(|a| ActivityItem {
            kind: ActivityKind::AnimalAdded,
            entity_id: a.id.clone(),
            title: format!("{} the {} joined the zoo", a.name, a.species),
            occurred_at: a.created_at,
        })
        .chain(checks.iter().map(|c| ActivityItem {
            kind: ActivityKind::MedicalCheck,
            entity_id: c.id.clone(),
            title: format!(
                "Medical check for {}: {}",
                names.get(c.animal_id.as_str()).copied().unwrap_or("unknown animal"),
                c.diagnosis
            ),
            occurred_at: c.created_at,
        }))
        .collect();
    recent_activity.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    recent_activity.truncate(recent_limit);

    DashboardSummary {
        total_animals: animals.len(),
        healthy_animals,
        needs_attention,
        total_staff: staff.len(),
        veterinarians: staff.iter().filter(|s| s.role == StaffRole::Veterinarian).count(),
        keepers: staff.iter().filter(|s| s.role == StaffRole::Keeper).count(),
        diet_types: diet_types.len(),
        medical_checks: checks.len(),
        animals_by_species_type,
        recent_activity,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use shared::{
        Animal, Diet, DietCategory, DietType, HealthStatus, MedicalCheck, SpeciesType, Staff,
        StaffRole,
    };

    pub fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn animal(id: &str, name: &str, species: &str, minutes: i64) -> Animal {
        Animal {
            id: id.to_string(),
            name: name.to_string(),
            species: species.to_string(),
            species_type: SpeciesType::Mammal,
            date_of_birth: None,
            gender: "Unknown".to_string(),
            weight: None,
            health_status: HealthStatus::Healthy,
            enclosure: None,
            wintering_location: None,
            hibernation_start: None,
            hibernation_end: None,
            hibernation_temperature: None,
            notes: None,
            created_at: at(minutes),
            updated_at: at(minutes),
        }
    }

    pub fn staff(id: &str, first: &str, role: StaffRole, spouse: Option<&str>, minutes: i64) -> Staff {
        Staff {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: "Smith".to_string(),
            email: format!("{}@zoo.test", id),
            phone: None,
            role,
            hire_date: date("2020-01-01"),
            specialization: None,
            spouse_id: spouse.map(str::to_string),
            is_active: true,
            created_at: at(minutes),
            updated_at: at(minutes),
        }
    }

    pub fn diet_type(id: &str, name: &str) -> DietType {
        DietType {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            category: DietCategory::Carnivore,
            created_at: at(0),
        }
    }

    pub fn diet(
        id: &str,
        animal_id: &str,
        diet_type_id: &str,
        start: Option<&str>,
        end: Option<&str>,
        minutes: i64,
    ) -> Diet {
        Diet {
            id: id.to_string(),
            animal_id: animal_id.to_string(),
            diet_type_id: diet_type_id.to_string(),
            food_name: format!("food-{}", id),
            quantity: Some("2 kg".to_string()),
            feeding_time: Some("08:00".to_string()),
            start_date: start.map(date),
            end_date: end.map(date),
            notes: None,
            created_at: at(minutes),
            updated_at: at(minutes),
        }
    }

    pub fn check(id: &str, animal_id: &str, vet_id: &str, day: &str, minutes: i64) -> MedicalCheck {
        MedicalCheck {
            id: id.to_string(),
            animal_id: animal_id.to_string(),
            vet_id: vet_id.to_string(),
            check_date: date(day),
            diagnosis: format!("diagnosis-{}", id),
            treatment: None,
            medications: None,
            next_check_date: None,
            notes: None,
            created_at: at(minutes),
        }
    }
}
