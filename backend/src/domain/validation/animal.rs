use chrono::{DateTime, NaiveDate, Utc};
use shared::{Animal, AnimalForm, AnimalUpdateForm, HealthStatus, SpeciesType};

use super::{
    date_order, not_in_future, optional_date, optional_text, parse_enum, required_text,
    update_enum, update_optional_date, update_optional_text, update_required_text,
    ValidationErrors,
};

pub const NAME_MAX: usize = 100;
pub const SPECIES_MAX: usize = 100;
pub const ENCLOSURE_MAX: usize = 100;
pub const WINTERING_LOCATION_MAX: usize = 100;
pub const NOTES_MAX: usize = 1000;
pub const WEIGHT_MAX_KG: f64 = 10_000.0;
pub const HIBERNATION_TEMP_MIN: f64 = -10.0;
pub const HIBERNATION_TEMP_MAX: f64 = 40.0;
pub const DEFAULT_GENDER: &str = "Unknown";

/// A validated animal, ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnimal {
    pub name: String,
    pub species: String,
    pub species_type: SpeciesType,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub weight: Option<f64>,
    pub health_status: HealthStatus,
    pub enclosure: Option<String>,
    pub wintering_location: Option<String>,
    pub hibernation_start: Option<NaiveDate>,
    pub hibernation_end: Option<NaiveDate>,
    pub hibernation_temperature: Option<f64>,
    pub notes: Option<String>,
}

impl NewAnimal {
    pub fn into_animal(self, id: String, now: DateTime<Utc>) -> Animal {
        Animal {
            id,
            name: self.name,
            species: self.species,
            species_type: self.species_type,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            weight: self.weight,
            health_status: self.health_status,
            enclosure: self.enclosure,
            wintering_location: self.wintering_location,
            hibernation_start: self.hibernation_start,
            hibernation_end: self.hibernation_end,
            hibernation_temperature: self.hibernation_temperature,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields changed by an edit. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimalChanges {
    pub name: Option<String>,
    pub species: Option<String>,
    pub species_type: Option<SpeciesType>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub health_status: Option<HealthStatus>,
    pub enclosure: Option<Option<String>>,
    pub wintering_location: Option<Option<String>>,
    pub hibernation_start: Option<Option<NaiveDate>>,
    pub hibernation_end: Option<Option<NaiveDate>>,
    pub hibernation_temperature: Option<f64>,
    pub notes: Option<Option<String>>,
}

impl AnimalChanges {
    /// Merges the changes into `animal`.
    ///
    /// Conditional fields that do not fit the resulting species type are
    /// dropped, and the hibernation period is re-checked on the merged
    /// record.
    pub fn apply(self, animal: &mut Animal) -> Result<(), ValidationErrors> {
        if let Some(name) = self.name {
            animal.name = name;
        }
        if let Some(species) = self.species {
            animal.species = species;
        }
        if let Some(species_type) = self.species_type {
            animal.species_type = species_type;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            animal.date_of_birth = date_of_birth;
        }
        if let Some(gender) = self.gender {
            animal.gender = gender;
        }
        if let Some(weight) = self.weight {
            animal.weight = Some(weight);
        }
        if let Some(health_status) = self.health_status {
            animal.health_status = health_status;
        }
        if let Some(enclosure) = self.enclosure {
            animal.enclosure = enclosure;
        }
        if let Some(wintering_location) = self.wintering_location {
            animal.wintering_location = wintering_location;
        }
        if let Some(start) = self.hibernation_start {
            animal.hibernation_start = start;
        }
        if let Some(end) = self.hibernation_end {
            animal.hibernation_end = end;
        }
        if let Some(temperature) = self.hibernation_temperature {
            animal.hibernation_temperature = Some(temperature);
        }
        if let Some(notes) = self.notes {
            animal.notes = notes;
        }

        clear_conditional_fields(animal);

        let mut errors = ValidationErrors::new();
        date_order(
            &mut errors,
            "hibernation_start",
            "hibernation_end",
            animal.hibernation_start,
            animal.hibernation_end,
        );
        errors.finish(())
    }
}

fn clear_conditional_fields(animal: &mut Animal) {
    if !animal.species_type.has_wintering_location() {
        animal.wintering_location = None;
    }
    if !animal.species_type.has_hibernation() {
        animal.hibernation_start = None;
        animal.hibernation_end = None;
        animal.hibernation_temperature = None;
    }
}

fn check_weight(errors: &mut ValidationErrors, weight: Option<f64>) -> Option<f64> {
    let weight = weight?;
    if !weight.is_finite() || weight <= 0.0 {
        errors.add("weight", "Weight must be greater than 0");
    } else if weight > WEIGHT_MAX_KG {
        errors.add("weight", format!("Weight must be at most {} kg", WEIGHT_MAX_KG));
    }
    Some(weight)
}

fn check_hibernation_temperature(errors: &mut ValidationErrors, value: Option<f64>) -> Option<f64> {
    let value = value?;
    if !value.is_finite() || !(HIBERNATION_TEMP_MIN..=HIBERNATION_TEMP_MAX).contains(&value) {
        errors.add(
            "hibernation_temperature",
            format!(
                "Hibernation temperature must be between {} and {} °C",
                HIBERNATION_TEMP_MIN, HIBERNATION_TEMP_MAX
            ),
        );
    }
    Some(value)
}

fn gender_or_default(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or(DEFAULT_GENDER)
        .to_string()
}

pub fn validate_animal_form(form: &AnimalForm, today: NaiveDate) -> Result<NewAnimal, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required_text(&mut errors, "name", &form.name, NAME_MAX);
    let species = required_text(&mut errors, "species", &form.species, SPECIES_MAX);
    let species_type: Option<SpeciesType> = parse_enum(&mut errors, "species_type", &form.species_type);

    let date_of_birth = optional_date(&mut errors, "date_of_birth", form.date_of_birth.as_deref());
    not_in_future(&mut errors, "date_of_birth", date_of_birth, today);

    let weight = check_weight(&mut errors, form.weight);
    let health_status = match form.health_status.as_deref().map(str::trim) {
        Some(status) if !status.is_empty() => parse_enum(&mut errors, "health_status", status),
        _ => Some(HealthStatus::default()),
    };
    let enclosure = optional_text(&mut errors, "enclosure", form.enclosure.as_deref(), ENCLOSURE_MAX);
    let notes = optional_text(&mut errors, "notes", form.notes.as_deref(), NOTES_MAX);

    // Conditional fields are only looked at when the species type asks for them
    let mut wintering_location = None;
    let mut hibernation_start = None;
    let mut hibernation_end = None;
    let mut hibernation_temperature = None;
    if let Some(species_type) = species_type {
        if species_type.has_wintering_location() {
            wintering_location = optional_text(
                &mut errors,
                "wintering_location",
                form.wintering_location.as_deref(),
                WINTERING_LOCATION_MAX,
            );
        }
        if species_type.has_hibernation() {
            hibernation_start =
                optional_date(&mut errors, "hibernation_start", form.hibernation_start.as_deref());
            hibernation_end =
                optional_date(&mut errors, "hibernation_end", form.hibernation_end.as_deref());
            date_order(
                &mut errors,
                "hibernation_start",
                "hibernation_end",
                hibernation_start,
                hibernation_end,
            );
            hibernation_temperature =
                check_hibernation_temperature(&mut errors, form.hibernation_temperature);
        }
    }

    match (species_type, health_status) {
        (Some(species_type), Some(health_status)) if errors.is_empty() => Ok(NewAnimal {
            name,
            species,
            species_type,
            date_of_birth,
            gender: gender_or_default(form.gender.as_deref()),
            weight,
            health_status,
            enclosure,
            wintering_location,
            hibernation_start,
            hibernation_end,
            hibernation_temperature,
            notes,
        }),
        _ => Err(errors),
    }
}

/// Validates only the submitted fields.
///
/// Conditional fields are checked when the submitted species type matches
/// them, or when no species type was submitted (the stored one decides in
/// [`AnimalChanges::apply`]).
pub fn validate_animal_update(
    form: &AnimalUpdateForm,
    today: NaiveDate,
) -> Result<AnimalChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = update_required_text(&mut errors, "name", form.name.as_deref(), NAME_MAX);
    let species = update_required_text(&mut errors, "species", form.species.as_deref(), SPECIES_MAX);
    let species_type: Option<SpeciesType> =
        update_enum(&mut errors, "species_type", form.species_type.as_deref());
    let type_rejected = form.species_type.is_some() && species_type.is_none();

    let date_of_birth =
        update_optional_date(&mut errors, "date_of_birth", form.date_of_birth.as_deref());
    not_in_future(&mut errors, "date_of_birth", date_of_birth.flatten(), today);

    let gender = form.gender.as_deref().map(|g| gender_or_default(Some(g)));
    let weight = check_weight(&mut errors, form.weight);
    let health_status = update_enum(&mut errors, "health_status", form.health_status.as_deref());
    let enclosure =
        update_optional_text(&mut errors, "enclosure", form.enclosure.as_deref(), ENCLOSURE_MAX);
    let notes = update_optional_text(&mut errors, "notes", form.notes.as_deref(), NOTES_MAX);

    let wants_wintering = !type_rejected && species_type.map_or(true, |t| t.has_wintering_location());
    let wants_hibernation = !type_rejected && species_type.map_or(true, |t| t.has_hibernation());

    let mut changes = AnimalChanges {
        name,
        species,
        species_type,
        date_of_birth,
        gender,
        weight,
        health_status,
        enclosure,
        notes,
        ..AnimalChanges::default()
    };

    if wants_wintering {
        changes.wintering_location = update_optional_text(
            &mut errors,
            "wintering_location",
            form.wintering_location.as_deref(),
            WINTERING_LOCATION_MAX,
        );
    }
    if wants_hibernation {
        changes.hibernation_start =
            update_optional_date(&mut errors, "hibernation_start", form.hibernation_start.as_deref());
        changes.hibernation_end =
            update_optional_date(&mut errors, "hibernation_end", form.hibernation_end.as_deref());
        date_order(
            &mut errors,
            "hibernation_start",
            "hibernation_end",
            changes.hibernation_start.flatten(),
            changes.hibernation_end.flatten(),
        );
        changes.hibernation_temperature =
            check_hibernation_temperature(&mut errors, form.hibernation_temperature);
    }

    errors.finish(changes)
}
