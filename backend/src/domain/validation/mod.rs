//! # Form Validation
//!
//! Per-entity schemas that turn raw form input into typed values. Every
//! validator collects all field errors before returning, so a form can show
//! them next to the offending inputs in one pass. Validation never touches
//! the store.
//!
//! Shared coercion rules:
//!
//! - text is trimmed; optional text that is empty after trimming is absent
//! - dates use `YYYY-MM-DD`
//! - on update forms a missing field is left unchanged, and an empty string
//!   clears an optional field

pub mod animal;
pub mod diet;
pub mod medical;
pub mod staff;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use shared::{FieldError, UnknownVariant};

pub use animal::{validate_animal_form, validate_animal_update, AnimalChanges, NewAnimal};
pub use diet::{
    validate_diet_form, validate_diet_type_form, validate_diet_type_update, validate_diet_update,
    DietChanges, DietTypeChanges, NewDiet, NewDietType,
};
pub use medical::{
    validate_medical_check_form, validate_medical_check_update, MedicalCheckChanges,
    NewMedicalCheck,
};
pub use staff::{validate_staff_form, validate_staff_update, NewStaff, StaffChanges};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Every field error found in one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First message recorded for `field`
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_field_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// `Ok(value)` when nothing was recorded
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Human label for a form field, `diet_type_id` becomes "Diet type"
fn label(field: &str) -> String {
    let base = field.strip_suffix("_id").unwrap_or(field).replace('_', " ");
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn check_length(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("{} must be at most {} characters", label(field), max));
    }
}

pub(crate) fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    max: usize,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, format!("{} is required", label(field)));
    } else {
        check_length(errors, field, value, max);
    }
    value.to_string()
}

pub(crate) fn optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    check_length(errors, field, value, max);
    Some(value.to_string())
}

/// A reference to another record; only presence is checked here
pub(crate) fn required_id(errors: &mut ValidationErrors, field: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, format!("{} is required", label(field)));
    }
    value.to_string()
}

pub(crate) fn parse_date(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, format!("{} is required", label(field)));
        return None;
    }
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, format!("{} must be a date in YYYY-MM-DD format", label(field)));
            None
        }
    }
}

pub(crate) fn optional_date(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
) -> Option<NaiveDate> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    parse_date(errors, field, value)
}

pub(crate) fn not_in_future(
    errors: &mut ValidationErrors,
    field: &str,
    date: Option<NaiveDate>,
    today: NaiveDate,
) {
    if matches!(date, Some(date) if date > today) {
        errors.add(field, format!("{} cannot be in the future", label(field)));
    }
}

pub(crate) fn parse_enum<T>(errors: &mut ValidationErrors, field: &str, value: &str) -> Option<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, format!("{} is required", label(field)));
        return None;
    }
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            errors.add(field, err.to_string());
            None
        }
    }
}

pub(crate) fn date_order(
    errors: &mut ValidationErrors,
    start_field: &str,
    end_field: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.add(
                end_field,
                format!("{} cannot be before {}", label(end_field), label(start_field).to_lowercase()),
            );
        }
    }
}

// Update-form variants: the outer Option is "was the field submitted"

pub(crate) fn update_required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    value.map(|v| required_text(errors, field, v, max))
}

pub(crate) fn update_optional_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<Option<String>> {
    value.map(|v| optional_text(errors, field, Some(v), max))
}

pub(crate) fn update_optional_date(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
) -> Option<Option<NaiveDate>> {
    value.map(|v| optional_date(errors, field, Some(v)))
}

pub(crate) fn update_enum<T>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
) -> Option<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    value.and_then(|v| parse_enum(errors, field, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SpeciesType;

    #[test]
    fn test_labels_drop_id_suffix() {
        assert_eq!(label("diet_type_id"), "Diet type");
        assert_eq!(label("date_of_birth"), "Date of birth");
        assert_eq!(label("name"), "Name");
    }

    #[test]
    fn test_optional_text_coerces_blank_to_absent() {
        let mut errors = ValidationErrors::new();
        assert_eq!(optional_text(&mut errors, "notes", Some("   "), 10), None);
        assert_eq!(optional_text(&mut errors, "notes", None, 10), None);
        assert_eq!(
            optional_text(&mut errors, "notes", Some(" hi "), 10).as_deref(),
            Some("hi")
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_length_is_counted_in_characters() {
        let mut errors = ValidationErrors::new();
        required_text(&mut errors, "name", &"é".repeat(5), 5);
        assert!(errors.is_empty());
        required_text(&mut errors, "name", &"é".repeat(6), 5);
        assert_eq!(errors.field("name"), Some("Name must be at most 5 characters"));
    }

    #[test]
    fn test_dates_and_enums_report_errors() {
        let mut errors = ValidationErrors::new();
        assert!(parse_date(&mut errors, "hire_date", "01/02/2024").is_none());
        assert!(parse_enum::<SpeciesType>(&mut errors, "species_type", "Dragon").is_none());
        assert!(parse_enum::<SpeciesType>(&mut errors, "species_type", "").is_none());
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.field("hire_date"),
            Some("Hire date must be a date in YYYY-MM-DD format")
        );
    }

    #[test]
    fn test_update_helpers_distinguish_missing_from_cleared() {
        let mut errors = ValidationErrors::new();
        assert_eq!(update_optional_text(&mut errors, "notes", None, 10), None);
        assert_eq!(update_optional_text(&mut errors, "notes", Some(""), 10), Some(None));
        assert_eq!(update_optional_date(&mut errors, "end_date", Some("")), Some(None));
        assert!(errors.is_empty());
    }
}
