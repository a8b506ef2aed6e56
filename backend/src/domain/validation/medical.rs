use chrono::{DateTime, NaiveDate, Utc};
use shared::{MedicalCheck, MedicalCheckForm, MedicalCheckUpdateForm};

use super::{
    not_in_future, optional_date, optional_text, parse_date, required_id, required_text,
    update_optional_date, update_optional_text, update_required_text, ValidationErrors,
};

pub const DIAGNOSIS_MAX: usize = 500;
pub const TREATMENT_MAX: usize = 500;
pub const MEDICATIONS_MAX: usize = 300;
pub const NOTES_MAX: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct NewMedicalCheck {
    pub animal_id: String,
    pub vet_id: String,
    pub check_date: NaiveDate,
    pub diagnosis: String,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub next_check_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewMedicalCheck {
    pub fn into_medical_check(self, id: String, now: DateTime<Utc>) -> MedicalCheck {
        MedicalCheck {
            id,
            animal_id: self.animal_id,
            vet_id: self.vet_id,
            check_date: self.check_date,
            diagnosis: self.diagnosis,
            treatment: self.treatment,
            medications: self.medications,
            next_check_date: self.next_check_date,
            notes: self.notes,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicalCheckChanges {
    pub vet_id: Option<String>,
    pub check_date: Option<NaiveDate>,
    pub diagnosis: Option<String>,
    pub treatment: Option<Option<String>>,
    pub medications: Option<Option<String>>,
    pub next_check_date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
}

impl MedicalCheckChanges {
    pub fn apply(self, check: &mut MedicalCheck) {
        if let Some(vet_id) = self.vet_id {
            check.vet_id = vet_id;
        }
        if let Some(check_date) = self.check_date {
            check.check_date = check_date;
        }
        if let Some(diagnosis) = self.diagnosis {
            check.diagnosis = diagnosis;
        }
        if let Some(treatment) = self.treatment {
            check.treatment = treatment;
        }
        if let Some(medications) = self.medications {
            check.medications = medications;
        }
        if let Some(next_check_date) = self.next_check_date {
            check.next_check_date = next_check_date;
        }
        if let Some(notes) = self.notes {
            check.notes = notes;
        }
    }
}

pub fn validate_medical_check_form(
    form: &MedicalCheckForm,
    today: NaiveDate,
) -> Result<NewMedicalCheck, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let animal_id = required_id(&mut errors, "animal_id", &form.animal_id);
    let vet_id = required_id(&mut errors, "vet_id", &form.vet_id);
    let check_date = parse_date(&mut errors, "check_date", &form.check_date);
    not_in_future(&mut errors, "check_date", check_date, today);
    let diagnosis = required_text(&mut errors, "diagnosis", &form.diagnosis, DIAGNOSIS_MAX);
    let treatment = optional_text(&mut errors, "treatment", form.treatment.as_deref(), TREATMENT_MAX);
    let medications =
        optional_text(&mut errors, "medications", form.medications.as_deref(), MEDICATIONS_MAX);
    // Unconstrained, any valid date
    let next_check_date = optional_date(&mut errors, "next_check_date", form.next_check_date.as_deref());
    let notes = optional_text(&mut errors, "notes", form.notes.as_deref(), NOTES_MAX);

    match check_date {
        Some(check_date) if errors.is_empty() => Ok(NewMedicalCheck {
            animal_id,
            vet_id,
            check_date,
            diagnosis,
            treatment,
            medications,
            next_check_date,
            notes,
        }),
        _ => Err(errors),
    }
}

pub fn validate_medical_check_update(
    form: &MedicalCheckUpdateForm,
    today: NaiveDate,
) -> Result<MedicalCheckChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let vet_id = form.vet_id.as_deref().map(|id| required_id(&mut errors, "vet_id", id));
    let check_date = form
        .check_date
        .as_deref()
        .and_then(|d| parse_date(&mut errors, "check_date", d));
    not_in_future(&mut errors, "check_date", check_date, today);

    let changes = MedicalCheckChanges {
        vet_id,
        check_date,
        diagnosis: update_required_text(&mut errors, "diagnosis", form.diagnosis.as_deref(), DIAGNOSIS_MAX),
        treatment: update_optional_text(&mut errors, "treatment", form.treatment.as_deref(), TREATMENT_MAX),
        medications: update_optional_text(
            &mut errors,
            "medications",
            form.medications.as_deref(),
            MEDICATIONS_MAX,
        ),
        next_check_date: update_optional_date(
            &mut errors,
            "next_check_date",
            form.next_check_date.as_deref(),
        ),
        notes: update_optional_text(&mut errors, "notes", form.notes.as_deref(), NOTES_MAX),
    };
    errors.finish(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reports::fixtures::date;

    fn form() -> MedicalCheckForm {
        MedicalCheckForm {
            animal_id: "a1".to_string(),
            vet_id: "v1".to_string(),
            check_date: "2024-05-01".to_string(),
            diagnosis: "Healthy".to_string(),
            ..MedicalCheckForm::default()
        }
    }

    #[test]
    fn test_valid_check_allows_any_next_check_date() {
        let mut input = form();
        input.next_check_date = Some("2030-01-01".to_string());
        let check = validate_medical_check_form(&input, date("2024-06-01")).unwrap();
        assert_eq!(check.next_check_date, Some(date("2030-01-01")));
    }

    #[test]
    fn test_check_date_cannot_be_in_future() {
        let errors = validate_medical_check_form(&form(), date("2024-04-30")).unwrap_err();
        assert_eq!(errors.field("check_date"), Some("Check date cannot be in the future"));
    }

    #[test]
    fn test_text_limits() {
        let mut input = form();
        input.diagnosis = "d".repeat(501);
        input.medications = Some("m".repeat(301));
        input.vet_id = String::new();

        let errors = validate_medical_check_form(&input, date("2024-06-01")).unwrap_err();
        assert_eq!(errors.field("vet_id"), Some("Vet is required"));
        assert!(errors.field("diagnosis").is_some());
        assert_eq!(
            errors.field("medications"),
            Some("Medications must be at most 300 characters")
        );
    }

    #[test]
    fn test_update_validates_present_fields_only() {
        let update = MedicalCheckUpdateForm {
            treatment: Some("Rest".to_string()),
            ..MedicalCheckUpdateForm::default()
        };
        let changes = validate_medical_check_update(&update, date("2024-06-01")).unwrap();
        assert_eq!(changes.treatment, Some(Some("Rest".to_string())));
        assert!(changes.diagnosis.is_none());
    }
}
