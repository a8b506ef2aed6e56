use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use shared::{Staff, StaffForm, StaffRole, StaffUpdateForm};

use super::{
    not_in_future, optional_text, parse_date, parse_enum, required_text, update_enum,
    update_optional_text, update_required_text, ValidationErrors,
};

pub const NAME_MAX: usize = 50;
pub const PHONE_MAX: usize = 30;
pub const SPECIALIZATION_MAX: usize = 100;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq)]
pub struct NewStaff {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub hire_date: NaiveDate,
    pub specialization: Option<String>,
    pub spouse_id: Option<String>,
}

impl NewStaff {
    pub fn into_staff(self, id: String, now: DateTime<Utc>) -> Staff {
        Staff {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            role: self.role,
            hire_date: self.hire_date,
            specialization: self.specialization,
            spouse_id: self.spouse_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub role: Option<StaffRole>,
    pub hire_date: Option<NaiveDate>,
    pub specialization: Option<Option<String>>,
    pub spouse_id: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl StaffChanges {
    pub fn apply(self, staff: &mut Staff) {
        if let Some(first_name) = self.first_name {
            staff.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            staff.last_name = last_name;
        }
        if let Some(email) = self.email {
            staff.email = email;
        }
        if let Some(phone) = self.phone {
            staff.phone = phone;
        }
        if let Some(role) = self.role {
            staff.role = role;
        }
        if let Some(hire_date) = self.hire_date {
            staff.hire_date = hire_date;
        }
        if let Some(specialization) = self.specialization {
            staff.specialization = specialization;
        }
        if let Some(spouse_id) = self.spouse_id {
            staff.spouse_id = spouse_id;
        }
        if let Some(is_active) = self.is_active {
            staff.is_active = is_active;
        }
    }
}

fn check_email(errors: &mut ValidationErrors, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add("email", "Email is required");
    } else if !EMAIL_RE.is_match(value) {
        errors.add("email", "Invalid email address");
    }
    value.to_string()
}

fn check_spouse(errors: &mut ValidationErrors, staff_id: Option<&str>, value: Option<&str>) -> Option<String> {
    let spouse_id = value.map(str::trim).filter(|v| !v.is_empty())?;
    if Some(spouse_id) == staff_id {
        errors.add("spouse_id", "An employee cannot be their own spouse");
    }
    Some(spouse_id.to_string())
}

pub fn validate_staff_form(form: &StaffForm, today: NaiveDate) -> Result<NewStaff, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let first_name = required_text(&mut errors, "first_name", &form.first_name, NAME_MAX);
    let last_name = required_text(&mut errors, "last_name", &form.last_name, NAME_MAX);
    let email = check_email(&mut errors, &form.email);
    let phone = optional_text(&mut errors, "phone", form.phone.as_deref(), PHONE_MAX);
    let role: Option<StaffRole> = parse_enum(&mut errors, "role", &form.role);
    let hire_date = parse_date(&mut errors, "hire_date", &form.hire_date);
    not_in_future(&mut errors, "hire_date", hire_date, today);
    let specialization =
        optional_text(&mut errors, "specialization", form.specialization.as_deref(), SPECIALIZATION_MAX);
    let spouse_id = check_spouse(&mut errors, None, form.spouse_id.as_deref());

    match (role, hire_date) {
        (Some(role), Some(hire_date)) if errors.is_empty() => Ok(NewStaff {
            first_name,
            last_name,
            email,
            phone,
            role,
            hire_date,
            specialization,
            spouse_id,
        }),
        _ => Err(errors),
    }
}

/// `staff_id` is the employee being edited, used to reject self-marriage
pub fn validate_staff_update(
    form: &StaffUpdateForm,
    staff_id: &str,
    today: NaiveDate,
) -> Result<StaffChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let hire_date = form
        .hire_date
        .as_deref()
        .and_then(|d| parse_date(&mut errors, "hire_date", d));
    not_in_future(&mut errors, "hire_date", hire_date, today);

    let changes = StaffChanges {
        first_name: update_required_text(&mut errors, "first_name", form.first_name.as_deref(), NAME_MAX),
        last_name: update_required_text(&mut errors, "last_name", form.last_name.as_deref(), NAME_MAX),
        email: form.email.as_deref().map(|e| check_email(&mut errors, e)),
        phone: update_optional_text(&mut errors, "phone", form.phone.as_deref(), PHONE_MAX),
        role: update_enum(&mut errors, "role", form.role.as_deref()),
        hire_date,
        specialization: update_optional_text(
            &mut errors,
            "specialization",
            form.specialization.as_deref(),
            SPECIALIZATION_MAX,
        ),
        spouse_id: form
            .spouse_id
            .as_deref()
            .map(|s| check_spouse(&mut errors, Some(staff_id), Some(s))),
        is_active: form.is_active,
    };

    errors.finish(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reports::fixtures::date;

    fn form() -> StaffForm {
        StaffForm {
            first_name: "Dana".to_string(),
            last_name: "Smith".to_string(),
            email: "dana@zoo.test".to_string(),
            role: "Veterinarian".to_string(),
            hire_date: "2020-03-01".to_string(),
            ..StaffForm::default()
        }
    }

    #[test]
    fn test_valid_staff_form() {
        let staff = validate_staff_form(&form(), date("2024-01-01")).unwrap();
        assert_eq!(staff.role, StaffRole::Veterinarian);
        assert!(staff.spouse_id.is_none());
        assert!(staff.phone.is_none());
    }

    #[test]
    fn test_invalid_email_and_future_hire_date() {
        let mut input = form();
        input.email = "dana at zoo".to_string();
        input.hire_date = "2024-02-01".to_string();
        input.first_name = "x".repeat(51);

        let errors = validate_staff_form(&input, date("2024-01-01")).unwrap_err();
        assert_eq!(errors.field("email"), Some("Invalid email address"));
        assert_eq!(errors.field("hire_date"), Some("Hire date cannot be in the future"));
        assert_eq!(errors.field("first_name"), Some("First name must be at most 50 characters"));
    }

    #[test]
    fn test_hire_date_is_required() {
        let mut input = form();
        input.hire_date = String::new();
        let errors = validate_staff_form(&input, date("2024-01-01")).unwrap_err();
        assert_eq!(errors.field("hire_date"), Some("Hire date is required"));
    }

    #[test]
    fn test_update_rejects_self_as_spouse() {
        let update = StaffUpdateForm {
            spouse_id: Some("s1".to_string()),
            ..StaffUpdateForm::default()
        };
        let errors = validate_staff_update(&update, "s1", date("2024-01-01")).unwrap_err();
        assert!(errors.field("spouse_id").is_some());

        let changes = validate_staff_update(&update, "s2", date("2024-01-01")).unwrap();
        assert_eq!(changes.spouse_id, Some(Some("s1".to_string())));
    }

    #[test]
    fn test_update_with_empty_spouse_clears_link() {
        let update = StaffUpdateForm {
            spouse_id: Some(String::new()),
            ..StaffUpdateForm::default()
        };
        let changes = validate_staff_update(&update, "s1", date("2024-01-01")).unwrap();
        assert_eq!(changes.spouse_id, Some(None));
    }
}
