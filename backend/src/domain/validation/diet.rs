use chrono::{DateTime, NaiveDate, Utc};
use shared::{Diet, DietCategory, DietForm, DietType, DietTypeForm, DietTypeUpdateForm, DietUpdateForm};

use super::{
    date_order, optional_date, optional_text, parse_enum, required_id, required_text,
    update_enum, update_optional_date, update_optional_text, update_required_text,
    ValidationErrors,
};

pub const DIET_TYPE_NAME_MAX: usize = 100;
pub const DIET_TYPE_DESCRIPTION_MAX: usize = 500;
pub const FOOD_NAME_MAX: usize = 100;
pub const QUANTITY_MAX: usize = 100;
pub const FEEDING_TIME_MAX: usize = 100;
pub const NOTES_MAX: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct NewDietType {
    pub name: String,
    pub description: Option<String>,
    pub category: DietCategory,
}

impl NewDietType {
    pub fn into_diet_type(self, id: String, now: DateTime<Utc>) -> DietType {
        DietType {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DietTypeChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<DietCategory>,
}

impl DietTypeChanges {
    pub fn apply(self, diet_type: &mut DietType) {
        if let Some(name) = self.name {
            diet_type.name = name;
        }
        if let Some(description) = self.description {
            diet_type.description = description;
        }
        if let Some(category) = self.category {
            diet_type.category = category;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDiet {
    pub animal_id: String,
    pub diet_type_id: String,
    pub food_name: String,
    pub quantity: Option<String>,
    pub feeding_time: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewDiet {
    pub fn into_diet(self, id: String, now: DateTime<Utc>) -> Diet {
        Diet {
            id,
            animal_id: self.animal_id,
            diet_type_id: self.diet_type_id,
            food_name: self.food_name,
            quantity: self.quantity,
            feeding_time: self.feeding_time,
            start_date: self.start_date,
            end_date: self.end_date,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DietChanges {
    pub diet_type_id: Option<String>,
    pub food_name: Option<String>,
    pub quantity: Option<Option<String>>,
    pub feeding_time: Option<Option<String>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
}

impl DietChanges {
    /// Merges the changes and re-checks the date range on the result
    pub fn apply(self, diet: &mut Diet) -> Result<(), ValidationErrors> {
        if let Some(diet_type_id) = self.diet_type_id {
            diet.diet_type_id = diet_type_id;
        }
        if let Some(food_name) = self.food_name {
            diet.food_name = food_name;
        }
        if let Some(quantity) = self.quantity {
            diet.quantity = quantity;
        }
        if let Some(feeding_time) = self.feeding_time {
            diet.feeding_time = feeding_time;
        }
        if let Some(start_date) = self.start_date {
            diet.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            diet.end_date = end_date;
        }
        if let Some(notes) = self.notes {
            diet.notes = notes;
        }

        let mut errors = ValidationErrors::new();
        date_order(&mut errors, "start_date", "end_date", diet.start_date, diet.end_date);
        errors.finish(())
    }
}

pub fn validate_diet_type_form(form: &DietTypeForm) -> Result<NewDietType, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required_text(&mut errors, "name", &form.name, DIET_TYPE_NAME_MAX);
    let description =
        optional_text(&mut errors, "description", form.description.as_deref(), DIET_TYPE_DESCRIPTION_MAX);
    let category: Option<DietCategory> = parse_enum(&mut errors, "category", &form.category);

    match category {
        Some(category) if errors.is_empty() => Ok(NewDietType { name, description, category }),
        _ => Err(errors),
    }
}

pub fn validate_diet_type_update(form: &DietTypeUpdateForm) -> Result<DietTypeChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let changes = DietTypeChanges {
        name: update_required_text(&mut errors, "name", form.name.as_deref(), DIET_TYPE_NAME_MAX),
        description: update_optional_text(
            &mut errors,
            "description",
            form.description.as_deref(),
            DIET_TYPE_DESCRIPTION_MAX,
        ),
        category: update_enum(&mut errors, "category", form.category.as_deref()),
    };
    errors.finish(changes)
}

pub fn validate_diet_form(form: &DietForm) -> Result<NewDiet, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let animal_id = required_id(&mut errors, "animal_id", &form.animal_id);
    let diet_type_id = required_id(&mut errors, "diet_type_id", &form.diet_type_id);
    let food_name = required_text(&mut errors, "food_name", &form.food_name, FOOD_NAME_MAX);
    let quantity = optional_text(&mut errors, "quantity", form.quantity.as_deref(), QUANTITY_MAX);
    let feeding_time =
        optional_text(&mut errors, "feeding_time", form.feeding_time.as_deref(), FEEDING_TIME_MAX);
    let start_date = optional_date(&mut errors, "start_date", form.start_date.as_deref());
    let end_date = optional_date(&mut errors, "end_date", form.end_date.as_deref());
    date_order(&mut errors, "start_date", "end_date", start_date, end_date);
    let notes = optional_text(&mut errors, "notes", form.notes.as_deref(), NOTES_MAX);

    errors.finish(NewDiet {
        animal_id,
        diet_type_id,
        food_name,
        quantity,
        feeding_time,
        start_date,
        end_date,
        notes,
    })
}

pub fn validate_diet_update(form: &DietUpdateForm) -> Result<DietChanges, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let diet_type_id = form
        .diet_type_id
        .as_deref()
        .map(|id| required_id(&mut errors, "diet_type_id", id));
    let start_date = update_optional_date(&mut errors, "start_date", form.start_date.as_deref());
    let end_date = update_optional_date(&mut errors, "end_date", form.end_date.as_deref());
    date_order(
        &mut errors,
        "start_date",
        "end_date",
        start_date.flatten(),
        end_date.flatten(),
    );

    let changes = DietChanges {
        diet_type_id,
        food_name: update_required_text(&mut errors, "food_name", form.food_name.as_deref(), FOOD_NAME_MAX),
        quantity: update_optional_text(&mut errors, "quantity", form.quantity.as_deref(), QUANTITY_MAX),
        feeding_time: update_optional_text(
            &mut errors,
            "feeding_time",
            form.feeding_time.as_deref(),
            FEEDING_TIME_MAX,
        ),
        start_date,
        end_date,
        notes: update_optional_text(&mut errors, "notes", form.notes.as_deref(), NOTES_MAX),
    };
    errors.finish(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reports::fixtures::{date, diet};

    #[test]
    fn test_diet_type_form() {
        let form = DietTypeForm {
            name: "Raw meat".to_string(),
            description: Some("".to_string()),
            category: "Carnivore".to_string(),
        };
        let diet_type = validate_diet_type_form(&form).unwrap();
        assert_eq!(diet_type.category, DietCategory::Carnivore);
        assert!(diet_type.description.is_none());

        let errors = validate_diet_type_form(&DietTypeForm::default()).unwrap_err();
        assert_eq!(errors.field("name"), Some("Name is required"));
        assert_eq!(errors.field("category"), Some("Category is required"));
    }

    #[test]
    fn test_diet_requires_references_and_ordered_dates() {
        let form = DietForm {
            food_name: "Hay".to_string(),
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("2024-02-01".to_string()),
            ..DietForm::default()
        };
        let errors = validate_diet_form(&form).unwrap_err();
        assert_eq!(errors.field("animal_id"), Some("Animal is required"));
        assert_eq!(errors.field("diet_type_id"), Some("Diet type is required"));
        assert_eq!(errors.field("end_date"), Some("End date cannot be before start date"));
    }

    #[test]
    fn test_diet_without_end_date_is_current() {
        let form = DietForm {
            animal_id: "a1".to_string(),
            diet_type_id: "t1".to_string(),
            food_name: "Hay".to_string(),
            end_date: Some(" ".to_string()),
            ..DietForm::default()
        };
        let diet = validate_diet_form(&form).unwrap();
        assert!(diet.end_date.is_none());
    }

    #[test]
    fn test_ending_a_diet_is_checked_against_stored_start() {
        let mut stored = diet("d1", "a1", "t1", Some("2024-03-01"), None, 0);
        let update = DietUpdateForm {
            end_date: Some("2024-01-01".to_string()),
            ..DietUpdateForm::default()
        };
        let errors = validate_diet_update(&update)
            .unwrap()
            .apply(&mut stored.clone())
            .unwrap_err();
        assert!(errors.field("end_date").is_some());

        let update = DietUpdateForm {
            end_date: Some("2024-04-01".to_string()),
            ..DietUpdateForm::default()
        };
        validate_diet_update(&update).unwrap().apply(&mut stored).unwrap();
        assert_eq!(stored.end_date, Some(date("2024-04-01")));
        assert!(!stored.is_current());
    }
}
