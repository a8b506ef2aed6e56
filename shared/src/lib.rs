use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Closed enum domains
// ---------------------------------------------------------------------------

/// Error returned when a string is not a member of one of the closed enums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid {}", self.value, self.kind)
    }
}

impl std::error::Error for UnknownVariant {}

/// Broad taxonomic group of an animal. Drives which conditional
/// fields (wintering location, hibernation) apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeciesType {
    Mammal,
    Bird,
    Reptile,
    Amphibian,
    Fish,
    Invertebrate,
}

impl SpeciesType {
    pub const ALL: [SpeciesType; 6] = [
        SpeciesType::Mammal,
        SpeciesType::Bird,
        SpeciesType::Reptile,
        SpeciesType::Amphibian,
        SpeciesType::Fish,
        SpeciesType::Invertebrate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesType::Mammal => "Mammal",
            SpeciesType::Bird => "Bird",
            SpeciesType::Reptile => "Reptile",
            SpeciesType::Amphibian => "Amphibian",
            SpeciesType::Fish => "Fish",
            SpeciesType::Invertebrate => "Invertebrate",
        }
    }

    /// Only birds track a wintering location
    pub fn has_wintering_location(&self) -> bool {
        matches!(self, SpeciesType::Bird)
    }

    /// Only reptiles track a hibernation period
    pub fn has_hibernation(&self) -> bool {
        matches!(self, SpeciesType::Reptile)
    }
}

impl FromStr for SpeciesType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpeciesType::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "species type", value: s.to_string() })
    }
}

impl fmt::Display for SpeciesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HealthStatus {
    #[default]
    Healthy,
    Sick,
    #[serde(rename = "Under Treatment")]
    UnderTreatment,
    Recovering,
    Critical,
}

impl HealthStatus {
    pub const ALL: [HealthStatus; 5] = [
        HealthStatus::Healthy,
        HealthStatus::Sick,
        HealthStatus::UnderTreatment,
        HealthStatus::Recovering,
        HealthStatus::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Sick => "Sick",
            HealthStatus::UnderTreatment => "Under Treatment",
            HealthStatus::Recovering => "Recovering",
            HealthStatus::Critical => "Critical",
        }
    }

    /// Anything other than healthy shows up in the dashboard alert
    pub fn needs_attention(&self) -> bool {
        !matches!(self, HealthStatus::Healthy)
    }
}

impl FromStr for HealthStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HealthStatus::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "health status", value: s.to_string() })
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    Keeper,
    Veterinarian,
}

impl StaffRole {
    pub const ALL: [StaffRole; 2] = [StaffRole::Keeper, StaffRole::Veterinarian];

    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Keeper => "Keeper",
            StaffRole::Veterinarian => "Veterinarian",
        }
    }
}

impl FromStr for StaffRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StaffRole::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "staff role", value: s.to_string() })
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietCategory {
    Carnivore,
    Herbivore,
    Omnivore,
    Insectivore,
}

impl DietCategory {
    pub const ALL: [DietCategory; 4] = [
        DietCategory::Carnivore,
        DietCategory::Herbivore,
        DietCategory::Omnivore,
        DietCategory::Insectivore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietCategory::Carnivore => "Carnivore",
            DietCategory::Herbivore => "Herbivore",
            DietCategory::Omnivore => "Omnivore",
            DietCategory::Insectivore => "Insectivore",
        }
    }
}

impl FromStr for DietCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DietCategory::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant { kind: "diet category", value: s.to_string() })
    }
}

impl fmt::Display for DietCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: String,
    pub name: String,
    pub species: String,
    pub species_type: SpeciesType,
    pub date_of_birth: Option<NaiveDate>,
    /// Free text, "Unknown" when not given
    pub gender: String,
    /// Weight in kilograms
    pub weight: Option<f64>,
    pub health_status: HealthStatus,
    pub enclosure: Option<String>,
    /// Birds only
    pub wintering_location: Option<String>,
    /// Reptiles only
    pub hibernation_start: Option<NaiveDate>,
    /// Reptiles only
    pub hibernation_end: Option<NaiveDate>,
    /// Reptiles only, degrees Celsius
    pub hibernation_temperature: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub hire_date: NaiveDate,
    pub specialization: Option<String>,
    /// Symmetric link, the spouse's record points back at this one
    pub spouse_id: Option<String>,
    /// Staff are deactivated instead of deleted
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Staff {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietType {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: DietCategory,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diet {
    pub id: String,
    pub animal_id: String,
    pub diet_type_id: String,
    pub food_name: String,
    pub quantity: Option<String>,
    pub feeding_time: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Absent while the diet is the animal's current one
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Diet {
    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalCheck {
    pub id: String,
    pub animal_id: String,
    pub vet_id: String,
    pub check_date: NaiveDate,
    pub diagnosis: String,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub next_check_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Forms: raw user input, validated and coerced by the backend
// ---------------------------------------------------------------------------
//
// Optional text fields treat an empty string as "not given". On update forms
// `None` leaves a field unchanged and `Some("")` clears an optional field.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnimalForm {
    pub name: String,
    pub species: String,
    pub species_type: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub health_status: Option<String>,
    pub enclosure: Option<String>,
    pub wintering_location: Option<String>,
    pub hibernation_start: Option<String>,
    pub hibernation_end: Option<String>,
    pub hibernation_temperature: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnimalUpdateForm {
    pub name: Option<String>,
    pub species: Option<String>,
    pub species_type: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub health_status: Option<String>,
    pub enclosure: Option<String>,
    pub wintering_location: Option<String>,
    pub hibernation_start: Option<String>,
    pub hibernation_end: Option<String>,
    pub hibernation_temperature: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StaffForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub hire_date: String,
    pub specialization: Option<String>,
    pub spouse_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StaffUpdateForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub hire_date: Option<String>,
    pub specialization: Option<String>,
    pub spouse_id: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DietTypeForm {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DietTypeUpdateForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DietForm {
    pub animal_id: String,
    pub diet_type_id: String,
    pub food_name: String,
    pub quantity: Option<String>,
    pub feeding_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DietUpdateForm {
    pub diet_type_id: Option<String>,
    pub food_name: Option<String>,
    pub quantity: Option<String>,
    pub feeding_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MedicalCheckForm {
    pub animal_id: String,
    pub vet_id: String,
    pub check_date: String,
    pub diagnosis: String,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub next_check_date: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MedicalCheckUpdateForm {
    pub vet_id: Option<String>,
    pub check_date: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub next_check_date: Option<String>,
    pub notes: Option<String>,
}

/// A validation failure attached to one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

/// One row per animal with its current diet and latest medical check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalFullInfo {
    pub id: String,
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
    pub current_diet: Option<String>,
    pub last_medical_check: Option<NaiveDate>,
    pub last_diagnosis: Option<String>,
    pub last_vet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoupleMember {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarriedCouple {
    pub first: CoupleMember,
    pub second: CoupleMember,
}

impl MarriedCouple {
    pub fn contains(&self, staff_id: &str) -> bool {
        self.first.id == staff_id || self.second.id == staff_id
    }
}

/// An animal joined with one of its active diets and the diet's type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalDietRow {
    pub animal_id: String,
    pub animal_name: String,
    pub species: String,
    pub diet_id: String,
    pub diet_type_id: String,
    pub diet_type: String,
    pub food_name: String,
    pub quantity: Option<String>,
    pub feeding_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    AnimalAdded,
    MedicalCheck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub entity_id: String,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesTypeCount {
    pub species_type: SpeciesType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_animals: usize,
    pub healthy_animals: usize,
    pub needs_attention: usize,
    pub total_staff: usize,
    pub veterinarians: usize,
    pub keepers: usize,
    pub diet_types: usize,
    pub medical_checks: usize,
    pub animals_by_species_type: Vec<SpeciesTypeCount>,
    pub recent_activity: Vec<ActivityItem>,
}

// ---------------------------------------------------------------------------
// API responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalListResponse {
    pub animals: Vec<Animal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalResponse {
    pub animal: Animal,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffListResponse {
    pub staff: Vec<Staff>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffResponse {
    pub staff: Staff,
    pub success_message: String,
    /// Set when the spouse's record could not be updated to match
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietTypeListResponse {
    pub diet_types: Vec<DietType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietTypeResponse {
    pub diet_type: DietType,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietListResponse {
    pub diets: Vec<Diet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietResponse {
    pub diet: Diet,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalCheckListResponse {
    pub medical_checks: Vec<MedicalCheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalCheckResponse {
    pub medical_check: MedicalCheck,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalFullInfoResponse {
    pub animals: Vec<AnimalFullInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarriedCouplesResponse {
    pub couples: Vec<MarriedCouple>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalsWithDietsResponse {
    pub rows: Vec<AnimalDietRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success_message: String,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_uses_display_names_on_the_wire() {
        let json = serde_json::to_string(&HealthStatus::UnderTreatment).unwrap();
        assert_eq!(json, "\"Under Treatment\"");

        let parsed: HealthStatus = "Under Treatment".parse().unwrap();
        assert_eq!(parsed, HealthStatus::UnderTreatment);
    }

    #[test]
    fn test_unknown_enum_values_are_rejected() {
        let err = "Dragon".parse::<SpeciesType>().unwrap_err();
        assert_eq!(err.to_string(), "'Dragon' is not a valid species type");
        assert!("keeper".parse::<StaffRole>().is_err());
    }

    #[test]
    fn test_conditional_fields_by_species_type() {
        assert!(SpeciesType::Bird.has_wintering_location());
        assert!(!SpeciesType::Bird.has_hibernation());
        assert!(SpeciesType::Reptile.has_hibernation());
        assert!(!SpeciesType::Mammal.has_wintering_location());
    }

    #[test]
    fn test_forms_deserialize_with_missing_optional_fields() {
        let form: AnimalForm = serde_json::from_str(
            r#"{"name":"Leo","species":"Lion","species_type":"Mammal"}"#,
        )
        .unwrap();
        assert_eq!(form.name, "Leo");
        assert!(form.gender.is_none());
        assert!(form.weight.is_none());
    }
}
