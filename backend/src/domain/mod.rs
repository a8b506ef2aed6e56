//! Business logic: validation, derived report views, the request cache and
//! the entity services that tie them to a [`ZooStore`](crate::storage::ZooStore).

pub mod animal_service;
pub mod cache;
pub mod diet_service;
pub mod errors;
pub mod medical_service;
pub mod report_service;
pub mod reports;
pub mod staff_service;
pub mod validation;

pub use animal_service::AnimalService;
pub use cache::{invalidated_by, CacheKey, EntityKind, QueryCache};
pub use diet_service::DietService;
pub use errors::{ZooError, ZooResult};
pub use medical_service::MedicalService;
pub use report_service::ReportService;
pub use staff_service::{SpouseLink, StaffService, StaffWrite};

use chrono::{DateTime, Local, NaiveDate, SubsecRound, Utc};
use uuid::Uuid;

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Truncated to what the SQLite store keeps
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
