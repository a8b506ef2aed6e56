//! # Page Controllers
//!
//! One controller per screen. Each holds the screen's local state (open
//! dialog, field errors, search term, notifications) next to the loaded
//! collections, and exposes the handlers a UI shell binds to. Controllers
//! only see domain services, so they behave the same on either store.

pub mod animals;
pub mod dashboard;
pub mod diets;
pub mod medical;
pub mod reports;
pub mod staff;
pub mod state;

pub use animals::{AnimalsPage, ViewMode};
pub use dashboard::DashboardPage;
pub use diets::DietsPage;
pub use medical::MedicalPage;
pub use reports::ReportsPage;
pub use staff::StaffPage;
pub use state::{
    failure_message, Dialog, FormState, Loadable, Notification, NotificationLevel, Notifications,
    SubmitOutcome,
};
