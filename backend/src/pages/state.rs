//! # Page State
//!
//! Building blocks shared by every page controller: which dialog is open,
//! the field errors of the open form, load status of a collection and the
//! queue of notifications the shell shows as toasts.

use shared::FieldError;
use tracing::warn;

use crate::domain::ZooError;

/// Which dialog a page has open, and for which record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialog {
    #[default]
    Closed,
    Create,
    Edit(String),
    ConfirmDelete(String),
}

/// Form state for one kind of record on a page
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub dialog: Dialog,
    pub field_errors: Vec<FieldError>,
    pub submitting: bool,
}

impl FormState {
    pub fn open_create(&mut self) {
        self.open(Dialog::Create);
    }

    pub fn open_edit(&mut self, id: &str) {
        self.open(Dialog::Edit(id.to_string()));
    }

    pub fn open_delete(&mut self, id: &str) {
        self.open(Dialog::ConfirmDelete(id.to_string()));
    }

    pub fn close(&mut self) {
        self.open(Dialog::Closed);
    }

    fn open(&mut self, dialog: Dialog) {
        self.dialog = dialog;
        self.field_errors.clear();
        self.submitting = false;
    }

    pub fn is_open(&self) -> bool {
        self.dialog != Dialog::Closed
    }

    /// Id of the record being edited
    pub fn editing(&self) -> Option<&str> {
        match &self.dialog {
            Dialog::Edit(id) => Some(id),
            _ => None,
        }
    }

    /// Id of the record awaiting delete confirmation
    pub fn deleting(&self) -> Option<&str> {
        match &self.dialog {
            Dialog::ConfirmDelete(id) => Some(id),
            _ => None,
        }
    }

    /// First error message for a field
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.field_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Toasts waiting to be shown, oldest first
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    queue: Vec<Notification>,
}

impl Notifications {
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Success, message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationLevel::Error, message.into());
    }

    fn push(&mut self, level: NotificationLevel, message: String) {
        self.queue.push(Notification { level, message });
    }

    pub fn pending(&self) -> &[Notification] {
        &self.queue
    }

    /// Hand every queued notification to the shell
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.queue)
    }

    pub fn last(&self) -> Option<&Notification> {
        self.queue.last()
    }
}

/// A collection plus its load status. A failed reload keeps the last data.
#[derive(Debug, Clone)]
pub struct Loadable<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T: Default> Default for Loadable<T> {
    fn default() -> Self {
        Self { data: T::default(), loading: false, error: None }
    }
}

impl<T> Loadable<T> {
    pub fn set_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn set_data(&mut self, data: T) {
        self.data = data;
        self.loading = false;
        self.error = None;
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.loading = false;
    }

    /// Apply a fetch result, logging and recording the failure
    pub fn settle(&mut self, what: &str, result: Result<T, ZooError>) {
        match result {
            Ok(data) => self.set_data(data),
            Err(e) => {
                warn!("Failed to load {}: {}", what, e);
                self.set_error(failure_message(&format!("load {}", what)));
            }
        }
    }
}

/// What happened to a submitted form or a confirmed delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    /// Field errors were recorded on the form, nothing reached the store
    Rejected,
    /// The store call failed and a notification was queued
    Failed,
    /// No matching dialog was open
    Ignored,
}

pub fn failure_message(action: &str) -> String {
    format!("Failed to {}. Please try again.", action)
}

/// Route a failed mutation: field errors stay on the form, everything else
/// becomes a generic notification. The dialog stays open either way.
pub(crate) fn reject(
    form: &mut FormState,
    notifications: &mut Notifications,
    action: &str,
    err: ZooError,
) -> SubmitOutcome {
    form.submitting = false;
    match err {
        ZooError::Validation(errors) => {
            form.field_errors = errors.into_field_errors();
            SubmitOutcome::Rejected
        }
        other => {
            warn!("Failed to {}: {}", action, other);
            notifications.error(failure_message(action));
            SubmitOutcome::Failed
        }
    }
}
