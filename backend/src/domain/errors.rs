use thiserror::Error;

use crate::domain::validation::ValidationErrors;
use crate::storage::StoreError;

pub type ZooResult<T> = Result<T, ZooError>;

/// Errors surfaced by the domain services
#[derive(Debug, Error)]
pub enum ZooError {
    /// Field-scoped form errors, raised before any store call
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Constraint(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("remote store failure: {0}")]
    Remote(String),
}

impl ZooError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        ZooError::NotFound { entity, id: id.to_string() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ZooError::Validation(_))
    }
}

impl From<ValidationErrors> for ZooError {
    fn from(errors: ValidationErrors) -> Self {
        ZooError::Validation(errors)
    }
}

impl From<StoreError> for ZooError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint(message) => ZooError::Constraint(message),
            StoreError::NotFound { entity, id } => ZooError::NotFound { entity, id },
            other => ZooError::Remote(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_onto_domain_errors() {
        let err: ZooError = StoreError::Constraint("diet type in use".into()).into();
        assert!(matches!(err, ZooError::Constraint(ref m) if m == "diet type in use"));

        let err: ZooError = StoreError::not_found("animal", "a1").into();
        assert_eq!(err.to_string(), "animal not found: a1");

        let err: ZooError = StoreError::Corrupt("bad date".into()).into();
        assert!(matches!(err, ZooError::Remote(_)));
    }
}
