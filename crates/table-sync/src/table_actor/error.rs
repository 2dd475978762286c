//! Error types for table operations.

use crate::clients::StoreError;
use thiserror::Error;

/// Errors returned by the synchronization engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TableError {
    /// A required field is missing, empty or not allowed in this deployment.
    #[error("Table validation error: {0}")]
    Validation(String),

    /// The status string is not one of the known statuses.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Another active table already uses this name.
    #[error("Table name already exists: {0}")]
    DuplicateName(String),

    /// No active table matches the given id.
    #[error("Table not found: {0}")]
    NotFound(String),

    /// Every candidate identifier was already taken.
    #[error("Could not generate a unique table id after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    /// A freshly generated id was claimed by a concurrent create, twice in a row.
    #[error("Table id conflict: {0}")]
    IdConflict(String),

    /// The backing store could not be reached.
    #[error("Table store unavailable: {0}")]
    StoreUnavailable(String),
}

impl TableError {
    /// HTTP-equivalent status code for an outer request layer.
    pub fn http_status(&self) -> u16 {
        match self {
            TableError::Validation(_) | TableError::InvalidStatus(_) => 400,
            TableError::NotFound(_) => 404,
            TableError::DuplicateName(_) | TableError::IdConflict(_) => 409,
            TableError::GenerationExhausted { .. } => 500,
            TableError::StoreUnavailable(_) => 503,
        }
    }
}

impl From<StoreError> for TableError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => TableError::NotFound(id),
            StoreError::DuplicateName(name) => TableError::DuplicateName(name),
            StoreError::DuplicateId(id) => TableError::IdConflict(id),
            StoreError::Rejected(msg) => TableError::Validation(msg),
            StoreError::Unavailable(msg) => TableError::StoreUnavailable(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(TableError::Validation("x".into()).http_status(), 400);
        assert_eq!(TableError::InvalidStatus("x".into()).http_status(), 400);
        assert_eq!(TableError::NotFound("x".into()).http_status(), 404);
        assert_eq!(TableError::DuplicateName("x".into()).http_status(), 409);
        assert_eq!(TableError::GenerationExhausted { attempts: 50 }.http_status(), 500);
        assert_eq!(TableError::StoreUnavailable("x".into()).http_status(), 503);
    }

    #[test]
    fn test_store_errors_are_translated() {
        assert_eq!(
            TableError::from(StoreError::DuplicateName("Bar".into())),
            TableError::DuplicateName("Bar".into())
        );
        assert_eq!(
            TableError::from(StoreError::Unavailable("closed".into())),
            TableError::StoreUnavailable("closed".into())
        );
    }
}
