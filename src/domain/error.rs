//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cycle detected in hierarchy: {0}")]
    CyclicHierarchy(String),

    #[error("duplicate identifier in input: {0}")]
    DuplicateIdentifier(String),

    #[error("unsupported sort key: {0}")]
    UnsupportedSortKey(String),

    #[error("unsupported sort direction: {0}")]
    UnsupportedSortDirection(String),

    #[error("missing required field '{field}' on {id}")]
    MissingRequiredField { id: String, field: &'static str },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
