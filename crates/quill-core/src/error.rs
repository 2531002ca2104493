//! Domain-level error types.

use thiserror::Error;

use crate::validation::Violation;

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    /// The store refused a record that breaks the post invariants.
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<Violation>),
}

/// Returned when a string is not a well-formed post identifier.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Malformed post id: {0}")]
pub struct IdParseError(pub String);
