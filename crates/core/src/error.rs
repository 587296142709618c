//! Domain error model.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification a transport layer maps onto its own status codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ValidationFailed,
    NotFound,
    Conflict,
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing references, uniqueness). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field value failed validation.
    #[error("invalid value for `{field}`: {reason}")]
    Validation { field: String, reason: String },

    /// A requested entity, or a referenced foreign id, does not exist.
    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },

    /// A uniqueness constraint or delete restriction would be violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Attempt to read a write-only field.
    #[error("`{0}` is not a readable attribute")]
    SecretField(&'static str),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } | DomainError::SecretField(_) => {
                ErrorKind::ValidationFailed
            }
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Conflict(_) => ErrorKind::Conflict,
        }
    }
}

/// Decode an attribute map (as produced by a transport layer) into a typed input.
///
/// Input types reject unknown field names, so a typo surfaces here instead of
/// being silently ignored.
pub fn from_attributes<T: DeserializeOwned>(attributes: serde_json::Value) -> DomainResult<T> {
    serde_json::from_value(attributes)
        .map_err(|e| DomainError::validation("payload", e.to_string()))
}
