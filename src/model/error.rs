//! Custom error handler for the domain model.

use std::fmt::Display;

pub type Result<T> = std::result::Result<T, DomainError>;

/// Invariant and relationship failures raised by entities and the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{entity} `{id}` not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} conflicts on {field} `{value}`")]
    Conflict {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(
        entity: &'static str,
        field: &'static str,
        value: impl Display,
    ) -> Self {
        Self::Conflict {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

/// Trims `value` and rejects it when empty or longer than `max` characters.
pub(crate) fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(trimmed.to_owned())
}

/// Same as [`required_text`] but maps blank input to `None`.
pub(crate) fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => required_text(field, value, max).map(Some),
    }
}
