//! Core data models for the vitals service

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A registered user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// An incoming user payload before the registry assigns an id.
///
/// Carrying no id field makes it structurally impossible for clients to
/// pick identifiers on create or override them on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

/// A payload constraint violation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,
    #[error("name must be between 2 and 50 characters")]
    NameLength,
    #[error("email is required")]
    EmailRequired,
    #[error("email must be a valid address")]
    EmailFormat,
}

impl UserDraft {
    /// Check the name and email constraints.
    ///
    /// The HTTP layer runs this before any registry mutation; the registry
    /// itself does not re-validate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        let name_len = self.name.chars().count();
        if !(2..=50).contains(&name_len) {
            return Err(ValidationError::NameLength);
        }

        if self.email.trim().is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::EmailFormat);
        }

        Ok(())
    }
}

/// Minimal syntactic email check: one `@`, non-empty local part, and a
/// dotted domain without leading/trailing dots or whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}
