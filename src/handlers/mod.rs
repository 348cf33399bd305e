//! HTTP handlers, grouped by the route group that mounts them.
//!
//! Role gates run as route-group middleware (see `crate::routes`), so a
//! handler only checks what the gate cannot: ownership and workflow state.

pub mod account;
pub mod admin;
pub mod catalog;
pub mod notifications;
pub mod offers;
pub mod requests;
pub mod sheets;

use crate::validation::{Validate, ValidationError};

/// Runs the payload's validation, turning a failure into a 400.
pub(crate) fn validated<T: Validate>(payload: T) -> Result<T, ValidationError> {
    payload.validate()?;
    Ok(payload)
}

/// Emails are stored and compared trimmed and lower-cased.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
