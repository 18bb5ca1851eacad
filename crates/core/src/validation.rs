//! Form validation helpers shared by the create/update payloads.
//!
//! Payloads derive [`validator::Validate`]; [`validate_form`] runs the
//! derived rules and folds failures into a single [`CoreError::Validation`]
//! so nothing invalid reaches the network.

use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;

/// 10-15 digits with an optional leading `+`.
pub static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid regex"));

/// `YYYY-MM` with a real month number.
pub static MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])$").expect("valid regex"));

/// Run a payload's validation rules.
pub fn validate_form<T: Validate>(form: &T) -> Result<(), CoreError> {
    form.validate().map_err(CoreError::from)
}

/// Render validation errors as `field: message` pairs, sorted by field name
/// so the output is stable.
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect();
    if parts.is_empty() {
        return errors.to_string();
    }
    parts.sort();
    parts.join("; ")
}

/// Reject strings that are empty once trimmed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}
