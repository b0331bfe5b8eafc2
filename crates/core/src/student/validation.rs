//! Field validation for inbound student requests.
//!
//! Pure functions with no I/O. Rules mirror the persisted column limits so a
//! request that passes validation always fits the `students` table.

use std::collections::BTreeMap;

use email_address::EmailAddress;
use serde::Serialize;

use super::{Gender, StudentRequest};

/// Minimum length (in characters) of `name` and `course`.
pub const MIN_TEXT_LEN: usize = 2;

/// Maximum length (in characters) of `name`, `email` and `course`.
pub const MAX_TEXT_LEN: usize = 100;

/// Field-level validation failures, keyed by JSON field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, empty if the field is valid.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Validates a student request, collecting every failing rule.
///
/// # Examples
///
/// ```
/// use roster_core::student::{validate_student_request, StudentRequest};
///
/// let request = StudentRequest::new("Al", "al@example.com", "Art", "Other");
/// assert!(validate_student_request(&request).is_ok());
///
/// let request = StudentRequest::new("A", "nope", "Art", "Robot");
/// let errors = validate_student_request(&request).unwrap_err();
/// assert_eq!(errors.fields().collect::<Vec<_>>(), ["email", "gender", "name"]);
/// ```
pub fn validate_student_request(request: &StudentRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    validate_text(&mut errors, "name", "Student Name", &request.name);
    validate_email(&mut errors, &request.email);
    validate_text(&mut errors, "course", "Student Course", &request.course);
    validate_gender(&mut errors, &request.gender);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn validate_text(errors: &mut ValidationErrors, field: &str, label: &str, value: &str) {
    if is_blank(value) {
        errors.add(field, format!("{label} is a required field!"));
        return;
    }

    let len = value.chars().count();
    if len < MIN_TEXT_LEN {
        errors.add(
            field,
            format!("{label} must contain at least {MIN_TEXT_LEN} characters!"),
        );
    }
    if len > MAX_TEXT_LEN {
        errors.add(
            field,
            format!("{label} can not exceed {MAX_TEXT_LEN} characters!"),
        );
    }
}

fn validate_email(errors: &mut ValidationErrors, value: &str) {
    if is_blank(value) {
        errors.add("email", "Student Email is a required field!");
        return;
    }

    if !EmailAddress::is_valid(value) {
        errors.add("email", "Not a valid E-mail was passed!");
    }
    if value.chars().count() > MAX_TEXT_LEN {
        errors.add(
            "email",
            format!("Student Email can not exceed {MAX_TEXT_LEN} characters!"),
        );
    }
}

fn validate_gender(errors: &mut ValidationErrors, value: &str) {
    if value.parse::<Gender>().is_err() {
        errors.add("gender", "Gender must be Male, Female, or Other");
    }
}
