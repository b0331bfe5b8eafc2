use thiserror::Error;

/// Errors that can occur when building student values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StudentError {
    #[error("Invalid gender: {0:?} (expected Male, Female, or Other)")]
    InvalidGender(String),
}
