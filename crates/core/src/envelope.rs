//! Uniform success/failure wrapper returned by every student operation.
//!
//! Serialized as `{"data": ..., "isSuccess": ..., "message": ...}`. A failed
//! envelope also carries a [`FailureKind`] that is not serialized; the HTTP
//! layer uses it to pick a status code.

use serde::{Deserialize, Serialize};

use crate::storage::RepositoryError;

/// Why an operation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The requested student does not exist.
    NotFound,
    /// Storage could not complete the operation.
    Storage(RepositoryError),
    /// Any other failure inside a handler.
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub is_success: bool,
    pub message: String,
    #[serde(skip)]
    pub failure: Option<FailureKind>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            is_success: true,
            message: String::new(),
            failure: None,
        }
    }

    /// A failed envelope never carries data.
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            data: None,
            is_success: false,
            message: message.into(),
            failure: Some(kind),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(FailureKind::NotFound, message)
    }

    pub fn storage(error: RepositoryError, message: impl Into<String>) -> Self {
        Self::failure(FailureKind::Storage(error), message)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.failure, Some(FailureKind::NotFound))
    }
}
