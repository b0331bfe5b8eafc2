use thiserror::Error;

/// Errors raised while building or using a mediator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No handler registered for request {request}")]
    MissingHandler { request: &'static str },
    #[error("A handler is already registered for request {request}")]
    DuplicateHandler { request: &'static str },
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_handler_display() {
        let error = DispatchError::MissingHandler {
            request: "GetStudent",
        };
        assert_eq!(
            error.to_string(),
            "No handler registered for request GetStudent"
        );
    }

    #[test]
    fn test_duplicate_handler_display() {
        let error = DispatchError::DuplicateHandler {
            request: "ListStudents",
        };
        assert_eq!(
            error.to_string(),
            "A handler is already registered for request ListStudents"
        );
    }
}
