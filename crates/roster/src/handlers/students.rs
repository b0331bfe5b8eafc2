//! Student CRUD handlers.
//!
//! Each handler validates its input, sends one request through the mediator
//! and turns the returned envelope into a response.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use roster_core::envelope::{Envelope, FailureKind};
use roster_core::storage::{is_transient, repository_error_to_status_code};
use roster_core::student::{
    validate_student_request, CreateStudent, GetStudent, ListStudents, RemoveStudent,
    StudentId, StudentRequest, UpdateStudent, ValidationErrors,
};

use crate::{handlers::AppError, state::AppState};

const VALIDATION_PROBLEM_TYPE: &str = "https://tools.ietf.org/html/rfc9110#section-15.5.1";
const VALIDATION_PROBLEM_TITLE: &str = "One or more validation errors occurred.";

/// Error response with message (for malformed request bodies).
fn error_response(status: StatusCode, message: impl Into<String>) -> (StatusCode, String) {
    let msg = message.into();
    tracing::warn!(status = %status, message = %msg, "API error");
    (status, msg)
}

/// Body of a 400 response listing every failed field.
#[derive(Debug, Serialize)]
struct ValidationProblem {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'static str,
    status: u16,
    errors: ValidationErrors,
}

fn validation_problem(errors: ValidationErrors) -> Response {
    tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Validation failed");
    let problem = ValidationProblem {
        kind: VALIDATION_PROBLEM_TYPE,
        title: VALIDATION_PROBLEM_TITLE,
        status: StatusCode::BAD_REQUEST.as_u16(),
        errors,
    };
    (StatusCode::BAD_REQUEST, Json(problem)).into_response()
}

/// Unwraps the JSON body and runs field validation.
fn validated(
    payload: Result<Json<StudentRequest>, JsonRejection>,
) -> Result<StudentRequest, Response> {
    let Json(request) = payload.map_err(|rejection| {
        error_response(StatusCode::BAD_REQUEST, rejection.body_text()).into_response()
    })?;

    validate_student_request(&request).map_err(validation_problem)?;
    Ok(request)
}

/// Status for an envelope. `not_found` is the status used when the student is missing.
fn envelope_status<T>(envelope: &Envelope<T>, not_found: StatusCode) -> StatusCode {
    if envelope.is_success {
        return StatusCode::OK;
    }

    match &envelope.failure {
        Some(FailureKind::NotFound) => not_found,
        Some(FailureKind::Storage(err)) => {
            StatusCode::from_u16(repository_error_to_status_code(err))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Some(FailureKind::Internal) | None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn envelope_response<T: Serialize>(envelope: Envelope<T>, not_found: StatusCode) -> Response {
    let status = envelope_status(&envelope, not_found);
    match &envelope.failure {
        Some(FailureKind::Storage(err)) => tracing::error!(
            status = %status,
            transient = is_transient(err),
            error = %err,
            "Student storage failure"
        ),
        Some(FailureKind::Internal) => {
            tracing::error!(status = %status, message = %envelope.message, "Student request failed")
        }
        _ => {}
    }
    (status, Json(envelope)).into_response()
}

/// List all students (GET /students).
///
/// An empty roster is a 204 with no body.
pub async fn list_students(State(state): State<AppState>) -> Result<Response, AppError> {
    let envelope = state.mediator.send(ListStudents).await?;

    if envelope.is_success && envelope.data.as_ref().is_some_and(Vec::is_empty) {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(envelope_response(envelope, StatusCode::NOT_FOUND))
}

/// Get a single student (GET /students/{id}).
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let envelope = state
        .mediator
        .send(GetStudent {
            id: StudentId::new(id),
        })
        .await?;

    Ok(envelope_response(envelope, StatusCode::NOT_FOUND))
}

/// Create a student (POST /students).
pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<StudentRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let student = match validated(payload) {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let envelope = state.mediator.send(CreateStudent { student }).await?;

    Ok(envelope_response(envelope, StatusCode::BAD_REQUEST))
}

/// Update a student (PATCH /students/{id}).
///
/// Every field is replaced. A missing student is a 400.
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<StudentRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let student = match validated(payload) {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let envelope = state
        .mediator
        .send(UpdateStudent {
            id: StudentId::new(id),
            student,
        })
        .await?;

    Ok(envelope_response(envelope, StatusCode::BAD_REQUEST))
}

/// Delete a student (DELETE /students/{id}). A missing student is a 400.
pub async fn remove_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let envelope = state
        .mediator
        .send(RemoveStudent {
            id: StudentId::new(id),
        })
        .await?;

    Ok(envelope_response(envelope, StatusCode::BAD_REQUEST))
}
