//! Write-side handlers: create, update and remove.
//!
//! Update and remove check existence once before mutating. A missing student
//! is a `NotFound` failure and the mutation is never attempted.

use std::sync::Arc;

use async_trait::async_trait;

use roster_core::dispatch::RequestHandler;
use roster_core::envelope::{Envelope, FailureKind};
use roster_core::storage::{RepositoryError, StudentRepository};
use roster_core::student::{CreateStudent, RemoveStudent, StudentId, UpdateStudent};

use super::not_found_message;

/// Outcome of a mutation: `success(true)` when it applied, `success(false)`
/// when storage refused it or the row vanished, and a storage failure
/// otherwise.
fn mutation_envelope(
    result: Result<(), RepositoryError>,
    failure_message: impl FnOnce(&RepositoryError) -> String,
) -> Envelope<bool> {
    match result {
        Ok(()) => Envelope::success(true),
        Err(err) if err.is_not_found() || err.is_rejection() => {
            tracing::warn!(error = %err, "Storage rejected mutation");
            Envelope::success(false)
        }
        Err(err) => {
            let message = failure_message(&err);
            Envelope::storage(err, message)
        }
    }
}

/// Runs the single existence check shared by update and remove.
///
/// Returns the envelope to hand back when the mutation must not run.
async fn ensure_exists(
    repository: &dyn StudentRepository,
    id: StudentId,
    failure_message: impl FnOnce(&RepositoryError) -> String,
) -> Option<Envelope<bool>> {
    match repository.get_student(id).await {
        Ok(Some(_)) => None,
        Ok(None) => {
            tracing::debug!(student_id = %id, "Student not found");
            Some(Envelope::not_found(not_found_message(id)))
        }
        Err(err) => {
            let message = failure_message(&err);
            Some(Envelope::storage(err, message))
        }
    }
}

/// Handles [`CreateStudent`].
pub struct CreateStudentHandler {
    repository: Arc<dyn StudentRepository>,
}

impl CreateStudentHandler {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<CreateStudent> for CreateStudentHandler {
    async fn handle(&self, request: CreateStudent) -> Envelope<bool> {
        let student = match request.student.to_student() {
            Ok(student) => student,
            Err(err) => {
                return Envelope::failure(
                    FailureKind::Internal,
                    format!("An error occurred while trying to insert a new student: {err}"),
                )
            }
        };

        let result = self.repository.add_student(&student).await.map(|saved| {
            tracing::info!(student_id = %saved.id, "Student created");
        });

        mutation_envelope(result, |err| {
            format!("An error occurred while trying to insert a new student: {err}")
        })
    }
}

/// Handles [`UpdateStudent`].
pub struct UpdateStudentHandler {
    repository: Arc<dyn StudentRepository>,
}

impl UpdateStudentHandler {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }
}

fn update_failure(id: StudentId, err: impl std::fmt::Display) -> String {
    format!("An error occurred while trying to update the student with Id {id}: {err}")
}

#[async_trait]
impl RequestHandler<UpdateStudent> for UpdateStudentHandler {
    async fn handle(&self, request: UpdateStudent) -> Envelope<bool> {
        let id = request.id;

        if let Some(envelope) =
            ensure_exists(self.repository.as_ref(), id, |err| update_failure(id, err)).await
        {
            return envelope;
        }

        let changes = match request.student.to_student() {
            Ok(student) => student,
            Err(err) => {
                return Envelope::failure(FailureKind::Internal, update_failure(id, err))
            }
        };

        let result = self
            .repository
            .update_student(id, &changes)
            .await
            .map(|_| tracing::info!(student_id = %id, "Student updated"));

        mutation_envelope(result, |err| update_failure(id, err))
    }
}

/// Handles [`RemoveStudent`].
pub struct RemoveStudentHandler {
    repository: Arc<dyn StudentRepository>,
}

impl RemoveStudentHandler {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }
}

fn remove_failure(id: StudentId, err: &RepositoryError) -> String {
    format!("An error occurred while trying to delete the student with Id {id}: {err}")
}

#[async_trait]
impl RequestHandler<RemoveStudent> for RemoveStudentHandler {
    async fn handle(&self, request: RemoveStudent) -> Envelope<bool> {
        let id = request.id;

        if let Some(envelope) =
            ensure_exists(self.repository.as_ref(), id, |err| remove_failure(id, err)).await
        {
            return envelope;
        }

        let result = self
            .repository
            .remove_student(id)
            .await
            .map(|()| tracing::info!(student_id = %id, "Student removed"));

        mutation_envelope(result, |err| remove_failure(id, err))
    }
}
