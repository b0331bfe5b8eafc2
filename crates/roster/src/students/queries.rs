//! Read-side handlers: list and get.

use std::sync::Arc;

use async_trait::async_trait;

use roster_core::dispatch::RequestHandler;
use roster_core::envelope::Envelope;
use roster_core::storage::StudentRepository;
use roster_core::student::{GetStudent, ListStudents, StudentResponse};

use super::not_found_message;

/// Handles [`ListStudents`].
pub struct ListStudentsHandler {
    repository: Arc<dyn StudentRepository>,
}

impl ListStudentsHandler {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<ListStudents> for ListStudentsHandler {
    async fn handle(&self, _request: ListStudents) -> Envelope<Vec<StudentResponse>> {
        match self.repository.list_students().await {
            Ok(students) => {
                tracing::debug!(count = students.len(), "Listed students");
                Envelope::success(students.into_iter().map(StudentResponse::from).collect())
            }
            Err(err) => {
                let message = format!("An error occurred while fetching students: {err}");
                Envelope::storage(err, message)
            }
        }
    }
}

/// Handles [`GetStudent`].
pub struct GetStudentHandler {
    repository: Arc<dyn StudentRepository>,
}

impl GetStudentHandler {
    pub fn new(repository: Arc<dyn StudentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RequestHandler<GetStudent> for GetStudentHandler {
    async fn handle(&self, request: GetStudent) -> Envelope<StudentResponse> {
        let id = request.id;

        match self.repository.get_student(id).await {
            Ok(Some(student)) => Envelope::success(student.into()),
            Ok(None) => {
                tracing::debug!(student_id = %id, "Student not found");
                Envelope::not_found(not_found_message(id))
            }
            Err(err) => {
                let message =
                    format!("An error occurred while fetching student with Id {id}: {err}");
                Envelope::storage(err, message)
            }
        }
    }
}
