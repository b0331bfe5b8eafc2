use async_trait::async_trait;

use crate::student::{Student, StudentId};

use super::Result;

/// Repository for student operations.
///
/// Every call is its own unit of work. Mutations either commit completely or
/// leave storage untouched.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Gets a student by id. `Ok(None)` when no row matches.
    async fn get_student(&self, id: StudentId) -> Result<Option<Student>>;

    /// Gets every student, ordered by id.
    async fn list_students(&self) -> Result<Vec<Student>>;

    /// Inserts a transient student and returns it with its generated id.
    async fn add_student(&self, student: &Student) -> Result<Student>;

    /// Copies the mutable fields of `updated` onto the stored student.
    ///
    /// Fails with `NotFound` when `id` does not exist.
    async fn update_student(&self, id: StudentId, updated: &Student) -> Result<Student>;

    /// Deletes a student. Fails with `NotFound` when `id` does not exist.
    async fn remove_student(&self, id: StudentId) -> Result<()>;
}
