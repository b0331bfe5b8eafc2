//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use roster_core::storage::{RepositoryError, Result, StudentRepository};
use roster_core::student::{Student, StudentId, MAX_TEXT_LEN};

/// Longest gender value the SQLite schema accepts.
const MAX_GENDER_LEN: usize = 6;

/// In-memory storage backend for testing.
///
/// Uses a BTreeMap wrapped in `Arc<RwLock<_>>` for thread-safe access, so
/// listing returns students ordered by id like the SQLite backend.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    students: Arc<RwLock<BTreeMap<StudentId, Student>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            students: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

/// Mirrors the CHECK constraints of the SQLite schema.
fn check_lengths(student: &Student) -> Result<()> {
    let too_long = [
        ("name", student.name.chars().count(), MAX_TEXT_LEN),
        ("email", student.email.chars().count(), MAX_TEXT_LEN),
        ("course", student.course.chars().count(), MAX_TEXT_LEN),
        ("gender", student.gender.as_str().len(), MAX_GENDER_LEN),
    ]
    .into_iter()
    .find(|(_, len, max)| len > max);

    match too_long {
        Some((field, _, max)) => Err(RepositoryError::InvalidData(format!(
            "{field} exceeds {max} characters"
        ))),
        None => Ok(()),
    }
}

#[async_trait]
impl StudentRepository for InMemoryRepository {
    async fn get_student(&self, id: StudentId) -> Result<Option<Student>> {
        let students = self.students.read().await;
        Ok(students.get(&id).cloned())
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let students = self.students.read().await;
        Ok(students.values().cloned().collect())
    }

    async fn add_student(&self, student: &Student) -> Result<Student> {
        if student.is_persisted() {
            return Err(RepositoryError::InvalidData(format!(
                "student already has id {}",
                student.id
            )));
        }

        check_lengths(student)?;

        let mut students = self.students.write().await;
        let id = StudentId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let saved = student.clone().with_id(id);
        students.insert(id, saved.clone());

        tracing::info!(student_id = %id, "Student inserted");
        Ok(saved)
    }

    async fn update_student(&self, id: StudentId, updated: &Student) -> Result<Student> {
        check_lengths(updated)?;

        let mut students = self.students.write().await;
        let student = students
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::student_not_found(id))?;
        student.apply_changes(updated);

        tracing::info!(student_id = %id, "Student updated");
        Ok(student.clone())
    }

    async fn remove_student(&self, id: StudentId) -> Result<()> {
        let mut students = self.students.write().await;
        students
            .remove(&id)
            .ok_or_else(|| RepositoryError::student_not_found(id))?;

        tracing::info!(student_id = %id, "Student removed");
        Ok(())
    }
}
