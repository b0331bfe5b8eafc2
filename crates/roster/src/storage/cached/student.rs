//! Cached student repository decorator.
//!
//! Wraps a `StudentRepository` implementation with cache-aside reads and
//! write-through mutations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use roster_core::cache::{
    deserialize_student, deserialize_students, serialize_student, serialize_students,
    student_key, students_list_key, Cache,
};
use roster_core::storage::{Result, StudentRepository};
use roster_core::student::{Student, StudentId};

/// Cached student repository decorator.
///
/// - **Reads**: Check cache first, on miss fetch from repository and populate cache
/// - **Add/Update**: Persist to repository, then write the returned student to the cache
/// - **Remove**: Persist to repository, then delete the cached student
///
/// Every successful mutation also drops the shared `students:all` slot.
/// Cache failures are logged and never fail the call.
///
/// A read that misses the cache only stores its result if no mutation
/// finished while it was reading from the repository. Otherwise it could put
/// back a value that the mutation already replaced or invalidated.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedStudentRepository<R, C>
where
    R: StudentRepository + ?Sized,
    C: Cache + ?Sized,
{
    repository: Arc<R>,
    cache: Arc<C>,
    ttl: Duration,
    /// Bumped after every successful mutation.
    generation: AtomicU64,
}

impl<R, C> CachedStudentRepository<R, C>
where
    R: StudentRepository + ?Sized,
    C: Cache + ?Sized,
{
    /// Creates a new cached student repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The cache implementation
    /// * `ttl` - Time-to-live for every cached value
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            repository,
            cache,
            ttl,
            generation: AtomicU64::new(0),
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Marks the end of a successful mutation, before its cache updates.
    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Stores a value read from the repository, unless a mutation finished
    /// since `read_generation` was taken.
    async fn fill(&self, key: &str, bytes: &[u8], read_generation: u64) {
        if self.generation() != read_generation {
            tracing::trace!(key, "Skipping cache fill after concurrent write");
            return;
        }

        if let Err(err) = self.cache.set(key, bytes, Some(self.ttl)).await {
            tracing::warn!(key, error = %err, "Failed to fill cache");
            return;
        }

        // A mutation may have landed between the check and the set.
        if self.generation() != read_generation {
            if let Err(err) = self.cache.delete(key).await {
                tracing::warn!(key, error = %err, "Failed to drop stale cache fill");
            }
        }
    }

    async fn cache_student(&self, student: &Student) {
        let cache_key = student_key(student.id);
        match serialize_student(student) {
            Ok(bytes) => {
                if let Err(err) = self.cache.set(&cache_key, &bytes, Some(self.ttl)).await {
                    tracing::warn!(student_id = %student.id, error = %err, "Failed to cache student");
                }
            }
            Err(err) => {
                tracing::warn!(student_id = %student.id, error = %err, "Failed to serialize student");
            }
        }
    }

    async fn invalidate_list(&self) {
        if let Err(err) = self.cache.delete(&students_list_key()).await {
            tracing::warn!(error = %err, "Failed to invalidate student list cache");
        }
    }
}

#[async_trait]
impl<R, C> StudentRepository for CachedStudentRepository<R, C>
where
    R: StudentRepository + ?Sized + 'static,
    C: Cache + ?Sized + 'static,
{
    async fn get_student(&self, id: StudentId) -> Result<Option<Student>> {
        let cache_key = student_key(id);

        match self.cache.get(&cache_key).await {
            Ok(Some(bytes)) => match deserialize_student(&bytes) {
                Ok(student) => {
                    tracing::trace!(student_id = %id, "Cache hit for student");
                    return Ok(Some(student));
                }
                // Undecodable value - treat as cache miss
                Err(err) => {
                    tracing::warn!(student_id = %id, error = %err, "Cache student deserialization failed");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(student_id = %id, error = %err, "Cache read failed for student");
            }
        }

        tracing::trace!(student_id = %id, "Cache miss for student");
        let read_generation = self.generation();
        let student = self.repository.get_student(id).await?;

        if let Some(ref s) = student {
            match serialize_student(s) {
                Ok(bytes) => self.fill(&cache_key, &bytes, read_generation).await,
                Err(err) => {
                    tracing::warn!(student_id = %id, error = %err, "Failed to serialize student");
                }
            }
        }

        Ok(student)
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let cache_key = students_list_key();

        match self.cache.get(&cache_key).await {
            Ok(Some(bytes)) => match deserialize_students(&bytes) {
                Ok(students) => {
                    tracing::trace!(count = students.len(), "Cache hit for student list");
                    return Ok(students);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Cache student list deserialization failed");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "Cache read failed for student list");
            }
        }

        tracing::trace!("Cache miss for student list");
        let read_generation = self.generation();
        let students = self.repository.list_students().await?;

        match serialize_students(&students) {
            Ok(bytes) => self.fill(&cache_key, &bytes, read_generation).await,
            Err(err) => {
                tracing::warn!(count = students.len(), error = %err, "Failed to serialize student list");
            }
        }

        Ok(students)
    }

    async fn add_student(&self, student: &Student) -> Result<Student> {
        let saved = self.repository.add_student(student).await?;
        self.bump_generation();

        self.cache_student(&saved).await;
        self.invalidate_list().await;

        tracing::debug!(student_id = %saved.id, "Student created");
        Ok(saved)
    }

    async fn update_student(&self, id: StudentId, updated: &Student) -> Result<Student> {
        let saved = self.repository.update_student(id, updated).await?;
        self.bump_generation();

        self.cache_student(&saved).await;
        self.invalidate_list().await;

        tracing::debug!(student_id = %id, "Student updated");
        Ok(saved)
    }

    async fn remove_student(&self, id: StudentId) -> Result<()> {
        self.repository.remove_student(id).await?;
        self.bump_generation();

        if let Err(err) = self.cache.delete(&student_key(id)).await {
            tracing::warn!(student_id = %id, error = %err, "Failed to invalidate student cache");
        }
        self.invalidate_list().await;

        tracing::debug!(student_id = %id, "Student removed");
        Ok(())
    }
}
