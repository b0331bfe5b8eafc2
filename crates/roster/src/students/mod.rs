//! Student request handlers and the mediator that routes to them.

mod commands;
mod queries;

use std::sync::Arc;

use roster_core::dispatch::{self, Mediator};
use roster_core::storage::StudentRepository;
use roster_core::student::{
    CreateStudent, GetStudent, ListStudents, RemoveStudent, StudentId, UpdateStudent,
};

pub use commands::{CreateStudentHandler, RemoveStudentHandler, UpdateStudentHandler};
pub use queries::{GetStudentHandler, ListStudentsHandler};

pub(crate) fn not_found_message(id: StudentId) -> String {
    format!("Student with Id {id} not found!")
}

/// Builds the mediator with one handler per student request.
///
/// Fails if any student request is left without a handler.
pub fn build_mediator(repository: Arc<dyn StudentRepository>) -> dispatch::Result<Mediator> {
    let mediator = Mediator::builder()
        .register::<ListStudents, _>(ListStudentsHandler::new(repository.clone()))
        .register::<GetStudent, _>(GetStudentHandler::new(repository.clone()))
        .register::<CreateStudent, _>(CreateStudentHandler::new(repository.clone()))
        .register::<UpdateStudent, _>(UpdateStudentHandler::new(repository.clone()))
        .register::<RemoveStudent, _>(RemoveStudentHandler::new(repository))
        .expect::<ListStudents>()
        .expect::<GetStudent>()
        .expect::<CreateStudent>()
        .expect::<UpdateStudent>()
        .expect::<RemoveStudent>()
        .build()?;

    tracing::debug!(handlers = ?mediator.registered(), "Mediator ready");
    Ok(mediator)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use roster_core::envelope::FailureKind;
    use roster_core::storage::{RepositoryError, Result};
    use roster_core::student::{Gender, Student, StudentRequest};

    use crate::storage::InMemoryRepository;

    /// Repository that counts every call and can be told to fail.
    #[derive(Default)]
    pub(crate) struct CountingRepository {
        students: Mutex<BTreeMap<StudentId, Student>>,
        next_id: AtomicUsize,
        pub(crate) get_calls: AtomicUsize,
        pub(crate) list_calls: AtomicUsize,
        pub(crate) add_calls: AtomicUsize,
        pub(crate) update_calls: AtomicUsize,
        pub(crate) remove_calls: AtomicUsize,
        fail_with: Mutex<Option<RepositoryError>>,
        fail_mutations_with: Mutex<Option<RepositoryError>>,
    }

    impl CountingRepository {
        fn failing(err: RepositoryError) -> Self {
            let repo = Self::default();
            *repo.fail_with.lock().unwrap() = Some(err);
            repo
        }

        fn failed(&self) -> Result<()> {
            match self.fail_with.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        fn failed_mutation(&self) -> Result<()> {
            self.failed()?;
            match self.fail_mutations_with.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        pub(crate) fn mutations(&self) -> usize {
            self.add_calls.load(Ordering::SeqCst)
                + self.update_calls.load(Ordering::SeqCst)
                + self.remove_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StudentRepository for CountingRepository {
        async fn get_student(&self, id: StudentId) -> Result<Option<Student>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            self.failed()?;
            Ok(self.students.lock().unwrap().get(&id).cloned())
        }

        async fn list_students(&self) -> Result<Vec<Student>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.failed()?;
            Ok(self.students.lock().unwrap().values().cloned().collect())
        }

        async fn add_student(&self, student: &Student) -> Result<Student> {
            self.add_calls.fetch_add(1, Ordering::SeqCst);
            self.failed_mutation()?;
            let id = StudentId::new(self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1);
            let saved = student.clone().with_id(id);
            self.students.lock().unwrap().insert(id, saved.clone());
            Ok(saved)
        }

        async fn update_student(&self, id: StudentId, updated: &Student) -> Result<Student> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            self.failed_mutation()?;
            let mut students = self.students.lock().unwrap();
            let student = students
                .get_mut(&id)
                .ok_or_else(|| RepositoryError::student_not_found(id))?;
            student.apply_changes(updated);
            Ok(student.clone())
        }

        async fn remove_student(&self, id: StudentId) -> Result<()> {
            self.remove_calls.fetch_add(1, Ordering::SeqCst);
            self.failed_mutation()?;
            self.students
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| RepositoryError::student_not_found(id))
        }
    }

    fn alice_request() -> StudentRequest {
        StudentRequest::new(
            "Alice Johnson",
            "alice.johnson@example.com",
            "Computer Science",
            "Female",
        )
    }

    fn mediator_over(repo: Arc<CountingRepository>) -> Mediator {
        build_mediator(repo).unwrap()
    }

    #[test]
    fn test_build_mediator_registers_every_request() {
        let mediator = build_mediator(Arc::new(InMemoryRepository::new())).unwrap();

        assert_eq!(
            mediator.registered(),
            vec![
                "CreateStudent",
                "GetStudent",
                "ListStudents",
                "RemoveStudent",
                "UpdateStudent"
            ]
        );
    }

    #[tokio::test]
    async fn test_list_empty_is_success() {
        let repo = Arc::new(CountingRepository::default());
        let mediator = mediator_over(repo.clone());

        let envelope = mediator.send(ListStudents).await.unwrap();

        assert!(envelope.is_success);
        assert_eq!(envelope.data, Some(vec![]));
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_list_storage_failure_is_tagged() {
        let err = RepositoryError::ConnectionFailed("database is locked".to_string());
        let mediator = mediator_over(Arc::new(CountingRepository::failing(err.clone())));

        let envelope = mediator.send(ListStudents).await.unwrap();

        assert!(!envelope.is_success);
        assert_eq!(envelope.data, None);
        assert_eq!(envelope.failure, Some(FailureKind::Storage(err)));
        assert!(envelope
            .message
            .starts_with("An error occurred while fetching students: "));
    }

    #[tokio::test]
    async fn test_get_missing_message_contains_id() {
        let mediator = mediator_over(Arc::new(CountingRepository::default()));

        let envelope = mediator
            .send(GetStudent {
                id: StudentId::new(42),
            })
            .await
            .unwrap();

        assert!(!envelope.is_success);
        assert!(envelope.is_not_found());
        assert_eq!(envelope.message, "Student with Id 42 not found!");
    }

    #[tokio::test]
    async fn test_get_storage_failure_is_not_not_found() {
        let err = RepositoryError::QueryFailed("disk I/O error".to_string());
        let mediator = mediator_over(Arc::new(CountingRepository::failing(err.clone())));

        let envelope = mediator
            .send(GetStudent {
                id: StudentId::new(3),
            })
            .await
            .unwrap();

        assert!(!envelope.is_not_found());
        assert_eq!(envelope.failure, Some(FailureKind::Storage(err)));
        assert_eq!(
            envelope.message,
            "An error occurred while fetching student with Id 3: Query failed: disk I/O error"
        );
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let repo = Arc::new(CountingRepository::default());
        let mediator = mediator_over(repo.clone());

        let created = mediator
            .send(CreateStudent {
                student: alice_request(),
            })
            .await
            .unwrap();
        assert_eq!(created.data, Some(true));

        let list = mediator.send(ListStudents).await.unwrap();
        let students = list.data.unwrap();
        assert_eq!(students.len(), 1);
        let id = students[0].id;
        assert!(!id.is_unsaved());

        let fetched = mediator.send(GetStudent { id }).await.unwrap();
        let student = fetched.data.unwrap();
        assert_eq!(student.name, "Alice Johnson");
        assert_eq!(student.email, "alice.johnson@example.com");
        assert_eq!(student.course, "Computer Science");
        assert_eq!(student.gender, Gender::Female);
    }

    #[tokio::test]
    async fn test_create_rejection_is_success_false() {
        let repo = Arc::new(CountingRepository::default());
        *repo.fail_mutations_with.lock().unwrap() =
            Some(RepositoryError::InvalidData("name too long".to_string()));
        let mediator = mediator_over(repo);

        let envelope = mediator
            .send(CreateStudent {
                student: alice_request(),
            })
            .await
            .unwrap();

        assert!(envelope.is_success);
        assert_eq!(envelope.data, Some(false));
    }

    #[tokio::test]
    async fn test_create_storage_failure_is_failure() {
        let err = RepositoryError::ConnectionFailed("gone".to_string());
        let mediator = mediator_over(Arc::new(CountingRepository::failing(err.clone())));

        let envelope = mediator
            .send(CreateStudent {
                student: alice_request(),
            })
            .await
            .unwrap();

        assert_eq!(envelope.failure, Some(FailureKind::Storage(err)));
        assert!(envelope
            .message
            .starts_with("An error occurred while trying to insert a new student: "));
    }

    #[tokio::test]
    async fn test_create_with_unparseable_gender_is_internal_failure() {
        let repo = Arc::new(CountingRepository::default());
        let mediator = mediator_over(repo.clone());
        let mut request = alice_request();
        request.gender = "Robot".to_string();

        let envelope = mediator.send(CreateStudent { student: request }).await.unwrap();

        assert_eq!(envelope.failure, Some(FailureKind::Internal));
        assert_eq!(repo.mutations(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_checks_once_and_never_mutates() {
        let repo = Arc::new(CountingRepository::default());
        let mediator = mediator_over(repo.clone());

        let envelope = mediator
            .send(UpdateStudent {
                id: StudentId::new(7),
                student: alice_request(),
            })
            .await
            .unwrap();

        assert!(envelope.is_not_found());
        assert_eq!(envelope.message, "Student with Id 7 not found!");
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.mutations(), 0);
    }

    #[tokio::test]
    async fn test_remove_missing_checks_once_and_never_mutates() {
        let repo = Arc::new(CountingRepository::default());
        let mediator = mediator_over(repo.clone());

        let envelope = mediator
            .send(RemoveStudent {
                id: StudentId::new(8),
            })
            .await
            .unwrap();

        assert!(envelope.is_not_found());
        assert_eq!(envelope.message, "Student with Id 8 not found!");
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.mutations(), 0);
    }

    #[tokio::test]
    async fn test_update_existing_checks_once() {
        let repo = Arc::new(CountingRepository::default());
        let mediator = mediator_over(repo.clone());
        mediator
            .send(CreateStudent {
                student: alice_request(),
            })
            .await
            .unwrap();

        let envelope = mediator
            .send(UpdateStudent {
                id: StudentId::new(1),
                student: alice_request(),
            })
            .await
            .unwrap();

        assert_eq!(envelope.data, Some(true));
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.update_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_storage_failure_message() {
        let repo = Arc::new(CountingRepository::default());
        let mediator = mediator_over(repo.clone());
        mediator
            .send(CreateStudent {
                student: alice_request(),
            })
            .await
            .unwrap();
        *repo.fail_mutations_with.lock().unwrap() =
            Some(RepositoryError::QueryFailed("locked".to_string()));

        let envelope = mediator
            .send(RemoveStudent {
                id: StudentId::new(1),
            })
            .await
            .unwrap();

        assert!(!envelope.is_success);
        assert_eq!(
            envelope.message,
            "An error occurred while trying to delete the student with Id 1: Query failed: locked"
        );
    }

    #[tokio::test]
    async fn test_alice_johnson_scenario() {
        let mediator = build_mediator(Arc::new(InMemoryRepository::new())).unwrap();

        let created = mediator
            .send(CreateStudent {
                student: alice_request(),
            })
            .await
            .unwrap();
        assert!(created.is_success);
        assert_eq!(created.data, Some(true));

        let list = mediator.send(ListStudents).await.unwrap();
        let students = list.data.unwrap();
        assert_eq!(students.len(), 1);
        let id = students[0].id;
        assert_eq!(students[0].name, "Alice Johnson");

        let updated = mediator
            .send(UpdateStudent {
                id,
                student: StudentRequest::new(
                    "Alice J.",
                    "alice.johnson@example.com",
                    "Computer Science",
                    "Female",
                ),
            })
            .await
            .unwrap();
        assert_eq!(updated.data, Some(true));

        let fetched = mediator.send(GetStudent { id }).await.unwrap();
        assert_eq!(fetched.data.unwrap().name, "Alice J.");

        let removed = mediator.send(RemoveStudent { id }).await.unwrap();
        assert_eq!(removed.data, Some(true));

        let gone = mediator.send(GetStudent { id }).await.unwrap();
        assert!(gone.is_not_found());
        assert_eq!(gone.message, format!("Student with Id {id} not found!"));
    }

    #[cfg(feature = "memory")]
    #[tokio::test]
    async fn test_cached_update_is_visible_to_next_get() {
        use crate::cache::MemoryCache;
        use crate::storage::CachedStudentRepository;

        let repo = Arc::new(InMemoryRepository::new());
        let cache = Arc::new(MemoryCache::new(100));
        let cached = Arc::new(CachedStudentRepository::new(
            repo,
            cache,
            std::time::Duration::from_secs(60),
        ));
        let mediator = build_mediator(cached).unwrap();

        mediator
            .send(CreateStudent {
                student: alice_request(),
            })
            .await
            .unwrap();
        let id = StudentId::new(1);
        // Warm the cache
        mediator.send(GetStudent { id }).await.unwrap();
        mediator.send(ListStudents).await.unwrap();

        let mut request = alice_request();
        request.course = "Mathematics".to_string();
        mediator
            .send(UpdateStudent {
                id,
                student: request,
            })
            .await
            .unwrap();

        let fetched = mediator.send(GetStudent { id }).await.unwrap();
        assert_eq!(fetched.data.unwrap().course, "Mathematics");
        let list = mediator.send(ListStudents).await.unwrap();
        assert_eq!(list.data.unwrap()[0].course, "Mathematics");
    }
}
