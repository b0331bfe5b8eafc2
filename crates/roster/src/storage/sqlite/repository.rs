//! SQLite repository implementation.
//!
//! Implements `StudentRepository` from `roster_core::storage` using SQLite.
//! Every mutation runs inside its own transaction, which rolls back unless
//! it is committed explicitly.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use roster_core::storage::{RepositoryError, Result, StudentRepository};
use roster_core::student::{Student, StudentId};

use super::conversions::row_to_student;
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        tracing::info!(path, "SQLite student repository ready");
        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl StudentRepository for SqliteRepository {
    async fn get_student(&self, id: StudentId) -> Result<Option<Student>> {
        tracing::debug!(student_id = %id, "Fetching student");

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_STUDENT_BY_ID, [id.get()], row_to_student)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| {
                let err = map_tokio_rusqlite_error(e, id.to_string());
                tracing::error!(student_id = %id, error = %err, "Failed to fetch student");
                err
            })
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        tracing::debug!("Fetching all students");

        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_STUDENTS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_student).map_err(wrap_err)?;

                let mut students = Vec::new();
                for row_result in rows {
                    students.push(row_result.map_err(wrap_err)?);
                }
                Ok(students)
            })
            .await
            .map_err(|e| {
                let err = map_tokio_rusqlite_error(e, "unknown");
                tracing::error!(error = %err, "Failed to fetch students");
                err
            })
    }

    async fn add_student(&self, student: &Student) -> Result<Student> {
        if student.is_persisted() {
            return Err(RepositoryError::InvalidData(format!(
                "student already has id {}",
                student.id
            )));
        }

        let mut student = student.clone();
        let name = student.name.clone();
        let email = student.email.clone();
        let course = student.course.clone();
        let gender = student.gender.as_str();

        let id = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_STUDENT,
                    rusqlite::params![name, email, course, gender],
                )
                .map_err(wrap_err)?;
                let id = tx.last_insert_rowid();
                tx.commit().map_err(wrap_err)?;
                Ok(id)
            })
            .await
            .map_err(|e| {
                let err = map_tokio_rusqlite_error(e, "unknown");
                tracing::error!(error = %err, "Failed to insert student");
                err
            })?;

        student.id = StudentId::new(id);
        tracing::info!(student_id = %student.id, "Student inserted");
        Ok(student)
    }

    async fn update_student(&self, id: StudentId, updated: &Student) -> Result<Student> {
        let updated = updated.clone();

        let student = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let mut student = tx
                    .query_row(schema::SELECT_STUDENT_BY_ID, [id.get()], row_to_student)
                    .map_err(wrap_err)?;

                student.apply_changes(&updated);
                tx.execute(
                    schema::UPDATE_STUDENT,
                    rusqlite::params![
                        id.get(),
                        student.name,
                        student.email,
                        student.course,
                        student.gender.as_str()
                    ],
                )
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(student)
            })
            .await
            .map_err(|e| {
                let err = map_tokio_rusqlite_error(e, id.to_string());
                tracing::error!(student_id = %id, error = %err, "Failed to update student");
                err
            })?;

        tracing::info!(student_id = %id, "Student updated");
        Ok(student)
    }

    async fn remove_student(&self, id: StudentId) -> Result<()> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let rows = tx
                    .execute(schema::DELETE_STUDENT, [id.get()])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| {
                let err = map_tokio_rusqlite_error(e, id.to_string());
                tracing::error!(student_id = %id, error = %err, "Failed to remove student");
                err
            })?;

        tracing::info!(student_id = %id, "Student removed");
        Ok(())
    }
}
