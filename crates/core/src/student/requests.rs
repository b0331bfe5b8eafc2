//! API request and response types for student operations.
//!
//! These types are pure data. The mediator request types (`ListStudents`,
//! `GetStudent`, ...) describe each operation and its envelope payload.

use serde::{Deserialize, Deserializer, Serialize};

use crate::dispatch::Request;
use crate::envelope::Envelope;

use super::{Gender, Student, StudentError, StudentId};

/// Request payload for creating or updating a student.
///
/// Missing and `null` fields deserialize as empty strings so they surface as
/// validation messages instead of JSON errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub course: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gender: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl StudentRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        course: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            course: course.into(),
            gender: gender.into(),
        }
    }

    /// Convert into a transient student (no id).
    pub fn to_student(&self) -> Result<Student, StudentError> {
        let gender: Gender = self.gender.parse()?;
        Ok(Student::new(
            self.name.clone(),
            self.email.clone(),
            self.course.clone(),
            gender,
        ))
    }
}

/// Read model returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub course: String,
    pub gender: Gender,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            email: student.email,
            course: student.course,
            gender: student.gender,
        }
    }
}

/// Lists every student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListStudents;

impl Request for ListStudents {
    type Response = Envelope<Vec<StudentResponse>>;
}

/// Fetches a single student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetStudent {
    pub id: StudentId,
}

impl Request for GetStudent {
    type Response = Envelope<StudentResponse>;
}

/// Creates a student from a validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStudent {
    pub student: StudentRequest,
}

impl Request for CreateStudent {
    type Response = Envelope<bool>;
}

/// Replaces the mutable fields of an existing student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStudent {
    pub id: StudentId,
    pub student: StudentRequest,
}

impl Request for UpdateStudent {
    type Response = Envelope<bool>;
}

/// Deletes an existing student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveStudent {
    pub id: StudentId,
}

impl Request for RemoveStudent {
    type Response = Envelope<bool>;
}
