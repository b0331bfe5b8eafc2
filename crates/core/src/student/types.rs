use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::StudentError;

/// Storage-generated identifier of a student.
///
/// Zero is reserved for students that have not been persisted yet.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StudentId(i64);

impl StudentId {
    /// Id carried by a transient (not yet inserted) student.
    pub const UNSAVED: StudentId = StudentId(0);

    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn is_unsaved(self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for StudentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allowed gender values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = StudentError;

    /// Parses the exact spelling used on the wire and in storage.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| StudentError::InvalidGender(s.to_string()))
    }
}

/// A student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub course: String,
    pub gender: Gender,
}

impl Student {
    /// Creates a transient student. Storage assigns the id on insert.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        course: impl Into<String>,
        gender: Gender,
    ) -> Self {
        Self {
            id: StudentId::UNSAVED,
            name: name.into(),
            email: email.into(),
            course: course.into(),
            gender,
        }
    }

    /// Sets a specific ID for this student.
    pub fn with_id(mut self, id: impl Into<StudentId>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns true once storage has assigned an id.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_unsaved()
    }

    /// Copies every mutable field from `updated`, leaving the id untouched.
    pub fn apply_changes(&mut self, updated: &Student) {
        self.name.clone_from(&updated.name);
        self.email.clone_from(&updated.email);
        self.course.clone_from(&updated.course);
        self.gender = updated.gender;
    }
}
