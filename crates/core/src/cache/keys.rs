use crate::student::StudentId;

/// Cache key of the shared "all students" slot.
pub const STUDENTS_LIST_KEY: &str = "students:all";

/// Returns the cache key for a single student.
pub fn student_key(id: StudentId) -> String {
    format!("student:{}", id)
}

/// Returns the cache key for the list of all students.
pub fn students_list_key() -> String {
    STUDENTS_LIST_KEY.to_string()
}
