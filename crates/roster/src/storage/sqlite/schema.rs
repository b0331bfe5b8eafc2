//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! following the Functional Core pattern - pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Students table
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(name) <= 100),
    email TEXT NOT NULL CHECK (length(email) <= 100),
    course TEXT NOT NULL CHECK (length(course) <= 100),
    gender TEXT NOT NULL CHECK (length(gender) <= 6)
);
"#;

pub const INSERT_STUDENT: &str = r#"
INSERT INTO students (name, email, course, gender)
VALUES (?1, ?2, ?3, ?4)
"#;

pub const SELECT_STUDENT_BY_ID: &str = r#"
SELECT id, name, email, course, gender
FROM students
WHERE id = ?1
"#;

pub const SELECT_ALL_STUDENTS: &str = r#"
SELECT id, name, email, course, gender
FROM students
ORDER BY id ASC
"#;

pub const UPDATE_STUDENT: &str = r#"
UPDATE students
SET name = ?2, email = ?3, course = ?4, gender = ?5
WHERE id = ?1
"#;

pub const DELETE_STUDENT: &str = r#"
DELETE FROM students
WHERE id = ?1
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_valid_sql() {
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS students"));
        assert!(CREATE_TABLES.contains("AUTOINCREMENT"));
        assert!(CREATE_TABLES.contains("length(gender) <= 6"));
    }

    #[test]
    fn test_queries_contain_expected_keywords() {
        assert!(INSERT_STUDENT.contains("INSERT"));
        assert!(SELECT_STUDENT_BY_ID.contains("WHERE id = ?1"));
        assert!(SELECT_ALL_STUDENTS.contains("ORDER BY id"));
        assert!(UPDATE_STUDENT.contains("UPDATE"));
        assert!(DELETE_STUDENT.contains("DELETE"));
    }
}
