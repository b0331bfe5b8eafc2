//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use rusqlite::Row;

use roster_core::student::{Gender, Student, StudentId};

/// Convert a SQLite row to a Student.
///
/// Expected columns: id, name, email, course, gender
pub fn row_to_student(row: &Row) -> rusqlite::Result<Student> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let email: String = row.get(2)?;
    let course: String = row.get(3)?;
    let gender: String = row.get(4)?;

    Ok(Student {
        id: StudentId::new(id),
        name,
        email,
        course,
        gender: parse_gender(&gender)?,
    })
}

/// Parse the stored gender column.
fn parse_gender(s: &str) -> rusqlite::Result<Gender> {
    s.parse::<Gender>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })
}
