mod error;
mod requests;
mod types;
mod validation;

pub use error::StudentError;
pub use requests::{
    CreateStudent, GetStudent, ListStudents, RemoveStudent, StudentRequest, StudentResponse,
    UpdateStudent,
};
pub use types::{Gender, Student, StudentId};
pub use validation::{validate_student_request, ValidationErrors, MAX_TEXT_LEN, MIN_TEXT_LEN};
