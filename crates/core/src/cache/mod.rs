mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{student_key, students_list_key, STUDENTS_LIST_KEY};
pub use serialization::{
    deserialize_student, deserialize_students, serialize_student, serialize_students,
    SerializationError,
};
pub use traits::Cache;
