pub mod error;
pub mod health;
pub mod students;

pub use error::AppError;
