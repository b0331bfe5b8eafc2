mod error;
mod mediator;

pub use error::{DispatchError, Result};
pub use mediator::{Mediator, MediatorBuilder, Request, RequestHandler};
