//! Typed request → handler dispatch.
//!
//! A [`Mediator`] maps each request type to exactly one handler. It is built
//! once at startup with [`MediatorBuilder`] and shared by reference; there is
//! no global registry.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{DispatchError, Result};

/// A request that can be dispatched through a [`Mediator`].
pub trait Request: Send + 'static {
    type Response: Send + 'static;
}

/// Handles one request type.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(&self, request: R) -> R::Response;
}

/// Holds an `Arc<dyn RequestHandler<R>>` for the `R` it is keyed by.
struct Registration {
    request: &'static str,
    handler: Box<dyn Any + Send + Sync>,
}

/// Short, human-readable name of a request type, used in errors and logs.
fn request_name<R: Request>() -> &'static str {
    let full = type_name::<R>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Routes typed requests to their registered handler.
pub struct Mediator {
    handlers: HashMap<TypeId, Registration>,
}

impl Mediator {
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::default()
    }

    /// Dispatches `request` to its handler and returns the handler's response.
    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response> {
        let handler = self.handler::<R>()?;
        Ok(handler.handle(request).await)
    }

    /// Returns true when a handler is registered for `R`.
    #[cfg(test)]
    pub fn handles<R: Request>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<R>())
    }

    /// Names of every registered request type, sorted.
    pub fn registered(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.values().map(|r| r.request).collect();
        names.sort_unstable();
        names
    }

    fn handler<R: Request>(&self) -> Result<Arc<dyn RequestHandler<R>>> {
        self.handlers
            .get(&TypeId::of::<R>())
            .and_then(|registration| {
                registration
                    .handler
                    .downcast_ref::<Arc<dyn RequestHandler<R>>>()
            })
            .cloned()
            .ok_or(DispatchError::MissingHandler {
                request: request_name::<R>(),
            })
    }
}

/// Builder that collects handlers and validates them before any request runs.
#[derive(Default)]
pub struct MediatorBuilder {
    handlers: HashMap<TypeId, Registration>,
    expected: Vec<(TypeId, &'static str)>,
    errors: Vec<DispatchError>,
}

impl MediatorBuilder {
    /// Registers the handler for request type `R`.
    ///
    /// A second registration for the same `R` is reported by [`build`](Self::build).
    pub fn register<R, H>(self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let handler: Arc<dyn RequestHandler<R>> = Arc::new(handler);
        self.register_shared(handler)
    }

    /// Registers an already shared handler for request type `R`.
    pub fn register_shared<R: Request>(mut self, handler: Arc<dyn RequestHandler<R>>) -> Self {
        let request = request_name::<R>();
        if self.handlers.contains_key(&TypeId::of::<R>()) {
            self.errors.push(DispatchError::DuplicateHandler { request });
            return self;
        }

        self.handlers.insert(
            TypeId::of::<R>(),
            Registration {
                request,
                handler: Box::new(handler),
            },
        );
        self
    }

    /// Declares that `R` must have a handler by the time [`build`](Self::build) runs.
    pub fn expect<R: Request>(mut self) -> Self {
        self.expected.push((TypeId::of::<R>(), request_name::<R>()));
        self
    }

    /// Finishes the mediator, failing on duplicate or missing handlers.
    pub fn build(self) -> Result<Mediator> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        if let Some(&(_, request)) = self
            .expected
            .iter()
            .find(|(type_id, _)| !self.handlers.contains_key(type_id))
        {
            return Err(DispatchError::MissingHandler { request });
        }

        Ok(Mediator {
            handlers: self.handlers,
        })
    }
}
