//! Handler trait and the category→handler registry.

use crate::request::{Category, Payload};
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by a mutation handler.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Creates a handler error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A scene-mutation callback for one operation category.
///
/// Supplied by the mutation layer at construction time; the dispatcher
/// makes no assumption about internals beyond the contract: synchronous,
/// fast, and it must not spawn threads that call back into the queue.
/// Handlers run only on the owning thread, so they may freely touch the
/// scene graph.
pub trait Handler: Send {
    /// Executes the mutation described by `payload`.
    ///
    /// The success value is returned verbatim to status pollers; the error
    /// message is captured into the request's outcome.
    fn execute(&self, payload: &Payload) -> Result<Payload, HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&Payload) -> Result<Payload, HandlerError> + Send,
{
    fn execute(&self, payload: &Payload) -> Result<Payload, HandlerError> {
        self(payload)
    }
}

/// Explicit category→handler map.
///
/// Registration is explicit per category rather than built by closing over
/// loop variables, so there is no late-binding capture to get wrong. A
/// category without a handler is legal; requests drained for it fail with
/// a descriptive outcome.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<Category, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for a category, replacing any previous one.
    pub fn register(&mut self, category: Category, handler: impl Handler + 'static) -> &mut Self {
        self.handlers.insert(category, Box::new(handler));
        self
    }

    /// Returns the handler for a category, if registered.
    pub fn get(&self, category: Category) -> Option<&dyn Handler> {
        self.handlers.get(&category).map(|h| h.as_ref())
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut categories: Vec<&str> = self.handlers.keys().map(|c| c.as_str()).collect();
        categories.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("categories", &categories)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_and_get() {
        let mut registry = HandlerRegistry::new();
        registry.register(Category::Element, |payload: &Payload| {
            Ok(json!({"echo": payload.clone()}))
        });

        assert_eq!(registry.len(), 1);
        let handler = registry.get(Category::Element).unwrap();
        let result = handler.execute(&json!(42)).unwrap();
        assert_eq!(result["echo"], 42);
    }

    #[test]
    fn test_unregistered_category_is_none() {
        let registry = HandlerRegistry::new();
        assert!(registry.get(Category::Camera).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = HandlerRegistry::new();
        registry.register(Category::Element, |_: &Payload| Ok(json!("first")));
        registry.register(Category::Element, |_: &Payload| Ok(json!("second")));

        assert_eq!(registry.len(), 1);
        let result = registry
            .get(Category::Element)
            .unwrap()
            .execute(&json!(null))
            .unwrap();
        assert_eq!(result, json!("second"));
    }

    #[test]
    fn test_handler_error_message() {
        let err = HandlerError::new("no stage open");
        assert_eq!(err.to_string(), "no stage open");
    }
}
