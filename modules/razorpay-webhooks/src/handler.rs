//! Handler values stored in a registry slot.

use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

use crate::payload::EventPayload;

/// The future a handler returns. Whatever it resolves or rejects to becomes
/// the dispatch result unchanged.
pub type HandlerFuture<T> = BoxFuture<'static, anyhow::Result<T>>;

type HandlerFn<T> = dyn Fn(Arc<EventPayload>) -> HandlerFuture<T> + Send + Sync;

/// A callback invoked with the full event envelope.
///
/// Cheap to clone. A dispatch clones the slot's handler before awaiting it, so
/// replacing the slot later does not affect a dispatch already in flight.
pub struct Handler<T> {
    func: Arc<HandlerFn<T>>,
    noop: bool,
}

impl<T: Send + 'static> Handler<T> {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Arc<EventPayload>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Self {
            func: Arc::new(move |payload: Arc<EventPayload>| f(payload).boxed()),
            noop: false,
        }
    }

    /// A handler with no side effect that resolves to `outcome`.
    pub fn noop(outcome: T) -> Self
    where
        T: Clone + Sync,
    {
        Self {
            func: Arc::new(move |_: Arc<EventPayload>| -> HandlerFuture<T> {
                future::ready(Ok(outcome.clone())).boxed()
            }),
            noop: true,
        }
    }
}

impl<T> Handler<T> {
    pub fn call(&self, payload: Arc<EventPayload>) -> HandlerFuture<T> {
        (self.func)(payload)
    }

    /// True while the slot still holds the registry's placeholder.
    pub fn is_noop(&self) -> bool {
        self.noop
    }
}

impl<T> Clone for Handler<T> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            noop: self.noop,
        }
    }
}

impl<T> std::fmt::Debug for Handler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler").field("noop", &self.noop).finish()
    }
}

/// The value an unregistered event resolves to. Truthy where the type allows.
pub trait DefaultOutcome {
    fn default_outcome() -> Self;
}

impl DefaultOutcome for Value {
    fn default_outcome() -> Self {
        Value::Bool(true)
    }
}

impl DefaultOutcome for bool {
    fn default_outcome() -> Self {
        true
    }
}

impl DefaultOutcome for () {
    fn default_outcome() -> Self {}
}
