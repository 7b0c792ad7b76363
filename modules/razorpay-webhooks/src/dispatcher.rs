//! Single-use router for one inbound payload.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::handler::DefaultOutcome;
use crate::payload::EventPayload;
use crate::registry::HandlerRegistry;

/// Binds one payload to a registry. Built per inbound webhook, executed once.
///
/// `execute` consumes the dispatcher; a fresh payload needs a fresh
/// dispatcher. Hosts that prefer a stateless call can use
/// [`HandlerRegistry::dispatch`] directly.
pub struct EventDispatcher<T = Value> {
    payload: Arc<EventPayload>,
    registry: Arc<HandlerRegistry<T>>,
}

impl<T> EventDispatcher<T>
where
    T: DefaultOutcome + Clone + Send + Sync + 'static,
{
    /// Dispatcher with its own empty registry. Register handlers through
    /// [`handler`](Self::handler) before calling [`execute`](Self::execute).
    pub fn new(payload: impl Into<Arc<EventPayload>>) -> Self {
        Self::with_registry(payload, Arc::new(HandlerRegistry::new()))
    }

    /// Fails with `MissingPayload` for JSON `null`, before any handler runs.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(Self::new(EventPayload::from_value(value)?))
    }

    /// Fails with `MissingPayload` for an empty body, before any handler runs.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(Self::new(EventPayload::from_slice(body)?))
    }
}

impl<T: Send + 'static> EventDispatcher<T> {
    /// Dispatcher sharing a registry with other dispatchers.
    pub fn with_registry(
        payload: impl Into<Arc<EventPayload>>,
        registry: Arc<HandlerRegistry<T>>,
    ) -> Self {
        Self {
            payload: payload.into(),
            registry,
        }
    }

    pub fn handler(&self) -> &HandlerRegistry<T> {
        &self.registry
    }

    pub fn payload(&self) -> &Arc<EventPayload> {
        &self.payload
    }

    /// Invoke the one handler matching the payload's event type.
    ///
    /// Resolves or rejects exactly as the handler does. An unrecognised event
    /// type rejects with [`WebhookError::UnsupportedEvent`](crate::WebhookError::UnsupportedEvent).
    pub async fn execute(self) -> anyhow::Result<T> {
        let Self { payload, registry } = self;
        registry.dispatch(payload).await
    }
}

impl<T> std::fmt::Debug for EventDispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("event", &self.payload.event_type)
            .field("account_id", &self.payload.account_id)
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WebhookError;
    use serde_json::json;

    #[test]
    fn null_payload_fails_at_construction() {
        let result = EventDispatcher::<Value>::from_value(Value::Null);
        assert!(matches!(result, Err(WebhookError::MissingPayload)));

        let result = EventDispatcher::<Value>::from_slice(b"");
        assert!(matches!(result, Err(WebhookError::MissingPayload)));
    }

    #[tokio::test]
    async fn own_registry_is_reachable_through_handler() {
        let dispatcher: EventDispatcher =
            EventDispatcher::from_value(json!({ "event": "invoice.paid" })).unwrap();
        dispatcher
            .handler()
            .on_invoice_paid(|p| async move { Ok(json!(p.event_type)) });

        assert_eq!(dispatcher.execute().await.unwrap(), json!("invoice.paid"));
    }

    #[tokio::test]
    async fn dispatchers_sharing_a_registry_see_the_same_handlers() {
        let registry: Arc<HandlerRegistry> = Arc::new(HandlerRegistry::new());
        registry.on_order_paid(|_| async { Ok(json!("shared")) });

        let a = EventDispatcher::with_registry(
            EventPayload::builder().event_type("order.paid").build(),
            registry.clone(),
        );
        let b = EventDispatcher::with_registry(
            EventPayload::builder().event_type("order.paid").build(),
            registry,
        );

        assert_eq!(a.execute().await.unwrap(), json!("shared"));
        assert_eq!(b.execute().await.unwrap(), json!("shared"));
    }
}
