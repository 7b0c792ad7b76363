//! The handler table: one slot per known event, each pre-populated with a
//! no-op so dispatch of a known event never fails for lack of a handler.
//!
//! Slots may be replaced at any time, including while dispatches are running.
//! Replacement is last-write-wins per slot; there is no atomicity across the
//! whole table.

use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, WebhookError};
use crate::events::{Category, EventType};
use crate::handler::{DefaultOutcome, Handler};
use crate::payload::EventPayload;

pub struct HandlerRegistry<T = Value> {
    slots: RwLock<[Handler<T>; EventType::COUNT]>,
    default: Handler<T>,
}

impl<T> HandlerRegistry<T>
where
    T: DefaultOutcome + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_default_outcome(T::default_outcome())
    }
}

impl<T> Default for HandlerRegistry<T>
where
    T: DefaultOutcome + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> HandlerRegistry<T> {
    /// A registry whose unregistered events resolve to `outcome`.
    pub fn with_default_outcome(outcome: T) -> Self
    where
        T: Clone + Sync,
    {
        let default = Handler::noop(outcome);
        Self {
            slots: RwLock::new(std::array::from_fn(|_| default.clone())),
            default,
        }
    }

    /// Replace the handler for `event`.
    pub fn register(&self, event: EventType, handler: Handler<T>) -> &Self {
        debug!(event = %event, noop = handler.is_noop(), "Registering webhook handler");
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots[event.index()] = handler;
        self
    }

    /// Replace the handler for `event` with a closure.
    pub fn on<F, Fut>(&self, event: EventType, handler: F) -> &Self
    where
        F: Fn(Arc<EventPayload>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        self.register(event, Handler::new(handler))
    }

    /// String-keyed registration, e.g. `("dispute", "won")`. Fails outside the
    /// closed key space.
    pub fn register_parts(
        &self,
        category: &str,
        sub_event: &str,
        handler: Handler<T>,
    ) -> Result<&Self> {
        let event = Category::parse_str(category)
            .and_then(|c| EventType::from_parts(c, sub_event))
            .ok_or_else(|| WebhookError::UnknownHandlerKey {
                category: category.to_string(),
                sub_event: sub_event.to_string(),
            })?;
        Ok(self.register(event, handler))
    }

    /// The placeholder every slot starts with. Registering it resets a slot.
    pub fn default_handler(&self) -> Handler<T> {
        self.default.clone()
    }

    /// The handler currently in the slot for `event`.
    pub fn handler(&self, event: EventType) -> Handler<T> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots[event.index()].clone()
    }

    /// Snapshot of the whole table. Later registrations do not affect it.
    pub fn handlers(&self) -> HandlerTable<T> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        HandlerTable {
            slots: slots.clone(),
        }
    }

    /// Route one payload to the handler registered for its event type and
    /// return that handler's result untouched.
    ///
    /// An unrecognised event type rejects with [`WebhookError::UnsupportedEvent`].
    pub async fn dispatch(&self, payload: Arc<EventPayload>) -> anyhow::Result<T> {
        let Some(event) = EventType::parse_str(&payload.event_type) else {
            warn!(
                event = %payload.event_type,
                account_id = %payload.account_id,
                "Unsupported webhook event"
            );
            return Err(WebhookError::UnsupportedEvent(payload.event_type.clone()).into());
        };

        let handler = self.handler(event);
        debug!(
            event = %event,
            account_id = %payload.account_id,
            handled = !handler.is_noop(),
            "Dispatching webhook event"
        );
        handler.call(payload).await
    }
}

impl<T> std::fmt::Debug for HandlerRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        let registered: Vec<&str> = EventType::ALL
            .iter()
            .filter(|event| !slots[event.index()].is_noop())
            .map(|event| event.as_str())
            .collect();
        f.debug_struct("HandlerRegistry")
            .field("registered", &registered)
            .finish()
    }
}

// --- Named setters, one per known event ---

macro_rules! named_setters {
    ($($method:ident => $event:ident),* $(,)?) => {
        impl<T: Send + 'static> HandlerRegistry<T> {
            $(
                pub fn $method<F, Fut>(&self, handler: F) -> &Self
                where
                    F: Fn(Arc<EventPayload>) -> Fut + Send + Sync + 'static,
                    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
                {
                    self.on(EventType::$event, handler)
                }
            )*
        }
    };
}

named_setters! {
    on_order_paid => OrderPaid,
    on_payment_authorized => PaymentAuthorized,
    on_payment_captured => PaymentCaptured,
    on_payment_failed => PaymentFailed,
    on_refund_created => RefundCreated,
    on_payment_dispute_created => DisputeCreated,
    on_payment_dispute_won => DisputeWon,
    on_payment_dispute_lost => DisputeLost,
    on_payment_dispute_closed => DisputeClosed,
    on_invoice_partially_paid => InvoicePartiallyPaid,
    on_invoice_paid => InvoicePaid,
    on_invoice_expired => InvoiceExpired,
    on_subscription_activated => SubscriptionActivated,
    on_subscription_charged => SubscriptionCharged,
    on_subscription_completed => SubscriptionCompleted,
    on_subscription_updated => SubscriptionUpdated,
    on_subscription_pending => SubscriptionPending,
    on_subscription_halted => SubscriptionHalted,
    on_subscription_cancelled => SubscriptionCancelled,
    on_settlement_processed => SettlementProcessed,
    on_virtual_account_created => VirtualAccountCreated,
    on_virtual_account_credited => VirtualAccountCredited,
    on_virtual_account_closed => VirtualAccountClosed,
}

// --- Snapshot ---

/// A point-in-time copy of every slot, grouped by category on read.
pub struct HandlerTable<T> {
    slots: [Handler<T>; EventType::COUNT],
}

impl<T> HandlerTable<T> {
    pub fn get(&self, event: EventType) -> &Handler<T> {
        &self.slots[event.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventType, &Handler<T>)> {
        EventType::ALL.into_iter().zip(self.slots.iter())
    }

    /// One category's handlers, keyed by sub-event name.
    pub fn category(&self, category: Category) -> impl Iterator<Item = (&'static str, &Handler<T>)> {
        self.iter()
            .filter(move |(event, _)| event.category() == category)
            .map(|(event, handler)| (event.sub_event(), handler))
    }

    /// Events whose slot holds something other than the placeholder.
    pub fn registered(&self) -> Vec<EventType> {
        self.iter()
            .filter(|(_, handler)| !handler.is_noop())
            .map(|(event, _)| event)
            .collect()
    }
}

impl<T> Clone for HandlerTable<T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<T> std::fmt::Debug for HandlerTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTable")
            .field("registered", &self.registered())
            .finish()
    }
}
