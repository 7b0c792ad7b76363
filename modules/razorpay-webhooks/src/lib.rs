//! Razorpay webhook event routing.
//!
//! Takes an already-authenticated, already-parsed webhook envelope and hands it
//! to exactly one host-supplied handler, chosen by the envelope's `event`
//! string. Every known event has a slot pre-filled with a no-op, so an event
//! the host doesn't care about resolves successfully. An event outside the
//! known set rejects with [`WebhookError::UnsupportedEvent`].
//!
//! Signature verification, HTTP reception and the Razorpay REST API are the
//! host's concern.
//!
//! ```rust,no_run
//! use razorpay_webhooks::{EventDispatcher, Payment};
//! use serde_json::json;
//!
//! # async fn run(body: &[u8]) -> anyhow::Result<()> {
//! let dispatcher: EventDispatcher = EventDispatcher::from_slice(body)?;
//! dispatcher.handler().on_payment_captured(|event| async move {
//!     let payment: Option<Payment> = event.typed_entity()?;
//!     Ok::<_, anyhow::Error>(json!(payment.map(|p| p.id)))
//! });
//! let _outcome = dispatcher.execute().await?;
//! # Ok(())
//! # }
//! ```

pub mod dispatcher;
pub mod entities;
pub mod error;
pub mod events;
pub mod handler;
pub mod payload;
pub mod registry;

pub use dispatcher::EventDispatcher;
pub use entities::{
    Dispute, Entity, Invoice, Order, Payment, Refund, Settlement, Subscription, VirtualAccount,
};
pub use error::{Result, WebhookError};
pub use events::{Category, EventType};
pub use handler::{DefaultOutcome, Handler, HandlerFuture};
pub use payload::EventPayload;
pub use registry::{HandlerRegistry, HandlerTable};
