//! The event envelope as delivered by Razorpay.
//!
//! Signature verification and HTTP reception happen upstream; this module only
//! turns an already-authenticated body into an [`EventPayload`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use typed_builder::TypedBuilder;

use crate::entities::Entity;
use crate::error::{Result, WebhookError};
use crate::events::{Category, EventType};

const ENVELOPE_ENTITY: &str = "event";

/// An inbound webhook event. Immutable once handed to a dispatcher.
///
/// `event_type` stays a raw string: an unrecognised value is a dispatch-time
/// failure, not a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct EventPayload {
    #[serde(default = "envelope_entity")]
    #[builder(default = envelope_entity(), setter(into))]
    pub entity: String,

    #[serde(default)]
    #[builder(default, setter(into))]
    pub account_id: String,

    #[serde(rename = "event")]
    #[builder(setter(into))]
    pub event_type: String,

    #[serde(rename = "contains", default)]
    #[builder(default)]
    pub contained_entities: Vec<String>,

    /// Category name → category-specific object. Passed through untouched.
    #[serde(rename = "payload", default)]
    #[builder(default, setter(transform = |body: Value| object_or_empty(body)))]
    pub payload_body: Map<String, Value>,

    /// Seconds since the Unix epoch.
    #[serde(default)]
    #[builder(default)]
    pub created_at: i64,
}

fn envelope_entity() -> String {
    ENVELOPE_ENTITY.to_string()
}

fn object_or_empty(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl EventPayload {
    /// Build from a parsed JSON body. `null` is an absent payload.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Err(WebhookError::MissingPayload),
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(WebhookError::MalformedPayload(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Build from a raw request body. An empty body is an absent payload.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(WebhookError::MissingPayload);
        }
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// The discriminant as a known event, if it is one.
    pub fn event(&self) -> Result<EventType> {
        self.event_type.parse()
    }

    /// Whether the envelope declares an embedded object of this category.
    pub fn contains(&self, category: Category) -> bool {
        self.contained_entities
            .iter()
            .any(|c| c == category.as_str())
    }

    /// The raw `payload.<category>.entity` object, if present.
    pub fn raw_entity(&self, category: Category) -> Option<&Value> {
        self.payload_body.get(category.as_str())?.get("entity")
    }

    /// Deserialize `payload.<category>.entity` into a caller-chosen type.
    /// `Ok(None)` when the envelope carries no such object.
    pub fn entity<E: DeserializeOwned>(&self, category: Category) -> Result<Option<E>> {
        match self.raw_entity(category) {
            Some(raw) => Ok(Some(E::deserialize(raw)?)),
            None => Ok(None),
        }
    }

    /// Like [`entity`](Self::entity), with the category taken from the type.
    pub fn typed_entity<E: Entity>(&self) -> Result<Option<E>> {
        self.entity(E::CATEGORY)
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.created_at, 0)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
