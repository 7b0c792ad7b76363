use thiserror::Error;

pub type Result<T> = std::result::Result<T, WebhookError>;

/// Failures owned by the router itself. Errors raised by registered handlers
/// are never converted into this type.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Webhook payload is missing")]
    MissingPayload,

    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(String),

    #[error("Unsupported webhook event: {0}")]
    UnsupportedEvent(String),

    #[error("No handler slot for {category}.{sub_event}")]
    UnknownHandlerKey { category: String, sub_event: String },
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::MalformedPayload(err.to_string())
    }
}
