use thiserror::Error;

/// Error for event publishing operations.
///
/// Publishing is always best-effort: callers log these and carry on.
#[derive(Debug, Clone, Error)]
pub enum EventPublisherError {
    #[error("Failed to serialize event: {0}")]
    SerializationFailed(String),

    #[error("Failed to publish event to broker: {0}")]
    PublishFailed(String),

    #[error("Event publishing timeout: {0}")]
    Timeout(String),
}
