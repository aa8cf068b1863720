use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use thiserror::Error;

use crate::config::KafkaConfig;
use crate::domain::errors::EventPublisherError;
use crate::domain::events::DomainEvent;
use crate::domain::events::EventPublisher;
use crate::outbound::events::messages::EventMessage;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Kafka send timed out: {0}")]
    Timeout(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),
}

impl From<KafkaProducerError> for EventPublisherError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SerializationError(msg) => {
                EventPublisherError::SerializationFailed(msg)
            }
            KafkaProducerError::SendError(msg) => EventPublisherError::PublishFailed(msg),
            KafkaProducerError::Timeout(msg) => EventPublisherError::Timeout(msg),
        }
    }
}

/// Publishes domain events to one topic per event type, keyed by user id.
pub struct KafkaEventProducer {
    producer: FutureProducer,
    timeout: Duration,
}

impl KafkaEventProducer {
    /// Create a new Kafka event producer with "at least once" delivery semantics
    ///
    /// # Arguments
    /// * `config` - Kafka connection settings
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: Prevents duplicate messages during retries
    /// - `message.timeout.ms=5000`: Auth requests never wait long on the broker
    pub fn new(config: &KafkaConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(
            "Initializing Kafka producer for auth events: brokers={}",
            &config.brokers
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "5000")
            .set("queue.buffering.max.messages", "10000")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "3")
            .set("max.in.flight.requests.per.connection", "5")
            .set("retry.backoff.ms", "100")
            .create()?;

        tracing::info!("Kafka producer initialized successfully");

        Ok(Self {
            producer,
            timeout: Duration::from_secs(5),
        })
    }

    async fn send(&self, topic: &str, key: &str, payload: &str) -> Result<(), KafkaProducerError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|_| {
                tracing::debug!(topic, user_id = key, "Event published");
            })
            .map_err(|(err, _)| match err {
                rdkafka::error::KafkaError::MessageProduction(
                    rdkafka::types::RDKafkaErrorCode::MessageTimedOut,
                ) => KafkaProducerError::Timeout(err.to_string()),
                other => KafkaProducerError::SendError(other.to_string()),
            })
    }
}

#[async_trait]
impl EventPublisher for KafkaEventProducer {
    async fn publish(&self, event: &DomainEvent) -> Result<(), EventPublisherError> {
        let message = EventMessage::from(event);
        let payload = serde_json::to_string(&message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        // Partition by user id so one user's events stay ordered
        let key = event.user_id().to_string();

        self.send(event.event_type(), &key, &payload)
            .await
            .map_err(|e| {
                tracing::error!(
                    event_type = event.event_type(),
                    user_id = %key,
                    "Failed to publish event to Kafka: {}",
                    e
                );
                e.into()
            })
    }
}
