//! Kafka notification publisher implementation.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use tracing::{debug, info};

use crate::errors::PublishError;
use crate::interfaces::NotificationPublisher;
use review_ingest_shared::NotificationPayload;

/// Delivery timeout for one send.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Flush timeout applied on close.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Publisher emitting completion notifications to a Kafka topic.
///
/// Delivery is at-least-once: the send awaits broker acknowledgement, and a
/// send that fails after the delivery timeout loses that notification.
/// Messages are keyed by place_id so one place's notifications stay on one
/// partition.
pub struct KafkaPublisher {
    producer: FutureProducer,
    topic: String,
}

impl KafkaPublisher {
    /// Create a publisher for the given brokers and topic.
    ///
    /// # Arguments
    ///
    /// * `brokers` - Kafka broker addresses (comma-separated)
    /// * `topic` - Topic notifications are published to
    ///
    /// # Returns
    ///
    /// * `Ok(KafkaPublisher)` - A new publisher instance
    /// * `Err(PublishError)` - If producer creation fails
    pub fn new(brokers: &str, topic: &str) -> Result<Self, PublishError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("client.id", "review-ingest")
            .set("compression.type", "zstd")
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| PublishError::build(e.to_string()))?;

        info!(brokers = %brokers, topic = %topic, "Created Kafka publisher");

        Ok(Self {
            producer,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl NotificationPublisher for KafkaPublisher {
    async fn publish(&self, payload: &NotificationPayload) -> Result<(), PublishError> {
        let body = serde_json::to_vec(payload)?;

        let record = FutureRecord::to(&self.topic)
            .key(&payload.place_id)
            .payload(&body);

        match self.producer.send(record, SEND_TIMEOUT).await {
            Ok(_) => {
                debug!(place_id = %payload.place_id, "Published notification");
                Ok(())
            }
            Err((e, _)) => Err(PublishError::send(e.to_string())),
        }
    }

    async fn close(&self) -> Result<(), PublishError> {
        self.producer
            .flush(CLOSE_TIMEOUT)
            .map_err(|e| PublishError::close(e.to_string()))?;

        info!("Closed Kafka publisher");
        Ok(())
    }
}
