//! Kafka-backed notification publishing.

mod publisher;

pub use publisher::KafkaPublisher;
