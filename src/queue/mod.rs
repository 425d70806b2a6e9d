//! Durable-queue consumption: connection lifecycle and task decoding.

pub mod consumer;
pub mod task;

pub use consumer::QueueConsumer;
pub use task::{ScanTask, TaskMessage};
