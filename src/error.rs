//! Error types for the scan worker.

/// Top-level error type for the worker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Broker connection and consumption errors.
///
/// Only the initial connect is fatal; everything else is logged and the
/// consume loop carries on with a fresh connection.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Failed to connect to broker at {host}: {reason}")]
    Connect { host: String, reason: String },

    #[error("Failed to open channel: {0}")]
    Channel(String),

    #[error("Failed to declare queue {queue}: {reason}")]
    Declare { queue: String, reason: String },

    #[error("Failed to start consumer on {queue}: {reason}")]
    Consume { queue: String, reason: String },
}

/// Task decode errors — these messages are rejected, never retried.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Undecodable task body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unknown task name: {0}")]
    UnknownTask(String),

    #[error("Bad arguments for task {task}: {reason}")]
    BadArguments { task: String, reason: String },
}

/// Result type alias for the worker.
pub type Result<T> = std::result::Result<T, Error>;
