//! Worker run loop — receive, dispatch, acknowledge.
//!
//! A delivery is acknowledged exactly once, and only after its handler has
//! returned; a worker crash mid-task therefore redelivers rather than
//! drops. Undecodable bodies and unknown task names are rejected without
//! requeue — with a dead-letter exchange configured on the queue they are
//! preserved there, otherwise the broker discards them.

use std::time::Duration;

use lapin::message::Delivery;
use lapin::options::{BasicAckOptions, BasicRejectOptions};
use tracing::{info, warn};

use crate::pipeline::ScanHandler;
use crate::queue::{QueueConsumer, ScanTask};

/// Pause after a cycle that yielded nothing (idle queue or broker fault).
const IDLE_BACKOFF: Duration = Duration::from_secs(1);

/// Single-consumer scan worker: one message in flight at a time.
pub struct Worker {
    consumer: QueueConsumer,
    handler: ScanHandler,
}

impl Worker {
    pub fn new(consumer: QueueConsumer, handler: ScanHandler) -> Self {
        Self { consumer, handler }
    }

    /// Drive the consume loop until the process is stopped.
    pub async fn run(&mut self) {
        loop {
            let Some(delivery) = self.consumer.recv().await else {
                tokio::time::sleep(IDLE_BACKOFF).await;
                continue;
            };
            self.handle(delivery).await;
        }
    }

    async fn handle(&self, delivery: Delivery) {
        match ScanTask::decode(&delivery.data) {
            Ok(ScanTask::ScanMessage { text, info }) => {
                let outcome = self.handler.scan_message(&text, &info).await;
                info!(
                    matches = outcome.total_matches(),
                    files_scanned = outcome.files_scanned,
                    channel = %info.channel,
                    "Scan task complete"
                );

                if let Err(e) = delivery.acker.ack(BasicAckOptions::default()).await {
                    warn!(error = %e, "Failed to ack delivery");
                }
            }
            Err(e) => {
                warn!(error = %e, "Rejecting undecodable task message");
                if let Err(e) = delivery
                    .acker
                    .reject(BasicRejectOptions { requeue: false })
                    .await
                {
                    warn!(error = %e, "Failed to reject delivery");
                }
            }
        }
    }

    /// Release the broker connection. Safe to call more than once.
    pub async fn close(&mut self) {
        self.consumer.close().await;
    }
}
