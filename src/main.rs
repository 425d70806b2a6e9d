use std::sync::Arc;

use leakwatch::api::DlpApi;
use leakwatch::config::WorkerConfig;
use leakwatch::extract::FileProcessor;
use leakwatch::pipeline::ScanHandler;
use leakwatch::queue::QueueConsumer;
use leakwatch::worker::Worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = WorkerConfig::from_env()?;

    eprintln!("🔍 Leakwatch v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Queue: {} on {}:{}",
        config.queue.queue_name, config.queue.host, config.queue.port
    );
    eprintln!("   Pattern API: {}\n", config.api.base_url);

    let api = Arc::new(DlpApi::new(&config.api));
    let extractor = Arc::new(FileProcessor::new(config.bot_token.clone()));
    let handler = ScanHandler::new(
        Arc::clone(&api) as Arc<dyn leakwatch::pipeline::PatternSource>,
        extractor,
        Arc::clone(&api) as Arc<dyn leakwatch::pipeline::MatchSink>,
    );

    // Startup connect failures are fatal; mid-run drops reconnect inside
    // the loop.
    let consumer = QueueConsumer::connect(config.queue.clone()).await?;
    let mut worker = Worker::new(consumer, handler);

    tokio::select! {
        _ = worker.run() => {}
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nInterrupted, shutting down.");
        }
    }

    worker.close().await;
    Ok(())
}
