//! Background consumer of the click queue.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::application::services::ClickProcessor;
use crate::domain::click_context::PendingClick;

/// Drains the click queue until every sender is gone.
///
/// At most `concurrency` clicks are processed at once. Failures are already
/// counted and logged by [`ClickProcessor::process`]; a panicking task is
/// logged here and does not stop the worker. In-flight clicks are awaited
/// before returning, so dropping the last [`super::services::ClickRecorder`]
/// lets the worker finish cleanly on shutdown.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<PendingClick>,
    processor: Arc<ClickProcessor>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    tracing::info!(concurrency, "Click worker started");

    while let Some(pending) = rx.recv().await {
        let permit = match Arc::clone(&permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        let processor = Arc::clone(&processor);
        tasks.spawn(async move {
            let _permit = permit;
            let _ = processor.process(pending).await;
        });

        while let Some(joined) = tasks.try_join_next() {
            log_join_error(joined);
        }
    }

    while let Some(joined) = tasks.join_next().await {
        log_join_error(joined);
    }

    tracing::info!("Click worker stopped");
}

fn log_join_error(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "Click task panicked");
    }
}
