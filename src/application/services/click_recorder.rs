//! Decoupled click recording.
//!
//! The redirect path only ever touches [`ClickRecorder`], which hands a
//! [`PendingClick`] to a bounded queue without waiting. The queue is drained by
//! [`crate::application::click_worker::run_click_worker`], which runs each
//! pending click through [`ClickProcessor`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::application::services::enricher::EventEnricher;
use crate::domain::click_context::{ClickContext, PendingClick};
use crate::domain::entities::{Click, NewClick};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Retries after the first failed write of a click event.
pub const MAX_PERSIST_RETRIES: usize = 3;

/// Non-blocking handle that queues clicks for background processing.
#[derive(Clone)]
pub struct ClickRecorder {
    sender: mpsc::Sender<PendingClick>,
}

impl ClickRecorder {
    /// Creates a recorder and the receiving end of its queue.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PendingClick>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Queues a click for `link_id` without waiting.
    ///
    /// A full or closed queue drops the click; the drop is counted and logged
    /// but never reported to the caller as an error. Returns whether the click
    /// was queued.
    pub fn record(&self, link_id: i64, context: ClickContext) -> bool {
        match self.sender.try_send(PendingClick::new(link_id, context)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                metrics::counter!("clicks_dropped_total", "reason" => "queue_full").increment(1);
                tracing::warn!(link_id, "Click queue full, dropping click");
                false
            }
            Err(TrySendError::Closed(_)) => {
                metrics::counter!("clicks_dropped_total", "reason" => "queue_closed").increment(1);
                tracing::warn!(link_id, "Click queue closed, dropping click");
                false
            }
        }
    }

    /// True once the worker side has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots currently left in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

/// Enriches and persists one queued click.
pub struct ClickProcessor {
    enricher: Arc<EventEnricher>,
    clicks: Arc<dyn ClickRepository>,
    links: Arc<dyn LinkRepository>,
}

impl ClickProcessor {
    pub fn new(
        enricher: Arc<EventEnricher>,
        clicks: Arc<dyn ClickRepository>,
        links: Arc<dyn LinkRepository>,
    ) -> Self {
        Self {
            enricher,
            clicks,
            links,
        }
    }

    /// Builds the click event, stores it, then bumps the link's counter.
    ///
    /// Storage writes are retried with jittered exponential backoff, but only
    /// for internal errors; a missing link fails immediately. The counter
    /// increment is best-effort and its failure does not fail the click.
    ///
    /// # Errors
    ///
    /// Returns the last storage error once retries are spent.
    pub async fn process(&self, pending: PendingClick) -> Result<Click, AppError> {
        let fields = self.enricher.enrich(&pending.context).await;

        let new_click = NewClick {
            link_id: pending.link_id,
            ip_address: pending.context.ip_address,
            user_agent: pending.context.user_agent,
            referrer: pending.context.referrer,
            device_type: fields.device_type,
            country: fields.country,
            city: fields.city,
            clicked_at: pending.clicked_at,
        };

        let strategy = ExponentialBackoff::from_millis(2)
            .factor(25)
            .max_delay(Duration::from_secs(1))
            .map(jitter)
            .take(MAX_PERSIST_RETRIES);

        let result = RetryIf::spawn(
            strategy,
            || {
                let clicks = Arc::clone(&self.clicks);
                let click = new_click.clone();
                async move { clicks.record(click).await }
            },
            |e: &AppError| matches!(e, AppError::Internal { .. }),
        )
        .await;

        let click = match result {
            Ok(click) => click,
            Err(e) => {
                metrics::counter!("clicks_failed_total").increment(1);
                tracing::error!(link_id = new_click.link_id, error = %e, "Failed to record click");
                return Err(e);
            }
        };

        metrics::counter!("clicks_recorded_total").increment(1);
        tracing::debug!(
            link_id = click.link_id,
            click_id = click.id,
            device = %click.device_type,
            country = click.country_label(),
            "Click recorded"
        );

        if let Err(e) = self.links.increment_click_count(click.link_id).await {
            metrics::counter!("click_count_increment_failed_total").increment(1);
            tracing::warn!(link_id = click.link_id, error = %e, "Failed to increment click count");
        }

        Ok(click)
    }
}
