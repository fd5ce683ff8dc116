//! Background worker that persists queued click events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

const MAX_RETRIES: usize = 3;

/// Consumes click events until every sender is dropped.
///
/// Up to `concurrency` events are persisted at the same time. Transient store
/// errors are retried with exponential backoff; a click for a link that no
/// longer exists is discarded immediately. Once the channel closes the worker
/// waits for in-flight inserts before returning, so a graceful shutdown
/// drains the queue.
pub async fn run_click_worker<R>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<R>,
    concurrency: usize,
) where
    R: ClickRepository + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let repository = repository.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            persist_click(repository.as_ref(), event).await;
        });

        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}

    info!("Click worker stopped");
}

async fn persist_click<R>(repository: &R, event: ClickEvent)
where
    R: ClickRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::spawn(
        strategy,
        || repository.record(event.to_new_click()),
        |e: &AppError| {
            if e.is_transient() {
                warn!(link_id = event.link_id, error = %e, "Retrying click insert");
            }
            e.is_transient()
        },
    )
    .await;

    match result {
        Ok(click) => {
            metrics::counter!("clicks_recorded_total").increment(1);
            debug!(click_id = click.id, link_id = click.link_id, "Click recorded");
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            error!(link_id = event.link_id, error = %e, "Failed to record click");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::click_event::ClientInfo;
    use crate::domain::entities::Click;
    use crate::domain::repositories::MockClickRepository;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(link_id: i64, device: Option<&str>) -> ClickEvent {
        ClickEvent::new(
            link_id,
            ClientInfo {
                device: device.map(str::to_string),
                ..ClientInfo::default()
            },
            Utc::now(),
        )
    }

    fn click_from(new_click: crate::domain::entities::NewClick) -> Click {
        Click {
            id: 1,
            link_id: new_click.link_id,
            ip: new_click.ip,
            user_agent: new_click.user_agent,
            device: new_click.device,
            browser: new_click.browser,
            created_at: new_click.created_at,
        }
    }

    #[tokio::test]
    async fn test_worker_records_every_event() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo
            .expect_record()
            .times(3)
            .returning(|new_click| Ok(click_from(new_click)));

        let (tx, rx) = mpsc::channel(10);
        for id in 1..=3 {
            tx.send(event(id, Some("mobile"))).await.unwrap();
        }
        drop(tx);

        run_click_worker(rx, Arc::new(mock_repo), 2).await;
    }

    #[tokio::test]
    async fn test_worker_passes_event_fields() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo
            .expect_record()
            .withf(|c| c.link_id == 9 && c.device.as_deref() == Some("mobile"))
            .times(1)
            .returning(|new_click| Ok(click_from(new_click)));

        let (tx, rx) = mpsc::channel(10);
        tx.send(event(9, Some("mobile"))).await.unwrap();
        drop(tx);

        run_click_worker(rx, Arc::new(mock_repo), 1).await;
    }

    #[tokio::test]
    async fn test_worker_retries_transient_errors() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let mut mock_repo = MockClickRepository::new();
        mock_repo.expect_record().times(2).returning(move |new_click| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::internal("connection reset", json!({})))
            } else {
                Ok(click_from(new_click))
            }
        });

        let (tx, rx) = mpsc::channel(10);
        tx.send(event(1, None)).await.unwrap();
        drop(tx);

        run_click_worker(rx, Arc::new(mock_repo), 1).await;

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_worker_does_not_retry_missing_link() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo
            .expect_record()
            .times(1)
            .returning(|_| Err(AppError::bad_request("Link does not exist", json!({}))));

        let (tx, rx) = mpsc::channel(10);
        tx.send(event(404, None)).await.unwrap();
        drop(tx);

        run_click_worker(rx, Arc::new(mock_repo), 1).await;
    }

    #[tokio::test]
    async fn test_worker_gives_up_after_max_retries() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo
            .expect_record()
            .times(MAX_RETRIES + 1)
            .returning(|_| Err(AppError::internal("down", json!({}))));

        let (tx, rx) = mpsc::channel(10);
        tx.send(event(1, None)).await.unwrap();
        drop(tx);

        run_click_worker(rx, Arc::new(mock_repo), 1).await;
    }
}
