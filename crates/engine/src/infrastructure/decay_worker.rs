//! Background influence decay.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::stores::TerritoryStore;

/// Lower every territory's influence by `points` once per `interval` until
/// `cancel` fires. The first tick runs one full interval after start.
pub async fn run_decay_worker(
    store: Arc<TerritoryStore>,
    interval: Duration,
    points: u8,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        points,
        "Starting influence decay worker"
    );

    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Influence decay worker shutting down");
                break;
            }
            _ = ticker.tick() => {
                let changed = store.decay_influence(points).await;
                tracing::debug!(changed, "Decay tick");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{cell, recording_repo, territory};

    #[tokio::test]
    async fn decays_on_each_tick_until_cancelled() {
        let (repo, _) = recording_repo();
        let store = Arc::new(TerritoryStore::new(repo));
        store
            .mutate(|index| {
                index.insert(territory("Axis", 0, 0));
                Ok::<_, ()>(())
            })
            .await
            .unwrap();

        let cancel = CancellationToken::new();
        let worker = tokio::spawn(run_decay_worker(
            Arc::clone(&store),
            Duration::from_millis(20),
            5,
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(150)).await;
        cancel.cancel();
        worker.await.unwrap();

        let after_cancel = store.get_territory(&cell(0, 0)).await.unwrap().influence();
        assert!(after_cancel < 50);
        assert_eq!(after_cancel % 5, 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            store.get_territory(&cell(0, 0)).await.unwrap().influence(),
            after_cancel
        );
    }

    #[tokio::test]
    async fn stops_immediately_when_already_cancelled() {
        let (repo, _) = recording_repo();
        let store = Arc::new(TerritoryStore::new(repo));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let finished = tokio::time::timeout(
            Duration::from_secs(1),
            run_decay_worker(store, Duration::from_secs(3600), 5, cancel),
        )
        .await;
        assert!(finished.is_ok());
    }
}
