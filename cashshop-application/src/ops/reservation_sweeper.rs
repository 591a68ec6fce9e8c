use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use cashshop_domain::ReservationCache;

use crate::{AppState, Metrics};

/// Purges expired reservations every `interval` until `shutdown` flips to true
/// or its sender goes away.
pub async fn sweep_every(
    cache: Arc<ReservationCache>,
    metrics: Arc<Metrics>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let expired = cache.sweep();
                if expired > 0 {
                    metrics.record_reservations_expired(expired);
                    info!("released {} expired item reservations", expired);
                } else {
                    debug!("reservation sweep found nothing to release");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    debug!("reservation sweeper stopping");
                    return;
                }
            }
        }
    }
}

pub fn spawn_reservation_sweeper(
    state: &AppState,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(sweep_every(
        state.reservations.clone(),
        state.metrics.clone(),
        Duration::from_secs(state.config.reservation_sweep_seconds),
        shutdown,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashshop_domain::{CharacterId, ItemId};

    #[tokio::test]
    async fn sweeper_releases_expired_reservations_and_stops_on_shutdown() {
        let cache = Arc::new(ReservationCache::new(Duration::from_millis(10)));
        let metrics = Arc::new(Metrics::default());
        assert!(cache.reserve(ItemId(1), CharacterId(1)));
        assert!(cache.reserve(ItemId(2), CharacterId(1)));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(sweep_every(
            cache.clone(),
            metrics.clone(),
            Duration::from_millis(20),
            shutdown_rx,
        ));

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.len(), 0);
        assert_eq!(metrics.snapshot().reservations_expired, 2);

        shutdown_tx.send(true).expect("signal shutdown");
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper stopped")
            .expect("sweeper task");
    }

    #[tokio::test]
    async fn live_reservations_survive_a_sweep() {
        let cache = Arc::new(ReservationCache::new(Duration::from_secs(300)));
        let metrics = Arc::new(Metrics::default());
        assert!(cache.reserve(ItemId(1), CharacterId(1)));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(sweep_every(
            cache.clone(),
            metrics.clone(),
            Duration::from_millis(10),
            shutdown_rx,
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(shutdown_tx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper stopped")
            .expect("sweeper task");

        assert!(cache.is_reserved(ItemId(1)));
        assert_eq!(metrics.snapshot().reservations_expired, 0);
    }
}
