//! Simulated "new product" announcements.
//!
//! The backend has no push channel yet, so the feed fabricates an event on a
//! fixed period until it is cancelled.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub const NEW_PRODUCT_EVENT: &str = "new_product";

const FEED_BUFFER: usize = 16;
const MAX_PRICE: u64 = 10_000_000;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductNotification {
    pub id: Uuid,
    pub name: String,
    pub price: u64,
    pub timestamp: DateTime<Utc>,
}

impl ProductNotification {
    pub fn random() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("New Product {}", rand::random::<u32>() % 1000),
            price: rand::random::<u64>() % MAX_PRICE,
            timestamp: Utc::now(),
        }
    }

    pub fn kind(&self) -> &'static str {
        NEW_PRODUCT_EVENT
    }
}

/// Emits one notification per `period` until `cancel` fires or the receiver
/// is dropped. The first one arrives after a full period.
pub fn spawn_mock_feed(
    period: Duration,
    cancel: CancellationToken,
) -> mpsc::Receiver<ProductNotification> {
    let (tx, rx) = mpsc::channel(FEED_BUFFER);
    let period = period.max(Duration::from_millis(1));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    log::debug!("Notification feed stopped");
                    break;
                }
                _ = interval.tick() => {
                    let notification = ProductNotification::random();
                    log::debug!("Announcing {}", notification.name);
                    if tx.send(notification).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn emits_once_per_period_until_cancelled() {
        let cancel = CancellationToken::new();
        let mut feed = spawn_mock_feed(Duration::from_secs(30), cancel.clone());

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(feed.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let first = feed.try_recv().unwrap();
        assert!(first.name.starts_with("New Product "));
        assert!(first.price < MAX_PRICE);
        assert_eq!(first.kind(), "new_product");

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(feed.try_recv().is_ok());

        cancel.cancel();
        assert!(feed.recv().await.is_none());
    }
}
