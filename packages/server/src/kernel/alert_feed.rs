//! In-process pub/sub feed for freshly delivered alerts.
//!
//! Gives UI stream endpoints a live push channel per user, on top of the
//! persisted alert store. Publishing is fire-and-forget: a user with no
//! open stream simply gets nothing here and reads the store later.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::common::UserId;
use crate::domains::notifications::models::Alert;

/// User-keyed broadcast hub for delivered alerts.
///
/// Thread-safe, cloneable.
#[derive(Clone)]
pub struct AlertFeed {
    channels: Arc<RwLock<HashMap<UserId, broadcast::Sender<Alert>>>>,
    capacity: usize,
}

impl AlertFeed {
    /// Create a new feed with default capacity (256 alerts per user channel).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a new feed with the given per-user channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    /// Push an alert to a user's live stream. No-op if nobody is listening.
    pub async fn publish(&self, user_id: UserId, alert: &Alert) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(&user_id) {
            // Ignore send errors (no active receivers)
            let _ = tx.send(alert.clone());
        }
    }

    /// Subscribe to a user's alerts. Creates the channel if it doesn't exist.
    pub async fn subscribe(&self, user_id: UserId) -> broadcast::Receiver<Alert> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }

    /// Remove channels with zero subscribers (housekeeping).
    pub async fn cleanup(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
    }
}

impl Default for AlertFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::AlertId;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_alert(user_id: UserId) -> Alert {
        Alert {
            id: AlertId::new(),
            user_id,
            event_id: Uuid::new_v4(),
            dedup_key: "k".to_string(),
            title: "t".to_string(),
            body: "b".to_string(),
            severity: "info".to_string(),
            action_url: "https://app.gridsense.example/assets/x".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_publish_subscribe_roundtrip() {
        let feed = AlertFeed::new();
        let user = UserId::new();
        let mut rx = feed.subscribe(user).await;

        let alert = sample_alert(user);
        feed.publish(user, &alert).await;

        let received = rx.recv().await.unwrap();
        assert_eq!(received.dedup_key, alert.dedup_key);
    }

    #[tokio::test]
    async fn test_publish_no_subscribers_is_noop() {
        let feed = AlertFeed::new();
        let user = UserId::new();
        // Should not panic
        feed.publish(user, &sample_alert(user)).await;
    }

    #[tokio::test]
    async fn test_publish_does_not_cross_users() {
        let feed = AlertFeed::new();
        let listener = UserId::new();
        let other = UserId::new();
        let mut rx = feed.subscribe(listener).await;

        feed.publish(other, &sample_alert(other)).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscriber_is_woken_by_publish() {
        let feed = AlertFeed::new();
        let user = UserId::new();
        let rx = feed.subscribe(user).await;

        let mut recv = tokio_test::task::spawn(async move {
            let mut rx = rx;
            rx.recv().await
        });
        tokio_test::assert_pending!(recv.poll());

        let alert = sample_alert(user);
        feed.publish(user, &alert).await;

        assert!(recv.is_woken());
        let received = tokio_test::assert_ready!(recv.poll()).unwrap();
        assert_eq!(received.id, alert.id);
    }

    #[tokio::test]
    async fn test_cleanup_removes_empty_channels() {
        let feed = AlertFeed::new();
        let user = UserId::new();
        let rx = feed.subscribe(user).await;

        assert_eq!(feed.channels.read().await.len(), 1);

        drop(rx);
        feed.cleanup().await;

        assert_eq!(feed.channels.read().await.len(), 0);
    }
}
