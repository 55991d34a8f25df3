//! Kitchen dashboard notification fan-out.

use domain::Order;
use tokio::sync::broadcast;

/// Name of the single channel order snapshots are published on.
pub const KITCHEN_TOPIC: &str = "kitchen";

/// Fire-and-forget fan-out of order snapshots to kitchen dashboard clients.
///
/// A thin wrapper over a `tokio::sync::broadcast` channel, constructed once
/// at startup and handed to the workflow engine — deliberately not a
/// process-wide singleton so tests can build their own. There is no delivery
/// guarantee and no replay: a subscriber joining after a publish only sees
/// future snapshots, and a slow subscriber that overflows the channel
/// capacity drops the oldest messages.
#[derive(Debug, Clone)]
pub struct KitchenBroadcaster {
    tx: broadcast::Sender<Order>,
}

impl KitchenBroadcaster {
    /// Creates a broadcaster buffering up to `capacity` snapshots per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publishes an order snapshot to every current subscriber.
    ///
    /// Never blocks on subscriber delivery speed; a send with no subscribers
    /// is not an error.
    pub fn publish(&self, order: &Order) {
        tracing::debug!(topic = KITCHEN_TOPIC, order_id = %order.id(), status = %order.status(), "publishing order snapshot");
        let _ = self.tx.send(order.clone());
    }

    /// Registers a new dashboard subscriber.
    pub fn subscribe(&self) -> broadcast::Receiver<Order> {
        self.tx.subscribe()
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for KitchenBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Money, Order, OrderItem, Product, ProductKind};

    fn some_order() -> Order {
        let product = Product::new(
            "Espresso",
            Money::from_cents(20000),
            10,
            ProductKind::Drink {
                cold: false,
                size: None,
            },
        )
        .unwrap();
        Order::new(None, None, vec![OrderItem::snapshot_of(&product, 1, None)]).unwrap()
    }

    #[tokio::test]
    async fn test_subscriber_receives_publishes_in_order() {
        let broadcaster = KitchenBroadcaster::new(16);
        let mut rx = broadcaster.subscribe();

        let first = some_order();
        let second = some_order();
        broadcaster.publish(&first);
        broadcaster.publish(&second);

        assert_eq!(rx.recv().await.unwrap().id(), first.id());
        assert_eq!(rx.recv().await.unwrap().id(), second.id());
    }

    #[tokio::test]
    async fn test_late_joiner_misses_earlier_publishes() {
        let broadcaster = KitchenBroadcaster::new(16);
        let mut early = broadcaster.subscribe();

        broadcaster.publish(&some_order());

        let mut late = broadcaster.subscribe();
        let seen = some_order();
        broadcaster.publish(&seen);

        // The early subscriber sees both, the late one only the second.
        assert!(early.recv().await.is_ok());
        assert_eq!(early.recv().await.unwrap().id(), seen.id());
        assert_eq!(late.recv().await.unwrap().id(), seen.id());
        assert!(late.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_silent() {
        let broadcaster = KitchenBroadcaster::new(16);
        assert_eq!(broadcaster.subscriber_count(), 0);
        broadcaster.publish(&some_order());
    }
}
