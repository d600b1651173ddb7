use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

pub const KEEP_ALIVE_EVENT: &str = "keep-alive";
const KEEP_ALIVE_DATA: &str = "ping";

/// Identifies one registered subscriber. Opaque; a new subscription always
/// gets a fresh handle — a pruned subscriber is never re-registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationHandle(Uuid);

/// Fan-out of domain events to all subscribed SSE clients.
///
/// State is exactly "who is currently registered": no replay, no ack, no
/// queue of undelivered frames. Delivery is best-effort and at-most-once; a
/// subscriber whose channel is closed or full is pruned on the next attempt
/// and never blocks delivery to the others.
pub struct EventBroadcaster {
    subscribers: DashMap<Uuid, mpsc::Sender<String>>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    /// Add a subscriber sink. Never fails.
    pub fn register(&self, sink: mpsc::Sender<String>) -> RegistrationHandle {
        let id = Uuid::new_v4();
        self.subscribers.insert(id, sink);
        debug!(subscriber = %id, "subscriber registered");
        RegistrationHandle(id)
    }

    /// Remove a subscriber. Silent no-op when the handle is already gone —
    /// disconnect handling and write-failure pruning race benignly.
    pub fn deregister(&self, handle: RegistrationHandle) {
        if self.subscribers.remove(&handle.0).is_some() {
            debug!(subscriber = %handle.0, "subscriber deregistered");
        }
    }

    /// Serialize `(event, payload)` once and deliver the frame to every
    /// current subscriber, in no particular order. Failed deliveries prune
    /// the subscriber and are logged, never surfaced to the caller.
    pub fn publish(&self, event: &str, payload: &impl Serialize) {
        let frame = format_frame(event, payload);

        // Collect failures first; removing while iterating a shard deadlocks.
        let mut dead = Vec::new();
        for entry in self.subscribers.iter() {
            if let Err(e) = entry.value().try_send(frame.clone()) {
                warn!(subscriber = %entry.key(), error = %e, "dropping subscriber after failed delivery");
                dead.push(*entry.key());
            }
        }
        for id in dead {
            self.subscribers.remove(&id);
        }
        debug!(event, subscribers = self.subscribers.len(), "event published");
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// One text event-stream frame, terminated by a blank line.
fn raw_frame(event: &str, data: &str) -> String {
    format!("event: {event}\ndata: {data}\n\n")
}

/// Frame carrying a JSON payload.
pub fn format_frame(event: &str, payload: &impl Serialize) -> String {
    let data = serde_json::to_value(payload).unwrap_or(Value::Null);
    raw_frame(event, &data.to_string())
}

pub fn keep_alive_frame() -> String {
    raw_frame(KEEP_ALIVE_EVENT, KEEP_ALIVE_DATA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn frame_format_matches_event_stream_wire() {
        let frame = format_frame("new_order", &json!({"id": 1}));
        assert_eq!(frame, "event: new_order\ndata: {\"id\":1}\n\n");
    }

    #[test]
    fn keep_alive_frame_is_fixed() {
        assert_eq!(keep_alive_frame(), "event: keep-alive\ndata: ping\n\n");
    }

    #[test]
    fn publish_reaches_every_registered_subscriber() {
        let broadcaster = EventBroadcaster::new();
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        let handle_a = broadcaster.register(tx_a);
        broadcaster.register(tx_b);

        broadcaster.publish("new_order", &json!({"id": 1}));
        let expected = "event: new_order\ndata: {\"id\":1}\n\n";
        assert_eq!(rx_a.try_recv().unwrap(), expected);
        assert_eq!(rx_b.try_recv().unwrap(), expected);

        // after A leaves, only B is reached
        broadcaster.deregister(handle_a);
        broadcaster.publish("new_order", &json!({"id": 2}));
        assert!(rx_a.try_recv().is_err());
        assert_eq!(
            rx_b.try_recv().unwrap(),
            "event: new_order\ndata: {\"id\":2}\n\n"
        );
    }

    #[test]
    fn closed_subscriber_is_pruned_on_publish() {
        let broadcaster = EventBroadcaster::new();
        let (tx, rx) = mpsc::channel(8);
        broadcaster.register(tx);
        drop(rx);

        broadcaster.publish("x", &json!({}));
        assert_eq!(broadcaster.subscriber_count(), 0);

        // a later publish has nobody left to fail on
        broadcaster.publish("x", &json!({}));
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[test]
    fn full_buffer_counts_as_delivery_failure() {
        let broadcaster = EventBroadcaster::new();
        let (tx, mut rx) = mpsc::channel(1);
        broadcaster.register(tx);

        broadcaster.publish("a", &json!(1));
        broadcaster.publish("b", &json!(2));
        assert_eq!(broadcaster.subscriber_count(), 0);

        // the frame accepted before the overflow is still readable
        assert_eq!(rx.try_recv().unwrap(), "event: a\ndata: 1\n\n");
    }

    #[test]
    fn one_failing_subscriber_never_blocks_the_rest() {
        let broadcaster = EventBroadcaster::new();
        let (tx_dead, rx_dead) = mpsc::channel(8);
        let (tx_live, mut rx_live) = mpsc::channel(8);
        broadcaster.register(tx_dead);
        broadcaster.register(tx_live);
        drop(rx_dead);

        broadcaster.publish("new_order", &json!({"id": 7}));
        assert_eq!(
            rx_live.try_recv().unwrap(),
            "event: new_order\ndata: {\"id\":7}\n\n"
        );
        assert_eq!(broadcaster.subscriber_count(), 1);
    }

    #[test]
    fn deregister_unknown_handle_is_a_noop() {
        let broadcaster = EventBroadcaster::new();
        let (tx, _rx) = mpsc::channel(8);
        let handle = broadcaster.register(tx);
        broadcaster.deregister(handle);
        broadcaster.deregister(handle);
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[test]
    fn concurrent_publishes_with_churn_deliver_everything() {
        let broadcaster = Arc::new(EventBroadcaster::new());
        let (tx, mut rx) = mpsc::channel(1024);
        broadcaster.register(tx);

        let mut workers = Vec::new();
        for w in 0..2 {
            let b = Arc::clone(&broadcaster);
            workers.push(std::thread::spawn(move || {
                for i in 0..100 {
                    b.publish("n", &json!({ "w": w, "i": i }));
                }
            }));
        }
        // churn the registry while publishes are in flight
        let churn = {
            let b = Arc::clone(&broadcaster);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let (tx, _rx) = mpsc::channel(1);
                    let h = b.register(tx);
                    b.deregister(h);
                }
            })
        };
        for worker in workers {
            worker.join().unwrap();
        }
        churn.join().unwrap();

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 200);
        assert_eq!(broadcaster.subscriber_count(), 1);
    }
}
