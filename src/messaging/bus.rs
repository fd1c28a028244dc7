use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
/// Event bus for pub/sub messaging
///
/// Stand-in for the host's event source: producers publish, the audio
/// adapter subscribes, and outbound notifications flow back the same way.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use super::events::Event;

/// Subscriber ID for tracking subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

/// Event subscriber
struct Subscriber {
    id: SubscriberId,
    sender: Sender<Event>,
}

/// Event bus for broadcasting events to subscribers
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    next_id: Arc<AtomicUsize>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Subscribe to events, returns a receiver and subscription ID
    pub fn subscribe(&self) -> (Receiver<Event>, SubscriberId) {
        let (tx, rx) = unbounded();

        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.write().push(Subscriber { id, sender: tx });

        (rx, id)
    }

    /// Unsubscribe from events
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.write().retain(|s| s.id != id);
    }

    /// Publish an event to all subscribers, returns how many received it
    ///
    /// Subscribers whose receiver was dropped are pruned.
    pub fn publish(&self, event: Event) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for subscriber in self.subscribers.read().iter() {
            match subscriber.sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Disconnected(_)) => closed.push(subscriber.id),
                // Unbounded channels never fill up
                Err(TrySendError::Full(_)) => {}
            }
        }

        if !closed.is_empty() {
            self.subscribers.write().retain(|s| !closed.contains(&s.id));
        }
        delivered
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Handle that does not keep the bus, or its subscriber channels, alive
    pub fn downgrade(&self) -> WeakEventBus {
        WeakEventBus {
            subscribers: Arc::downgrade(&self.subscribers),
            next_id: Arc::downgrade(&self.next_id),
        }
    }
}

/// Non-owning reference to an `EventBus`.
///
/// Once every `EventBus` clone is gone, subscriber receivers disconnect.
#[derive(Clone)]
pub struct WeakEventBus {
    subscribers: Weak<RwLock<Vec<Subscriber>>>,
    next_id: Weak<AtomicUsize>,
}

impl WeakEventBus {
    pub fn upgrade(&self) -> Option<EventBus> {
        Some(EventBus {
            subscribers: self.subscribers.upgrade()?,
            next_id: self.next_id.upgrade()?,
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bus_unsubscribe() {
        let bus = EventBus::new();
        let (_rx, id) = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.unsubscribe(id);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_bus_publish() {
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();

        bus.publish(Event::PlaySound {
            name: "victoria".to_string(),
        });

        match rx.try_recv().unwrap() {
            Event::PlaySound { name } => assert_eq!(name, "victoria"),
            other => panic!("Wrong event type received: {:?}", other),
        }
    }

    #[test]
    fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new();
        let (rx1, _id1) = bus.subscribe();
        let (rx2, _id2) = bus.subscribe();

        bus.publish(Event::Shutdown);

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_publish_after_receiver_dropped() {
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();
        drop(rx);

        assert_eq!(bus.publish(Event::ToggleMute), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_bus_clone() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let (_rx, id) = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1); // Shared state

        bus2.unsubscribe(id);
        assert_eq!(bus1.subscriber_count(), 0);
    }

    #[test]
    fn test_weak_bus_does_not_keep_subscribers_open() {
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();
        let weak = bus.downgrade();
        assert!(weak.upgrade().is_some());

        drop(bus);
        assert!(weak.upgrade().is_none());
        assert_eq!(
            rx.recv_timeout(std::time::Duration::from_millis(10)),
            Err(crossbeam_channel::RecvTimeoutError::Disconnected)
        );
    }
}
