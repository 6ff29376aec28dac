use std::collections::HashMap;
use std::sync::Mutex;

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use serde_json::Value;

use crate::dao::ServerStatus;
use crate::focus::ComponentId;

/// Default inbound queue capacity per component.
const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Payload delivered between components.
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    /// A history entry was picked for the query bar.
    HistoryAccepted(String),
    /// The history modal was dismissed without a selection.
    HistoryDismissed,
    /// Key-dispatch ownership moved to another component.
    FocusChanged(ComponentId),
    /// The edit pipeline committed a document.
    DocumentSaved { db: String, coll: String, document: Value },
    /// Result of the latest health check.
    HealthChanged(Option<ServerStatus>),
}

/// `{event, sender}` as delivered to a subscriber's queue.
#[derive(Clone, Debug, PartialEq)]
pub struct EventMessage {
    pub sender: ComponentId,
    pub event: AppEvent,
}

struct Subscription {
    tx: Sender<EventMessage>,
    // Kept so a full queue can shed its oldest unread message.
    rx: Receiver<EventMessage>,
}

/// Publish/subscribe bus decoupling components. Each component owns exactly
/// one bounded inbound queue; send never blocks the sender. When a queue is
/// full the oldest unread message is dropped and the condition logged,
/// not treated as an error.
pub struct EventBus {
    capacity: usize,
    subscriptions: Mutex<HashMap<ComponentId, Subscription>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    /// Registers the component's inbound queue and returns its receiving
    /// end. Subscribing again replaces the previous queue; components
    /// subscribe once and live for the process lifetime.
    pub fn subscribe(&self, id: ComponentId) -> Receiver<EventMessage> {
        let (tx, rx) = channel::bounded(self.capacity);
        let mut subscriptions = self.subscriptions.lock().expect("bus poisoned");
        subscriptions.insert(
            id,
            Subscription {
                tx,
                rx: rx.clone(),
            },
        );
        rx
    }

    /// Fire-and-forget delivery to one component.
    pub fn send(&self, target: ComponentId, sender: ComponentId, event: AppEvent) {
        let subscriptions = self.subscriptions.lock().expect("bus poisoned");
        if let Some(subscription) = subscriptions.get(&target) {
            Self::deliver(target, subscription, EventMessage { sender, event });
        } else {
            tracing::debug!(target = %target, "event dropped, no subscriber");
        }
    }

    /// Fire-and-forget delivery to every subscriber except the sender.
    pub fn broadcast(&self, sender: ComponentId, event: AppEvent) {
        let subscriptions = self.subscriptions.lock().expect("bus poisoned");
        for (target, subscription) in subscriptions.iter() {
            if *target == sender {
                continue;
            }
            Self::deliver(
                *target,
                subscription,
                EventMessage {
                    sender,
                    event: event.clone(),
                },
            );
        }
    }

    fn deliver(target: ComponentId, subscription: &Subscription, message: EventMessage) {
        match subscription.tx.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(message)) => {
                // Shed the oldest unread message and retry once.
                let _ = subscription.rx.try_recv();
                tracing::warn!(target = %target, "event queue full, dropped oldest message");
                if subscription.tx.try_send(message).is_err() {
                    tracing::warn!(target = %target, "event dropped after shedding");
                }
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!(target = %target, "event dropped, subscriber gone");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_reaches_only_target() {
        let bus = EventBus::new();
        let query_bar = bus.subscribe(ComponentId::QueryBar);
        let header = bus.subscribe(ComponentId::Header);

        bus.send(
            ComponentId::QueryBar,
            ComponentId::HistoryModal,
            AppEvent::HistoryAccepted("{ name: 1 }".into()),
        );

        let message = query_bar.try_recv().unwrap();
        assert_eq!(message.sender, ComponentId::HistoryModal);
        assert_eq!(
            message.event,
            AppEvent::HistoryAccepted("{ name: 1 }".into())
        );
        assert!(header.try_recv().is_err());
    }

    #[test]
    fn test_broadcast_skips_sender() {
        let bus = EventBus::new();
        let content = bus.subscribe(ComponentId::Content);
        let header = bus.subscribe(ComponentId::Header);

        bus.broadcast(
            ComponentId::Content,
            AppEvent::FocusChanged(ComponentId::DatabaseTree),
        );

        assert!(content.try_recv().is_err());
        assert_eq!(
            header.try_recv().unwrap().event,
            AppEvent::FocusChanged(ComponentId::DatabaseTree)
        );
    }

    #[test]
    fn test_messages_from_one_sender_arrive_in_order() {
        let bus = EventBus::new();
        let query_bar = bus.subscribe(ComponentId::QueryBar);

        for i in 0..10 {
            bus.send(
                ComponentId::QueryBar,
                ComponentId::HistoryModal,
                AppEvent::HistoryAccepted(format!("q{i}")),
            );
        }

        for i in 0..10 {
            match query_bar.try_recv().unwrap().event {
                AppEvent::HistoryAccepted(q) => assert_eq!(q, format!("q{i}")),
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[test]
    fn test_full_queue_drops_oldest_not_newest() {
        let bus = EventBus::with_capacity(2);
        let query_bar = bus.subscribe(ComponentId::QueryBar);

        for i in 0..3 {
            bus.send(
                ComponentId::QueryBar,
                ComponentId::HistoryModal,
                AppEvent::HistoryAccepted(format!("q{i}")),
            );
        }

        // q0 was shed; q1 and q2 survive in order.
        assert_eq!(
            query_bar.try_recv().unwrap().event,
            AppEvent::HistoryAccepted("q1".into())
        );
        assert_eq!(
            query_bar.try_recv().unwrap().event,
            AppEvent::HistoryAccepted("q2".into())
        );
        assert!(query_bar.try_recv().is_err());
    }

    #[test]
    fn test_send_without_subscriber_is_noop() {
        let bus = EventBus::new();
        bus.send(
            ComponentId::Peeker,
            ComponentId::Content,
            AppEvent::HistoryDismissed,
        );
    }
}
