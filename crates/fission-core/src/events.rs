//! The event bridge: how the core tells the outside world that state
//! changed.
//!
//! A [`Game`](crate::Game) owns an [`EventBus`]. Delivery systems
//! (socket broadcasters, bot message editors, persistence-on-change)
//! subscribe a callback per [`EventKind`]; the game invokes callbacks
//! synchronously at the point of the state change. The core has no
//! knowledge of transport — this bus is its only outward surface.

use std::collections::HashMap;
use std::fmt;

use crate::{Explosion, GameSnapshot};

/// The kinds of event a game can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Roster, turn, status, or board changed; carries a full snapshot.
    StatusChange,
    /// A move triggered at least one explosion; carries the trace.
    ChainReaction,
}

/// A state-change notification with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StatusChange(GameSnapshot),
    ChainReaction(Vec<Explosion>),
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::StatusChange(_) => EventKind::StatusChange,
            Self::ChainReaction(_) => EventKind::ChainReaction,
        }
    }
}

/// A subscriber callback. Invoked synchronously; must not block.
pub type EventCallback = Box<dyn Fn(&GameEvent) + Send>;

/// Per-game subscription registry, keyed by event kind.
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<EventKind, Vec<EventCallback>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for events of `kind`.
    pub fn subscribe(&mut self, kind: EventKind, callback: EventCallback) {
        self.subscribers.entry(kind).or_default().push(callback);
    }

    /// Delivers `event` to every subscriber of its kind, in
    /// subscription order.
    pub fn emit(&self, event: &GameEvent) {
        if let Some(callbacks) = self.subscribers.get(&event.kind()) {
            for callback in callbacks {
                callback(event);
            }
        }
    }

    /// Number of subscribers for `kind`.
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field(
                "status_change",
                &self.subscriber_count(EventKind::StatusChange),
            )
            .field(
                "chain_reaction",
                &self.subscriber_count(EventKind::ChainReaction),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_emit_reaches_matching_subscribers_only() {
        let status_hits = Arc::new(AtomicUsize::new(0));
        let chain_hits = Arc::new(AtomicUsize::new(0));

        let mut bus = EventBus::new();
        let s = Arc::clone(&status_hits);
        bus.subscribe(
            EventKind::StatusChange,
            Box::new(move |_| {
                s.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let c = Arc::clone(&chain_hits);
        bus.subscribe(
            EventKind::ChainReaction,
            Box::new(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        );

        bus.emit(&GameEvent::ChainReaction(vec![]));

        assert_eq!(status_hits.load(Ordering::SeqCst), 0);
        assert_eq!(chain_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_multiple_subscribers_all_invoked() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();
        for _ in 0..3 {
            let h = Arc::clone(&hits);
            bus.subscribe(
                EventKind::ChainReaction,
                Box::new(move |_| {
                    h.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        bus.emit(&GameEvent::ChainReaction(vec![]));

        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert_eq!(bus.subscriber_count(EventKind::ChainReaction), 3);
    }

    #[test]
    fn test_emit_with_no_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        bus.emit(&GameEvent::ChainReaction(vec![]));
    }
}
