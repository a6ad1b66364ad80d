//! Listener registry.
//!
//! The bus stores listeners and provides lookup by event name. Cards
//! register their handler table when they enter play and remove exactly
//! those listeners when they leave.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityHost, Handler};
use crate::core::EntityId;

use super::event::EventName;

/// Unique identifier for a registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

impl ListenerId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

/// A subscription: which card listens to which event, and what runs.
#[derive(Clone)]
pub struct Listener {
    pub id: ListenerId,
    pub event: EventName,
    pub host: AbilityHost,
    pub handler: Handler,
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("event", &self.event)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

/// Per-game publish/subscribe registry.
///
/// Listeners for one event are kept in registration order. Dispatch lives
/// in `game::dispatch`, which needs the game itself as well as the bus.
#[derive(Clone, Debug, Default)]
pub struct EventBus {
    /// All registered listeners.
    listeners: FxHashMap<ListenerId, Listener>,

    /// Index by event name, in registration order.
    by_event: FxHashMap<EventName, Vec<ListenerId>>,

    /// Next listener ID to allocate.
    next_id: u32,
}

impl EventBus {
    /// Create a new empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `event` on behalf of `host`.
    pub fn on(&mut self, event: EventName, host: AbilityHost, handler: Handler) -> ListenerId {
        let id = ListenerId::new(self.next_id);
        self.next_id += 1;

        self.by_event.entry(event).or_default().push(id);
        self.listeners.insert(
            id,
            Listener {
                id,
                event,
                host,
                handler,
            },
        );
        id
    }

    /// Remove one listener.
    pub fn remove_listener(&mut self, id: ListenerId) -> Option<Listener> {
        let listener = self.listeners.remove(&id)?;
        if let Some(list) = self.by_event.get_mut(&listener.event) {
            list.retain(|&lid| lid != id);
            if list.is_empty() {
                self.by_event.remove(&listener.event);
            }
        }
        Some(listener)
    }

    /// Remove every listener hosted by `card`. Returns how many were removed.
    pub fn remove_for_source(&mut self, card: EntityId) -> usize {
        let to_remove: Vec<_> = self
            .listeners
            .values()
            .filter(|l| l.host.card == card)
            .map(|l| l.id)
            .collect();

        for &id in &to_remove {
            self.remove_listener(id);
        }
        to_remove.len()
    }

    /// Live listeners for `event`, in registration order.
    ///
    /// Returns clones so the caller can run handlers that mutate the bus.
    #[must_use]
    pub fn listeners(&self, event: EventName) -> Vec<Listener> {
        self.by_event
            .get(&event)
            .into_iter()
            .flatten()
            .filter_map(|id| self.listeners.get(id).cloned())
            .collect()
    }

    #[must_use]
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Number of listeners hosted by `card`.
    #[must_use]
    pub fn count_for_source(&self, card: EntityId) -> usize {
        self.listeners.values().filter(|l| l.host.card == card).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
