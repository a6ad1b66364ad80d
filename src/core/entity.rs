//! Entity identification system.
//!
//! Every card instance in a game has a unique `EntityId`, allocated once
//! when a deck is materialised and kept for the whole session, whichever
//! zone the card wanders into.
//!
//! ## ID Layout
//!
//! IDs are allocated as follows:
//! - `0..player_count`: Reserved for players
//! - `player_count..`: Cards
//!
//! ## Usage
//!
//! ```
//! use rust_plots::core::{EntityAllocator, EntityId};
//!
//! let mut ids = EntityAllocator::new(2);
//!
//! let first = ids.alloc();
//! let second = ids.alloc();
//!
//! assert_eq!(first, EntityId(2));
//! assert_ne!(first, second);
//! assert!(EntityId::player_id(1).is_player(2));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for any game entity.
///
/// Serialises as a bare integer; this is the `uuid` field of card summaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create an entity ID for a player by index.
    #[must_use]
    pub const fn player_id(index: u8) -> Self {
        Self(index as u32)
    }

    /// Get the first entity ID available for cards.
    ///
    /// In a game with `player_count` players, entity IDs 0..player_count
    /// are reserved for players.
    #[must_use]
    pub const fn first_non_player(player_count: usize) -> u32 {
        player_count as u32
    }

    /// Check if this entity ID refers to a player.
    ///
    /// ```
    /// use rust_plots::core::EntityId;
    ///
    /// let id = EntityId(1);
    /// assert!(id.is_player(2));
    /// assert!(!id.is_player(1));
    /// ```
    #[must_use]
    pub const fn is_player(self, player_count: usize) -> bool {
        self.0 < player_count as u32
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Hands out fresh entity IDs for one game session.
///
/// IDs are never reused: the counter only moves forward.
#[derive(Clone, Debug)]
pub struct EntityAllocator {
    next: u32,
}

impl EntityAllocator {
    /// Create an allocator that skips the IDs reserved for players.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            next: EntityId::first_non_player(player_count),
        }
    }

    /// Allocate a new entity ID.
    pub fn alloc(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of IDs handed out so far, including the reserved player IDs.
    #[must_use]
    pub fn high_water_mark(&self) -> u32 {
        self.next
    }
}
