//! # rust-plots
//!
//! Rules engine for a two-player plot-and-challenge card game.
//!
//! ## Design Principles
//!
//! 1. **Players Own Their Zones**: Every card is in exactly one place: a
//!    pile, a duplicate stack, an attachment list or the active plot slot.
//!    Moving a card moves the value.
//!
//! 2. **Commands Check Before They Mutate**: An illegal command returns
//!    `false` and changes nothing. Errors are reserved for loading catalogs,
//!    decks and configs.
//!
//! 3. **Explicit Capabilities**: Code that subscribes abilities takes the
//!    `EventBus` as an argument; handlers act only through the
//!    `GameContext` they are handed.
//!
//! ## Architecture
//!
//! - **Event Bus**: Cards register a table of handlers when they enter
//!   play and remove exactly those listeners when they leave. Dispatch
//!   re-checks every listener before calling it, so a card that left play
//!   mid-dispatch stays silent.
//!
//! - **Viewer-Dependent Snapshots**: A snapshot has the same shape for
//!   every viewer; hidden cards are redacted where they are summarised.
//!
//! - **Deterministic**: All randomness goes through one seeded `GameRng`.
//!
//! ## Modules
//!
//! - `core`: Entity IDs, players, RNG, zones and phases, rules, commands, errors
//! - `zones`: Ordered card piles
//! - `cards`: Card definitions, instances and the catalog
//! - `triggers`: Events and the listener registry
//! - `abilities`: Per-card behavior and the core-set plots
//! - `player`: The player state machine
//! - `game`: The game context, event dispatch and round sequencing

pub mod core;
pub mod zones;
pub mod cards;
pub mod triggers;
pub mod abilities;
pub mod player;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    Button, ChallengeType, Command, EngineError, EntityAllocator, EntityId, GameConfig, GameRng,
    Phase, PlayerId, PlayerMap, RulesConfig, Zone, ZoneVisibility,
};

pub use crate::zones::{Pile, ZonePosition};

pub use crate::cards::{
    Card, CardDefinition, CardRegistry, CardSummary, CardType, DrawCard, PlotCard,
};

pub use crate::triggers::{EventArg, EventBus, EventName, GameEvent, Listener, ListenerId};

pub use crate::abilities::{AbilityHost, AbilityRegistry, CardAbility};

pub use crate::player::{Player, PlayerSnapshot};

pub use crate::game::{dispatch, Deck, Game, GameContext, GameSnapshot, PlayerSetup};
