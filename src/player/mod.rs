//! Player state machine.
//!
//! A `Player` owns its zones and walks its own phase flags. Every command
//! it accepts checks legality first and returns `false` without touching
//! anything when the command is not allowed.
//!
//! ## Key Types
//!
//! - `Player`: zones, scalars and per-phase flags
//! - `ChallengeTracker`: challenges performed and won this round
//! - `Departures`: cards that left play or must reach the opponent
//! - `PlayerSnapshot`: the viewer-dependent rendering of a player

mod challenge;
mod marshal;
mod movement;
mod plots;
mod snapshot;
mod state;

pub use challenge::{ChallengeCount, ChallengeTracker};
pub use movement::{is_valid_drop_combination, Departures, Outbound};
pub use snapshot::PlayerSnapshot;
pub use state::{DeckInfo, Player};
