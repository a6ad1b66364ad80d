//! Game orchestration.
//!
//! ## Key Types
//!
//! - `GameContext`: What card abilities may touch, implemented by `Game`
//! - `dispatch`: Runs the listeners of one event, skipping stale ones
//! - `Deck`: A decklist to materialise into cards
//! - `Game`: Two players, one event bus, one RNG, and the round sequence

mod context;
mod deck;
mod game;

pub use context::{dispatch, GameContext};
pub use deck::{Deck, DeckEntry};
pub use game::{ChallengeInProgress, ChallengeStage, Game, GameSnapshot, PlayerSetup};
