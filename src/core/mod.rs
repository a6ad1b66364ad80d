//! Core engine types: entities, players, RNG, configuration, commands, errors.
//!
//! This module contains the vocabulary every other module speaks: ids,
//! zones, phases, challenge types, the rule numbers, and the error type.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;

pub use entity::{EntityAllocator, EntityId};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::GameRng;
pub use config::{ChallengeType, GameConfig, Phase, RulesConfig, Zone, ZoneVisibility};
pub use action::{Button, Command};
pub use error::EngineError;
