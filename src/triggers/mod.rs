//! Event bus for card abilities.
//!
//! Cards in play subscribe handlers to named game events; the game emits
//! events at fixed points of the round and every live listener runs.
//!
//! ## Key Components
//!
//! - [`EventName`]: The channels abilities can listen on
//! - [`GameEvent`]: A named event with positional arguments
//! - [`EventBus`]: Storage and lookup for listeners
//!
//! ## Example Usage
//!
//! ```
//! use rust_plots::abilities::AbilityHost;
//! use rust_plots::core::{ChallengeType, EntityId, PlayerId};
//! use rust_plots::game::GameContext;
//! use rust_plots::triggers::{EventBus, EventName, GameEvent};
//!
//! fn on_challenge(_: &AbilityHost, _: &GameEvent, _: &mut dyn GameContext) {}
//!
//! let mut bus = EventBus::new();
//! let host = AbilityHost::new(EntityId(10), PlayerId::new(0), "A Clash of Kings");
//! let id = bus.on(EventName::AfterChallenge, host, on_challenge);
//!
//! assert_eq!(bus.listeners(EventName::AfterChallenge).len(), 1);
//!
//! // The card leaves play: its listeners go with it.
//! bus.remove_listener(id);
//! assert!(bus.is_empty());
//!
//! let event = GameEvent::after_challenge(ChallengeType::Power, PlayerId::new(0), PlayerId::new(1));
//! assert_eq!(event.challenge(0), Some(ChallengeType::Power));
//! ```

mod event;
mod registry;

pub use event::{EventArg, EventName, GameEvent};
pub use registry::{EventBus, Listener, ListenerId};
