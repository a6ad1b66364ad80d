//! Per-card behavior.
//!
//! Most cards are plain data. A card with printed behavior gets a
//! `CardAbility` from the `AbilityRegistry`, keyed by card code, when its
//! instance is created. The ability describes itself as a table of
//! `(event, handler)` pairs; the card registers the whole table on the
//! `EventBus` when it enters play and removes it when it leaves.
//!
//! Handlers are plain `fn` pointers. Everything they touch goes through the
//! `GameContext` they are handed.
//!
//! ```
//! use rust_plots::abilities::{AbilityRegistry, plots};
//!
//! let abilities = AbilityRegistry::core_set();
//! let clash = abilities.create(plots::A_CLASH_OF_KINGS).unwrap();
//! assert_eq!(clash.handlers().len(), 1);
//!
//! assert!(abilities.create("01999").is_none());
//! ```

pub mod plots;

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{ChallengeType, EntityId, PlayerId};
use crate::game::GameContext;
use crate::player::Player;
use crate::triggers::{EventName, GameEvent};

/// The card a listener belongs to, as seen by its handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityHost {
    pub card: EntityId,
    pub owner: PlayerId,
    pub name: String,
}

impl AbilityHost {
    pub fn new(card: EntityId, owner: PlayerId, name: impl Into<String>) -> Self {
        Self {
            card,
            owner,
            name: name.into(),
        }
    }
}

/// A reaction to one event.
pub type Handler = fn(&AbilityHost, &GameEvent, &mut dyn GameContext);

/// The `(event, handler)` pairs an ability subscribes as a unit.
pub type HandlerTable = SmallVec<[(EventName, Handler); 2]>;

/// Printed behavior of a card.
pub trait CardAbility: fmt::Debug {
    /// Handlers to subscribe while the card is in play.
    fn handlers(&self) -> HandlerTable {
        HandlerTable::new()
    }

    /// May `player` initiate a challenge of this type?
    ///
    /// Consulted on the active plots of both players.
    fn can_challenge(&self, _player: &Player, _challenge_type: ChallengeType) -> bool {
        true
    }
}

/// Builds a fresh ability for one card instance.
pub type AbilityFactory = fn() -> Rc<dyn CardAbility>;

/// Registry from card code to ability factory.
#[derive(Clone, Debug, Default)]
pub struct AbilityRegistry {
    factories: FxHashMap<String, AbilityFactory>,
}

impl AbilityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every ability the engine implements.
    #[must_use]
    pub fn core_set() -> Self {
        let mut registry = Self::new();
        plots::register(&mut registry);
        registry
    }

    /// Register a factory.
    ///
    /// # Panics
    ///
    /// Panics if the code already has a factory.
    pub fn register(&mut self, code: impl Into<String>, factory: AbilityFactory) {
        let code = code.into();
        if self.factories.contains_key(&code) {
            panic!("Ability for card {code} already registered");
        }
        self.factories.insert(code, factory);
    }

    /// Build the ability for a card code, if it has one.
    #[must_use]
    pub fn create(&self, code: &str) -> Option<Rc<dyn CardAbility>> {
        self.factories.get(code).map(|factory| factory())
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.factories.contains_key(code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Inert;

    impl CardAbility for Inert {}

    fn inert() -> Rc<dyn CardAbility> {
        Rc::new(Inert)
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = AbilityRegistry::new();
        registry.register("02001", inert);

        assert!(registry.contains("02001"));
        let ability = registry.create("02001").unwrap();
        assert!(ability.handlers().is_empty());
        assert!(registry.create("02002").is_none());
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_registration_panics() {
        let mut registry = AbilityRegistry::new();
        registry.register("02001", inert);
        registry.register("02001", inert);
    }

    #[test]
    fn test_core_set() {
        let registry = AbilityRegistry::core_set();
        assert_eq!(registry.len(), 3);
        for code in [plots::A_CLASH_OF_KINGS, plots::A_FEAST_FOR_CROWS, plots::A_GAME_OF_THRONES] {
            assert!(registry.contains(code), "missing {code}");
        }
    }

    #[test]
    fn test_each_instance_is_fresh() {
        let registry = AbilityRegistry::core_set();
        let a = registry.create(plots::A_FEAST_FOR_CROWS).unwrap();
        let b = registry.create(plots::A_FEAST_FOR_CROWS).unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
    }
}
