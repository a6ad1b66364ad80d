//! Card registry for definition lookup.
//!
//! The `CardRegistry` is the card catalog of a game: every definition, keyed
//! by card code. Definitions are handed out as `Arc`s so each card instance
//! shares its record instead of copying it.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardType};
use crate::core::EngineError;

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use rust_plots::cards::{CardDefinition, CardRegistry, CardType};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDefinition::new("01090", "Ser Jaime Lannister", CardType::Character));
///
/// let found = registry.get("01090").unwrap();
/// assert_eq!(found.name, "Ser Jaime Lannister");
///
/// let loaded = CardRegistry::from_json(r#"[
///     { "code": "01001", "name": "A Clash of Kings", "type_code": "plot" }
/// ]"#).unwrap();
/// assert_eq!(loaded.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<String, Arc<CardDefinition>>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a JSON array of catalog records.
    ///
    /// A code that appears twice keeps its last record.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let records: Vec<CardDefinition> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for card in records {
            registry.cards.insert(card.code.clone(), Arc::new(card));
        }
        Ok(registry)
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same code already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.code) {
            panic!("Card with code {:?} already registered", card.code);
        }
        self.cards.insert(card.code.clone(), Arc::new(card));
    }

    /// Get a card definition by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<Arc<CardDefinition>> {
        self.cards.get(code).cloned()
    }

    /// Get a card definition, or `UnknownCard`.
    pub fn lookup(&self, code: &str) -> Result<Arc<CardDefinition>, EngineError> {
        self.get(code)
            .ok_or_else(|| EngineError::UnknownCard(code.to_string()))
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.cards.contains_key(code)
    }

    /// Iterate all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().map(AsRef::as_ref)
    }

    /// Find all cards of a type.
    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &CardDefinition> {
        self.iter().filter(move |c| c.card_type == card_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
