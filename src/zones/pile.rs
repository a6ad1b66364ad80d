//! Ordered card collections.
//!
//! A `Pile` owns the card instances of one zone. Cards are looked up by
//! `EntityId`, never by value, so two copies of the same card are always
//! distinguishable.
//!
//! Index 0 is the bottom of the pile and the last index is the top, so
//! drawing pops from the end.
//!
//! ```
//! use std::sync::Arc;
//! use rust_plots::cards::{Card, CardDefinition, CardType, DrawCard};
//! use rust_plots::core::{EntityId, PlayerId};
//! use rust_plots::zones::{Pile, ZonePosition};
//!
//! let def = Arc::new(CardDefinition::new("01100", "Guard", CardType::Character));
//! let card = |id| DrawCard::new(EntityId(id), PlayerId::new(0), def.clone(), None);
//!
//! let mut deck = Pile::new();
//! deck.push(card(10));
//! deck.insert(card(11), ZonePosition::Bottom);
//!
//! assert_eq!(deck.top().map(|c| c.id()), Some(EntityId(10)));
//! assert!(deck.remove(EntityId(11)).is_some());
//! assert_eq!(deck.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{EntityId, GameRng};

/// Position for inserting a card into a pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Add to top of pile (e.g., top of the draw deck).
    Top,
    /// Add to bottom of pile.
    Bottom,
    /// Insert at specific index (0 = bottom).
    Index(usize),
}

/// An ordered collection of cards belonging to one zone.
#[derive(Clone, Debug)]
pub struct Pile<C> {
    cards: Vec<C>,
}

impl<C> Default for Pile<C> {
    fn default() -> Self {
        Self { cards: Vec::new() }
    }
}

impl<C: Card> Pile<C> {
    /// Create an empty pile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pile from cards listed bottom to top.
    #[must_use]
    pub fn from_vec(cards: Vec<C>) -> Self {
        Self { cards }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.cards.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, C> {
        self.cards.iter_mut()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.cards
    }

    /// IDs of the cards, bottom to top.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.cards.iter().map(Card::id).collect()
    }

    #[must_use]
    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.cards.iter().position(|c| c.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub fn find(&self, id: EntityId) -> Option<&C> {
        self.cards.iter().find(|c| c.id() == id)
    }

    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut C> {
        self.cards.iter_mut().find(|c| c.id() == id)
    }

    /// Remove a card by ID, keeping the order of the rest.
    pub fn remove(&mut self, id: EntityId) -> Option<C> {
        let index = self.position(id)?;
        Some(self.cards.remove(index))
    }

    /// Remove the card at `index` (0 = bottom).
    pub fn remove_at(&mut self, index: usize) -> Option<C> {
        (index < self.cards.len()).then(|| self.cards.remove(index))
    }

    /// Put a card on top.
    pub fn push(&mut self, card: C) {
        self.cards.push(card);
    }

    /// Put a card at a specific position.
    pub fn insert(&mut self, card: C, position: ZonePosition) {
        match position {
            ZonePosition::Top => self.cards.push(card),
            ZonePosition::Bottom => self.cards.insert(0, card),
            ZonePosition::Index(i) => {
                let idx = i.min(self.cards.len());
                self.cards.insert(idx, card);
            }
        }
    }

    #[must_use]
    pub fn top(&self) -> Option<&C> {
        self.cards.last()
    }

    pub fn pop_top(&mut self) -> Option<C> {
        self.cards.pop()
    }

    /// Take up to `n` cards from the top, topmost first.
    ///
    /// Returns fewer than `n` cards when the pile runs out.
    pub fn take_top(&mut self, n: usize) -> Vec<C> {
        let keep = self.cards.len().saturating_sub(n);
        let mut taken = self.cards.split_off(keep);
        taken.reverse();
        taken
    }

    /// The top `n` cards, topmost first, without removing them.
    pub fn peek_top(&self, n: usize) -> impl Iterator<Item = &C> {
        self.cards.iter().rev().take(n)
    }

    /// Remove every card, bottom to top.
    pub fn drain(&mut self) -> Vec<C> {
        std::mem::take(&mut self.cards)
    }

    /// Uniformly permute the pile.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }
}

impl<C> Extend<C> for Pile<C> {
    fn extend<I: IntoIterator<Item = C>>(&mut self, iter: I) {
        self.cards.extend(iter);
    }
}

impl<'a, C> IntoIterator for &'a Pile<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}
