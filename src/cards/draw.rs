//! Draw deck cards: characters, locations, attachments and events.

use std::rc::Rc;
use std::sync::Arc;

use super::base::{BaseCard, Card};
use super::definition::{CardDefinition, CardType};
use super::keyword;
use super::summary::CardSummary;
use crate::abilities::CardAbility;
use crate::core::{ChallengeType, EntityId, PlayerId};
use crate::triggers::EventBus;

/// A card from the draw deck.
///
/// In play, a draw card can carry a stack of duplicates (extra copies of a
/// unique card, used to absorb a kill) and a list of attachments. Both are
/// owned here, so moving the host moves them too.
#[derive(Clone, Debug)]
pub struct DrawCard {
    base: BaseCard,
    pub dupes: Vec<DrawCard>,
    pub attachments: Vec<DrawCard>,
    /// Host card, for an attachment in play.
    pub parent: Option<EntityId>,
    pub kneeled: bool,
    /// Declared for the current challenge.
    pub selected: bool,
    /// Chosen as a stealth target for the current challenge.
    pub stealth: bool,
    /// Power tokens on the card.
    pub power: u32,
}

impl DrawCard {
    pub fn new(
        id: EntityId,
        owner: PlayerId,
        definition: Arc<CardDefinition>,
        ability: Option<Rc<dyn CardAbility>>,
    ) -> Self {
        Self {
            base: BaseCard::new(id, owner, definition, ability),
            dupes: Vec::new(),
            attachments: Vec::new(),
            parent: None,
            kneeled: false,
            selected: false,
            stealth: false,
            power: 0,
        }
    }

    /// Printed cost; 0 when the card prints none.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.definition().cost.unwrap_or(0)
    }

    #[must_use]
    pub fn strength(&self) -> u32 {
        self.definition().strength.unwrap_or(0)
    }

    #[must_use]
    pub fn is_limited(&self) -> bool {
        self.has_keyword(keyword::LIMITED)
    }

    /// Terminal attachments go to the discard pile instead of back to hand.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.has_keyword(keyword::TERMINAL)
    }

    #[must_use]
    pub fn has_icon(&self, challenge_type: ChallengeType) -> bool {
        self.definition().has_icon(challenge_type)
    }

    /// Push a copy onto the duplicate stack.
    pub fn add_duplicate(&mut self, mut card: DrawCard) {
        card.base.facedown = false;
        card.base.in_play = false;
        self.dupes.push(card);
    }

    /// Pop the top duplicate.
    pub fn pop_duplicate(&mut self) -> Option<DrawCard> {
        self.dupes.pop()
    }

    #[must_use]
    pub fn has_attachment(&self, id: EntityId) -> bool {
        self.attachments.iter().any(|a| a.id() == id)
    }

    pub fn remove_attachment(&mut self, id: EntityId) -> Option<DrawCard> {
        let index = self.attachments.iter().position(|a| a.id() == id)?;
        Some(self.attachments.remove(index))
    }

    /// Mark the card in play and subscribe its ability.
    pub fn enters_play(&mut self, bus: &mut EventBus) -> usize {
        self.base.in_play = true;
        if self.base.facedown {
            return 0;
        }
        self.base.register_events(bus)
    }

    /// Unsubscribe the ability and clear all in-play state.
    pub fn leaves_play(&mut self, bus: &mut EventBus) {
        self.base.unregister_events(bus);
        self.base.in_play = false;
        self.base.facedown = false;
        self.parent = None;
        self.kneeled = false;
        self.selected = false;
        self.stealth = false;
        self.power = 0;
    }

    /// IDs of this card, its duplicates and its attachments.
    #[must_use]
    pub fn all_ids(&self) -> Vec<EntityId> {
        let mut ids = vec![self.id()];
        ids.extend(self.dupes.iter().flat_map(DrawCard::all_ids));
        ids.extend(self.attachments.iter().flat_map(DrawCard::all_ids));
        ids
    }

    #[must_use]
    pub fn is_character(&self) -> bool {
        self.card_type() == CardType::Character
    }
}

impl Card for DrawCard {
    fn base(&self) -> &BaseCard {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseCard {
        &mut self.base
    }

    fn summary(&self, show: bool) -> CardSummary {
        let mut summary = self.base.summary(show);
        if show {
            summary.kneeled = self.kneeled;
            summary.selected = self.selected;
            summary.stealth = self.stealth;
            summary.power = self.power;
        }
        summary.dupes = self.dupes.iter().map(|d| d.summary(show)).collect();
        summary.attachments = self.attachments.iter().map(|a| a.summary(show)).collect();
        summary
    }
}
