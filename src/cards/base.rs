//! State shared by every card instance.
//!
//! `BaseCard` carries identity, ownership, face state and the card's
//! ability, and owns the registration contract: the listener ids it put on
//! the bus are recorded so that exactly those are removed when the card
//! leaves play.

use std::rc::Rc;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use super::definition::{CardDefinition, CardType};
use super::keyword;
use super::summary::CardSummary;
use crate::abilities::{AbilityHost, CardAbility};
use crate::core::{EntityId, PlayerId};
use crate::triggers::{EventBus, ListenerId};

/// Identity and lifecycle state of one physical card.
#[derive(Clone, Debug)]
pub struct BaseCard {
    pub id: EntityId,
    pub owner: PlayerId,
    pub definition: Arc<CardDefinition>,
    pub facedown: bool,
    pub in_play: bool,
    ability: Option<Rc<dyn CardAbility>>,
    listeners: SmallVec<[ListenerId; 2]>,
}

impl BaseCard {
    pub fn new(
        id: EntityId,
        owner: PlayerId,
        definition: Arc<CardDefinition>,
        ability: Option<Rc<dyn CardAbility>>,
    ) -> Self {
        Self {
            id,
            owner,
            definition,
            facedown: false,
            in_play: false,
            ability,
            listeners: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn ability(&self) -> Option<&dyn CardAbility> {
        self.ability.as_deref()
    }

    /// The identity handlers see for this card.
    #[must_use]
    pub fn host(&self) -> AbilityHost {
        AbilityHost::new(self.id, self.owner, self.definition.label())
    }

    /// Subscribe every handler of the card's ability.
    ///
    /// Does nothing if the card is already subscribed, so a card moving
    /// between places in play never doubles its listeners. Returns the
    /// number of listeners added.
    pub fn register_events(&mut self, bus: &mut EventBus) -> usize {
        if !self.listeners.is_empty() {
            return 0;
        }
        let Some(ability) = self.ability.clone() else {
            return 0;
        };

        let host = self.host();
        for (event, handler) in ability.handlers() {
            let id = bus.on(event, host.clone(), handler);
            self.listeners.push(id);
        }
        trace!(card = %self.id, count = self.listeners.len(), "registered listeners");
        self.listeners.len()
    }

    /// Remove exactly the listeners this card registered.
    pub fn unregister_events(&mut self, bus: &mut EventBus) {
        for id in self.listeners.drain(..) {
            bus.remove_listener(id);
        }
    }

    /// Listener ids currently registered by this card.
    #[must_use]
    pub fn registered_listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Summary for a viewer: full fields when `show` is true, otherwise only
    /// the face-down marker.
    #[must_use]
    pub fn summary(&self, show: bool) -> CardSummary {
        if !show {
            return CardSummary::hidden();
        }
        CardSummary {
            facedown: self.facedown,
            uuid: Some(self.id),
            code: Some(self.definition.code.clone()),
            name: Some(self.definition.name.clone()),
            card_type: Some(self.definition.card_type),
            ..CardSummary::default()
        }
    }
}

/// Common read access to any card instance.
pub trait Card {
    fn base(&self) -> &BaseCard;

    fn base_mut(&mut self) -> &mut BaseCard;

    fn id(&self) -> EntityId {
        self.base().id
    }

    fn owner(&self) -> PlayerId {
        self.base().owner
    }

    fn definition(&self) -> &CardDefinition {
        &self.base().definition
    }

    fn code(&self) -> &str {
        &self.base().definition.code
    }

    fn name(&self) -> &str {
        &self.base().definition.name
    }

    fn card_type(&self) -> CardType {
        self.base().definition.card_type
    }

    fn is_unique(&self) -> bool {
        self.base().definition.is_unique
    }

    fn is_in_play(&self) -> bool {
        self.base().in_play
    }

    fn is_facedown(&self) -> bool {
        self.base().facedown
    }

    /// See [`keyword::has_keyword`].
    fn has_keyword(&self, word: &str) -> bool {
        keyword::has_keyword(self.base().definition.text.as_deref(), word)
    }

    fn summary(&self, show: bool) -> CardSummary {
        self.base().summary(show)
    }
}

impl Card for BaseCard {
    fn base(&self) -> &BaseCard {
        self
    }

    fn base_mut(&mut self) -> &mut BaseCard {
        self
    }
}
