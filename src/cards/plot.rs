//! Plot cards.

use std::rc::Rc;
use std::sync::Arc;

use super::base::{BaseCard, Card};
use super::definition::{CardDefinition, PlotStat};
use super::keyword;
use crate::abilities::CardAbility;
use crate::core::{ChallengeType, EntityId, PlayerId};
use crate::player::Player;
use crate::triggers::EventBus;

/// A plot card: chosen secretly each round, revealed simultaneously.
///
/// The active plot sets its owner's income, initiative, claim and reserve
/// for the round, and its ability (if any) listens while it stays revealed.
#[derive(Clone, Debug)]
pub struct PlotCard {
    base: BaseCard,
}

impl PlotCard {
    pub fn new(
        id: EntityId,
        owner: PlayerId,
        definition: Arc<CardDefinition>,
        ability: Option<Rc<dyn CardAbility>>,
    ) -> Self {
        Self {
            base: BaseCard::new(id, owner, definition, ability),
        }
    }

    fn stat(&self, stat: PlotStat) -> i64 {
        self.definition().stat(stat).unwrap_or(0)
    }

    #[must_use]
    pub fn income(&self) -> i64 {
        self.stat(PlotStat::Income)
    }

    #[must_use]
    pub fn initiative(&self) -> i64 {
        self.stat(PlotStat::Initiative)
    }

    #[must_use]
    pub fn reserve(&self) -> i64 {
        self.stat(PlotStat::Reserve)
    }

    #[must_use]
    pub fn claim(&self) -> i64 {
        self.stat(PlotStat::Claim)
    }

    #[must_use]
    pub fn has_when_revealed(&self) -> bool {
        keyword::has_marker(self.definition().text.as_deref(), keyword::WHEN_REVEALED)
    }

    /// Flip face-up, mark in play and subscribe the ability.
    pub fn revealed(&mut self, bus: &mut EventBus) -> usize {
        self.base.facedown = false;
        self.base.in_play = true;
        self.base.register_events(bus)
    }

    /// Unsubscribe and leave play.
    pub fn leaves_play(&mut self, bus: &mut EventBus) {
        self.base.unregister_events(bus);
        self.base.in_play = false;
    }

    /// Ask the ability whether `player` may initiate a challenge.
    #[must_use]
    pub fn can_challenge(&self, player: &Player, challenge_type: ChallengeType) -> bool {
        self.base
            .ability()
            .map_or(true, |ability| ability.can_challenge(player, challenge_type))
    }
}

impl Card for PlotCard {
    fn base(&self) -> &BaseCard {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseCard {
        &mut self.base
    }
}
