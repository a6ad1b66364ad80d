//! Challenges, claim and the end of the round.

use std::ops::Index;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::state::Player;
use crate::cards::{Card, DrawCard};
use crate::core::{Button, ChallengeType, Command, EntityId, GameRng, Phase, RulesConfig, Zone};
use crate::triggers::EventBus;

/// Per-type challenge counts for one round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeCount {
    pub performed: u32,
    pub max: u32,
    pub won: u32,
}

/// Challenge tallies for one player for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeTracker {
    pub complete: u32,
    pub max_total: u32,
    pub military: ChallengeCount,
    pub intrigue: ChallengeCount,
    pub power: ChallengeCount,
}

impl ChallengeTracker {
    #[must_use]
    pub fn new(rules: &RulesConfig) -> Self {
        let count = ChallengeCount {
            performed: 0,
            max: rules.max_challenges_per_type,
            won: 0,
        };
        Self {
            complete: 0,
            max_total: rules.max_challenges,
            military: count,
            intrigue: count,
            power: count,
        }
    }

    #[must_use]
    pub fn get(&self, challenge_type: ChallengeType) -> &ChallengeCount {
        match challenge_type {
            ChallengeType::Military => &self.military,
            ChallengeType::Intrigue => &self.intrigue,
            ChallengeType::Power => &self.power,
        }
    }

    pub fn get_mut(&mut self, challenge_type: ChallengeType) -> &mut ChallengeCount {
        match challenge_type {
            ChallengeType::Military => &mut self.military,
            ChallengeType::Intrigue => &mut self.intrigue,
            ChallengeType::Power => &mut self.power,
        }
    }

    #[must_use]
    pub fn won(&self, challenge_type: ChallengeType) -> u32 {
        self.get(challenge_type).won
    }

    pub fn record_won(&mut self, challenge_type: ChallengeType) {
        self.get_mut(challenge_type).won += 1;
    }

    pub fn record_performed(&mut self, challenge_type: ChallengeType) {
        self.get_mut(challenge_type).performed += 1;
        self.complete += 1;
    }

    /// Both the per-type and the total cap leave room for one more.
    #[must_use]
    pub fn can_initiate(&self, challenge_type: ChallengeType) -> bool {
        let count = self.get(challenge_type);
        count.performed < count.max && self.complete < self.max_total
    }
}

impl Index<ChallengeType> for ChallengeTracker {
    type Output = ChallengeCount;

    fn index(&self, challenge_type: ChallengeType) -> &ChallengeCount {
        self.get(challenge_type)
    }
}

impl Player {
    /// Enter the challenge phase with a clean slate.
    pub fn begin_challenge(&mut self) {
        self.phase = Phase::Challenge;
        self.menu_title.clear();
        self.show_challenge_menu();

        self.cards_in_challenge.clear();
        for card in self.cards_in_play.iter_mut() {
            card.stealth = false;
        }
        self.current_challenge = None;
        self.challenger = false;
        self.select_card = false;
        self.selecting_challengers = false;
        self.selected_attachment = None;
    }

    /// One button per challenge type, plus "Done".
    pub fn show_challenge_menu(&mut self) {
        self.buttons = ChallengeType::ALL
            .into_iter()
            .map(|ty| Button::new(Command::Challenge(ty), ty.label()))
            .chain(std::iter::once(Button::done(Command::DoneAllChallenges)))
            .collect();
    }

    #[must_use]
    pub fn can_start_challenge(&self, challenge_type: ChallengeType) -> bool {
        self.phase == Phase::Challenge
            && !self.done_challenges
            && self.current_challenge.is_none()
            && self.challenges.can_initiate(challenge_type)
    }

    /// Declare a challenge and start choosing attackers.
    pub fn start_challenge(&mut self, challenge_type: ChallengeType) -> bool {
        if !self.can_start_challenge(challenge_type) {
            debug!(player = %self.id, %challenge_type, "challenge refused");
            return false;
        }

        self.menu_title = "Select challenge targets".to_string();
        self.buttons = vec![Button::done(Command::DoneChallenge)];

        self.current_challenge = Some(challenge_type);
        self.cards_in_challenge.clear();
        self.select_card = true;
        self.challenger = true;
        self.selecting_challengers = true;
        self.picking_stealth = false;
        true
    }

    /// Could this card join the current challenge?
    #[must_use]
    pub fn can_add_to_challenge(&self, card_id: EntityId) -> bool {
        let Some(challenge_type) = self.current_challenge else {
            return false;
        };
        if !self.selecting_challengers {
            return false;
        }
        let Some(card) = self.cards_in_play.find(card_id) else {
            return false;
        };

        card.is_character() && card.has_icon(challenge_type) && !card.stealth && !card.kneeled
    }

    /// Toggle a card's participation in the current challenge.
    pub fn add_to_challenge(&mut self, card_id: EntityId) -> bool {
        let already_selected = self
            .cards_in_play
            .find(card_id)
            .is_some_and(|card| card.selected);

        if !already_selected && !self.can_add_to_challenge(card_id) {
            return false;
        }
        let Some(card) = self.cards_in_play.find_mut(card_id) else {
            return false;
        };

        card.selected = !card.selected;
        if card.selected {
            self.cards_in_challenge.push(card_id);
        } else {
            self.cards_in_challenge.retain(|&id| id != card_id);
        }
        true
    }

    /// Mark one of this player's characters as a stealth target.
    pub fn add_to_stealth(&mut self, card_id: EntityId) -> bool {
        let Some(challenge_type) = self.current_challenge else {
            return false;
        };
        let Some(card) = self.cards_in_play.find_mut(card_id) else {
            return false;
        };
        if !card.has_icon(challenge_type) {
            return false;
        }

        card.stealth = true;
        true
    }

    /// Finish choosing participants: kneel them and total their strength.
    ///
    /// `is_mine` is true for the attacker, whose tallies count the challenge.
    pub fn done_challenge(&mut self, is_mine: bool) -> u32 {
        self.selecting_challengers = false;

        let mut strength = 0;
        for card in self.cards_in_play.iter_mut().filter(|c| c.selected) {
            card.kneeled = true;
            card.selected = false;
            strength += card.strength();
        }

        self.challenge_strength = strength;
        self.select_card = false;

        if is_mine {
            if let Some(challenge_type) = self.current_challenge {
                self.challenges.record_performed(challenge_type);
            }
        }
        strength
    }

    /// Start choosing defenders against a challenge.
    pub fn begin_defend(&mut self, challenge_type: ChallengeType) {
        self.menu_title = "Select defenders".to_string();
        self.buttons = vec![Button::done(Command::DoneDefend)];

        self.select_card = true;
        self.current_challenge = Some(challenge_type);
        self.phase = Phase::Challenge;
        self.cards_in_challenge.clear();
        self.challenger = false;
        self.selecting_challengers = true;
    }

    /// Clear all per-challenge state once a challenge is fully resolved.
    pub fn end_challenge(&mut self) {
        self.current_challenge = None;
        self.challenger = false;
        self.selecting_challengers = false;
        self.select_card = false;
        self.cards_in_challenge.clear();
        self.challenge_strength = 0;
        for card in self.cards_in_play.iter_mut() {
            card.selected = false;
            card.stealth = false;
        }
    }

    // === Claim ===

    pub fn select_character_to_kill(&mut self) {
        self.select_card = true;
        self.phase = Phase::Claim;

        self.menu_title = "Select character to kill".to_string();
        self.buttons = vec![Button::done(Command::CancelClaim)];
    }

    /// Kill a character to satisfy military claim.
    ///
    /// A duplicate absorbs the kill: the top duplicate goes to the discard
    /// pile and `None` is returned. Otherwise the character leaves play into
    /// the dead pile, with its attachments detached, and its id is returned.
    /// Pending claim drops by one either way.
    pub fn kill_character(&mut self, card_id: EntityId, bus: &mut EventBus) -> Option<EntityId> {
        let character = self.cards_in_play.find_mut(card_id)?;
        if !character.is_character() {
            return None;
        }

        self.claim_to_do = self.claim_to_do.saturating_sub(1);

        if let Some(dupe) = character.pop_duplicate() {
            debug!(player = %self.id, card = %card_id, "duplicate absorbed kill");
            let dupe = self.release_duplicate(dupe, bus);
            self.discard_pile.push(dupe);
            return None;
        }

        self.leave_play(card_id, Zone::DeadPile, bus)
            .then_some(card_id)
    }

    pub fn done_claim(&mut self) {
        self.phase = Phase::Challenge;
        self.select_card = false;
        self.claim_to_do = 0;

        self.menu_title = "Waiting for opponent to issue challenge".to_string();
        self.buttons.clear();
    }

    /// Discard up to `count` cards chosen uniformly from hand.
    pub fn discard_at_random(&mut self, count: usize, rng: &mut GameRng) -> usize {
        let mut discarded = 0;
        while discarded < count && !self.hand.is_empty() {
            let index = rng.gen_range_usize(0..self.hand.len());
            if let Some(card) = self.hand.remove_at(index) {
                self.discard_pile.push(card);
                discarded += 1;
            }
        }
        discarded
    }

    // === Dominance and taxation ===

    /// Strength of standing characters plus unspent gold.
    #[must_use]
    pub fn get_dominance(&self) -> u32 {
        let strength: u32 = self
            .cards_in_play
            .iter()
            .filter(|c| !c.kneeled && c.is_character())
            .map(DrawCard::strength)
            .sum();
        strength + self.gold
    }

    pub fn stand_cards(&mut self) {
        for card in self.cards_in_play.iter_mut() {
            card.kneeled = false;
            for attachment in &mut card.attachments {
                attachment.kneeled = false;
            }
        }
    }

    pub fn taxation(&mut self) {
        self.phase = Phase::Taxation;
        self.gold = 0;
    }

    /// Characters that could still be chosen for military claim.
    #[must_use]
    pub fn characters_in_play(&self) -> Vec<EntityId> {
        self.cards_in_play
            .iter()
            .filter(|c| c.is_character())
            .map(Card::id)
            .collect()
    }
}
