//! Playing cards: setup, marshalling and attachments.

use std::{iter, mem};

use tracing::debug;

use super::state::Player;
use crate::cards::{Card, CardType, DrawCard, PlotStat};
use crate::core::{Button, Command, EntityId, Phase, Zone};
use crate::triggers::EventBus;
use crate::zones::Pile;

impl Player {
    #[must_use]
    pub fn is_card_in_hand(&self, card_id: EntityId) -> bool {
        self.hand.contains(card_id)
    }

    /// The copy already in play that `card` would duplicate.
    ///
    /// Only unique cards have duplicates. A copy matches on code or name.
    #[must_use]
    pub fn get_duplicate_in_play(&self, card: &DrawCard) -> Option<&DrawCard> {
        if !card.is_unique() {
            return None;
        }
        self.cards_in_play
            .iter()
            .find(|in_play| in_play.code() == card.code() || in_play.name() == card.name())
    }

    /// Is playing `card` from hand legal right now?
    #[must_use]
    pub fn can_play_card(&self, card: &DrawCard) -> bool {
        if !matches!(self.phase, Phase::Setup | Phase::Marshal) || self.setup_locked() {
            return false;
        }
        if !self.is_card_in_hand(card.id()) {
            return false;
        }

        let dupe = self.get_duplicate_in_play(card).is_some();

        if card.cost() > self.gold && !dupe {
            return false;
        }
        if self.limited_played && card.is_limited() && !dupe {
            return false;
        }
        if card.card_type() == CardType::Event {
            return false;
        }
        if card.is_character()
            && card.is_unique()
            && self.dead_pile.iter().any(|dead| dead.code() == card.code())
        {
            return false;
        }

        true
    }

    /// Play a card from hand.
    ///
    /// A forced play skips the legality check and pays nothing. Outside
    /// setup an attachment stays in hand until a target is chosen, and a
    /// duplicate goes onto the copy already in play. Everything else enters
    /// the play area, face-down during setup.
    pub fn play_card(&mut self, card_id: EntityId, force: bool, bus: &mut EventBus) -> bool {
        if self.setup_locked() {
            return false;
        }
        let Some(card) = self.hand.find(card_id) else {
            return false;
        };
        if !force && !self.can_play_card(card) {
            debug!(player = %self.id, card = %card_id, "play refused");
            return false;
        }

        let dupe_of = self.get_duplicate_in_play(card).map(Card::id);
        let cost = card.cost();
        let limited = card.is_limited();
        let is_attachment = card.card_type() == CardType::Attachment;
        let in_setup = self.phase == Phase::Setup;

        let paid = if dupe_of.is_none() && !force { cost } else { 0 };
        self.gold = self.gold.saturating_sub(paid);

        if is_attachment && !in_setup {
            self.prompt_for_attachment(card_id, paid);
            return true;
        }

        let Some(mut card) = self.hand.remove(card_id) else {
            return false;
        };

        let stack_on = if in_setup { None } else { dupe_of };
        match stack_on.and_then(|host| self.cards_in_play.find_mut(host)) {
            Some(host) => host.add_duplicate(card),
            None => {
                card.base_mut().facedown = in_setup;
                card.enters_play(bus);
                self.cards_in_play.push(card);
            }
        }

        if limited && !force {
            self.limited_played = true;
        }
        debug!(player = %self.id, card = %card_id, paid, "card played");
        true
    }

    fn prompt_for_attachment(&mut self, card_id: EntityId, paid: u32) {
        self.selected_attachment = Some(card_id);
        self.attachment_paid = paid;
        self.select_card = true;
        self.menu_title = "Select target for attachment".to_string();
        self.buttons = vec![Button::done(Command::DoneAttachment)];
    }

    fn clear_attachment_prompt(&mut self) {
        self.selected_attachment = None;
        self.attachment_paid = 0;
        self.select_card = false;
        self.drop_pending = false;
        match self.phase {
            Phase::Marshal => self.show_marshal_menu(),
            Phase::Setup => self.show_setup_menu(),
            _ => {}
        }
    }

    /// Abandon the pending attachment. The card stays in hand and its cost
    /// is refunded.
    pub fn cancel_attachment(&mut self) -> bool {
        if self.selected_attachment.is_none() {
            return false;
        }
        self.gold += self.attachment_paid;
        self.clear_attachment_prompt();
        true
    }

    /// Does the play area hold attachments not yet placed on a card?
    #[must_use]
    pub fn has_unmapped_attachments(&self) -> bool {
        self.cards_in_play
            .iter()
            .any(|card| card.card_type() == CardType::Attachment)
    }

    /// Where an attachment about to be placed currently sits: the pending
    /// attachment in hand, or an unmapped one in the play area.
    fn attachment_zone(&self, attachment_id: EntityId) -> Option<Zone> {
        if self.selected_attachment == Some(attachment_id) && self.hand.contains(attachment_id) {
            Some(Zone::Hand)
        } else if self.cards_in_play.contains(attachment_id) {
            Some(Zone::PlayArea)
        } else {
            None
        }
    }

    /// The attachment waiting to be placed, if `attachment_id` is one.
    #[must_use]
    pub fn attachment_source(&self, attachment_id: EntityId) -> Option<&DrawCard> {
        let zone = self.attachment_zone(attachment_id)?;
        self.pile(zone)?
            .find(attachment_id)
            .filter(|card| card.card_type() == CardType::Attachment)
    }

    /// Pick up an attachment that was put into play unattached during setup.
    pub fn select_attachment_in_play(&mut self, attachment_id: EntityId) -> bool {
        if self.setup_locked() {
            return false;
        }
        let unmapped = self
            .cards_in_play
            .find(attachment_id)
            .is_some_and(|card| card.card_type() == CardType::Attachment);
        if !unmapped {
            return false;
        }
        self.prompt_for_attachment(attachment_id, 0);
        true
    }

    /// Can `target` (a top-level card in this play area) take an attachment?
    #[must_use]
    pub fn can_host_attachment(&self, target_id: EntityId) -> bool {
        self.cards_in_play
            .find(target_id)
            .is_some_and(|target| target.card_type() != CardType::Attachment)
    }

    /// Attach one of this player's attachments to one of their own cards.
    pub fn attach(&mut self, attachment_id: EntityId, target_id: EntityId, bus: &mut EventBus) -> bool {
        if attachment_id == target_id
            || self.attachment_source(attachment_id).is_none()
            || !self.can_host_attachment(target_id)
        {
            return false;
        }
        let Some(attachment) = self.take_attachment(attachment_id) else {
            return false;
        };
        match self.accept_attachment(attachment, target_id, bus) {
            Ok(()) => true,
            Err(attachment) => {
                self.hand.push(attachment);
                false
            }
        }
    }

    /// Remove an attachment from where it waits to be placed.
    pub fn take_attachment(&mut self, attachment_id: EntityId) -> Option<DrawCard> {
        self.attachment_source(attachment_id)?;
        let zone = self.attachment_zone(attachment_id)?;
        let card = self.pile_mut(zone)?.remove(attachment_id)?;
        self.clear_attachment_prompt();
        Some(card)
    }

    /// Put an attachment (possibly the opponent's) on a card in this play
    /// area. Hands the attachment back if the target cannot take it.
    pub fn accept_attachment(
        &mut self,
        mut attachment: DrawCard,
        target_id: EntityId,
        bus: &mut EventBus,
    ) -> Result<(), DrawCard> {
        let Some(target) = self
            .cards_in_play
            .find_mut(target_id)
            .filter(|t| t.card_type() != CardType::Attachment)
        else {
            return Err(attachment);
        };

        attachment.parent = Some(target_id);
        attachment.base_mut().facedown = target.is_facedown();
        attachment.enters_play(bus);
        debug!(card = %attachment.id(), target = %target_id, "attached");
        target.attachments.push(attachment);
        Ok(())
    }

    // === Setup ===

    pub(super) fn show_setup_menu(&mut self) {
        self.buttons = vec![Button::done(Command::SetupDone)];
        self.menu_title = "Select setup cards".to_string();
    }

    /// Setup cards are locked in while waiting for the opponent.
    pub(super) fn setup_locked(&self) -> bool {
        self.phase == Phase::Setup && self.setup_complete
    }

    /// Finish choosing setup cards. Refused while an attachment in play has
    /// no host.
    pub fn setup_done(&mut self) -> bool {
        if self.phase != Phase::Setup || self.setup_complete || self.has_unmapped_attachments() {
            return false;
        }
        self.setup_complete = true;
        self.buttons.clear();
        self.menu_title = "Waiting for opponent to finish setup".to_string();
        true
    }

    /// Reveal the setup cards.
    ///
    /// Refills the hand, flips every card face-up, folds extra copies of a
    /// unique card into duplicates of the first, and subscribes the
    /// abilities of everything now in play. Attachments on a folded copy
    /// move to the copy that stays in play.
    pub fn post_setup(&mut self, bus: &mut EventBus) {
        let refill = self.rules.opening_hand_size.saturating_sub(self.hand.len());
        self.draw_cards_to_hand(refill);

        let mut processed: Vec<DrawCard> = Vec::new();
        for mut card in self.cards_in_play.drain() {
            card.base_mut().facedown = false;
            match processed
                .iter_mut()
                .find(|c| c.is_unique() && c.code() == card.code())
            {
                Some(first) => {
                    for mut attachment in mem::take(&mut card.attachments) {
                        attachment.parent = Some(first.id());
                        first.attachments.push(attachment);
                    }
                    first.add_duplicate(card);
                }
                None => processed.push(card),
            }
        }

        for card in &mut processed {
            card.enters_play(bus);
            for attachment in &mut card.attachments {
                attachment.base_mut().facedown = false;
                attachment.enters_play(bus);
            }
        }
        self.cards_in_play = Pile::from_vec(processed);
    }

    // === Marshal ===

    fn show_marshal_menu(&mut self) {
        self.buttons = vec![Button::done(Command::DoneMarshal)];
        self.menu_title = "Marshal your cards".to_string();
    }

    /// Collect income and set reserve and claim for the round.
    pub fn begin_marshal(&mut self) {
        self.phase = Phase::Marshal;
        self.show_marshal_menu();

        self.gold += self.get_total_income();
        self.reserve = self.get_total_reserve();
        self.claim = self
            .active_plot
            .as_ref()
            .map_or(0, |plot| u32::try_from(plot.claim().max(0)).unwrap_or(0));

        self.limited_played = false;
        self.marshalled = false;
    }

    pub fn marshal_done(&mut self) {
        self.marshalled = true;
        self.buttons.clear();
        self.menu_title = "Waiting for opponent to finish marshalling".to_string();
    }

    /// Active plot value plus every printed modifier in play, clamped at 0.
    fn total_plot_stat(&self, stat: PlotStat) -> u32 {
        let base = self
            .active_plot
            .as_ref()
            .and_then(|plot| plot.definition().stat(stat))
            .unwrap_or(0);
        let modifier: i64 = self
            .cards_in_play
            .iter()
            .flat_map(|card| iter::once(card).chain(card.attachments.iter()))
            .filter_map(|card| card.definition().stat(stat))
            .sum();
        u32::try_from((base + modifier).max(0)).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn get_total_income(&self) -> u32 {
        self.total_plot_stat(PlotStat::Income)
    }

    #[must_use]
    pub fn get_total_initiative(&self) -> u32 {
        self.total_plot_stat(PlotStat::Initiative)
    }

    #[must_use]
    pub fn get_total_reserve(&self) -> u32 {
        self.total_plot_stat(PlotStat::Reserve)
    }
}
