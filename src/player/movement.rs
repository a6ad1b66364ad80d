//! Moving cards between zones.
//!
//! A card leaving play takes its whole stack with it: duplicates go to the
//! same destination, attachments go back to their owner (hand, or discard
//! pile when Terminal). Every card that leaves play is unsubscribed from
//! the event bus in the same call.
//!
//! A player can only reach their own zones. Cards that belong to the
//! opponent, such as an attachment placed on one of this player's
//! characters, are queued as [`Departures`] for the game to deliver.

use std::mem;

use tracing::{debug, error};

use super::state::Player;
use crate::cards::{Card, CardType, DrawCard};
use crate::core::{EntityId, Zone};
use crate::triggers::EventBus;
use crate::zones::Pile;

/// A card that must land in the opponent's zones.
#[derive(Clone, Debug)]
pub struct Outbound {
    pub card: DrawCard,
    pub zone: Zone,
}

/// What happened during a command that the game has to follow up on.
#[derive(Clone, Debug, Default)]
pub struct Departures {
    /// Every card that left play, in order.
    pub left_play: Vec<EntityId>,
    pub to_opponent: Vec<Outbound>,
}

impl Departures {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left_play.is_empty() && self.to_opponent.is_empty()
    }
}

/// Can a card be dragged from `source` to `target`?
///
/// Plots only move between the active plot slot and the plot discard pile.
/// The plot deck is never a drag source or target.
#[must_use]
pub fn is_valid_drop_combination(source: Zone, target: Zone) -> bool {
    if source == target {
        return false;
    }
    if source == Zone::PlotDeck || target == Zone::PlotDeck {
        return false;
    }
    match (source, target) {
        (Zone::ActivePlot, Zone::PlotDiscard) | (Zone::PlotDiscard, Zone::ActivePlot) => true,
        (s, t) => !s.holds_plots() && !t.holds_plots(),
    }
}

impl Player {
    /// Hand the queued departures to the caller.
    pub fn take_departures(&mut self) -> Departures {
        mem::take(&mut self.departures)
    }

    /// The draw-card pile backing a zone.
    #[must_use]
    pub fn pile(&self, zone: Zone) -> Option<&Pile<DrawCard>> {
        match zone {
            Zone::Hand => Some(&self.hand),
            Zone::DrawDeck => Some(&self.draw_deck),
            Zone::DiscardPile => Some(&self.discard_pile),
            Zone::DeadPile => Some(&self.dead_pile),
            Zone::PlayArea => Some(&self.cards_in_play),
            Zone::PlotDeck | Zone::ActivePlot | Zone::PlotDiscard => None,
        }
    }

    pub fn pile_mut(&mut self, zone: Zone) -> Option<&mut Pile<DrawCard>> {
        match zone {
            Zone::Hand => Some(&mut self.hand),
            Zone::DrawDeck => Some(&mut self.draw_deck),
            Zone::DiscardPile => Some(&mut self.discard_pile),
            Zone::DeadPile => Some(&mut self.dead_pile),
            Zone::PlayArea => Some(&mut self.cards_in_play),
            Zone::PlotDeck | Zone::ActivePlot | Zone::PlotDiscard => None,
        }
    }

    /// Send an out-of-play card to its owner's `zone`.
    fn route(&mut self, card: DrawCard, zone: Zone) {
        if card.owner() == self.id {
            self.receive(card, zone);
        } else {
            self.departures.to_opponent.push(Outbound { card, zone });
        }
    }

    /// Put an out-of-play card on top of one of this player's piles.
    pub fn receive(&mut self, card: DrawCard, zone: Zone) {
        match self.pile_mut(zone) {
            Some(pile) if zone != Zone::PlayArea => pile.push(card),
            _ => {
                error!(player = %self.id, card = %card.id(), %zone, "cannot receive card; discarding");
                self.discard_pile.push(card);
            }
        }
    }

    /// Take a card out of play, top-level or attached, and send it to
    /// `destination`.
    ///
    /// Duplicates follow the card; attachments go back to their owners.
    pub fn leave_play(&mut self, card_id: EntityId, destination: Zone, bus: &mut EventBus) -> bool {
        if destination == Zone::PlayArea || destination.holds_plots() {
            return false;
        }

        let removed = match self.cards_in_play.remove(card_id) {
            Some(card) => Some(card),
            None => self
                .cards_in_play
                .iter_mut()
                .find_map(|host| host.remove_attachment(card_id)),
        };
        let Some(mut card) = removed else {
            return false;
        };

        for dupe in mem::take(&mut card.dupes) {
            let dupe = self.release_duplicate(dupe, bus);
            self.route(dupe, destination);
        }
        for attachment in mem::take(&mut card.attachments) {
            self.remove_attachment(attachment, bus);
        }

        card.leaves_play(bus);
        self.cards_in_challenge.retain(|&id| id != card_id);
        self.departures.left_play.push(card_id);
        debug!(player = %self.id, card = %card_id, %destination, "left play");
        self.route(card, destination);
        true
    }

    /// Strip a duplicate leaving its host of anything still attached to it.
    pub(super) fn release_duplicate(&mut self, mut dupe: DrawCard, bus: &mut EventBus) -> DrawCard {
        for attachment in mem::take(&mut dupe.attachments) {
            self.remove_attachment(attachment, bus);
        }
        dupe
    }

    /// Detach an attachment and return it to its owner: discard pile if
    /// Terminal, hand otherwise.
    pub fn remove_attachment(&mut self, mut attachment: DrawCard, bus: &mut EventBus) {
        let zone = if attachment.is_terminal() {
            Zone::DiscardPile
        } else {
            Zone::Hand
        };

        attachment.leaves_play(bus);
        self.departures.left_play.push(attachment.id());
        self.route(attachment, zone);
    }

    /// Put a card in play into the discard or dead pile.
    ///
    /// Only characters die.
    pub fn discard_card(&mut self, card_id: EntityId, pile: Zone, bus: &mut EventBus) -> bool {
        if !matches!(pile, Zone::DiscardPile | Zone::DeadPile) {
            return false;
        }
        let Some(card) = self.find_card_in_play(card_id) else {
            return false;
        };
        if pile == Zone::DeadPile && !card.is_character() {
            return false;
        }

        self.leave_play(card_id, pile, bus)
    }

    /// Drag a card from one of this player's zones to another.
    ///
    /// The attachment waiting for a target cannot be dragged until the
    /// prompt is finished or cancelled.
    pub fn drop(&mut self, card_id: EntityId, source: Zone, target: Zone, bus: &mut EventBus) -> bool {
        if !is_valid_drop_combination(source, target) || self.selected_attachment == Some(card_id) {
            return false;
        }
        if source.holds_plots() {
            return self.drop_plot(card_id, source, bus);
        }

        let card = match source {
            Zone::PlayArea => self.find_card_in_play(card_id),
            other => self.pile(other).and_then(|pile| pile.find(card_id)),
        };
        let Some(card) = card else {
            return false;
        };

        match target {
            Zone::DeadPile if !card.is_character() => return false,
            Zone::PlayArea if card.card_type() == CardType::Event || self.setup_locked() => return false,
            _ => {}
        }

        if source == Zone::PlayArea {
            return self.leave_play(card_id, target, bus);
        }

        let Some(card) = self.pile_mut(source).and_then(|pile| pile.remove(card_id)) else {
            return false;
        };

        if target == Zone::PlayArea {
            self.hand.push(card);
            if !self.play_card(card_id, true, bus) {
                return false;
            }
            if self.selected_attachment == Some(card_id) {
                self.drop_pending = true;
            }
            return true;
        }

        self.receive(card, target);
        true
    }

    /// Swap plots between the active slot and the plot discard pile.
    fn drop_plot(&mut self, card_id: EntityId, source: Zone, bus: &mut EventBus) -> bool {
        match source {
            Zone::ActivePlot => {
                if self.active_plot.as_ref().map(Card::id) != Some(card_id) {
                    return false;
                }
                let Some(mut plot) = self.active_plot.take() else {
                    return false;
                };
                plot.leaves_play(bus);
                self.departures.left_play.push(card_id);
                self.plot_discard.push(plot);
                true
            }
            Zone::PlotDiscard => {
                let Some(mut plot) = self.plot_discard.remove(card_id) else {
                    return false;
                };
                if let Some(mut previous) = self.active_plot.take() {
                    previous.leaves_play(bus);
                    self.departures.left_play.push(previous.id());
                    self.plot_discard.push(previous);
                }
                plot.revealed(bus);
                self.active_plot = Some(plot);
                true
            }
            _ => false,
        }
    }
}
