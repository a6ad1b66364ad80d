//! What a client sees of a player.

use serde::Serialize;

use super::challenge::ChallengeTracker;
use super::state::Player;
use crate::cards::{Card, CardSummary};
use crate::core::{Button, EntityId, Phase, PlayerId, Zone};
use crate::zones::Pile;

/// One player's state, as rendered for one viewer.
///
/// The shape is the same for the owner and the opponent. What changes is
/// which card summaries are hidden and whether the prompt is filled in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub faction: Option<String>,
    pub agenda: Option<String>,

    pub num_draw_cards: usize,
    pub hand: Vec<CardSummary>,
    pub buttons: Vec<Button>,
    pub menu_title: String,

    pub gold: u32,
    pub power: u32,
    pub total_power: u32,
    pub reserve: u32,
    pub claim: u32,
    pub phase: Phase,

    pub cards_in_play: Vec<CardSummary>,
    pub plot_deck: Vec<CardSummary>,
    pub num_plot_cards: usize,
    pub plot_selected: bool,
    pub active_plot: Option<CardSummary>,
    pub first_player: bool,
    pub plot_discard: Vec<CardSummary>,

    pub selected_attachment: Option<EntityId>,
    pub select_card: bool,
    pub dead_pile: Vec<CardSummary>,
    pub discard_pile: Vec<CardSummary>,

    pub show_deck: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_deck: Option<Vec<CardSummary>>,

    pub challenges: ChallengeTracker,
}

fn summarise<C: Card>(pile: &Pile<C>, show: bool) -> Vec<CardSummary> {
    pile.iter().map(|card| card.summary(show)).collect()
}

/// Summaries of a pile under its zone's visibility rule.
fn summarise_zone<C: Card>(pile: &Pile<C>, zone: Zone, is_owner: bool) -> Vec<CardSummary> {
    summarise(pile, zone.visibility().shows_to(is_owner))
}

/// The prompt belongs to its owner; the opponent gets an empty one.
fn owner_view<T: Clone + Default>(is_active_player: bool, value: &T) -> T {
    if is_active_player {
        value.clone()
    } else {
        T::default()
    }
}

impl Player {
    /// Render this player for a viewer. `is_active_player` is true when the
    /// viewer owns this player.
    #[must_use]
    pub fn get_state(&self, is_active_player: bool) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id,
            name: self.name.clone(),
            faction: self.deck.faction.clone(),
            agenda: self.deck.agenda.clone(),

            num_draw_cards: self.draw_deck.len(),
            hand: summarise_zone(&self.hand, Zone::Hand, is_active_player),
            buttons: owner_view(is_active_player, &self.buttons),
            menu_title: owner_view(is_active_player, &self.menu_title),

            gold: if !is_active_player && self.phase == Phase::Setup {
                0
            } else {
                self.gold
            },
            power: self.power,
            total_power: self.get_total_power(),
            reserve: self.reserve,
            claim: self.claim,
            phase: self.phase,

            cards_in_play: self
                .cards_in_play
                .iter()
                .map(|card| card.summary(is_active_player || !card.is_facedown()))
                .collect(),
            plot_deck: summarise_zone(&self.plot_deck, Zone::PlotDeck, is_active_player),
            num_plot_cards: self.plot_deck.len(),
            plot_selected: self.selected_plot.is_some(),
            active_plot: self.active_plot.as_ref().map(|plot| plot.summary(true)),
            first_player: self.first_player,
            plot_discard: summarise_zone(&self.plot_discard, Zone::PlotDiscard, is_active_player),

            selected_attachment: if is_active_player {
                self.selected_attachment
            } else {
                None
            },
            select_card: self.select_card,
            dead_pile: summarise_zone(&self.dead_pile, Zone::DeadPile, is_active_player),
            discard_pile: summarise_zone(&self.discard_pile, Zone::DiscardPile, is_active_player),

            show_deck: self.show_deck,
            draw_deck: self
                .show_deck
                .then(|| summarise(&self.draw_deck, is_active_player)),

            challenges: self.challenges.clone(),
        }
    }
}
