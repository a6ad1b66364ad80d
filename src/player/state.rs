//! Player state: zones, scalars and per-phase flags.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::challenge::ChallengeTracker;
use super::movement::Departures;
use crate::abilities::AbilityRegistry;
use crate::cards::{Card, CardRegistry, CardType, DrawCard, PlotCard};
use crate::core::{
    Button, ChallengeType, Command, EngineError, EntityAllocator, EntityId, GameRng, Phase, PlayerId,
    RulesConfig,
};
use crate::game::Deck;
use crate::zones::Pile;

/// Faction and agenda of the deck a player brought.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckInfo {
    pub faction: Option<String>,
    pub agenda: Option<String>,
}

/// Everything one player owns and every flag of their state machine.
///
/// Commands return `false` (or `None`) and leave the player untouched when
/// they are not legal; they never panic on bad input.
#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub rules: RulesConfig,
    pub deck: DeckInfo,

    // === Zones ===
    pub hand: Pile<DrawCard>,
    /// Top of the pile is the next card drawn.
    pub draw_deck: Pile<DrawCard>,
    pub discard_pile: Pile<DrawCard>,
    pub dead_pile: Pile<DrawCard>,
    /// Top-level cards in play; duplicates and attachments hang off them.
    pub cards_in_play: Pile<DrawCard>,
    pub plot_deck: Pile<PlotCard>,
    pub plot_discard: Pile<PlotCard>,
    pub active_plot: Option<PlotCard>,

    // === Scalars ===
    pub gold: u32,
    pub claim: u32,
    /// Power on the faction card.
    pub power: u32,
    pub reserve: u32,
    pub phase: Phase,

    // === Pre-game ===
    pub taken_mulligan: bool,
    pub ready_to_start: bool,
    pub setup_complete: bool,

    // === Round state ===
    pub first_player: bool,
    pub selected_plot: Option<EntityId>,
    pub plot_confirmed: bool,
    pub plot_revealed: bool,
    pub limited_played: bool,
    pub marshalled: bool,
    pub done_challenges: bool,
    pub round_done: bool,
    pub challenges: ChallengeTracker,
    pub current_challenge: Option<ChallengeType>,
    pub cards_in_challenge: Vec<EntityId>,
    pub challenge_strength: u32,
    pub challenger: bool,
    pub selecting_challengers: bool,
    pub picking_stealth: bool,
    pub claim_to_do: u32,

    // === Prompts ===
    pub select_card: bool,
    pub selected_attachment: Option<EntityId>,
    /// Gold paid for the attachment awaiting a target, refunded on cancel.
    pub attachment_paid: u32,
    /// An attachment was dropped into play and still needs a target.
    pub drop_pending: bool,
    pub show_deck: bool,
    pub menu_title: String,
    pub buttons: Vec<Button>,

    pub(super) departures: Departures,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, rules: RulesConfig) -> Self {
        Self {
            id,
            name: name.into(),
            rules,
            deck: DeckInfo::default(),
            hand: Pile::new(),
            draw_deck: Pile::new(),
            discard_pile: Pile::new(),
            dead_pile: Pile::new(),
            cards_in_play: Pile::new(),
            plot_deck: Pile::new(),
            plot_discard: Pile::new(),
            active_plot: None,
            gold: 0,
            claim: 0,
            power: 0,
            reserve: 0,
            phase: Phase::Mulligan,
            taken_mulligan: false,
            ready_to_start: false,
            setup_complete: false,
            first_player: false,
            selected_plot: None,
            plot_confirmed: false,
            plot_revealed: false,
            limited_played: false,
            marshalled: false,
            done_challenges: false,
            round_done: false,
            challenges: ChallengeTracker::new(&rules),
            current_challenge: None,
            cards_in_challenge: Vec::new(),
            challenge_strength: 0,
            challenger: false,
            selecting_challengers: false,
            picking_stealth: false,
            claim_to_do: 0,
            select_card: false,
            selected_attachment: None,
            attachment_paid: 0,
            drop_pending: false,
            show_deck: false,
            menu_title: String::new(),
            buttons: Vec::new(),
            departures: Departures::default(),
        }
    }

    /// Materialise a deck into card instances.
    ///
    /// Draw cards land in the draw deck and plots in the plot deck, each
    /// with a fresh id and, if its code has one, its ability. Nothing is
    /// changed when the deck names an unknown card or puts a card in the
    /// wrong section.
    pub fn select_deck(
        &mut self,
        deck: &Deck,
        catalog: &CardRegistry,
        abilities: &AbilityRegistry,
        ids: &mut EntityAllocator,
    ) -> Result<(), EngineError> {
        for entry in &deck.draw_cards {
            let definition = catalog.lookup(&entry.code)?;
            if !definition.card_type.is_draw_card() {
                return Err(EngineError::WrongCardType {
                    code: entry.code.clone(),
                    section: "draw",
                });
            }
        }
        for entry in &deck.plot_cards {
            let definition = catalog.lookup(&entry.code)?;
            if definition.card_type != CardType::Plot {
                return Err(EngineError::WrongCardType {
                    code: entry.code.clone(),
                    section: "plot",
                });
            }
        }

        let mut draw_cards = Vec::new();
        for entry in &deck.draw_cards {
            let definition = catalog.lookup(&entry.code)?;
            for _ in 0..entry.count {
                let ability = abilities.create(&entry.code);
                draw_cards.push(DrawCard::new(ids.alloc(), self.id, definition.clone(), ability));
            }
        }

        let mut plot_cards = Vec::new();
        for entry in &deck.plot_cards {
            let definition = catalog.lookup(&entry.code)?;
            for _ in 0..entry.count {
                let ability = abilities.create(&entry.code);
                plot_cards.push(PlotCard::new(ids.alloc(), self.id, definition.clone(), ability));
            }
        }

        debug!(
            player = %self.id,
            draw = draw_cards.len(),
            plots = plot_cards.len(),
            "deck selected"
        );
        self.draw_deck = Pile::from_vec(draw_cards);
        self.plot_deck = Pile::from_vec(plot_cards);
        self.deck = DeckInfo {
            faction: deck.faction.clone(),
            agenda: deck.agenda.clone(),
        };
        Ok(())
    }

    // === Draw deck ===

    pub fn shuffle_draw_deck(&mut self, rng: &mut GameRng) {
        self.draw_deck.shuffle(rng);
    }

    /// Draw up to `count` cards. Drawing from an empty deck draws nothing.
    ///
    /// Returns the number of cards actually drawn.
    pub fn draw_cards_to_hand(&mut self, count: usize) -> usize {
        let drawn = self.draw_deck.take_top(count);
        let n = drawn.len();
        self.hand.extend(drawn);
        n
    }

    /// Cards among the top `limit` of the draw deck (all of it when `None`)
    /// matching `predicate`, topmost first.
    pub fn search_draw_deck<F>(&self, limit: Option<usize>, predicate: F) -> Vec<&DrawCard>
    where
        F: Fn(&DrawCard) -> bool,
    {
        let limit = limit.unwrap_or(self.draw_deck.len());
        self.draw_deck
            .peek_top(limit)
            .filter(|card| predicate(card))
            .collect()
    }

    pub fn move_from_draw_deck_to_hand(&mut self, card_id: EntityId) -> bool {
        let Some(card) = self.draw_deck.remove(card_id) else {
            return false;
        };
        self.hand.push(card);
        true
    }

    /// Discard up to `count` cards from the top of the draw deck.
    pub fn discard_from_draw(&mut self, count: usize) -> usize {
        let discarded = self.draw_deck.take_top(count);
        let n = discarded.len();
        self.discard_pile.extend(discarded);
        n
    }

    pub fn show_draw_deck(&mut self) {
        self.show_deck = true;
    }

    // === Game start ===

    /// Return the hand to the deck, shuffle, and draw an opening hand.
    pub fn init_draw_deck(&mut self, rng: &mut GameRng) {
        let hand = self.hand.drain();
        self.draw_deck.extend(hand);
        self.shuffle_draw_deck(rng);
        self.draw_cards_to_hand(self.rules.opening_hand_size);
    }

    /// Gather every plot back into the plot deck.
    pub fn init_plot_deck(&mut self) {
        let discarded = self.plot_discard.drain();
        self.plot_deck.extend(discarded);
        self.plot_deck.extend(self.active_plot.take());
    }

    pub fn initialise(&mut self, rng: &mut GameRng) {
        self.init_draw_deck(rng);
        self.init_plot_deck();

        self.gold = 0;
        self.claim = 0;
        self.power = 0;
        self.reserve = 0;
        self.phase = Phase::Mulligan;
        self.ready_to_start = false;
        self.limited_played = false;
        self.claim_to_do = 0;

        self.menu_title = "Keep Starting Hand?".to_string();
        self.buttons = vec![
            Button::new(Command::Keep, "Keep Hand"),
            Button::new(Command::Mulligan, "Mulligan"),
        ];
    }

    /// Enter setup. Only once the player has kept or mulliganed.
    pub fn start_game(&mut self) -> bool {
        if !self.ready_to_start {
            return false;
        }

        self.gold = self.rules.setup_gold;
        self.phase = Phase::Setup;
        self.show_setup_menu();
        true
    }

    /// Redraw the opening hand. Allowed once.
    pub fn mulligan(&mut self, rng: &mut GameRng) -> bool {
        if self.taken_mulligan || self.phase != Phase::Mulligan {
            return false;
        }

        self.init_draw_deck(rng);
        self.taken_mulligan = true;
        self.wait_for_opponent_to_start();
        debug!(player = %self.id, "took mulligan");
        true
    }

    pub fn keep(&mut self) -> bool {
        if self.phase != Phase::Mulligan {
            return false;
        }
        self.wait_for_opponent_to_start();
        true
    }

    fn wait_for_opponent_to_start(&mut self) {
        self.ready_to_start = true;
        self.buttons.clear();
        self.menu_title = "Waiting for opponent to keep hand or mulligan".to_string();
    }

    // === Lookup ===

    /// A card in play, top-level or attached.
    #[must_use]
    pub fn find_card_in_play(&self, card_id: EntityId) -> Option<&DrawCard> {
        self.cards_in_play.iter().find_map(|card| {
            if card.id() == card_id {
                Some(card)
            } else {
                card.attachments.iter().find(|a| a.id() == card_id)
            }
        })
    }

    pub fn find_card_in_play_mut(&mut self, card_id: EntityId) -> Option<&mut DrawCard> {
        self.cards_in_play.iter_mut().find_map(|card| {
            if card.id() == card_id {
                Some(card)
            } else {
                card.attachments.iter_mut().find(|a| a.id() == card_id)
            }
        })
    }

    /// The first top-level card in play with this code.
    #[must_use]
    pub fn find_card_in_play_by_code(&self, code: &str) -> Option<&DrawCard> {
        self.cards_in_play.iter().find(|card| card.code() == code)
    }

    /// Is the card in play here, as a top-level card, an attachment or the
    /// active plot?
    #[must_use]
    pub fn is_card_in_play(&self, card_id: EntityId) -> bool {
        if let Some(plot) = &self.active_plot {
            if plot.id() == card_id {
                return plot.is_in_play();
            }
        }
        self.find_card_in_play(card_id).is_some_and(Card::is_in_play)
    }

    /// Every card id this player currently holds, in any zone.
    #[must_use]
    pub fn all_card_ids(&self) -> Vec<EntityId> {
        let mut ids = Vec::new();
        for pile in [&self.hand, &self.draw_deck, &self.discard_pile, &self.dead_pile] {
            ids.extend(pile.ids());
        }
        ids.extend(self.cards_in_play.iter().flat_map(DrawCard::all_ids));
        ids.extend(self.plot_deck.ids());
        ids.extend(self.plot_discard.ids());
        ids.extend(self.active_plot.as_ref().map(Card::id));
        ids
    }

    /// Faction power plus power on cards in play.
    #[must_use]
    pub fn get_total_power(&self) -> u32 {
        self.cards_in_play
            .iter()
            .fold(self.power, |total, card| total + card.power)
    }
}
