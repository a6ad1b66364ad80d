//! Plot and draw phases.

use tracing::debug;

use super::challenge::ChallengeTracker;
use super::state::Player;
use crate::cards::Card;
use crate::core::{Button, Command, EntityId, GameRng, Phase};
use crate::triggers::EventBus;

impl Player {
    /// Reset the round state and ask for a plot.
    pub fn start_plot_phase(&mut self) {
        self.phase = Phase::Plot;

        self.menu_title = "Choose your plot".to_string();
        self.buttons = vec![Button::done(Command::SelectPlot)];

        self.gold = 0;
        self.claim = 0;
        self.reserve = 0;
        self.first_player = false;
        self.selected_plot = None;
        self.plot_confirmed = false;
        self.claim_to_do = 0;
        self.done_challenges = false;
        self.plot_revealed = false;
        self.round_done = false;
        self.marshalled = false;
        self.challenges = ChallengeTracker::new(&self.rules);
    }

    /// Choose a plot from the plot deck. Any earlier choice is replaced.
    pub fn select_plot(&mut self, plot_id: EntityId) -> bool {
        if self.phase != Phase::Plot || self.plot_confirmed || !self.plot_deck.contains(plot_id) {
            return false;
        }
        self.selected_plot = Some(plot_id);
        true
    }

    /// Lock in the selected plot.
    pub fn confirm_plot(&mut self) -> bool {
        if self.selected_plot.is_none() {
            return false;
        }
        self.plot_confirmed = true;
        self.buttons.clear();
        self.menu_title = "Waiting for opponent to select plot".to_string();
        true
    }

    /// Reveal the selected plot.
    ///
    /// The previous plot leaves play into the plot discard pile. Revealing
    /// the last plot of the deck shuffles the plot discard pile back into it.
    pub fn reveal_plot(&mut self, bus: &mut EventBus, rng: &mut GameRng) -> bool {
        let Some(mut plot) = self
            .selected_plot
            .and_then(|plot_id| self.plot_deck.remove(plot_id))
        else {
            return false;
        };

        self.menu_title.clear();
        self.buttons.clear();

        if let Some(mut previous) = self.active_plot.take() {
            previous.leaves_play(bus);
            self.departures.left_play.push(previous.id());
            self.plot_discard.push(previous);
        }

        plot.revealed(bus);
        debug!(player = %self.id, plot = plot.name(), "plot revealed");
        self.active_plot = Some(plot);

        if self.plot_deck.is_empty() {
            let recycled = self.plot_discard.drain();
            self.plot_deck.extend(recycled);
            self.plot_deck.shuffle(rng);
        }

        self.plot_revealed = true;
        self.selected_plot = None;
        true
    }

    /// Does the active plot carry a "When Revealed:" ability?
    #[must_use]
    pub fn has_when_revealed(&self) -> bool {
        self.active_plot
            .as_ref()
            .is_some_and(|plot| plot.has_when_revealed())
    }

    /// Draw the cards for the round.
    pub fn draw_phase(&mut self) -> usize {
        self.phase = Phase::Draw;
        self.draw_cards_to_hand(self.rules.draw_phase_cards)
    }
}
