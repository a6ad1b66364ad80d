//! The two-player game.
//!
//! `Game` owns both players, the event bus, the RNG and the message log,
//! and sequences the round: plot, draw, marshal, challenges, dominance and
//! taxation. Players validate their own commands; the game decides whose
//! turn it is and carries out everything that touches both players.

use std::cmp::{Ordering, Reverse};

use im::Vector;
use serde::Serialize;
use tracing::{debug, error, info};

use super::context::{dispatch, GameContext};
use super::deck::Deck;
use crate::abilities::AbilityRegistry;
use crate::cards::{keyword, Card, CardRegistry};
use crate::core::{
    ChallengeType, Command, EngineError, EntityAllocator, EntityId, GameConfig, GameRng, Phase,
    PlayerId, PlayerMap, Zone, PLAYER_COUNT,
};
use crate::player::{Player, PlayerSnapshot};
use crate::triggers::{EventBus, GameEvent};

/// A seat at the table: who sits there and what they brought.
#[derive(Clone, Debug)]
pub struct PlayerSetup {
    pub name: String,
    pub deck: Deck,
}

impl PlayerSetup {
    pub fn new(name: impl Into<String>, deck: Deck) -> Self {
        Self {
            name: name.into(),
            deck,
        }
    }
}

/// Where a challenge stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStage {
    /// The attacker is choosing participants.
    Declaring,
    /// The defender is choosing participants.
    Defending,
    /// The attacker won a military challenge; the defender is killing.
    Claim,
}

/// The challenge currently being fought.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeInProgress {
    pub challenge_type: ChallengeType,
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub stage: ChallengeStage,
}

/// Everything one viewer may see of the game.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub round: u32,
    pub first_player: Option<PlayerId>,
    pub challenge: Option<ChallengeInProgress>,
    pub players: Vec<PlayerSnapshot>,
    pub messages: Vector<String>,
}

/// A running game.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    players: PlayerMap<Player>,
    events: EventBus,
    rng: GameRng,
    ids: EntityAllocator,
    messages: Vector<String>,
    round: u32,
    first_player: Option<PlayerId>,
    /// Whose turn it is to declare challenges.
    challenging: Option<PlayerId>,
    challenge: Option<ChallengeInProgress>,
}

impl Game {
    /// Seat both players, build their decks and deal opening hands.
    pub fn new(
        config: GameConfig,
        seats: [PlayerSetup; PLAYER_COUNT],
        catalog: &CardRegistry,
        abilities: &AbilityRegistry,
    ) -> Result<Self, EngineError> {
        let mut ids = EntityAllocator::new(PLAYER_COUNT);
        let mut players = PlayerMap::new(|id| Player::new(id, String::new(), config.rules));

        for (id, seat) in PlayerId::all().zip(seats) {
            let player = &mut players[id];
            player.name = seat.name;
            player.select_deck(&seat.deck, catalog, abilities, &mut ids)?;
        }

        let mut game = Self {
            rng: GameRng::new(config.seed),
            config,
            players,
            events: EventBus::new(),
            ids,
            messages: Vector::new(),
            round: 0,
            first_player: None,
            challenging: None,
            challenge: None,
        };

        for id in PlayerId::all() {
            game.players[id].initialise(&mut game.rng);
        }
        info!(seed = game.rng.seed(), "game created");
        Ok(game)
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    #[must_use]
    pub fn messages(&self) -> &Vector<String> {
        &self.messages
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn first_player(&self) -> Option<PlayerId> {
        self.first_player
    }

    #[must_use]
    pub fn challenge(&self) -> Option<&ChallengeInProgress> {
        self.challenge.as_ref()
    }

    /// Ids handed out so far, including the ones reserved for players.
    #[must_use]
    pub fn cards_created(&self) -> u32 {
        self.ids.high_water_mark()
    }

    /// The game as `viewer` sees it.
    #[must_use]
    pub fn get_state(&self, viewer: PlayerId) -> GameSnapshot {
        GameSnapshot {
            round: self.round,
            first_player: self.first_player,
            challenge: self.challenge,
            players: self
                .players
                .iter()
                .map(|(id, player)| player.get_state(id == viewer))
                .collect(),
            messages: self.messages.clone(),
        }
    }

    // === Commands ===

    /// Carry out a button press.
    pub fn apply_command(&mut self, player: PlayerId, command: Command) -> bool {
        let accepted = match command {
            Command::Keep => self.keep(player),
            Command::Mulligan => self.mulligan(player),
            Command::SetupDone => self.setup_done(player),
            Command::SelectPlot => self.confirm_plot(player),
            Command::DoneMarshal => self.marshal_done(player),
            Command::DoneAttachment => self.players[player].cancel_attachment(),
            Command::Challenge(challenge_type) => self.start_challenge(player, challenge_type),
            Command::DoneChallenge => self.done_challenge(player),
            Command::DoneDefend => self.done_defend(player),
            Command::DoneAllChallenges => self.done_all_challenges(player),
            Command::CancelClaim => self.cancel_claim(player),
        };
        if !accepted {
            debug!(%player, ?command, "command rejected");
        }
        accepted
    }

    /// A click on a card. What it means depends on the phase and on any
    /// pending prompt.
    pub fn card_clicked(&mut self, player: PlayerId, card: EntityId) -> bool {
        if let Some(attachment) = self.players[player].selected_attachment {
            return attachment != card && self.attach(player, attachment, card);
        }
        if self.challenge.is_some_and(|c| c.stage == ChallengeStage::Claim) {
            return self.kill_for_claim(player, card);
        }

        let phase = self.players[player].phase;
        let in_hand = self.players[player].is_card_in_hand(card);
        let marshalling = !self.players[player].marshalled;

        match phase {
            Phase::Setup if in_hand => self.play_card(player, card, false),
            Phase::Setup => self.players[player].select_attachment_in_play(card),
            Phase::Marshal if marshalling => self.play_card(player, card, false),
            Phase::Plot => self.select_plot(player, card),
            Phase::Challenge => self.select_for_challenge(player, card),
            _ => false,
        }
    }

    /// Play a card from hand. Forced plays skip legality and cost.
    pub fn play_card(&mut self, player: PlayerId, card: EntityId, force: bool) -> bool {
        let was_in_play = self.is_in_play(card);
        if !self.players[player].play_card(card, force, &mut self.events) {
            return false;
        }

        let name = self.card_name(player, card);
        self.add_message(format!("{} plays {}", self.players[player].name, name));
        self.announce_if_entered(player, card, was_in_play);
        true
    }

    /// Drag a card between two of `player`'s zones.
    pub fn drop(&mut self, player: PlayerId, card: EntityId, source: Zone, target: Zone) -> bool {
        let was_in_play = self.is_in_play(card);
        if !self.players[player].drop(card, source, target, &mut self.events) {
            return false;
        }

        let name = self.card_name(player, card);
        self.add_message(format!(
            "{} has moved {} from their {} to their {}",
            self.players[player].name, name, source, target
        ));
        self.route_departures();
        self.announce_if_entered(player, card, was_in_play);
        true
    }

    /// Place `player`'s pending attachment on a card in either play area.
    pub fn attach(&mut self, player: PlayerId, attachment: EntityId, target: EntityId) -> bool {
        let opponent = player.opponent();
        let was_in_play = self.is_in_play(attachment);

        let attached = if self.players[player].can_host_attachment(target) {
            self.players[player].attach(attachment, target, &mut self.events)
        } else if self.players[opponent].can_host_attachment(target) {
            self.attach_to_opponent(player, attachment, target)
        } else {
            false
        };
        if !attached {
            return false;
        }

        let host = self.locate_in_play(attachment).unwrap_or_else(|err| {
            error!(%err, "attached card went missing");
            player
        });
        self.add_message(format!(
            "{} attaches {} to {}",
            self.players[player].name,
            self.card_name(host, attachment),
            self.card_name(host, target)
        ));
        self.announce_if_entered(host, attachment, was_in_play);
        true
    }

    fn attach_to_opponent(&mut self, player: PlayerId, attachment: EntityId, target: EntityId) -> bool {
        let (me, them) = self.players.pair_mut(player);
        if me.attachment_source(attachment).is_none() {
            return false;
        }
        let Some(card) = me.take_attachment(attachment) else {
            return false;
        };
        match them.accept_attachment(card, target, &mut self.events) {
            Ok(()) => true,
            Err(card) => {
                error!(%player, card = %attachment, target = %target, "attachment refused after check");
                me.hand.push(card);
                false
            }
        }
    }

    // === Mulligan and setup ===

    fn keep(&mut self, player: PlayerId) -> bool {
        if !self.players[player].keep() {
            return false;
        }
        self.add_message(format!("{} has kept their hand", self.players[player].name));
        self.maybe_start_game();
        true
    }

    fn mulligan(&mut self, player: PlayerId) -> bool {
        if !self.players[player].mulligan(&mut self.rng) {
            return false;
        }
        self.add_message(format!("{} has taken a mulligan", self.players[player].name));
        self.maybe_start_game();
        true
    }

    fn maybe_start_game(&mut self) {
        if !self.players.values().all(|p| p.ready_to_start) {
            return;
        }
        for id in PlayerId::all() {
            self.players[id].start_game();
        }
        info!("setup started");
        self.emit(GameEvent::phase_started(Phase::Setup));
    }

    fn setup_done(&mut self, player: PlayerId) -> bool {
        if !self.players[player].setup_done() {
            return false;
        }
        self.add_message(format!("{} has finished setup", self.players[player].name));
        if self.players.values().all(|p| p.setup_complete) {
            self.finish_setup();
        }
        true
    }

    /// Flip setup cards and start the first round.
    fn finish_setup(&mut self) {
        for id in PlayerId::all() {
            self.players[id].post_setup(&mut self.events);
        }
        self.route_departures();

        for id in PlayerId::all() {
            let entered: Vec<_> = self.players[id]
                .cards_in_play
                .iter()
                .flat_map(|card| card.all_ids())
                .filter(|&card| self.players[id].is_card_in_play(card))
                .collect();
            for card in entered {
                self.emit(GameEvent::card_entered_play(id, card));
            }
        }

        self.begin_plot_phase();
    }

    // === Plot, draw and marshal ===

    fn begin_plot_phase(&mut self) {
        self.round += 1;
        self.first_player = None;
        self.challenging = None;
        self.challenge = None;

        for id in PlayerId::all() {
            self.players[id].start_plot_phase();
        }
        info!(round = self.round, "plot phase");
        self.emit(GameEvent::phase_started(Phase::Plot));
    }

    /// Choose a plot from the plot deck.
    pub fn select_plot(&mut self, player: PlayerId, plot: EntityId) -> bool {
        self.players[player].select_plot(plot)
    }

    fn confirm_plot(&mut self, player: PlayerId) -> bool {
        if !self.players[player].confirm_plot() {
            return false;
        }
        if self.players.values().all(|p| p.plot_confirmed) {
            self.reveal_plots();
        }
        true
    }

    /// Reveal both plots at once, then settle initiative.
    fn reveal_plots(&mut self) {
        for id in PlayerId::all() {
            self.players[id].reveal_plot(&mut self.events, &mut self.rng);
        }
        self.route_departures();

        for id in PlayerId::all() {
            let Some(plot) = self.players[id].active_plot.as_ref() else {
                continue;
            };
            let plot_id = plot.id();
            let mut message = format!("{} reveals {}", self.players[id].name, plot.name());
            if plot.has_when_revealed() {
                message.push_str(" (When Revealed)");
            }
            info!(player = %id, plot = plot.name(), "plot revealed");
            self.add_message(message);
            self.emit(GameEvent::plot_revealed(id, plot_id));
        }

        let first = self.choose_first_player();
        self.first_player = Some(first);
        for (id, player) in self.players.iter_mut() {
            player.first_player = id == first;
        }
        self.add_message(format!(
            "{} has won initiative and is first player",
            self.players[first].name
        ));

        self.draw_phase();
    }

    /// Highest initiative wins; ties go to the player with less power, then
    /// to a coin flip.
    fn choose_first_player(&mut self) -> PlayerId {
        let key = |player: &Player| (player.get_total_initiative(), Reverse(player.get_total_power()));
        let (a, b) = (PlayerId::new(0), PlayerId::new(1));

        match key(&self.players[a]).cmp(&key(&self.players[b])) {
            Ordering::Greater => a,
            Ordering::Less => b,
            Ordering::Equal => {
                if self.rng.gen_bool(0.5) {
                    a
                } else {
                    b
                }
            }
        }
    }

    fn draw_phase(&mut self) {
        for id in PlayerId::all() {
            self.players[id].draw_phase();
        }
        self.emit(GameEvent::phase_started(Phase::Draw));
        self.begin_marshal_phase();
    }

    /// The first player marshals; the other waits their turn.
    fn begin_marshal_phase(&mut self) {
        let first = self.first_player.unwrap_or(PlayerId::new(0));
        self.players[first].begin_marshal();

        let second = &mut self.players[first.opponent()];
        second.buttons.clear();
        second.menu_title = "Waiting for opponent to marshal their cards".to_string();

        self.emit(GameEvent::phase_started(Phase::Marshal));
    }

    fn marshal_done(&mut self, player: PlayerId) -> bool {
        let me = &self.players[player];
        if me.phase != Phase::Marshal || me.marshalled || me.selected_attachment.is_some() {
            return false;
        }
        self.players[player].marshal_done();
        self.add_message(format!("{} has finished marshalling", self.players[player].name));

        let other = &mut self.players[player.opponent()];
        if !other.marshalled {
            other.begin_marshal();
        } else {
            self.begin_challenge_phase();
        }
        true
    }

    // === Challenges ===

    fn begin_challenge_phase(&mut self) {
        let first = self.first_player.unwrap_or(PlayerId::new(0));
        for id in PlayerId::all() {
            self.players[id].begin_challenge();
        }
        self.wait_for_challenge(first.opponent());
        self.challenging = Some(first);

        self.emit(GameEvent::phase_started(Phase::Challenge));
    }

    fn wait_for_challenge(&mut self, player: PlayerId) {
        let player = &mut self.players[player];
        player.buttons.clear();
        player.menu_title = "Waiting for opponent to issue challenge".to_string();
    }

    /// Declare a challenge. Either active plot may forbid it.
    fn start_challenge(&mut self, player: PlayerId, challenge_type: ChallengeType) -> bool {
        if self.challenging != Some(player) || self.challenge.is_some() {
            return false;
        }

        let vetoed = self
            .players
            .values()
            .filter_map(|p| p.active_plot.as_ref())
            .any(|plot| !plot.can_challenge(&self.players[player], challenge_type));
        if vetoed {
            debug!(%player, %challenge_type, "challenge forbidden by a plot");
            return false;
        }

        if !self.players[player].start_challenge(challenge_type) {
            return false;
        }

        let defender = player.opponent();
        self.players[defender].current_challenge = Some(challenge_type);
        self.challenge = Some(ChallengeInProgress {
            challenge_type,
            attacker: player,
            defender,
            stage: ChallengeStage::Declaring,
        });
        true
    }

    fn select_for_challenge(&mut self, player: PlayerId, card: EntityId) -> bool {
        let Some(challenge) = self.challenge else {
            return false;
        };
        let own_card = self.players[player].cards_in_play.contains(card);

        match challenge.stage {
            ChallengeStage::Declaring if player == challenge.attacker => {
                if own_card {
                    self.players[player].add_to_challenge(card)
                } else {
                    self.mark_stealth_target(challenge, card)
                }
            }
            ChallengeStage::Defending if player == challenge.defender && own_card => {
                self.players[player].add_to_challenge(card)
            }
            _ => false,
        }
    }

    /// Each attacker with Stealth may take one defender out of the challenge.
    fn mark_stealth_target(&mut self, challenge: ChallengeInProgress, card: EntityId) -> bool {
        let attacker = &self.players[challenge.attacker];
        let stealthy = attacker
            .cards_in_challenge
            .iter()
            .filter_map(|&id| attacker.cards_in_play.find(id))
            .filter(|c| c.has_keyword(keyword::STEALTH))
            .count();

        let defender = &mut self.players[challenge.defender];
        let targeted = defender.cards_in_play.iter().filter(|c| c.stealth).count();
        if targeted >= stealthy || !defender.cards_in_play.find(card).is_some_and(|c| c.is_character()) {
            return false;
        }
        defender.add_to_stealth(card)
    }

    fn done_challenge(&mut self, player: PlayerId) -> bool {
        let Some(challenge) = self
            .challenge
            .filter(|c| c.attacker == player && c.stage == ChallengeStage::Declaring)
        else {
            return false;
        };

        if self.players[player].cards_in_challenge.is_empty() {
            for id in PlayerId::all() {
                self.players[id].end_challenge();
            }
            self.players[player].show_challenge_menu();
            self.challenge = None;
            return true;
        }

        let attacker = &mut self.players[player];
        let strength = attacker.done_challenge(true);
        attacker.buttons.clear();
        attacker.menu_title = "Waiting for opponent to defend".to_string();

        self.players[challenge.defender].begin_defend(challenge.challenge_type);
        self.challenge = Some(ChallengeInProgress {
            stage: ChallengeStage::Defending,
            ..challenge
        });

        self.add_message(format!(
            "{} has initiated a {} challenge with strength {}",
            self.players[player].name, challenge.challenge_type, strength
        ));
        self.emit(GameEvent::challenge_declared(
            challenge.challenge_type,
            challenge.attacker,
            challenge.defender,
        ));
        true
    }

    fn done_defend(&mut self, player: PlayerId) -> bool {
        let Some(challenge) = self
            .challenge
            .filter(|c| c.defender == player && c.stage == ChallengeStage::Defending)
        else {
            return false;
        };

        let strength = self.players[player].done_challenge(false);
        self.add_message(format!(
            "{} has defended with strength {}",
            self.players[player].name, strength
        ));
        self.resolve_challenge(challenge);
        true
    }

    /// The attacker wins with at least the defender's strength and more
    /// than zero.
    fn resolve_challenge(&mut self, challenge: ChallengeInProgress) {
        let ChallengeInProgress {
            challenge_type,
            attacker,
            defender,
            ..
        } = challenge;
        let attacking = self.players[attacker].challenge_strength;
        let defending = self.players[defender].challenge_strength;

        let attacker_won = attacking >= defending && attacking > 0;
        let (winner, loser) = if attacker_won {
            (attacker, defender)
        } else {
            (defender, attacker)
        };

        self.players[winner].challenges.record_won(challenge_type);
        info!(%challenge_type, %winner, attacking, defending, "challenge resolved");
        self.add_message(format!(
            "{} won a {} challenge {} vs {}",
            self.players[winner].name, challenge_type, attacking, defending
        ));

        if attacker_won && defending == 0 {
            let power = self.config.rules.unopposed_power;
            self.add_message(format!(
                "{} has gained {} power from an unopposed challenge",
                self.players[attacker].name, power
            ));
            self.add_power(attacker, power);
        }

        self.emit(GameEvent::after_challenge(challenge_type, winner, loser));

        if attacker_won {
            self.apply_claim(challenge);
        } else {
            self.finish_challenge();
        }
    }

    fn apply_claim(&mut self, challenge: ChallengeInProgress) {
        let ChallengeInProgress {
            challenge_type,
            attacker,
            defender,
            ..
        } = challenge;
        let claim = self.players[attacker].claim;
        if claim == 0 {
            self.finish_challenge();
            return;
        }

        match challenge_type {
            ChallengeType::Military => {
                let victim = &mut self.players[defender];
                if victim.characters_in_play().is_empty() {
                    self.finish_challenge();
                    return;
                }
                victim.claim_to_do = claim;
                victim.select_character_to_kill();
                self.challenge = Some(ChallengeInProgress {
                    stage: ChallengeStage::Claim,
                    ..challenge
                });

                let waiting = &mut self.players[attacker];
                waiting.buttons.clear();
                waiting.menu_title = "Waiting for opponent to apply claim".to_string();
            }
            ChallengeType::Intrigue => {
                let discarded = self.players[defender].discard_at_random(claim as usize, &mut self.rng);
                self.add_message(format!(
                    "{} discards {} cards at random",
                    self.players[defender].name, discarded
                ));
                self.finish_challenge();
            }
            ChallengeType::Power => {
                let moved = self.transfer_power(defender, attacker, claim);
                self.add_message(format!(
                    "{} takes {} power from {}",
                    self.players[attacker].name, moved, self.players[defender].name
                ));
                self.finish_challenge();
            }
        }
    }

    fn kill_for_claim(&mut self, player: PlayerId, card: EntityId) -> bool {
        if !self
            .challenge
            .is_some_and(|c| c.stage == ChallengeStage::Claim && c.defender == player)
        {
            return false;
        }
        let name = match self.players[player].cards_in_play.find(card) {
            Some(character) if character.is_character() => character.name().to_string(),
            _ => return false,
        };

        match self.players[player].kill_character(card, &mut self.events) {
            Some(killed) => {
                self.add_message(format!("{} has killed {}", self.players[player].name, name));
                self.route_departures();
                self.emit(GameEvent::character_killed(player, killed));
            }
            None => {
                self.add_message(format!("A duplicate of {name} is discarded instead"));
            }
        }

        let victim = &mut self.players[player];
        if victim.claim_to_do == 0 || victim.characters_in_play().is_empty() {
            victim.done_claim();
            self.finish_challenge();
        }
        true
    }

    fn cancel_claim(&mut self, player: PlayerId) -> bool {
        if !self
            .challenge
            .is_some_and(|c| c.stage == ChallengeStage::Claim && c.defender == player)
        {
            return false;
        }
        self.players[player].done_claim();
        self.finish_challenge();
        true
    }

    /// Clear the challenge and hand the menu back to the attacker.
    fn finish_challenge(&mut self) {
        let Some(challenge) = self.challenge.take() else {
            return;
        };
        for id in PlayerId::all() {
            let player = &mut self.players[id];
            player.end_challenge();
            player.phase = Phase::Challenge;
        }

        let attacker = &mut self.players[challenge.attacker];
        attacker.menu_title.clear();
        attacker.show_challenge_menu();
        self.wait_for_challenge(challenge.defender);
    }

    fn done_all_challenges(&mut self, player: PlayerId) -> bool {
        if self.challenging != Some(player) || self.challenge.is_some() {
            return false;
        }
        self.players[player].done_challenges = true;
        self.wait_for_challenge(player);
        self.add_message(format!("{} has finished their challenges", self.players[player].name));

        let other = player.opponent();
        if self.players[other].done_challenges {
            self.challenging = None;
            self.dominance();
        } else {
            self.challenging = Some(other);
            let next = &mut self.players[other];
            next.menu_title.clear();
            next.show_challenge_menu();
        }
        true
    }

    // === Dominance and taxation ===

    fn dominance(&mut self) {
        for id in PlayerId::all() {
            self.players[id].phase = Phase::Dominance;
        }
        self.emit(GameEvent::phase_started(Phase::Dominance));

        let (a, b) = (PlayerId::new(0), PlayerId::new(1));
        let (score_a, score_b) = (self.players[a].get_dominance(), self.players[b].get_dominance());
        let winner = match score_a.cmp(&score_b) {
            Ordering::Greater => Some(a),
            Ordering::Less => Some(b),
            Ordering::Equal => None,
        };
        info!(?winner, score_a, score_b, "dominance");

        match winner {
            Some(winner) => {
                let power = self.config.rules.dominance_power;
                self.add_message(format!(
                    "{} wins dominance ({} vs {}) and gains {} power",
                    self.players[winner].name,
                    score_a.max(score_b),
                    score_a.min(score_b),
                    power
                ));
                self.add_power(winner, power);
                self.emit(GameEvent::after_dominance(winner));
            }
            None => self.add_message("Dominance is tied; no one wins it".to_string()),
        }

        self.taxation();
    }

    fn taxation(&mut self) {
        for id in PlayerId::all() {
            let player = &mut self.players[id];
            player.taxation();
            player.stand_cards();
        }
        self.emit(GameEvent::phase_started(Phase::Taxation));
        self.begin_plot_phase();
    }

    // === Events ===

    /// Dispatch an event, then deliver whatever the handlers moved.
    fn emit(&mut self, event: GameEvent) -> usize {
        let invoked = dispatch(self, &event);
        self.route_departures();
        invoked
    }

    /// Deliver cards bound for the other player and announce every card
    /// that left play, until nothing is pending.
    fn route_departures(&mut self) {
        loop {
            let mut pending = Vec::new();
            for id in PlayerId::all() {
                let departures = self.players[id].take_departures();
                if !departures.is_empty() {
                    pending.push((id, departures));
                }
            }
            if pending.is_empty() {
                return;
            }

            for (id, departures) in pending {
                for outbound in departures.to_opponent {
                    let owner = outbound.card.owner();
                    self.players[owner].receive(outbound.card, outbound.zone);
                }
                for card in departures.left_play {
                    self.notify_leaving_play(id, card);
                }
            }
        }
    }

    fn announce_if_entered(&mut self, player: PlayerId, card: EntityId, was_in_play: bool) {
        if was_in_play {
            return;
        }
        let entered = match self.players[player].find_card_in_play(card) {
            Some(found) => found.is_in_play() && !found.is_facedown(),
            None => false,
        };
        if entered {
            self.emit(GameEvent::card_entered_play(player, card));
        }
    }

    /// Whose play area holds a card in play.
    fn locate_in_play(&self, card: EntityId) -> Result<PlayerId, EngineError> {
        self.players
            .iter()
            .find(|(_, player)| player.find_card_in_play(card).is_some())
            .map(|(id, _)| id)
            .ok_or(EngineError::CardNotInPlay(card))
    }

    fn card_name(&self, player: PlayerId, card: EntityId) -> String {
        let player = &self.players[player];
        player
            .find_card_in_play(card)
            .or_else(|| player.hand.find(card))
            .or_else(|| Zone::ALL.into_iter().find_map(|zone| player.pile(zone)?.find(card)))
            .map_or_else(|| card.to_string(), |found| found.name().to_string())
    }
}

impl GameContext for Game {
    fn event_bus(&self) -> &EventBus {
        &self.events
    }

    fn event_bus_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    fn is_in_play(&self, card: EntityId) -> bool {
        self.players.values().any(|player| player.is_card_in_play(card))
    }

    fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    fn add_message(&mut self, message: String) {
        debug!(%message, "game message");
        self.messages.push_back(message);
    }

    fn add_power(&mut self, player: PlayerId, amount: u32) {
        if amount == 0 {
            return;
        }
        self.players[player].power += amount;
        self.emit(GameEvent::power_gained(player, amount));
    }

    fn transfer_power(&mut self, from: PlayerId, to: PlayerId, amount: u32) -> u32 {
        let moved = amount.min(self.players[from].power);
        if moved == 0 || from == to {
            return 0;
        }
        self.players[from].power -= moved;
        self.players[to].power += moved;
        self.emit(GameEvent::power_transferred(from, to, moved));
        moved
    }

    fn notify_leaving_play(&mut self, player: PlayerId, card: EntityId) {
        self.emit(GameEvent::card_left_play(player, card));
    }
}
