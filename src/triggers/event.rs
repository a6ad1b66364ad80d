//! Game event types.
//!
//! Events are named, and carry their data as a short list of positional
//! arguments. Every listener for a name receives the same arguments in the
//! same order; the constructors below document the order for each name.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ChallengeType, EntityId, Phase, PlayerId};

/// Name of an event channel on the bus.
///
/// Serialises to the camelCase names abilities subscribe to, e.g.
/// `"afterChallenge"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventName {
    /// A phase began for both players.
    PhaseStarted,
    /// A plot was revealed.
    PlotRevealed,
    /// A draw card entered a play area face-up.
    CardEnteredPlay,
    /// A card left a play area.
    CardLeftPlay,
    /// A challenge was declared with at least one attacker.
    ChallengeDeclared,
    /// A challenge resolved.
    AfterChallenge,
    /// A character was moved to its owner's dead pile.
    CharacterKilled,
    /// Dominance was decided.
    AfterDominance,
    /// A player gained power on their faction card.
    PowerGained,
    /// Power moved between faction cards.
    PowerTransferred,
}

impl EventName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EventName::PhaseStarted => "phaseStarted",
            EventName::PlotRevealed => "plotRevealed",
            EventName::CardEnteredPlay => "cardEnteredPlay",
            EventName::CardLeftPlay => "cardLeftPlay",
            EventName::ChallengeDeclared => "challengeDeclared",
            EventName::AfterChallenge => "afterChallenge",
            EventName::CharacterKilled => "characterKilled",
            EventName::AfterDominance => "afterDominance",
            EventName::PowerGained => "powerGained",
            EventName::PowerTransferred => "powerTransferred",
        }
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One positional argument of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventArg {
    Player(PlayerId),
    Card(EntityId),
    Challenge(ChallengeType),
    Amount(i64),
    Phase(Phase),
}

impl EventArg {
    #[must_use]
    pub const fn as_player(&self) -> Option<PlayerId> {
        match self {
            EventArg::Player(p) => Some(*p),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_card(&self) -> Option<EntityId> {
        match self {
            EventArg::Card(c) => Some(*c),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_challenge(&self) -> Option<ChallengeType> {
        match self {
            EventArg::Challenge(t) => Some(*t),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_amount(&self) -> Option<i64> {
        match self {
            EventArg::Amount(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_phase(&self) -> Option<Phase> {
        match self {
            EventArg::Phase(p) => Some(*p),
            _ => None,
        }
    }
}

/// A game event with its positional arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub name: EventName,
    pub args: SmallVec<[EventArg; 4]>,
}

impl GameEvent {
    /// Create an event with no arguments.
    #[must_use]
    pub fn new(name: EventName) -> Self {
        Self {
            name,
            args: SmallVec::new(),
        }
    }

    /// Append an argument (builder pattern).
    #[must_use]
    pub fn with_arg(mut self, arg: EventArg) -> Self {
        self.args.push(arg);
        self
    }

    #[must_use]
    pub fn with_player(self, player: PlayerId) -> Self {
        self.with_arg(EventArg::Player(player))
    }

    #[must_use]
    pub fn with_card(self, card: EntityId) -> Self {
        self.with_arg(EventArg::Card(card))
    }

    #[must_use]
    pub fn with_challenge(self, challenge_type: ChallengeType) -> Self {
        self.with_arg(EventArg::Challenge(challenge_type))
    }

    #[must_use]
    pub fn with_amount(self, amount: i64) -> Self {
        self.with_arg(EventArg::Amount(amount))
    }

    #[must_use]
    pub fn with_phase(self, phase: Phase) -> Self {
        self.with_arg(EventArg::Phase(phase))
    }

    /// The argument at `index`, if it is a player.
    #[must_use]
    pub fn player(&self, index: usize) -> Option<PlayerId> {
        self.args.get(index).and_then(EventArg::as_player)
    }

    #[must_use]
    pub fn card(&self, index: usize) -> Option<EntityId> {
        self.args.get(index).and_then(EventArg::as_card)
    }

    #[must_use]
    pub fn challenge(&self, index: usize) -> Option<ChallengeType> {
        self.args.get(index).and_then(EventArg::as_challenge)
    }

    /// The amount at `index`, or a default.
    #[must_use]
    pub fn amount(&self, index: usize, default: i64) -> i64 {
        self.args
            .get(index)
            .and_then(EventArg::as_amount)
            .unwrap_or(default)
    }

    #[must_use]
    pub fn phase(&self, index: usize) -> Option<Phase> {
        self.args.get(index).and_then(EventArg::as_phase)
    }
}

/// Constructors for the events the game emits.
impl GameEvent {
    /// `[phase]`
    pub fn phase_started(phase: Phase) -> Self {
        Self::new(EventName::PhaseStarted).with_phase(phase)
    }

    /// `[player, plot]`
    pub fn plot_revealed(player: PlayerId, plot: EntityId) -> Self {
        Self::new(EventName::PlotRevealed)
            .with_player(player)
            .with_card(plot)
    }

    /// `[player, card]`
    pub fn card_entered_play(player: PlayerId, card: EntityId) -> Self {
        Self::new(EventName::CardEnteredPlay)
            .with_player(player)
            .with_card(card)
    }

    /// `[player, card]`
    pub fn card_left_play(player: PlayerId, card: EntityId) -> Self {
        Self::new(EventName::CardLeftPlay)
            .with_player(player)
            .with_card(card)
    }

    /// `[challenge type, attacker, defender]`
    pub fn challenge_declared(
        challenge_type: ChallengeType,
        attacker: PlayerId,
        defender: PlayerId,
    ) -> Self {
        Self::new(EventName::ChallengeDeclared)
            .with_challenge(challenge_type)
            .with_player(attacker)
            .with_player(defender)
    }

    /// `[challenge type, winner, loser]`
    pub fn after_challenge(challenge_type: ChallengeType, winner: PlayerId, loser: PlayerId) -> Self {
        Self::new(EventName::AfterChallenge)
            .with_challenge(challenge_type)
            .with_player(winner)
            .with_player(loser)
    }

    /// `[player, card]`
    pub fn character_killed(player: PlayerId, card: EntityId) -> Self {
        Self::new(EventName::CharacterKilled)
            .with_player(player)
            .with_card(card)
    }

    /// `[winner]`
    pub fn after_dominance(winner: PlayerId) -> Self {
        Self::new(EventName::AfterDominance).with_player(winner)
    }

    /// `[player, amount]`
    pub fn power_gained(player: PlayerId, amount: u32) -> Self {
        Self::new(EventName::PowerGained)
            .with_player(player)
            .with_amount(i64::from(amount))
    }

    /// `[from, to, amount]`
    pub fn power_transferred(from: PlayerId, to: PlayerId, amount: u32) -> Self {
        Self::new(EventName::PowerTransferred)
            .with_player(from)
            .with_player(to)
            .with_amount(i64::from(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name_strings() {
        assert_eq!(EventName::AfterChallenge.as_str(), "afterChallenge");
        assert_eq!(
            serde_json::to_string(&EventName::AfterDominance).unwrap(),
            "\"afterDominance\""
        );
        assert_eq!(EventName::PlotRevealed.to_string(), "plotRevealed");
    }

    #[test]
    fn test_game_event_builder() {
        let event = GameEvent::new(EventName::CardLeftPlay)
            .with_player(PlayerId::new(1))
            .with_card(EntityId(20))
            .with_amount(3);

        assert_eq!(event.player(0), Some(PlayerId::new(1)));
        assert_eq!(event.card(1), Some(EntityId(20)));
        assert_eq!(event.amount(2, 0), 3);
    }

    #[test]
    fn test_accessors_check_kind() {
        let event = GameEvent::after_dominance(PlayerId::new(0));

        assert_eq!(event.player(0), Some(PlayerId::new(0)));
        assert_eq!(event.card(0), None);
        assert_eq!(event.player(5), None);
        assert_eq!(event.amount(0, -1), -1);
    }

    #[test]
    fn test_after_challenge_argument_order() {
        let event = GameEvent::after_challenge(
            ChallengeType::Power,
            PlayerId::new(1),
            PlayerId::new(0),
        );

        assert_eq!(event.name, EventName::AfterChallenge);
        assert_eq!(event.challenge(0), Some(ChallengeType::Power));
        assert_eq!(event.player(1), Some(PlayerId::new(1)));
        assert_eq!(event.player(2), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_power_transferred() {
        let event = GameEvent::power_transferred(PlayerId::new(0), PlayerId::new(1), 2);
        assert_eq!(event.player(0), Some(PlayerId::new(0)));
        assert_eq!(event.player(1), Some(PlayerId::new(1)));
        assert_eq!(event.amount(2, 0), 2);
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::phase_started(Phase::Marshal);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["name"], "phaseStarted");
        assert_eq!(json["args"][0]["phase"], "marshal");
    }
}
