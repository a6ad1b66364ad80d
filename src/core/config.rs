//! Game configuration and the fixed vocabulary of the rules.
//!
//! - `Zone`: the named card collections a player owns
//! - `ZoneVisibility`: who may see the cards of a zone
//! - `Phase`: the player state machine's phase indicator
//! - `ChallengeType`: military, intrigue, power
//! - `RulesConfig` / `GameConfig`: tunable numbers and the RNG seed
//!
//! Configs deserialise from JSON with every field optional:
//!
//! ```
//! use rust_plots::core::GameConfig;
//!
//! let config = GameConfig::from_json(r#"{ "seed": 9, "rules": { "setup_gold": 10 } }"#).unwrap();
//! assert_eq!(config.seed, 9);
//! assert_eq!(config.rules.setup_gold, 10);
//! assert_eq!(config.rules.opening_hand_size, 7);
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// A named card collection belonging to one player.
///
/// The serialised names are the ones the presentation layer sends with
/// drag-and-drop commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    #[serde(rename = "hand")]
    Hand,
    #[serde(rename = "draw deck")]
    DrawDeck,
    #[serde(rename = "discard pile")]
    DiscardPile,
    #[serde(rename = "dead pile")]
    DeadPile,
    #[serde(rename = "play area")]
    PlayArea,
    #[serde(rename = "plot deck")]
    PlotDeck,
    /// The active (revealed) plot slot.
    #[serde(rename = "plot")]
    ActivePlot,
    #[serde(rename = "plot discard pile")]
    PlotDiscard,
}

impl Zone {
    /// Every zone, draw zones first.
    pub const ALL: [Zone; 8] = [
        Zone::Hand,
        Zone::DrawDeck,
        Zone::DiscardPile,
        Zone::DeadPile,
        Zone::PlayArea,
        Zone::PlotDeck,
        Zone::ActivePlot,
        Zone::PlotDiscard,
    ];

    /// Wire name of the zone.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Zone::Hand => "hand",
            Zone::DrawDeck => "draw deck",
            Zone::DiscardPile => "discard pile",
            Zone::DeadPile => "dead pile",
            Zone::PlayArea => "play area",
            Zone::PlotDeck => "plot deck",
            Zone::ActivePlot => "plot",
            Zone::PlotDiscard => "plot discard pile",
        }
    }

    /// Zones that hold plot cards rather than draw cards.
    #[must_use]
    pub const fn holds_plots(self) -> bool {
        matches!(self, Zone::PlotDeck | Zone::ActivePlot | Zone::PlotDiscard)
    }

    /// Who may see the faces of the cards in this zone.
    #[must_use]
    pub const fn visibility(self) -> ZoneVisibility {
        match self {
            Zone::PlayArea | Zone::DiscardPile | Zone::ActivePlot | Zone::PlotDiscard => {
                ZoneVisibility::Public
            }
            Zone::Hand | Zone::DeadPile | Zone::PlotDeck => ZoneVisibility::OwnerOnly,
            Zone::DrawDeck => ZoneVisibility::Hidden,
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::ALL
            .into_iter()
            .find(|zone| zone.as_str() == s)
            .ok_or_else(|| EngineError::UnknownZone(s.to_string()))
    }
}

/// Zone visibility rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneVisibility {
    /// All cards visible to both players (play area).
    Public,
    /// Cards visible only to the zone owner (hand).
    OwnerOnly,
    /// Cards visible to nobody unless the deck is explicitly shown.
    Hidden,
}

impl ZoneVisibility {
    /// Should a viewer see card faces in a zone with this visibility?
    #[must_use]
    pub const fn shows_to(self, is_owner: bool) -> bool {
        match self {
            ZoneVisibility::Public => true,
            ZoneVisibility::OwnerOnly => is_owner,
            ZoneVisibility::Hidden => false,
        }
    }
}

/// Phase indicator of a player's state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Pre-game keep-or-mulligan decision.
    #[default]
    Mulligan,
    Setup,
    Plot,
    Draw,
    Marshal,
    Challenge,
    /// Choosing characters to satisfy military claim.
    Claim,
    Dominance,
    Taxation,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Mulligan => "mulligan",
            Phase::Setup => "setup",
            Phase::Plot => "plot",
            Phase::Draw => "draw",
            Phase::Marshal => "marshal",
            Phase::Challenge => "challenge",
            Phase::Claim => "claim",
            Phase::Dominance => "dominance",
            Phase::Taxation => "taxation",
        };
        f.write_str(name)
    }
}

/// The three kinds of challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeType {
    Military,
    Intrigue,
    Power,
}

impl ChallengeType {
    pub const ALL: [ChallengeType; 3] = [
        ChallengeType::Military,
        ChallengeType::Intrigue,
        ChallengeType::Power,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            ChallengeType::Military => 0,
            ChallengeType::Intrigue => 1,
            ChallengeType::Power => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ChallengeType::Military => "military",
            ChallengeType::Intrigue => "intrigue",
            ChallengeType::Power => "power",
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ChallengeType::Military => "Military",
            ChallengeType::Intrigue => "Intrigue",
            ChallengeType::Power => "Power",
        }
    }
}

impl std::fmt::Display for ChallengeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The numbers of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Cards in an opening hand (and the hand refill after setup).
    pub opening_hand_size: usize,
    /// Gold available for setup.
    pub setup_gold: u32,
    /// Cards drawn in the draw phase.
    pub draw_phase_cards: usize,
    /// Challenges a player may initiate per round.
    pub max_challenges: u32,
    /// Challenges of one type a player may initiate per round.
    pub max_challenges_per_type: u32,
    /// Power gained for winning dominance.
    pub dominance_power: u32,
    /// Power gained by the attacker for an unopposed challenge.
    pub unopposed_power: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            opening_hand_size: 7,
            setup_gold: 8,
            draw_phase_cards: 2,
            max_challenges: 3,
            max_challenges_per_type: 1,
            dominance_power: 1,
            unopposed_power: 1,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the game RNG.
    pub seed: u64,

    /// Rule numbers.
    pub rules: RulesConfig,

    /// Debug: expose draw deck contents in snapshots.
    pub show_decks: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            rules: RulesConfig::default(),
            show_decks: false,
        }
    }
}

impl GameConfig {
    /// Create a default configuration with the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}
