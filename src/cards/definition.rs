//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable catalog record of a card: its code,
//! name, type, text and printed numbers. Every copy of a card in a game
//! shares one definition through an `Arc`.
//!
//! Instance-specific data (owner, face state, kneeling, duplicates,
//! attachments) lives on the card instances in `base`, `draw` and `plot`.
//!
//! The field names follow the catalog JSON:
//!
//! ```
//! use rust_plots::cards::{CardDefinition, CardType};
//!
//! let json = r#"{
//!     "code": "01109",
//!     "name": "The Red Keep",
//!     "type_code": "location",
//!     "cost": 3,
//!     "is_unique": true,
//!     "text": "Action: ..."
//! }"#;
//! let card: CardDefinition = serde_json::from_str(json).unwrap();
//!
//! assert_eq!(card.card_type, CardType::Location);
//! assert_eq!(card.cost, Some(3));
//! assert!(card.is_unique);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::ChallengeType;

/// Printed card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Character,
    Location,
    Attachment,
    Event,
    Plot,
    Agenda,
    Title,
    /// Any type this engine does not know about.
    #[serde(other)]
    Other,
}

impl CardType {
    /// Types that belong in the draw deck.
    #[must_use]
    pub const fn is_draw_card(self) -> bool {
        matches!(
            self,
            CardType::Character | CardType::Location | CardType::Attachment | CardType::Event
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CardType::Character => "character",
            CardType::Location => "location",
            CardType::Attachment => "attachment",
            CardType::Event => "event",
            CardType::Plot => "plot",
            CardType::Agenda => "agenda",
            CardType::Title => "title",
            CardType::Other => "other",
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A printed number that contributes to a player's totals.
///
/// Plots print all four; some locations and attachments print income,
/// initiative or reserve modifiers too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlotStat {
    Income,
    Initiative,
    Reserve,
    Claim,
}

/// Immutable catalog record of a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Catalog key shared by every copy of the card.
    pub code: String,

    pub name: String,

    /// Display label (plots print one distinct from the name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(rename = "type_code")]
    pub card_type: CardType,

    /// Printed rules text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<i64>,

    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub is_military: bool,
    #[serde(default)]
    pub is_intrigue: bool,
    #[serde(default)]
    pub is_power: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction_code: Option<String>,
}

impl CardDefinition {
    /// Create a definition with no text, stats or icons.
    pub fn new(code: impl Into<String>, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            label: None,
            card_type,
            text: None,
            cost: None,
            strength: None,
            income: None,
            initiative: None,
            reserve: None,
            claim: None,
            is_unique: false,
            is_military: false,
            is_intrigue: false,
            is_power: false,
            faction_code: None,
        }
    }

    /// Display label, falling back to the name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Does the card carry the icon for a challenge type?
    #[must_use]
    pub const fn has_icon(&self, challenge_type: ChallengeType) -> bool {
        match challenge_type {
            ChallengeType::Military => self.is_military,
            ChallengeType::Intrigue => self.is_intrigue,
            ChallengeType::Power => self.is_power,
        }
    }

    /// A printed contribution to a player total, if the card prints one.
    #[must_use]
    pub const fn stat(&self, stat: PlotStat) -> Option<i64> {
        match stat {
            PlotStat::Income => self.income,
            PlotStat::Initiative => self.initiative,
            PlotStat::Reserve => self.reserve,
            PlotStat::Claim => self.claim,
        }
    }

    // === Builder methods ===

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = Some(cost);
        self
    }

    #[must_use]
    pub fn with_strength(mut self, strength: u32) -> Self {
        self.strength = Some(strength);
        self
    }

    /// Add a challenge icon (builder pattern).
    #[must_use]
    pub fn with_icon(mut self, challenge_type: ChallengeType) -> Self {
        match challenge_type {
            ChallengeType::Military => self.is_military = true,
            ChallengeType::Intrigue => self.is_intrigue = true,
            ChallengeType::Power => self.is_power = true,
        }
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    #[must_use]
    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction_code = Some(faction.into());
        self
    }

    /// Set the four plot numbers (builder pattern).
    #[must_use]
    pub fn with_plot_stats(mut self, income: i64, initiative: i64, claim: i64, reserve: i64) -> Self {
        self.income = Some(income);
        self.initiative = Some(initiative);
        self.claim = Some(claim);
        self.reserve = Some(reserve);
        self
    }

    #[must_use]
    pub fn with_stat(mut self, stat: PlotStat, value: i64) -> Self {
        match stat {
            PlotStat::Income => self.income = Some(value),
            PlotStat::Initiative => self.initiative = Some(value),
            PlotStat::Reserve => self.reserve = Some(value),
            PlotStat::Claim => self.claim = Some(value),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_builder() {
        let card = CardDefinition::new("01090", "Ser Jaime Lannister", CardType::Character)
            .with_cost(7)
            .with_strength(5)
            .with_icon(ChallengeType::Military)
            .with_icon(ChallengeType::Power)
            .unique()
            .with_faction("lannister");

        assert_eq!(card.cost, Some(7));
        assert_eq!(card.strength, Some(5));
        assert!(card.has_icon(ChallengeType::Military));
        assert!(!card.has_icon(ChallengeType::Intrigue));
        assert!(card.has_icon(ChallengeType::Power));
        assert!(card.is_unique);
        assert_eq!(card.label(), "Ser Jaime Lannister");
    }

    #[test]
    fn test_plot_stats() {
        let plot = CardDefinition::new("01001", "A Clash of Kings", CardType::Plot)
            .with_plot_stats(4, 1, 1, 5);

        assert_eq!(plot.stat(PlotStat::Income), Some(4));
        assert_eq!(plot.stat(PlotStat::Initiative), Some(1));
        assert_eq!(plot.stat(PlotStat::Claim), Some(1));
        assert_eq!(plot.stat(PlotStat::Reserve), Some(5));

        let location = CardDefinition::new("01039", "Roseroad", CardType::Location)
            .with_stat(PlotStat::Income, 1);
        assert_eq!(location.stat(PlotStat::Income), Some(1));
        assert_eq!(location.stat(PlotStat::Reserve), None);
    }

    #[test]
    fn test_catalog_record() {
        let json = r#"{
            "code": "01001",
            "name": "A Clash of Kings",
            "label": "A Clash of Kings (Core)",
            "type_code": "plot",
            "income": 4,
            "initiative": 1,
            "claim": 1,
            "reserve": 5,
            "text": "<b>Reaction:</b> After you win a power challenge..."
        }"#;
        let card: CardDefinition = serde_json::from_str(json).unwrap();

        assert_eq!(card.card_type, CardType::Plot);
        assert_eq!(card.label(), "A Clash of Kings (Core)");
        assert_eq!(card.income, Some(4));
        assert_eq!(card.cost, None);
        assert!(!card.is_unique);
    }

    #[test]
    fn test_unknown_type_code() {
        let json = r#"{ "code": "00001", "name": "Marker", "type_code": "token" }"#;
        let card: CardDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(card.card_type, CardType::Other);
        assert!(!card.card_type.is_draw_card());
    }

    #[test]
    fn test_card_type_names() {
        assert_eq!(CardType::Attachment.to_string(), "attachment");
        assert_eq!(serde_json::to_string(&CardType::Character).unwrap(), "\"character\"");
        assert!(CardType::Event.is_draw_card());
        assert!(!CardType::Plot.is_draw_card());
    }
}
