//! Deck descriptions.

use serde::{Deserialize, Serialize};

use crate::core::EngineError;

/// `count` copies of the card `code`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub count: u32,
    pub code: String,
}

/// A decklist, as the deck builder hands it over.
///
/// ```
/// use rust_plots::game::Deck;
///
/// let deck = Deck::from_json(r#"{
///     "faction": "lannister",
///     "drawCards": [{ "count": 3, "code": "01090" }],
///     "plotCards": [{ "count": 1, "code": "01001" }]
/// }"#).unwrap();
///
/// assert_eq!(deck.draw_card_count(), 3);
/// assert_eq!(deck.agenda, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(default)]
    pub faction: Option<String>,
    #[serde(default)]
    pub agenda: Option<String>,
    #[serde(default)]
    pub draw_cards: Vec<DeckEntry>,
    #[serde(default)]
    pub plot_cards: Vec<DeckEntry>,
}

impl Deck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    #[must_use]
    pub fn with_agenda(mut self, agenda: impl Into<String>) -> Self {
        self.agenda = Some(agenda.into());
        self
    }

    #[must_use]
    pub fn with_draw(mut self, code: impl Into<String>, count: u32) -> Self {
        self.draw_cards.push(DeckEntry {
            count,
            code: code.into(),
        });
        self
    }

    #[must_use]
    pub fn with_plot(mut self, code: impl Into<String>, count: u32) -> Self {
        self.plot_cards.push(DeckEntry {
            count,
            code: code.into(),
        });
        self
    }

    #[must_use]
    pub fn draw_card_count(&self) -> u32 {
        self.draw_cards.iter().map(|e| e.count).sum()
    }

    #[must_use]
    pub fn plot_card_count(&self) -> u32 {
        self.plot_cards.iter().map(|e| e.count).sum()
    }
}
