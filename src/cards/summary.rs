//! Viewer-dependent card summaries.
//!
//! A summary is what a client is allowed to know about one card. Hidden
//! cards keep their place in the layout but say nothing except that they
//! are face-down.

use serde::{Deserialize, Serialize};

use super::definition::CardType;
use crate::core::EntityId;

fn is_false(b: &bool) -> bool {
    !*b
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// What one viewer can see of one card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    pub facedown: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CardType>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub kneeled: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub stealth: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub power: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dupes: Vec<CardSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<CardSummary>,
}

impl CardSummary {
    /// The summary of a card the viewer may not see.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            facedown: true,
            ..Self::default()
        }
    }

    /// True when no identifying field is present.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.uuid.is_none() && self.code.is_none() && self.name.is_none() && self.card_type.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_serializes_to_facedown_only() {
        let json = serde_json::to_string(&CardSummary::hidden()).unwrap();
        assert_eq!(json, r#"{"facedown":true}"#);
        assert!(CardSummary::hidden().is_hidden());
    }

    #[test]
    fn test_visible_fields() {
        let summary = CardSummary {
            uuid: Some(EntityId(12)),
            code: Some("01090".into()),
            name: Some("Ser Jaime Lannister".into()),
            card_type: Some(CardType::Character),
            kneeled: true,
            power: 2,
            ..CardSummary::default()
        };
        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["uuid"], 12);
        assert_eq!(value["type"], "character");
        assert_eq!(value["kneeled"], true);
        assert_eq!(value["power"], 2);
        assert_eq!(value["facedown"], false);
        assert!(value.get("selected").is_none());
        assert!(!summary.is_hidden());
    }
}
