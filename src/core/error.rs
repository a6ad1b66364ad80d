//! Engine errors.
//!
//! Gameplay rejections are not errors: commands return `false` and leave
//! the state untouched. `EngineError` covers loading catalogs, decks and
//! configs, plus the programmer-error conditions that correct sequencing
//! never produces.

use thiserror::Error;

use super::entity::EntityId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown card code {0:?}")]
    UnknownCard(String),
    #[error("card {code:?} cannot go in the {section} section of a deck")]
    WrongCardType { code: String, section: &'static str },
    #[error("unknown zone {0:?}")]
    UnknownZone(String),
    #[error("card {0} is reported in play but cannot be found")]
    CardNotInPlay(EntityId),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = EngineError::UnknownCard("01999".into());
        assert_eq!(err.to_string(), "unknown card code \"01999\"");

        let err = EngineError::WrongCardType { code: "01001".into(), section: "draw" };
        assert_eq!(err.to_string(), "card \"01001\" cannot go in the draw section of a deck");

        let err = EngineError::CardNotInPlay(EntityId(12));
        assert_eq!(err.to_string(), "card Entity(12) is reported in play but cannot be found");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("x").unwrap_err();
        let err: EngineError = json_err.into();
        assert!(matches!(err, EngineError::Json(_)));
    }
}
