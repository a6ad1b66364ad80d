//! Button commands.
//!
//! Every phase publishes the set of commands a player may currently issue
//! as `Button`s. The presentation layer renders them; pressing one sends the
//! `Command` back to the game. Commands that point at a card (play, select
//! plot, click, drop) travel separately with the card's `EntityId`.

use serde::{Deserialize, Serialize};

use super::config::ChallengeType;

/// A command a player can issue by pressing a button.
///
/// Serialises adjacently tagged, e.g. `{"command":"challenge","arg":"power"}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "command", content = "arg", rename_all = "lowercase")]
pub enum Command {
    Keep,
    Mulligan,
    SetupDone,
    SelectPlot,
    DoneMarshal,
    DoneAttachment,
    Challenge(ChallengeType),
    DoneChallenge,
    DoneDefend,
    DoneAllChallenges,
    CancelClaim,
}

/// A labelled command offered to the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    #[serde(flatten)]
    pub command: Command,
}

impl Button {
    #[must_use]
    pub fn new(command: Command, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            command,
        }
    }

    /// The standard "Done" button for a command.
    #[must_use]
    pub fn done(command: Command) -> Self {
        Self::new(command, "Done")
    }
}
