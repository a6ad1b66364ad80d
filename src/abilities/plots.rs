//! Core set plots with printed behavior.

use std::rc::Rc;

use smallvec::smallvec;

use super::{AbilityHost, AbilityRegistry, CardAbility, Handler, HandlerTable};
use crate::core::ChallengeType;
use crate::game::GameContext;
use crate::player::Player;
use crate::triggers::{EventName, GameEvent};

pub const A_CLASH_OF_KINGS: &str = "01001";
pub const A_FEAST_FOR_CROWS: &str = "01002";
pub const A_GAME_OF_THRONES: &str = "01003";

/// Register every plot in this module.
pub fn register(registry: &mut AbilityRegistry) {
    registry.register(A_CLASH_OF_KINGS, || Rc::new(AClashOfKings) as Rc<dyn CardAbility>);
    registry.register(A_FEAST_FOR_CROWS, || Rc::new(AFeastForCrows) as Rc<dyn CardAbility>);
    registry.register(A_GAME_OF_THRONES, || Rc::new(AGameOfThrones) as Rc<dyn CardAbility>);
}

/// After winning a power challenge, move 1 power from the loser's faction
/// card to the owner's.
#[derive(Debug)]
pub struct AClashOfKings;

impl AClashOfKings {
    fn after_challenge(host: &AbilityHost, event: &GameEvent, ctx: &mut dyn GameContext) {
        let (Some(challenge_type), Some(winner), Some(loser)) =
            (event.challenge(0), event.player(1), event.player(2))
        else {
            return;
        };
        if winner != host.owner || challenge_type != ChallengeType::Power {
            return;
        }
        if ctx.player(loser).power == 0 {
            return;
        }

        let message = format!(
            "{} uses {} to move 1 power from {}'s faction card",
            ctx.player(winner).name,
            host.name,
            ctx.player(loser).name
        );
        ctx.add_message(message);
        ctx.transfer_power(loser, winner, 1);
    }
}

impl CardAbility for AClashOfKings {
    fn handlers(&self) -> HandlerTable {
        smallvec![(EventName::AfterChallenge, Self::after_challenge as Handler)]
    }
}

/// After winning dominance, the owner gains 2 power.
#[derive(Debug)]
pub struct AFeastForCrows;

impl AFeastForCrows {
    const POWER: u32 = 2;

    fn after_dominance(host: &AbilityHost, event: &GameEvent, ctx: &mut dyn GameContext) {
        if event.player(0) != Some(host.owner) {
            return;
        }

        let message = format!(
            "{} uses {} to gain {} power",
            ctx.player(host.owner).name,
            host.name,
            Self::POWER
        );
        ctx.add_message(message);
        ctx.add_power(host.owner, Self::POWER);
    }
}

impl CardAbility for AFeastForCrows {
    fn handlers(&self) -> HandlerTable {
        smallvec![(EventName::AfterDominance, Self::after_dominance as Handler)]
    }
}

/// No military or power challenges until an intrigue challenge is won.
#[derive(Debug)]
pub struct AGameOfThrones;

impl CardAbility for AGameOfThrones {
    fn can_challenge(&self, player: &Player, challenge_type: ChallengeType) -> bool {
        match challenge_type {
            ChallengeType::Military | ChallengeType::Power => {
                player.challenges.won(ChallengeType::Intrigue) > 0
            }
            ChallengeType::Intrigue => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayerId, RulesConfig};

    #[test]
    fn test_handler_tables() {
        assert_eq!(AClashOfKings.handlers()[0].0, EventName::AfterChallenge);
        assert_eq!(AFeastForCrows.handlers()[0].0, EventName::AfterDominance);
        assert!(AGameOfThrones.handlers().is_empty());
    }

    #[test]
    fn test_game_of_thrones_veto() {
        let mut player = Player::new(PlayerId::new(0), "Alice", RulesConfig::default());

        assert!(AGameOfThrones.can_challenge(&player, ChallengeType::Intrigue));
        assert!(!AGameOfThrones.can_challenge(&player, ChallengeType::Military));
        assert!(!AGameOfThrones.can_challenge(&player, ChallengeType::Power));

        player.challenges.record_won(ChallengeType::Intrigue);

        assert!(AGameOfThrones.can_challenge(&player, ChallengeType::Military));
        assert!(AGameOfThrones.can_challenge(&player, ChallengeType::Power));
    }

    #[test]
    fn test_other_plots_permit() {
        let player = Player::new(PlayerId::new(0), "Alice", RulesConfig::default());
        for ty in ChallengeType::ALL {
            assert!(AClashOfKings.can_challenge(&player, ty));
            assert!(AFeastForCrows.can_challenge(&player, ty));
        }
    }
}
