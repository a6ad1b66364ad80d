//! Property tests for card conservation.
//!
//! Whatever a player clicks, presses or drags, every card created for the
//! game stays in exactly one place.

use proptest::prelude::*;

use rust_plots::cards::{Card, CardDefinition, CardRegistry, CardType};
use rust_plots::core::{ChallengeType, Command, EntityId, GameConfig, PlayerId, Zone};
use rust_plots::game::{Deck, Game, PlayerSetup};
use rust_plots::AbilityRegistry;

const COMMANDS: [Command; 13] = [
    Command::Keep,
    Command::Mulligan,
    Command::SetupDone,
    Command::SelectPlot,
    Command::DoneMarshal,
    Command::DoneAttachment,
    Command::Challenge(ChallengeType::Military),
    Command::Challenge(ChallengeType::Intrigue),
    Command::Challenge(ChallengeType::Power),
    Command::DoneChallenge,
    Command::DoneDefend,
    Command::DoneAllChallenges,
    Command::CancelClaim,
];

fn catalog() -> CardRegistry {
    let mut catalog = CardRegistry::new();
    let mut guard = CardDefinition::new("01100", "Guard", CardType::Character)
        .with_cost(1)
        .with_strength(2);
    for ty in ChallengeType::ALL {
        guard = guard.with_icon(ty);
    }
    catalog.register(guard);
    catalog.register(
        CardDefinition::new("01141", "Eddard Stark", CardType::Character)
            .unique()
            .with_cost(3)
            .with_strength(4)
            .with_icon(ChallengeType::Military),
    );
    catalog.register(
        CardDefinition::new("01151", "Blade", CardType::Attachment)
            .with_cost(0)
            .with_text("Attach to a character."),
    );
    catalog.register(CardDefinition::new("01024", "Feast", CardType::Event).with_cost(0));
    catalog.register(
        CardDefinition::new("01001", "A Clash of Kings", CardType::Plot).with_plot_stats(4, 1, 1, 5),
    );
    catalog.register(
        CardDefinition::new("01002", "A Feast for Crows", CardType::Plot).with_plot_stats(1, 0, 2, 4),
    );
    catalog.register(
        CardDefinition::new("01003", "A Game of Thrones", CardType::Plot).with_plot_stats(2, 1, 1, 5),
    );
    catalog
}

fn new_game(seed: u64) -> Game {
    let deck = Deck::new()
        .with_draw("01100", 12)
        .with_draw("01141", 3)
        .with_draw("01151", 3)
        .with_draw("01024", 2)
        .with_plot("01001", 3)
        .with_plot("01002", 2)
        .with_plot("01003", 2);
    let seats = [PlayerSetup::new("Alice", deck.clone()), PlayerSetup::new("Bob", deck)];
    Game::new(GameConfig::with_seed(seed), seats, &catalog(), &AbilityRegistry::core_set()).unwrap()
}

fn all_ids(game: &Game) -> Vec<EntityId> {
    let mut ids: Vec<_> = PlayerId::all()
        .flat_map(|id| game.player(id).all_card_ids())
        .collect();
    ids.sort();
    ids
}

/// One thing a player might do.
#[derive(Clone, Debug)]
enum Step {
    Press(usize),
    Click(usize),
    Drag(usize, usize, usize),
}

fn step() -> impl Strategy<Value = (u8, Step)> {
    let action = prop_oneof![
        (0..COMMANDS.len()).prop_map(Step::Press),
        (0usize..200).prop_map(Step::Click),
        (0usize..200, 0..Zone::ALL.len(), 0..Zone::ALL.len())
            .prop_map(|(card, from, to)| Step::Drag(card, from, to)),
    ];
    (0u8..2, action)
}

fn run(game: &mut Game, player: PlayerId, step: &Step, ids: &[EntityId]) {
    match *step {
        Step::Press(index) => {
            game.apply_command(player, COMMANDS[index]);
        }
        Step::Click(card) => {
            game.card_clicked(player, ids[card % ids.len()]);
        }
        Step::Drag(card, from, to) => {
            game.drop(player, ids[card % ids.len()], Zone::ALL[from], Zone::ALL[to]);
        }
    }
}

proptest! {
    /// Random play never creates, loses or copies a card.
    #[test]
    fn cards_are_conserved(seed in 0u64..1000, steps in prop::collection::vec(step(), 0..150)) {
        let mut game = new_game(seed);
        let initial = all_ids(&game);
        prop_assert_eq!(initial.len(), game.cards_created() as usize - 2);

        for (player, step) in &steps {
            run(&mut game, PlayerId::new(*player), step, &initial);
            prop_assert_eq!(&all_ids(&game), &initial);
        }
    }

    /// Cards stay with their owner unless they are in play.
    #[test]
    fn cards_out_of_play_are_with_their_owner(seed in 0u64..1000, steps in prop::collection::vec(step(), 0..150)) {
        let mut game = new_game(seed);
        let initial = all_ids(&game);

        for (player, step) in &steps {
            run(&mut game, PlayerId::new(*player), step, &initial);
        }

        for id in PlayerId::all() {
            let player = game.player(id);
            for pile in [&player.hand, &player.draw_deck, &player.discard_pile, &player.dead_pile] {
                prop_assert!(pile.iter().all(|card| card.owner() == id));
            }
        }
    }

    /// Faction power never goes negative and never appears from nowhere.
    #[test]
    fn power_only_moves_through_the_rules(seed in 0u64..1000, steps in prop::collection::vec(step(), 0..150)) {
        let mut game = new_game(seed);
        let initial = all_ids(&game);
        let mut rounds_seen = game.round();

        for (player, step) in &steps {
            run(&mut game, PlayerId::new(*player), step, &initial);
            rounds_seen = rounds_seen.max(game.round());
        }

        // Dominance with A Feast for Crows gives 3 a round, and each of up to
        // six challenges may be unopposed. Claim and Clash only move power.
        let total: u32 = PlayerId::all().map(|id| game.player(id).power).sum();
        prop_assert!(total <= rounds_seen * 9);
    }
}
