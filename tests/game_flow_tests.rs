//! Full-game integration tests.
//!
//! These drive a two-player game through its public command surface: the
//! mulligan, setup, plots, marshalling, challenges, claim and dominance.

use rust_plots::abilities::plots;
use rust_plots::cards::{Card, CardDefinition, CardRegistry, CardType};
use rust_plots::core::{ChallengeType, Command, EntityId, GameConfig, Phase, PlayerId, Zone};
use rust_plots::game::{ChallengeStage, Deck, Game, PlayerSetup};
use rust_plots::AbilityRegistry;

const GUARD: &str = "01100";
const RANGER: &str = "01101";
const LITTLE_BIRD: &str = "01102";
const STEADY: &str = "01004";
const SLOW: &str = "01005";

const ALICE: PlayerId = PlayerId::new(0);
const BOB: PlayerId = PlayerId::new(1);

fn catalog() -> CardRegistry {
    let mut catalog = CardRegistry::new();

    let mut guard = CardDefinition::new(GUARD, "Guard", CardType::Character)
        .with_cost(1)
        .with_strength(2);
    for ty in ChallengeType::ALL {
        guard = guard.with_icon(ty);
    }
    catalog.register(guard);
    catalog.register(
        CardDefinition::new(RANGER, "Ranger", CardType::Character)
            .with_cost(2)
            .with_strength(1)
            .with_icon(ChallengeType::Military)
            .with_text("Stealth."),
    );
    catalog.register(
        CardDefinition::new(LITTLE_BIRD, "Little Bird", CardType::Attachment)
            .with_cost(1)
            .with_text("Attach to a character."),
    );

    catalog.register(
        CardDefinition::new(plots::A_CLASH_OF_KINGS, "A Clash of Kings", CardType::Plot)
            .with_plot_stats(4, 1, 1, 5),
    );
    catalog.register(
        CardDefinition::new(plots::A_FEAST_FOR_CROWS, "A Feast for Crows", CardType::Plot)
            .with_plot_stats(1, 0, 2, 4),
    );
    catalog.register(
        CardDefinition::new(plots::A_GAME_OF_THRONES, "A Game of Thrones", CardType::Plot)
            .with_plot_stats(2, 1, 1, 5),
    );
    catalog.register(CardDefinition::new(STEADY, "Steady Plot", CardType::Plot).with_plot_stats(5, 3, 1, 6));
    catalog.register(CardDefinition::new(SLOW, "Slow Plot", CardType::Plot).with_plot_stats(1, 0, 2, 6));
    catalog
}

fn deck() -> Deck {
    Deck::new()
        .with_faction("stark")
        .with_draw(GUARD, 28)
        .with_draw(RANGER, 2)
        .with_draw(LITTLE_BIRD, 3)
        .with_plot(plots::A_CLASH_OF_KINGS, 1)
        .with_plot(plots::A_FEAST_FOR_CROWS, 1)
        .with_plot(plots::A_GAME_OF_THRONES, 1)
        .with_plot(STEADY, 2)
        .with_plot(SLOW, 2)
}

fn new_game() -> Game {
    let seats = [PlayerSetup::new("Alice", deck()), PlayerSetup::new("Bob", deck())];
    Game::new(GameConfig::with_seed(7), seats, &catalog(), &AbilityRegistry::core_set()).unwrap()
}

/// A card of `code` in `player`'s hand, pulled from the draw deck if needed.
fn fetch(game: &mut Game, player: PlayerId, code: &str) -> EntityId {
    if let Some(card) = game.player(player).hand.iter().find(|c| c.code() == code) {
        return card.id();
    }
    let id = game
        .player(player)
        .draw_deck
        .iter()
        .find(|c| c.code() == code)
        .map(Card::id)
        .unwrap();
    assert!(game.drop(player, id, Zone::DrawDeck, Zone::Hand));
    id
}

fn keep_hands(game: &mut Game) {
    assert!(game.apply_command(ALICE, Command::Keep));
    assert!(game.apply_command(BOB, Command::Keep));
}

/// Put `code` into play (face-down during setup) and return its id.
fn put_in_play(game: &mut Game, player: PlayerId, code: &str) -> EntityId {
    let id = fetch(game, player, code);
    assert!(game.card_clicked(player, id));
    id
}

fn finish_setup(game: &mut Game) {
    assert!(game.apply_command(ALICE, Command::SetupDone));
    assert!(game.apply_command(BOB, Command::SetupDone));
}

fn choose_plot(game: &mut Game, player: PlayerId, code: &str) {
    let plot = game
        .player(player)
        .plot_deck
        .iter()
        .find(|p| p.code() == code)
        .map(Card::id)
        .unwrap();
    assert!(game.card_clicked(player, plot));
    assert!(game.apply_command(player, Command::SelectPlot));
}

fn reveal(game: &mut Game, alice_plot: &str, bob_plot: &str) {
    choose_plot(game, ALICE, alice_plot);
    choose_plot(game, BOB, bob_plot);
}

fn skip_marshal(game: &mut Game) {
    let first = game.first_player().unwrap();
    assert!(game.apply_command(first, Command::DoneMarshal));
    assert!(game.apply_command(first.opponent(), Command::DoneMarshal));
}

/// A game in Alice's challenge turn, each side holding `alice` and `bob`
/// guards in play. Alice reveals the steady plot and wins initiative.
fn game_at_challenges(alice: usize, bob: usize, bob_plot: &str) -> (Game, Vec<EntityId>, Vec<EntityId>) {
    let mut game = new_game();
    keep_hands(&mut game);
    let alice_guards: Vec<_> = (0..alice).map(|_| put_in_play(&mut game, ALICE, GUARD)).collect();
    let bob_guards: Vec<_> = (0..bob).map(|_| put_in_play(&mut game, BOB, GUARD)).collect();
    finish_setup(&mut game);
    reveal(&mut game, STEADY, bob_plot);
    skip_marshal(&mut game);
    (game, alice_guards, bob_guards)
}

/// Test opening hands and the one-time mulligan.
#[test]
fn test_opening_hands_and_mulligan() {
    let mut game = new_game();

    for id in [ALICE, BOB] {
        let player = game.player(id);
        assert_eq!(player.phase, Phase::Mulligan);
        assert_eq!(player.hand.len(), 7);
        assert_eq!(player.draw_deck.len(), 26);
        assert_eq!(player.plot_deck.len(), 7);
        assert_eq!(player.buttons.len(), 2);
    }

    assert!(game.apply_command(ALICE, Command::Mulligan));
    assert!(!game.apply_command(ALICE, Command::Mulligan));
    assert_eq!(game.player(ALICE).hand.len(), 7);
    assert_eq!(game.player(ALICE).phase, Phase::Mulligan);

    assert!(game.apply_command(BOB, Command::Keep));
    for id in [ALICE, BOB] {
        assert_eq!(game.player(id).phase, Phase::Setup);
        assert_eq!(game.player(id).gold, 8);
    }
    assert!(game.messages().iter().any(|m| m.contains("has taken a mulligan")));
}

/// Test that setup cards stay hidden from the opponent until both are done.
#[test]
fn test_setup_is_face_down_until_both_done() {
    let mut game = new_game();
    keep_hands(&mut game);
    let guards: Vec<_> = (0..3).map(|_| put_in_play(&mut game, ALICE, GUARD)).collect();

    assert_eq!(game.player(ALICE).gold, 5);
    let bob_view = game.get_state(BOB);
    let alice_seen = &bob_view.players[ALICE.index()];
    assert_eq!(alice_seen.cards_in_play.len(), 3);
    assert!(alice_seen.cards_in_play.iter().all(|c| c.is_hidden()));
    assert_eq!(alice_seen.gold, 0);

    let own_view = game.get_state(ALICE);
    assert!(own_view.players[ALICE.index()]
        .cards_in_play
        .iter()
        .all(|c| c.facedown && c.uuid.is_some()));

    assert!(game.apply_command(ALICE, Command::SetupDone));
    assert!(!game.apply_command(ALICE, Command::SetupDone));
    assert_eq!(game.round(), 0);

    assert!(game.apply_command(BOB, Command::SetupDone));
    assert_eq!(game.round(), 1);
    for id in [ALICE, BOB] {
        assert_eq!(game.player(id).phase, Phase::Plot);
        assert_eq!(game.player(id).hand.len(), 7);
    }
    for guard in guards {
        let card = game.player(ALICE).find_card_in_play(guard).unwrap();
        assert!(!card.is_facedown());
    }
    let bob_view = game.get_state(BOB);
    assert_eq!(
        bob_view.players[ALICE.index()].cards_in_play[0].name.as_deref(),
        Some("Guard")
    );
}

/// Test initiative, the draw phase and sequential marshalling.
#[test]
fn test_initiative_and_marshal_order() {
    let mut game = new_game();
    keep_hands(&mut game);
    finish_setup(&mut game);
    reveal(&mut game, STEADY, SLOW);

    assert_eq!(game.first_player(), Some(ALICE));
    assert!(game.player(ALICE).first_player);
    assert!(game.messages().iter().any(|m| m.contains("Alice reveals Steady Plot")));

    let alice = game.player(ALICE);
    assert_eq!(alice.phase, Phase::Marshal);
    assert_eq!(alice.gold, 5);
    assert_eq!(alice.claim, 1);
    assert_eq!(alice.reserve, 6);
    assert_eq!(alice.hand.len(), 9);

    let bob = game.player(BOB);
    assert_eq!(bob.phase, Phase::Draw);
    assert_eq!(bob.hand.len(), 9);
    assert!(bob.buttons.is_empty());

    let bob_card = game.player(BOB).hand.iter().next().map(Card::id).unwrap();
    assert!(!game.card_clicked(BOB, bob_card));
    assert!(!game.apply_command(BOB, Command::DoneMarshal));

    put_in_play(&mut game, ALICE, GUARD);
    assert_eq!(game.player(ALICE).gold, 4);

    assert!(game.apply_command(ALICE, Command::DoneMarshal));
    assert_eq!(game.player(BOB).phase, Phase::Marshal);
    assert_eq!(game.player(BOB).gold, 1);

    assert!(game.apply_command(BOB, Command::DoneMarshal));
    for id in [ALICE, BOB] {
        assert_eq!(game.player(id).phase, Phase::Challenge);
    }
    assert!(game
        .player(ALICE)
        .buttons
        .iter()
        .any(|b| b.command == Command::Challenge(ChallengeType::Military)));
    assert!(game.player(BOB).buttons.is_empty());
}

/// Test an unopposed power challenge.
#[test]
fn test_unopposed_power_challenge() {
    let (mut game, alice_guards, _) = game_at_challenges(2, 0, SLOW);

    assert!(!game.apply_command(BOB, Command::Challenge(ChallengeType::Power)));
    assert!(game.apply_command(ALICE, Command::Challenge(ChallengeType::Power)));
    assert!(!game.apply_command(ALICE, Command::Challenge(ChallengeType::Intrigue)));
    assert!(game.card_clicked(ALICE, alice_guards[0]));
    assert!(game.apply_command(ALICE, Command::DoneChallenge));

    let challenge = game.challenge().unwrap();
    assert_eq!(challenge.stage, ChallengeStage::Defending);
    assert_eq!(challenge.defender, BOB);

    assert!(game.apply_command(BOB, Command::DoneDefend));

    assert!(game.challenge().is_none());
    let alice = game.player(ALICE);
    assert_eq!(alice.power, 1);
    assert_eq!(alice.challenges.won(ChallengeType::Power), 1);
    assert!(alice.find_card_in_play(alice_guards[0]).unwrap().kneeled);
    assert!(!alice.find_card_in_play(alice_guards[1]).unwrap().kneeled);
    assert!(game.messages().iter().any(|m| m.contains("unopposed")));

    // One challenge of each type per round.
    assert!(!game.apply_command(ALICE, Command::Challenge(ChallengeType::Power)));
}

/// Test that a challenge with no attackers is called off uncounted.
#[test]
fn test_empty_challenge_is_cancelled() {
    let (mut game, _, _) = game_at_challenges(1, 0, SLOW);

    assert!(game.apply_command(ALICE, Command::Challenge(ChallengeType::Intrigue)));
    assert!(game.apply_command(ALICE, Command::DoneChallenge));

    assert!(game.challenge().is_none());
    assert_eq!(game.player(ALICE).challenges.get(ChallengeType::Intrigue).performed, 0);
    assert!(game.apply_command(ALICE, Command::Challenge(ChallengeType::Intrigue)));
}

/// Test the defender winning a challenge.
#[test]
fn test_defender_wins() {
    let (mut game, alice_guards, bob_guards) = game_at_challenges(1, 2, SLOW);
    let bob_hand = game.player(BOB).hand.len();

    assert!(game.apply_command(ALICE, Command::Challenge(ChallengeType::Intrigue)));
    assert!(game.card_clicked(ALICE, alice_guards[0]));
    assert!(game.apply_command(ALICE, Command::DoneChallenge));

    assert!(!game.card_clicked(ALICE, bob_guards[0]));
    assert!(game.card_clicked(BOB, bob_guards[0]));
    assert!(game.card_clicked(BOB, bob_guards[1]));
    assert!(game.apply_command(BOB, Command::DoneDefend));

    assert!(game.challenge().is_none());
    assert_eq!(game.player(BOB).challenges.won(ChallengeType::Intrigue), 1);
    assert_eq!(game.player(ALICE).challenges.won(ChallengeType::Intrigue), 0);
    assert_eq!(game.player(BOB).hand.len(), bob_hand);
    assert_eq!(game.player(ALICE).power, 0);
}

/// Test that intrigue claim discards from the defender's hand.
#[test]
fn test_intrigue_claim_discards() {
    let (mut game, alice_guards, _) = game_at_challenges(1, 0, SLOW);
    let bob_hand = game.player(BOB).hand.len();

    assert!(game.apply_command(ALICE, Command::Challenge(ChallengeType::Intrigue)));
    assert!(game.card_clicked(ALICE, alice_guards[0]));
    assert!(game.apply_command(ALICE, Command::DoneChallenge));
    assert!(game.apply_command(BOB, Command::DoneDefend));

    assert_eq!(game.player(BOB).hand.len(), bob_hand - 1);
    assert_eq!(game.player(BOB).discard_pile.len(), 1);
}

/// Test military claim: the defender chooses a character to kill.
#[test]
fn test_military_claim_kills() {
    let (mut game, alice_guards, bob_guards) = game_at_challenges(1, 2, SLOW);

    assert!(game.apply_command(ALICE, Command::Challenge(ChallengeType::Military)));
    assert!(game.card_clicked(ALICE, alice_guards[0]));
    assert!(game.apply_command(ALICE, Command::DoneChallenge));
    assert!(game.apply_command(BOB, Command::DoneDefend));

    assert_eq!(game.challenge().unwrap().stage, ChallengeStage::Claim);
    assert_eq!(game.player(BOB).phase, Phase::Claim);
    assert_eq!(game.player(BOB).claim_to_do, 1);

    assert!(!game.card_clicked(ALICE, bob_guards[0]));
    assert!(!game.card_clicked(BOB, alice_guards[0]));
    assert!(game.card_clicked(BOB, bob_guards[0]));

    assert!(game.challenge().is_none());
    let bob = game.player(BOB);
    assert!(bob.dead_pile.contains(bob_guards[0]));
    assert_eq!(bob.cards_in_play.len(), 1);
    assert_eq!(bob.phase, Phase::Challenge);
    assert!(game.messages().iter().any(|m| m.contains("has killed Guard")));
}

/// Test that the defender may decline to finish military claim.
#[test]
fn test_cancel_claim() {
    let (mut game, alice_guards, _) = game_at_challenges(1, 1, SLOW);

    assert!(game.apply_command(ALICE, Command::Challenge(ChallengeType::Military)));
    assert!(game.card_clicked(ALICE, alice_guards[0]));
    assert!(game.apply_command(ALICE, Command::DoneChallenge));
    assert!(game.apply_command(BOB, Command::DoneDefend));

    assert!(!game.apply_command(ALICE, Command::CancelClaim));
    assert!(game.apply_command(BOB, Command::CancelClaim));
    assert!(game.challenge().is_none());
    assert_eq!(game.player(BOB).cards_in_play.len(), 1);
}

/// Test that a Stealth attacker can take a defender out of the challenge.
#[test]
fn test_stealth_target_cannot_defend() {
    let mut game = new_game();
    keep_hands(&mut game);
    let ranger = put_in_play(&mut game, ALICE, RANGER);
    let bob_guards: Vec<_> = (0..2).map(|_| put_in_play(&mut game, BOB, GUARD)).collect();
    finish_setup(&mut game);
    reveal(&mut game, STEADY, SLOW);
    skip_marshal(&mut game);

    assert!(game.apply_command(ALICE, Command::Challenge(ChallengeType::Military)));
    assert!(game.card_clicked(ALICE, ranger));
    assert!(game.card_clicked(ALICE, bob_guards[0]));
    assert!(!game.card_clicked(ALICE, bob_guards[1]));
    assert!(game.apply_command(ALICE, Command::DoneChallenge));

    assert!(!game.card_clicked(BOB, bob_guards[0]));
    assert!(game.card_clicked(BOB, bob_guards[1]));
    assert!(game.apply_command(BOB, Command::DoneDefend));

    // Ranger (1) loses to the remaining guard (2).
    assert_eq!(game.player(BOB).challenges.won(ChallengeType::Military), 1);
    assert!(game
        .player(BOB)
        .cards_in_play
        .iter()
        .all(|c| !c.stealth));
}

/// Test that A Game of Thrones forbids military and power challenges.
#[test]
fn test_game_of_thrones_restricts_challenges() {
    let (mut game, _, _) = game_at_challenges(1, 0, plots::A_GAME_OF_THRONES);

    assert!(!game.apply_command(ALICE, Command::Challenge(ChallengeType::Military)));
    assert!(!game.apply_command(ALICE, Command::Challenge(ChallengeType::Power)));
    assert!(game.apply_command(ALICE, Command::Challenge(ChallengeType::Intrigue)));
}

/// Test dominance, A Feast for Crows and the return to the plot phase.
#[test]
fn test_dominance_and_next_round() {
    let mut game = new_game();
    keep_hands(&mut game);
    for _ in 0..4 {
        put_in_play(&mut game, ALICE, GUARD);
    }
    finish_setup(&mut game);
    reveal(&mut game, plots::A_FEAST_FOR_CROWS, SLOW);
    skip_marshal(&mut game);

    let first = game.first_player().unwrap();
    assert!(!game.apply_command(first.opponent(), Command::DoneAllChallenges));
    assert!(game.apply_command(first, Command::DoneAllChallenges));
    assert!(game.apply_command(first.opponent(), Command::DoneAllChallenges));

    // 4 guards at 2 strength plus 1 gold against 1 gold.
    let alice = game.player(ALICE);
    assert_eq!(alice.power, 3);
    assert_eq!(game.player(BOB).power, 0);
    assert!(game.messages().iter().any(|m| m.contains("wins dominance")));
    assert!(game.messages().iter().any(|m| m.contains("A Feast for Crows")));

    assert_eq!(game.round(), 2);
    for id in [ALICE, BOB] {
        let player = game.player(id);
        assert_eq!(player.phase, Phase::Plot);
        assert_eq!(player.gold, 0);
        assert_eq!(player.plot_deck.len(), 6);
    }
}

/// Test an attachment played onto the opponent's character. When the host
/// dies the attachment returns to its owner's hand.
#[test]
fn test_attachment_on_opponent_returns_to_owner() {
    let mut game = new_game();
    keep_hands(&mut game);
    let alice_guard = put_in_play(&mut game, ALICE, GUARD);
    let bob_guard = put_in_play(&mut game, BOB, GUARD);
    finish_setup(&mut game);
    reveal(&mut game, STEADY, SLOW);

    let bird = fetch(&mut game, ALICE, LITTLE_BIRD);
    assert!(game.card_clicked(ALICE, bird));
    assert_eq!(game.player(ALICE).selected_attachment, Some(bird));
    assert_eq!(game.player(ALICE).gold, 4);
    assert!(!game.apply_command(ALICE, Command::DoneMarshal));

    assert!(game.card_clicked(ALICE, bob_guard));
    let host = game.player(BOB).find_card_in_play(bob_guard).unwrap();
    assert_eq!(host.attachments.len(), 1);
    assert_eq!(host.attachments[0].owner(), ALICE);
    assert!(game.player(ALICE).selected_attachment.is_none());
    assert!(!game.player(ALICE).hand.contains(bird));
    assert!(game.messages().iter().any(|m| m.contains("attaches Little Bird to Guard")));

    skip_marshal(&mut game);
    assert!(game.apply_command(ALICE, Command::Challenge(ChallengeType::Military)));
    assert!(game.card_clicked(ALICE, alice_guard));
    assert!(game.apply_command(ALICE, Command::DoneChallenge));
    assert!(game.apply_command(BOB, Command::DoneDefend));
    assert!(game.card_clicked(BOB, bob_guard));

    assert!(game.player(BOB).dead_pile.contains(bob_guard));
    assert!(game.player(ALICE).hand.contains(bird));
    assert!(game.player(BOB).all_card_ids().iter().all(|&id| id != bird));
}

/// Test that abandoning an attachment refunds its cost.
#[test]
fn test_cancel_attachment_refunds() {
    let mut game = new_game();
    keep_hands(&mut game);
    finish_setup(&mut game);
    reveal(&mut game, STEADY, SLOW);

    let bird = fetch(&mut game, ALICE, LITTLE_BIRD);
    assert!(game.card_clicked(ALICE, bird));
    assert_eq!(game.player(ALICE).gold, 4);

    assert!(game.apply_command(ALICE, Command::DoneAttachment));
    let alice = game.player(ALICE);
    assert_eq!(alice.gold, 5);
    assert!(alice.hand.contains(bird));
    assert!(alice.selected_attachment.is_none());
    assert!(alice.buttons.iter().any(|b| b.command == Command::DoneMarshal));
}

/// Test moving cards between zones by hand.
#[test]
fn test_manual_drops() {
    let (mut game, alice_guards, _) = game_at_challenges(1, 0, SLOW);
    let guard = alice_guards[0];

    assert!(!game.drop(ALICE, guard, Zone::PlayArea, Zone::PlayArea));
    assert!(!game.drop(ALICE, guard, Zone::PlayArea, Zone::PlotDeck));
    assert!(game.drop(ALICE, guard, Zone::PlayArea, Zone::DiscardPile));
    assert!(game.player(ALICE).discard_pile.contains(guard));
    assert!(game
        .messages()
        .iter()
        .any(|m| m.contains("from their play area to their discard pile")));

    assert!(game.drop(ALICE, guard, Zone::DiscardPile, Zone::PlayArea));
    let card = game.player(ALICE).find_card_in_play(guard).unwrap();
    assert!(!card.is_facedown());

    assert!(game.drop(ALICE, guard, Zone::PlayArea, Zone::DrawDeck));
    assert_eq!(game.player(ALICE).draw_deck.top().map(Card::id), Some(guard));
}

/// Test the snapshot each viewer receives.
#[test]
fn test_snapshot_redaction() {
    let mut game = new_game();
    keep_hands(&mut game);

    let snapshot = game.get_state(BOB);
    let alice = &snapshot.players[ALICE.index()];
    assert_eq!(alice.hand.len(), 7);
    assert!(alice.hand.iter().all(|c| c.is_hidden()));
    assert!(alice.plot_deck.iter().all(|c| c.is_hidden()));
    assert!(alice.buttons.is_empty());
    assert!(alice.menu_title.is_empty());

    let bob = &snapshot.players[BOB.index()];
    assert!(bob.hand.iter().all(|c| c.uuid.is_some()));
    assert_eq!(bob.menu_title, "Select setup cards");

    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["players"][0]["hand"][0], serde_json::json!({ "facedown": true }));
    assert_eq!(value["players"][1]["numDrawCards"], 26);
    assert_eq!(value["round"], 0);
    assert!(value["challenge"].is_null());
}

/// Test that every card id is created once and never lost.
#[test]
fn test_ids_are_conserved_through_a_round() {
    let (mut game, alice_guards, _) = game_at_challenges(2, 2, SLOW);
    let expected = game.cards_created() as usize - 2;

    assert!(game.apply_command(ALICE, Command::Challenge(ChallengeType::Military)));
    assert!(game.card_clicked(ALICE, alice_guards[0]));
    assert!(game.apply_command(ALICE, Command::DoneChallenge));
    assert!(game.apply_command(BOB, Command::DoneDefend));

    let mut ids: Vec<_> = [ALICE, BOB]
        .into_iter()
        .flat_map(|id| game.player(id).all_card_ids())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), expected);
    assert_eq!(ids[0], EntityId(2));
}
