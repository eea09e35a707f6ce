mod utils;

use tablier::yahtzee::models::Category;
use tablier::yahtzee::DiceRoll;
use utils::YahtzeeSetupBuilder;

fn roll(faces: [u8; 5]) -> DiceRoll {
    DiceRoll::new(faces).unwrap()
}

#[tokio::test]
async fn full_game_flow_produces_consistent_statistics() {
    let setup = YahtzeeSetupBuilder::new().with_two_players().build().await;
    let alice = setup.player_ids[0];
    let bob = setup.player_ids[1];
    let game = setup
        .service
        .create_game("Kitchen table", setup.player_ids.clone())
        .await
        .unwrap();

    // Alice fills a strong upper section plus a yahtzee.
    setup
        .service
        .record_roll(game.id, alice, Category::Sixes, roll([6, 6, 6, 1, 2]))
        .await
        .unwrap();
    setup
        .service
        .record_roll(game.id, alice, Category::Fives, roll([5, 5, 5, 2, 2]))
        .await
        .unwrap();
    setup
        .service
        .record_roll(game.id, alice, Category::Yahtzee, roll([4, 4, 4, 4, 4]))
        .await
        .unwrap();
    // Bob scratches his yahtzee and keeps a straight.
    setup
        .service
        .record_roll(game.id, bob, Category::Yahtzee, roll([1, 2, 3, 4, 5]))
        .await
        .unwrap();
    setup
        .service
        .record_roll(game.id, bob, Category::LargeStraight, roll([1, 2, 3, 4, 5]))
        .await
        .unwrap();

    let alice_total = setup.service.game_total(game.id, alice, 0).await.unwrap();
    assert_eq!(alice_total, 18 + 15 + 50);
    let bob_total = setup.service.game_total(game.id, bob, 0).await.unwrap();
    assert_eq!(bob_total, 40);

    let rankings = setup.service.game_rankings(game.id).await.unwrap();
    assert_eq!(rankings[0].player_id, alice);
    assert_eq!(rankings[0].rank, 1);
    assert_eq!(rankings[1].rank, 2);

    let finished = setup.service.finish_game(game.id).await.unwrap();
    assert_eq!(finished.winner_id, Some(alice));

    let stats = setup.service.player_statistics(alice).await.unwrap();
    assert_eq!(stats.wins, 1);
    assert_eq!(stats.yahtzee_count, 1);
    assert_eq!(stats.best_score, 83);
    assert_eq!(stats.recent_games.len(), 1);
    assert_eq!(stats.recent_games[0].rank, 1);

    let bob_stats = setup.service.player_statistics(bob).await.unwrap();
    assert_eq!(bob_stats.yahtzee_count, 0);
    let bob_yahtzee = bob_stats
        .categories
        .iter()
        .find(|c| c.category == Category::Yahtzee)
        .unwrap();
    assert_eq!(bob_yahtzee.times_zeroed, 1);
}

#[tokio::test]
async fn global_report_covers_records_and_leaderboards() {
    let setup = YahtzeeSetupBuilder::new().with_two_players().build().await;
    let alice = setup.player_ids[0];
    let bob = setup.player_ids[1];

    for round in 0..2 {
        let game = setup
            .service
            .create_game(format!("Game {}", round + 1).as_str(), setup.player_ids.clone())
            .await
            .unwrap();
        setup
            .service
            .record_roll(game.id, alice, Category::Yahtzee, roll([3, 3, 3, 3, 3]))
            .await
            .unwrap();
        if round == 1 {
            // Alice's second sheet scores higher, so her totals vary.
            setup
                .service
                .record_roll(game.id, alice, Category::Sixes, roll([6, 6, 6, 6, 2]))
                .await
                .unwrap();
        }
        setup
            .service
            .record_roll(game.id, bob, Category::Chance, roll([2, 2, 3, 3, 4]))
            .await
            .unwrap();
        setup.service.finish_game(game.id).await.unwrap();
    }

    let report = setup.service.global_statistics().await.unwrap();

    assert_eq!(report.player_count, 2);
    assert_eq!(report.game_count, 2);
    assert_eq!(report.finished_game_count, 2);
    assert_eq!(report.estimated_dice_rolls, 2 * 13 * 3);

    let record = report.high_score.unwrap();
    assert_eq!(record.score, 74);
    assert_eq!(record.player_name, "alice");

    assert_eq!(report.top_wins[0].player_name, "alice");
    assert_eq!(report.top_wins[0].value, 2.0);
    assert_eq!(report.top_yahtzees[0].value, 2.0);

    let luckiest = report.luckiest_player.unwrap();
    assert_eq!(luckiest.player_id, alice);

    // Both of Bob's games score 14: perfectly consistent.
    let consistent = report.most_consistent_player.unwrap();
    assert_eq!(consistent.player_id, bob);

    let yahtzee_stats = report
        .categories
        .iter()
        .find(|c| c.category == Category::Yahtzee)
        .unwrap();
    assert_eq!(yahtzee_stats.times_scored, 2);
    assert_eq!(yahtzee_stats.best_player_name.as_deref(), Some("alice"));
}

#[tokio::test]
async fn aggregates_serialize_for_the_presentation_layer() {
    let setup = YahtzeeSetupBuilder::new().with_two_players().build().await;
    let game = setup
        .service
        .create_game("Render me", setup.player_ids.clone())
        .await
        .unwrap();

    setup
        .service
        .record_roll(
            game.id,
            setup.player_ids[0],
            Category::FullHouse,
            roll([2, 2, 2, 5, 5]),
        )
        .await
        .unwrap();
    setup.service.finish_game(game.id).await.unwrap();

    let stats = setup
        .service
        .player_statistics(setup.player_ids[0])
        .await
        .unwrap();
    let report = setup.service.global_statistics().await.unwrap();

    assert!(serde_json::to_value(&stats).is_ok());
    assert!(serde_json::to_value(&report).is_ok());
}

#[tokio::test]
async fn scores_on_finished_games_are_rejected() {
    let setup = YahtzeeSetupBuilder::new().with_two_players().build().await;
    let game = setup
        .service
        .create_game("Locked", setup.player_ids.clone())
        .await
        .unwrap();
    setup.service.finish_game(game.id).await.unwrap();

    let result = setup
        .service
        .record_roll(
            game.id,
            setup.player_ids[0],
            Category::Chance,
            roll([1, 2, 3, 4, 5]),
        )
        .await;
    assert!(result.is_err());
}
