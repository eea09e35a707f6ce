mod utils;

use tablier::tarot::models::MAX_TAROT_PLAYERS;
use tablier::tarot::progression::StreakKind;
use tablier::tarot::statistics::round_attribution;
use tablier::tarot::RoundEntry;
use utils::{all_bonuses, garde_with_petit, round_entry, TarotSetupBuilder};

#[tokio::test]
async fn full_game_flow_produces_consistent_statistics() {
    let setup = TarotSetupBuilder::new().with_four_players().build().await;
    let game = setup.game("Friday night").await;

    // Alice takes twice, once big and once failed; Bob takes once.
    let (_, first) = setup
        .service
        .record_round(game.id, garde_with_petit(&setup, 0))
        .await
        .unwrap();
    assert_eq!(first.base_points, 68);
    assert_eq!(first.bonus_points, 20);
    assert_eq!(first.score, 88);
    assert!(first.contract_made);

    setup
        .service
        .record_round(game.id, round_entry(&setup, 0, 30))
        .await
        .unwrap();
    setup
        .service
        .record_round(game.id, round_entry(&setup, 1, 55))
        .await
        .unwrap();

    // History: one boundary per round plus the zero head, zero-sum at each.
    let history = setup.service.score_history(game.id).await.unwrap();
    for id in &setup.player_ids {
        assert_eq!(history[id].len(), 4);
        assert_eq!(history[id][0], 0.0);
    }
    for boundary in 0..4 {
        let sum: f64 = setup.player_ids.iter().map(|id| history[id][boundary]).sum();
        assert!(sum.abs() < 1e-9);
    }

    // Three rounds unlock every insight.
    let highlights = setup.service.highlights(game.id).await.unwrap().unwrap();
    assert!(highlights.best_round.is_some());

    let momentum = setup.service.momentum(game.id).await.unwrap();
    let alice = &momentum[&setup.player_ids[0]];
    assert_eq!(alice.current.kind, StreakKind::Losing);
    assert_eq!(alice.longest_win_streak, 1);

    let performance = setup.service.taker_performance(game.id).await.unwrap();
    assert_eq!(performance[&setup.player_ids[0]].rounds_taken, 2);
    assert!(!performance.contains_key(&setup.player_ids[2]));

    // Rankings cover every seat with dense ranks and resolved names.
    let rankings = setup.service.game_rankings(game.id).await.unwrap();
    assert_eq!(rankings.len(), 4);
    let ranks: Vec<u32> = rankings.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
    assert!(rankings.iter().any(|r| r.player_name == "alice"));

    let total: f64 = rankings.iter().map(|r| r.total).sum();
    assert!(total.abs() < 1e-9);
}

#[tokio::test]
async fn insights_stay_silent_below_three_rounds() {
    let setup = TarotSetupBuilder::new().with_four_players().build().await;
    let game = setup.game("Short").await;

    setup
        .service
        .record_round(game.id, round_entry(&setup, 0, 60))
        .await
        .unwrap();
    setup
        .service
        .record_round(game.id, round_entry(&setup, 1, 40))
        .await
        .unwrap();

    assert!(setup.service.highlights(game.id).await.unwrap().is_none());
    assert!(setup.service.momentum(game.id).await.unwrap().is_empty());
    assert!(setup
        .service
        .taker_performance(game.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn five_player_rounds_share_fate_with_called_partner() {
    let setup = TarotSetupBuilder::new().with_five_players().build().await;
    let game = setup.game("Table of five").await;

    let mut entry = round_entry(&setup, 0, 60);
    entry.called_partner_id = Some(setup.player_ids[1]);
    let (round, breakdown) = setup.service.record_round(game.id, entry).await.unwrap();
    assert_eq!(game.player_ids.len(), MAX_TAROT_PLAYERS);

    let shares = round_attribution(&round, &game.player_ids);
    let score = f64::from(breakdown.score);
    assert_eq!(shares[&setup.player_ids[0]], score);
    assert_eq!(shares[&setup.player_ids[1]], score);

    let sum: f64 = shares.values().sum();
    assert!(sum.abs() < 1e-9);
}

#[tokio::test]
async fn cross_game_player_statistics_and_bid_preferences() {
    let setup = TarotSetupBuilder::new().with_four_players().build().await;
    let game_a = setup.game("A").await;
    let game_b = setup.game("B").await;

    setup
        .service
        .record_round(game_a.id, round_entry(&setup, 0, 60))
        .await
        .unwrap();
    setup
        .service
        .record_round(game_a.id, round_entry(&setup, 0, 30))
        .await
        .unwrap();
    setup
        .service
        .record_round(game_b.id, all_bonuses(&setup, 0, 70))
        .await
        .unwrap();
    setup
        .service
        .record_round(game_b.id, round_entry(&setup, 1, 51))
        .await
        .unwrap();

    let stats = setup
        .service
        .player_statistics(setup.player_ids[0])
        .await
        .unwrap();
    assert_eq!(stats.games_played, 2);
    assert_eq!(stats.rounds_played, 4);
    assert_eq!(stats.taker_rounds, 3);
    assert_eq!(stats.taker_wins, 2);
    // The attribution nets to zero across the table, not per player.
    assert_ne!(stats.total_net_score, 0.0);

    let bids = setup
        .service
        .bid_statistics(setup.player_ids[0])
        .await
        .unwrap();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].times_played, 3);

    // Exact boundary: 51 points on a one-oudler garde is a win.
    let bob = setup
        .service
        .player_statistics(setup.player_ids[1])
        .await
        .unwrap();
    assert_eq!(bob.taker_wins, 1);
}

#[tokio::test]
async fn aggregates_serialize_for_the_presentation_layer() {
    let setup = TarotSetupBuilder::new().with_four_players().build().await;
    let game = setup.game("Render me").await;

    for (seat, points) in [(0usize, 60), (1, 30), (2, 45)] {
        setup
            .service
            .record_round(game.id, round_entry(&setup, seat, points))
            .await
            .unwrap();
    }

    let highlights = setup.service.highlights(game.id).await.unwrap();
    let rankings = setup.service.game_rankings(game.id).await.unwrap();
    let stats = setup
        .service
        .player_statistics(setup.player_ids[0])
        .await
        .unwrap();

    assert!(serde_json::to_value(&highlights).is_ok());
    assert!(serde_json::to_value(&rankings).is_ok());
    assert!(serde_json::to_value(&stats).is_ok());
}

#[tokio::test]
async fn unseated_takers_are_rejected_at_entry() {
    let setup = TarotSetupBuilder::new().with_four_players().build().await;
    let game = setup.game("Strict").await;

    let result = setup
        .service
        .record_round(
            game.id,
            RoundEntry {
                taker_id: uuid::Uuid::new_v4(),
                ..round_entry(&setup, 0, 60)
            },
        )
        .await;
    assert!(result.is_err());

    let stats = setup
        .service
        .player_statistics(setup.player_ids[0])
        .await
        .unwrap();
    assert_eq!(stats.rounds_played, 0);
}
