use parlay_engine::normalize::merge_duplicates;
use parlay_engine::{
    aggregate, combine_parlay_odds, normalize_batch, BetStatus, EngineConfig, FixedClock,
    PayoutLabel, PerformanceSummary, WagerKind,
};
use serde_json::json;

const NOW: i64 = 1_730_000_000_000;

#[test]
fn test_client_submission_to_display_values() {
    let config = EngineConfig::default();
    let clock = FixedClock(NOW);

    // What a web client submits for a two-leg parlay
    let submitted = vec![json!({
        "id": "PL-123",
        "uid": "user-7",
        "amount": 10,
        "boost": true,
        "boostPercentage": 25,
        "legs": [
            { "id": "leg-1", "Player": "Josh Allen", "Prop": "Passing Yards", "Line": 249.5,
              "selection": "Over", "odds": -110, "week": 7 },
            { "id": "leg-2", "player": "James Cook", "prop": "Rush Yards", "line": "64.5",
              "Selection": "Under", "Odds": -110, "Week": "Week 7" }
        ]
    })];

    let outcome = normalize_batch(&submitted, &config, &clock);
    assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
    let wager = &outcome.accepted[0];
    assert_eq!(wager.kind, WagerKind::Parlay);
    assert_eq!(wager.odds, 264);
    assert_eq!(wager.created_at, NOW);

    // The store hands the legs back as flat rows sharing a correlation key
    let rows: Vec<_> = wager
        .legs
        .iter()
        .map(|leg| {
            json!({
                "id": leg.id,
                "parlayId": wager.id,
                "userId": wager.user_id,
                "createdAt": wager.created_at,
                "status": "won",
                "stake": wager.stake,
                "totalOdds": wager.odds,
                "boost": wager.boost,
                "boostPct": wager.boost_pct,
                "player": leg.player,
                "prop": leg.prop,
                "line": leg.line,
                "selection": leg.selection,
                "odds": leg.odds,
                "week": leg.week,
            })
        })
        .collect();

    let wagers = aggregate(&rows, &config, &clock);
    assert_eq!(wagers.len(), 1);
    let parlay = &wagers[0];
    assert_eq!(parlay.id, "PL-123");
    assert_eq!(parlay.odds, 264);
    assert_eq!(parlay.legs.len(), 2);
    assert_eq!(parlay.legs[0].odds, -110);
    assert_eq!(parlay.legs[1].player, "James Cook");
    assert_eq!(parlay.legs[1].week, 7);

    // 10 * (3.6446 - 1) * 1.25 + 10
    let payout = parlay.payout(&config).unwrap();
    assert_eq!(payout.label, PayoutLabel::WonBoosted);
    let combined = combine_parlay_odds(&[264]).unwrap();
    let expected = 10.0 + 10.0 * (combined.total_decimal_odds - 1.0) * 1.25;
    assert!((payout.amount - expected).abs() < 1e-9);
    assert!((payout.amount - 43.0).abs() < 0.01);

    let summary = PerformanceSummary::from_wagers(&wagers, &config);
    assert_eq!(summary.won, 1);
    assert_eq!(summary.win_rate, Some(1.0));
}

#[test]
fn test_historical_prop_migration() {
    let config = EngineConfig {
        default_stake: 5.0,
        ..Default::default()
    };
    let clock = FixedClock(NOW);

    let legacy = vec![
        json!({ "Player": "Josh Allen", "Prop": "Passing Yards", "Week": 7, "Line": 249.5,
                "selection": "Over", "uid": "u1", "gameDate": "2024-10-20" }),
        json!({ "player": "josh allen", "prop": "passing yards", "week": "7", "line": "249.5",
                "result": "won", "odds": -120, "Player": null }),
        json!({ "player": "Dalton Kincaid", "prop": "Receptions", "week": 7, "line": "four",
                "selection": "Over" }),
        json!({ "player": "Khalil Shakir", "prop": "Receptions", "week": 7, "line": 3.5,
                "selection": "Over", "result": "push" }),
    ];

    let merged = merge_duplicates(&legacy);
    assert_eq!(merged.len(), 3);

    let outcome = normalize_batch(&merged, &config, &clock);
    assert_eq!(outcome.accepted.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 1);
    assert_eq!(outcome.failures[0].violations[0].field, "legs[0].line");

    let allen = &outcome.accepted[0];
    assert_eq!(allen.id, "josh_allen_passing_yards_w7_249.5");
    assert_eq!(allen.user_id, "u1");
    assert_eq!(allen.status, BetStatus::Won);
    assert_eq!(allen.stake, 5.0);
    assert_eq!(allen.odds, -120);
    assert_eq!(allen.created_at, 1_729_382_400_000);
    // later spelling wins, the null "Player" erased nothing
    assert_eq!(allen.legs[0].player, "josh allen");

    let shakir = &outcome.accepted[1];
    assert_eq!(shakir.status, BetStatus::Void);
    assert_eq!(shakir.payout(&config).unwrap().amount, 5.0);
}
