use cricket_auction_backend::models::Money;
use cricket_auction_backend::services::ServiceError;

mod common;
use common::auction_helpers::{auction_floor, CRORE, LAKH};

fn validation_message(err: ServiceError) -> String {
    match err {
        ServiceError::Validation(message) => message,
        other => panic!("Expected a validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn opening_bid_may_match_base_price_but_later_bids_must_beat_it() {
    let floor = auction_floor();
    let league = floor.league("WPL 2026").await;
    let team_a = floor.team(league.id, "Mumbai", 10 * CRORE).await;
    let team_b = floor.team(league.id, "Delhi", 10 * CRORE).await;
    let player = floor.player(league.id, "Smriti Mandhana", 50 * LAKH).await;
    floor.auction.start_auction(player.id).await.unwrap();

    let outcome = floor
        .auction
        .place_bid(player.id, team_a.id, Money::new(50 * LAKH))
        .await
        .unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.current_price, Money::new(50 * LAKH));

    let err = floor
        .auction
        .place_bid(player.id, team_b.id, Money::new(50 * LAKH))
        .await
        .unwrap_err();
    assert_eq!(validation_message(err), "Bid must be higher than current price");

    let outcome = floor
        .auction
        .place_bid(player.id, team_b.id, Money::new(60 * LAKH))
        .await
        .unwrap();
    assert_eq!(outcome.current_price, Money::new(60 * LAKH));
    assert_eq!(floor.reload(player.id).await.current_price, Money::new(60 * LAKH));
}

#[tokio::test]
async fn opening_bid_below_base_price_is_rejected() {
    let floor = auction_floor();
    let league = floor.league("WPL 2026").await;
    let team = floor.team(league.id, "Mumbai", 10 * CRORE).await;
    let player = floor.player(league.id, "Ellyse Perry", 50 * LAKH).await;
    floor.auction.start_auction(player.id).await.unwrap();

    let err = floor
        .auction
        .place_bid(player.id, team.id, Money::new(40 * LAKH))
        .await
        .unwrap_err();
    assert_eq!(validation_message(err), "Bid must be at least the base price");
}

#[tokio::test]
async fn bid_over_budget_is_rejected_and_budget_untouched() {
    let floor = auction_floor();
    let league = floor.league("WPL 2026").await;
    let team = floor.team(league.id, "Gujarat", CRORE).await;
    let player = floor.player(league.id, "Beth Mooney", 50 * LAKH).await;
    floor.auction.start_auction(player.id).await.unwrap();

    let err = floor
        .auction
        .place_bid(player.id, team.id, Money::new(150 * LAKH))
        .await
        .unwrap_err();
    assert_eq!(validation_message(err), "Insufficient budget");
    assert_eq!(floor.budget(team.id).await, Money::new(CRORE));
}

#[tokio::test]
async fn rejected_bids_leave_no_trace() {
    let floor = auction_floor();
    let league = floor.league("WPL 2026").await;
    let rich = floor.team(league.id, "Mumbai", 10 * CRORE).await;
    let poor = floor.team(league.id, "Gujarat", CRORE).await;
    let player = floor.player(league.id, "Harmanpreet Kaur", 50 * LAKH).await;
    floor.auction.start_auction(player.id).await.unwrap();
    floor
        .auction
        .place_bid(player.id, rich.id, Money::new(60 * LAKH))
        .await
        .unwrap();

    for _ in 0..3 {
        assert!(floor.auction.place_bid(player.id, rich.id, Money::new(55 * LAKH)).await.is_err());
        assert!(floor.auction.place_bid(player.id, poor.id, Money::new(2 * CRORE)).await.is_err());
        assert!(floor.auction.place_bid(player.id, rich.id, Money::new(-1)).await.is_err());
    }

    assert_eq!(floor.reload(player.id).await.current_price, Money::new(60 * LAKH));
    assert_eq!(floor.auction.bid_history(player.id).await.unwrap().len(), 1);
    assert_eq!(floor.budget(rich.id).await, Money::new(10 * CRORE));
    assert_eq!(floor.budget(poor.id).await, Money::new(CRORE));
}

#[tokio::test]
async fn non_positive_bid_is_rejected_before_any_lookup() {
    let floor = auction_floor();
    let err = floor
        .auction
        .place_bid(uuid::Uuid::new_v4(), uuid::Uuid::new_v4(), Money::ZERO)
        .await
        .unwrap_err();
    assert_eq!(validation_message(err), "Bid amount must be positive");
}

#[tokio::test]
async fn bids_require_a_live_lot_and_a_known_team() {
    let floor = auction_floor();
    let league = floor.league("WPL 2026").await;
    let team = floor.team(league.id, "Mumbai", 10 * CRORE).await;
    let player = floor.player(league.id, "Shafali Verma", 50 * LAKH).await;

    let err = floor
        .auction
        .place_bid(player.id, team.id, Money::new(50 * LAKH))
        .await
        .unwrap_err();
    assert_eq!(validation_message(err), "Player is not up for auction");

    floor.auction.start_auction(player.id).await.unwrap();
    let err = floor
        .auction
        .place_bid(player.id, uuid::Uuid::new_v4(), Money::new(50 * LAKH))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Team not found"));

    let err = floor
        .auction
        .place_bid(uuid::Uuid::new_v4(), team.id, Money::new(50 * LAKH))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Player not found"));
}

#[tokio::test]
async fn teams_cannot_bid_across_leagues() {
    let floor = auction_floor();
    let wpl = floor.league("WPL 2026").await;
    let ipl = floor.league("IPL 2026").await;
    let outsider = floor.team(ipl.id, "Chennai", 10 * CRORE).await;
    let player = floor.player(wpl.id, "Deepti Sharma", 50 * LAKH).await;
    floor.auction.start_auction(player.id).await.unwrap();

    let err = floor
        .auction
        .place_bid(player.id, outsider.id, Money::new(50 * LAKH))
        .await
        .unwrap_err();
    assert_eq!(validation_message(err), "Team is not part of this player's league");
}

#[tokio::test]
async fn reset_price_retracts_only_bids_above_the_new_price() {
    let floor = auction_floor();
    let league = floor.league("WPL 2026").await;
    let team_a = floor.team(league.id, "Mumbai", 10 * CRORE).await;
    let team_b = floor.team(league.id, "Delhi", 10 * CRORE).await;
    let player = floor.player(league.id, "Jemimah Rodrigues", 50 * LAKH).await;
    floor.auction.start_auction(player.id).await.unwrap();
    floor.auction.place_bid(player.id, team_a.id, Money::new(55 * LAKH)).await.unwrap();
    floor.auction.place_bid(player.id, team_b.id, Money::new(60 * LAKH)).await.unwrap();

    let outcome = floor.auction.reset_price(Money::new(55 * LAKH)).await.unwrap();
    assert_eq!(outcome.new_price, Money::new(55 * LAKH));
    assert_eq!(outcome.retracted_bids, 1);

    let history = floor.auction.bid_history(player.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, Money::new(55 * LAKH));
    assert_eq!(history[0].team_id, team_a.id);
    assert_eq!(floor.reload(player.id).await.current_price, Money::new(55 * LAKH));

    // Bidding resumes from the reset price
    let err = floor
        .auction
        .place_bid(player.id, team_b.id, Money::new(55 * LAKH))
        .await
        .unwrap_err();
    assert_eq!(validation_message(err), "Bid must be higher than current price");
    floor.auction.place_bid(player.id, team_b.id, Money::new(58 * LAKH)).await.unwrap();
}

#[tokio::test]
async fn reset_price_needs_a_positive_price_and_an_active_auction() {
    let floor = auction_floor();

    let err = floor.auction.reset_price(Money::ZERO).await.unwrap_err();
    assert_eq!(validation_message(err), "Price must be positive");

    let err = floor.auction.reset_price(Money::new(LAKH)).await.unwrap_err();
    assert_eq!(validation_message(err), "No active auction");
}

#[tokio::test]
async fn accepted_bids_strictly_increase() {
    let floor = auction_floor();
    let league = floor.league("WPL 2026").await;
    let team_a = floor.team(league.id, "Mumbai", 10 * CRORE).await;
    let team_b = floor.team(league.id, "Delhi", 10 * CRORE).await;
    let player = floor.player(league.id, "Richa Ghosh", 20 * LAKH).await;
    floor.auction.start_auction(player.id).await.unwrap();

    let attempts = [20, 25, 25, 24, 30, 45, 40, 50];
    for (i, lakhs) in attempts.iter().enumerate() {
        let team = if i % 2 == 0 { team_a.id } else { team_b.id };
        let _ = floor.auction.place_bid(player.id, team, Money::new(lakhs * LAKH)).await;
    }

    let mut accepted: Vec<Money> = floor
        .auction
        .bid_history(player.id)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.amount)
        .collect();
    accepted.sort();
    let expected: Vec<Money> = [20, 25, 30, 45, 50].iter().map(|l| Money::new(l * LAKH)).collect();
    assert_eq!(accepted, expected);
}
