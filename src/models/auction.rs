// src/models/auction.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::money::Money;

pub const DEFAULT_COUNTDOWN_SECONDS: i32 = 300;

/// The single auction seat: which player is under the hammer, if any.
///
/// Persisted as one row. Only `open` and `close` change it, so the
/// `is_active` flag and `current_player_id` can never disagree.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuctionSeat {
    pub current_player_id: Option<Uuid>,
    pub is_active: bool,
    pub time_remaining: i32,
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatState {
    Idle,
    Bidding(Uuid),
}

impl AuctionSeat {
    pub fn idle(countdown_seconds: i32) -> Self {
        Self {
            current_player_id: None,
            is_active: false,
            time_remaining: countdown_seconds,
            started_at: None,
        }
    }

    pub fn state(&self) -> SeatState {
        match (self.is_active, self.current_player_id) {
            (true, Some(player_id)) => SeatState::Bidding(player_id),
            _ => SeatState::Idle,
        }
    }

    /// Player currently under the hammer
    pub fn active_player(&self) -> Option<Uuid> {
        match self.state() {
            SeatState::Bidding(player_id) => Some(player_id),
            SeatState::Idle => None,
        }
    }

    pub fn open(&mut self, player_id: Uuid, countdown_seconds: i32, now: DateTime<Utc>) {
        self.current_player_id = Some(player_id);
        self.is_active = true;
        self.time_remaining = countdown_seconds;
        self.started_at = Some(now);
    }

    pub fn close(&mut self) {
        self.current_player_id = None;
        self.is_active = false;
        self.started_at = None;
    }

    /// Advisory countdown for display. Never enforced by the core.
    pub fn seconds_left(&self, now: DateTime<Utc>) -> i64 {
        match (self.is_active, self.started_at) {
            (true, Some(started_at)) => {
                let elapsed = (now - started_at).num_seconds().max(0);
                (i64::from(self.time_remaining) - elapsed).max(0)
            }
            _ => 0,
        }
    }
}

// Operation outcomes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StartOutcome {
    pub success: bool,
    pub player_id: Uuid,
    pub time_remaining: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BidOutcome {
    pub success: bool,
    pub current_price: Money,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EndOutcome {
    pub success: bool,
    pub player_id: Uuid,
    pub sold_to: Option<String>,
    pub team_id: Option<Uuid>,
    pub amount: Option<Money>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UnsoldOutcome {
    pub success: bool,
    pub player_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResetOutcome {
    pub success: bool,
    pub new_price: Money,
    pub retracted_bids: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub success: bool,
    pub message: String,
}

// Read-side view of the seat
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuctionStateView {
    pub is_active: bool,
    pub time_remaining: i32,
    pub seconds_left: i64,
    pub current_player_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_player: Option<CurrentPlayerView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_bid: Option<HighestBidView>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentPlayerView {
    pub id: Uuid,
    pub name: String,
    pub base_price: Money,
    pub current_price: Money,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HighestBidView {
    pub team_id: Uuid,
    pub amount: Money,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResetPriceRequest {
    pub price: Money,
}
