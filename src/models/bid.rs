// src/models/bid.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::money::Money;

/// One accepted bid. Rows are append-only; retraction only flips `is_deleted`.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Bid {
    pub id: Uuid,
    pub player_id: Uuid,
    pub team_id: Uuid,
    pub amount: Money,
    #[serde(skip_serializing, default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Bid {
    pub fn new(player_id: Uuid, team_id: Uuid, amount: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            team_id,
            amount,
            is_deleted: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidRequest {
    pub player_id: Uuid,
    pub team_id: Uuid,
    pub amount: Money,
}
