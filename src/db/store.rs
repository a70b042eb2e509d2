//! Persistence seam for the auction.
//!
//! Every mutation goes through an [`AuctionTx`]: the service reads and
//! validates inside the transaction, writes, then calls [`AuctionTx::commit`].
//! Dropping a transaction without committing discards all of its writes.
//!
//! All lookups skip soft-deleted rows unless stated otherwise.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::auction::AuctionSeat;
use crate::models::bid::Bid;
use crate::models::league::League;
use crate::models::money::Money;
use crate::models::player::{Player, PlayerFilter};
use crate::models::team::Team;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record {0} already exists")]
    Conflict(Uuid),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// One all-or-nothing unit of work against the store.
///
/// `*_for_update` reads take a row lock on stores that support it. Callers
/// must lock in the order seat, player, team.
#[async_trait]
pub trait AuctionTx: Send {
    async fn seat_for_update(&mut self) -> Result<Option<AuctionSeat>, StoreError>;
    async fn save_seat(&mut self, seat: &AuctionSeat) -> Result<(), StoreError>;

    async fn league(&mut self, id: Uuid) -> Result<Option<League>, StoreError>;
    /// Whether a live league other than `except` already uses `name` (case-insensitive)
    async fn league_name_taken(&mut self, name: &str, except: Option<Uuid>) -> Result<bool, StoreError>;
    async fn insert_league(&mut self, league: &League) -> Result<(), StoreError>;
    async fn update_league(&mut self, league: &League) -> Result<(), StoreError>;

    async fn player_for_update(&mut self, id: Uuid) -> Result<Option<Player>, StoreError>;
    async fn insert_player(&mut self, player: &Player) -> Result<(), StoreError>;
    async fn update_player(&mut self, player: &Player) -> Result<(), StoreError>;

    async fn team_for_update(&mut self, id: Uuid) -> Result<Option<Team>, StoreError>;
    async fn team_name_taken(
        &mut self,
        league_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<bool, StoreError>;
    async fn insert_team(&mut self, team: &Team) -> Result<(), StoreError>;
    async fn update_team(&mut self, team: &Team) -> Result<(), StoreError>;

    async fn count_live_bids(&mut self, player_id: Uuid) -> Result<i64, StoreError>;
    /// Highest live bid, earliest first on equal amounts
    async fn highest_live_bid(&mut self, player_id: Uuid) -> Result<Option<Bid>, StoreError>;
    async fn insert_bid(&mut self, bid: &Bid) -> Result<(), StoreError>;
    /// Soft-delete live bids strictly above `price`. Returns how many were retracted.
    async fn retract_bids_above(&mut self, player_id: Uuid, price: Money) -> Result<u64, StoreError>;
    /// Soft-delete every live bid for the player
    async fn retract_bids(&mut self, player_id: Uuid) -> Result<u64, StoreError>;
    /// Soft-delete the live bids one team holds on the player
    async fn retract_team_bids(&mut self, player_id: Uuid, team_id: Uuid) -> Result<u64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AuctionStore: Send + Sync {
    /// True when `*_for_update` reads take real row locks
    fn supports_row_locks(&self) -> bool;

    async fn begin(&self) -> Result<Box<dyn AuctionTx>, StoreError>;

    // Informational reads, outside any transaction. May be slightly stale.
    async fn seat(&self) -> Result<Option<AuctionSeat>, StoreError>;
    async fn league(&self, id: Uuid) -> Result<Option<League>, StoreError>;
    async fn list_leagues(&self) -> Result<Vec<League>, StoreError>;
    async fn team(&self, id: Uuid) -> Result<Option<Team>, StoreError>;
    async fn list_teams(&self, league_id: Uuid) -> Result<Vec<Team>, StoreError>;
    async fn player(&self, id: Uuid) -> Result<Option<Player>, StoreError>;
    async fn list_players(&self, league_id: Uuid, filter: &PlayerFilter) -> Result<Vec<Player>, StoreError>;
    /// Live bids for a player, highest first
    async fn live_bids(&self, player_id: Uuid) -> Result<Vec<Bid>, StoreError>;
}
