//! The auction core: one seat, players moving through
//! `available -> bidding -> sold | unsold`, and team purses.
//!
//! Every operation enters its critical section, opens a store transaction,
//! validates against freshly locked rows, writes, then commits. Any early
//! return drops the transaction, which discards its writes.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::store::{AuctionStore, AuctionTx};
use crate::models::auction::{
    AuctionSeat, AuctionStateView, BidOutcome, CurrentPlayerView, EndOutcome, HighestBidView,
    ReleaseOutcome, ResetOutcome, StartOutcome, UnsoldOutcome,
};
use crate::models::bid::Bid;
use crate::models::money::Money;
use crate::models::player::{Player, PlayerStatus};
use crate::services::error::ServiceError;
use crate::services::locks::{AuctionLocks, LockName};

pub struct AuctionService {
    store: Arc<dyn AuctionStore>,
    locks: AuctionLocks,
    countdown_seconds: i32,
}

async fn locked_player(tx: &mut Box<dyn AuctionTx>, player_id: Uuid) -> Result<Player, ServiceError> {
    tx.player_for_update(player_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Player not found"))
}

/// Seat row plus the player it holds, or "No active auction".
async fn active_lot(tx: &mut Box<dyn AuctionTx>) -> Result<(AuctionSeat, Player), ServiceError> {
    let seat = tx.seat_for_update().await?;
    let Some((seat, player_id)) = seat.and_then(|s| s.active_player().map(|id| (s, id))) else {
        return Err(ServiceError::validation("No active auction"));
    };
    let player = locked_player(tx, player_id).await?;
    Ok((seat, player))
}

impl AuctionService {
    pub fn new(store: Arc<dyn AuctionStore>, locks: AuctionLocks, countdown_seconds: i32) -> Self {
        Self {
            store,
            locks,
            countdown_seconds,
        }
    }

    pub fn locks(&self) -> &AuctionLocks {
        &self.locks
    }

    /// Put a player under the hammer. An active seat on another player is
    /// retargeted and that player goes back to `available`. Live bids on
    /// both lots are retracted.
    pub async fn start_auction(&self, player_id: Uuid) -> Result<StartOutcome, ServiceError> {
        let _guard = self.locks.acquire(LockName::Auction).await?;
        let mut tx = self.store.begin().await?;

        let mut seat = tx
            .seat_for_update()
            .await?
            .unwrap_or_else(|| AuctionSeat::idle(self.countdown_seconds));
        let mut player = locked_player(&mut tx, player_id).await?;

        let holds_seat = seat.active_player() == Some(player_id);
        let eligible = matches!(player.status, PlayerStatus::Available | PlayerStatus::Unsold);
        if !holds_seat && !eligible {
            return Err(ServiceError::validation("Player is not available for auction"));
        }

        if let Some(previous_id) = seat.active_player().filter(|id| *id != player_id) {
            if let Some(mut previous) = tx.player_for_update(previous_id).await? {
                if previous.status == PlayerStatus::Bidding {
                    previous.status = PlayerStatus::Available;
                    previous.current_price = previous.base_price;
                    tx.update_player(&previous).await?;
                    let retracted = tx.retract_bids(previous.id).await?;
                    tracing::info!(
                        "Returned {} ({}) to the pool before retargeting the seat, {} bid(s) retracted",
                        previous.name, previous.id, retracted
                    );
                }
            }
        }

        // Each round starts clean; bids from an earlier round never carry over
        let stale = tx.retract_bids(player_id).await?;
        if stale > 0 {
            tracing::info!("Retracted {} bid(s) on {} ({}) from an earlier round", stale, player.name, player.id);
        }

        player.status = PlayerStatus::Bidding;
        player.current_price = player.base_price;
        tx.update_player(&player).await?;

        seat.open(player_id, self.countdown_seconds, Utc::now());
        tx.save_seat(&seat).await?;
        tx.commit().await?;

        tracing::info!(
            "Auction started for {} ({}) at base price {}",
            player.name, player.id, player.base_price
        );

        Ok(StartOutcome {
            success: true,
            player_id,
            time_remaining: seat.time_remaining,
        })
    }

    pub async fn place_bid(&self, player_id: Uuid, team_id: Uuid, amount: Money) -> Result<BidOutcome, ServiceError> {
        if !amount.is_positive() {
            return Err(ServiceError::validation("Bid amount must be positive"));
        }

        let _guard = self.locks.acquire(LockName::Bid).await?;
        let mut tx = self.store.begin().await?;

        let mut player = locked_player(&mut tx, player_id).await?;
        let team = tx
            .team_for_update(team_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Team not found"))?;

        if player.status != PlayerStatus::Bidding {
            return Err(ServiceError::validation("Player is not up for auction"));
        }
        if team.league_id != player.league_id {
            return Err(ServiceError::validation("Team is not part of this player's league"));
        }

        // The opening bid may match the base price; later ones must beat it
        if tx.count_live_bids(player_id).await? == 0 {
            if amount < player.current_price {
                return Err(ServiceError::validation("Bid must be at least the base price"));
            }
        } else if amount <= player.current_price {
            return Err(ServiceError::validation("Bid must be higher than current price"));
        }

        if amount > team.budget {
            return Err(ServiceError::validation("Insufficient budget"));
        }

        let bid = Bid::new(player_id, team_id, amount);
        tx.insert_bid(&bid).await?;
        player.current_price = amount;
        tx.update_player(&player).await?;
        tx.commit().await?;

        tracing::info!("{} bid {} for {} ({})", team.name, amount, player.name, player.id);

        Ok(BidOutcome {
            success: true,
            current_price: amount,
        })
    }

    /// Hammer down: sell to the highest live bid or mark the lot unsold.
    pub async fn end_auction(&self) -> Result<EndOutcome, ServiceError> {
        let _guard = self.locks.acquire(LockName::Auction).await?;
        let mut tx = self.store.begin().await?;

        let (mut seat, mut player) = active_lot(&mut tx).await?;

        let outcome = match tx.highest_live_bid(player.id).await? {
            Some(bid) => {
                let mut team = tx
                    .team_for_update(bid.team_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Team not found"))?;
                if team.budget < bid.amount {
                    return Err(ServiceError::validation("Team has insufficient budget for this purchase"));
                }
                team.budget = team
                    .budget
                    .checked_sub(bid.amount)
                    .ok_or(ServiceError::Arithmetic("team budget debit"))?;
                tx.update_team(&team).await?;

                player.team_id = Some(team.id);
                player.current_price = bid.amount;
                player.status = PlayerStatus::Sold;

                tracing::info!("{} ({}) sold to {} for {}", player.name, player.id, team.name, bid.amount);
                EndOutcome {
                    success: true,
                    player_id: player.id,
                    sold_to: Some(team.name),
                    team_id: Some(team.id),
                    amount: Some(bid.amount),
                }
            }
            None => {
                player.status = PlayerStatus::Unsold;

                tracing::info!("{} ({}) went unsold with no bids", player.name, player.id);
                EndOutcome {
                    success: true,
                    player_id: player.id,
                    sold_to: None,
                    team_id: None,
                    amount: None,
                }
            }
        };

        tx.update_player(&player).await?;
        seat.close();
        tx.save_seat(&seat).await?;
        tx.commit().await?;

        Ok(outcome)
    }

    /// Close the seat without a sale. Bids are kept for the record.
    pub async fn mark_unsold(&self) -> Result<UnsoldOutcome, ServiceError> {
        let _guard = self.locks.acquire(LockName::Auction).await?;
        let mut tx = self.store.begin().await?;

        let (mut seat, mut player) = active_lot(&mut tx).await?;
        player.status = PlayerStatus::Unsold;
        player.current_price = Money::ZERO;
        tx.update_player(&player).await?;

        seat.close();
        tx.save_seat(&seat).await?;
        tx.commit().await?;

        tracing::info!("{} ({}) marked unsold", player.name, player.id);

        Ok(UnsoldOutcome {
            success: true,
            player_id: player.id,
        })
    }

    /// Set the price of the lot under the hammer and retract bids above it.
    pub async fn reset_price(&self, new_price: Money) -> Result<ResetOutcome, ServiceError> {
        if !new_price.is_positive() {
            return Err(ServiceError::validation("Price must be positive"));
        }

        let _guard = self.locks.acquire(LockName::Auction).await?;
        let mut tx = self.store.begin().await?;

        let (_seat, mut player) = active_lot(&mut tx).await?;
        player.current_price = new_price;
        tx.update_player(&player).await?;
        let retracted_bids = tx.retract_bids_above(player.id, new_price).await?;
        tx.commit().await?;

        tracing::info!(
            "Price for {} ({}) reset to {}, {} bid(s) retracted",
            player.name, player.id, new_price, retracted_bids
        );

        Ok(ResetOutcome {
            success: true,
            new_price,
            retracted_bids,
        })
    }

    /// Undo a sale: refund the owning team and put the player back in the pool.
    pub async fn release_player(&self, player_id: Uuid) -> Result<ReleaseOutcome, ServiceError> {
        let _guard = self.locks.acquire(LockName::Player).await?;
        let mut tx = self.store.begin().await?;

        let mut player = locked_player(&mut tx, player_id).await?;
        if player.status != PlayerStatus::Sold {
            return Err(ServiceError::validation("Player is not currently sold to a team"));
        }

        if let Some(team_id) = player.team_id {
            // A deleted team keeps no purse to refund
            if let Some(mut team) = tx.team_for_update(team_id).await? {
                team.budget = team
                    .budget
                    .checked_add(player.current_price)
                    .ok_or(ServiceError::Arithmetic("team budget refund"))?;
                tx.update_team(&team).await?;
                tracing::info!("Refunded {} to {} ({})", player.current_price, team.name, team.id);
            }
        }

        player.status = PlayerStatus::Available;
        player.team_id = None;
        player.current_price = player.base_price;
        tx.update_player(&player).await?;
        let retracted = tx.retract_bids(player.id).await?;
        tx.commit().await?;

        tracing::info!("{} ({}) released, {} bid(s) retracted", player.name, player.id, retracted);

        Ok(ReleaseOutcome {
            success: true,
            message: format!("{} has been released back to auction", player.name),
        })
    }

    /// Snapshot of the seat for display. Read without locks, so it may lag
    /// an in-flight operation.
    pub async fn auction_state(&self) -> Result<Option<AuctionStateView>, ServiceError> {
        let seat = match self.store.seat().await? {
            Some(seat) => seat,
            None => return Ok(None),
        };

        let (current_player, highest_bid) = match seat.current_player_id {
            Some(player_id) => {
                let player = self.store.player(player_id).await?;
                let highest = self.store.live_bids(player_id).await?.into_iter().next();
                (
                    player.map(|p| CurrentPlayerView {
                        id: p.id,
                        name: p.name,
                        base_price: p.base_price,
                        current_price: p.current_price,
                    }),
                    highest.map(|b| HighestBidView {
                        team_id: b.team_id,
                        amount: b.amount,
                    }),
                )
            }
            None => (None, None),
        };

        Ok(Some(AuctionStateView {
            is_active: seat.is_active,
            time_remaining: seat.time_remaining,
            seconds_left: seat.seconds_left(Utc::now()),
            current_player_id: seat.current_player_id,
            current_player,
            highest_bid,
        }))
    }

    pub async fn bid_history(&self, player_id: Uuid) -> Result<Vec<Bid>, ServiceError> {
        if self.store.player(player_id).await?.is_none() {
            return Err(ServiceError::not_found("Player not found"));
        }
        Ok(self.store.live_bids(player_id).await?)
    }
}
