//! Critical sections for the auction core.
//!
//! With a store that takes row locks the transaction itself serializes
//! writers, so no application lock is held. Otherwise each section has its
//! own mutex, acquired with a bounded wait.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::db::store::AuctionStore;
use crate::services::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockName {
    Bid,
    Auction,
    Player,
}

impl LockName {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockName::Bid => "bid",
            LockName::Auction => "auction",
            LockName::Player => "player",
        }
    }
}

impl fmt::Display for LockName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct NamedLocks {
    bid: Arc<Mutex<()>>,
    auction: Arc<Mutex<()>>,
    player: Arc<Mutex<()>>,
    timeout: Duration,
}

impl NamedLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            bid: Arc::new(Mutex::new(())),
            auction: Arc::new(Mutex::new(())),
            player: Arc::new(Mutex::new(())),
            timeout,
        }
    }

    fn mutex(&self, name: LockName) -> Arc<Mutex<()>> {
        match name {
            LockName::Bid => self.bid.clone(),
            LockName::Auction => self.auction.clone(),
            LockName::Player => self.player.clone(),
        }
    }

    pub async fn acquire(&self, name: LockName) -> Result<OwnedMutexGuard<()>, ServiceError> {
        tokio::time::timeout(self.timeout, self.mutex(name).lock_owned())
            .await
            .map_err(|_| {
                tracing::error!("Timed out after {:?} waiting for the {} lock", self.timeout, name);
                ServiceError::LockTimeout(name)
            })
    }
}

/// Locking strategy, fixed at startup from the store's capabilities.
#[derive(Debug, Clone)]
pub enum AuctionLocks {
    RowLevel,
    Named(NamedLocks),
}

impl AuctionLocks {
    pub fn for_store(store: &dyn AuctionStore, timeout: Duration) -> Self {
        if store.supports_row_locks() {
            tracing::info!("Using row-level locking for auction operations");
            AuctionLocks::RowLevel
        } else {
            tracing::info!("Using named locks for auction operations (timeout {:?})", timeout);
            AuctionLocks::Named(NamedLocks::new(timeout))
        }
    }

    /// Enter a critical section. The guard, if any, must live until after commit.
    pub async fn acquire(&self, name: LockName) -> Result<Option<OwnedMutexGuard<()>>, ServiceError> {
        match self {
            AuctionLocks::RowLevel => Ok(None),
            AuctionLocks::Named(locks) => locks.acquire(name).await.map(Some),
        }
    }
}
