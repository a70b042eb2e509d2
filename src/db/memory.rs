//! Embedded single-process store.
//!
//! There are no row locks here. A transaction takes the store-wide writer
//! lock for its whole life, works on a private copy of the tables and swaps
//! it in on commit. Readers never wait for a writer; they see the last
//! committed state.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::db::store::{AuctionStore, AuctionTx, StoreError};
use crate::models::auction::AuctionSeat;
use crate::models::bid::Bid;
use crate::models::league::League;
use crate::models::money::Money;
use crate::models::player::{Player, PlayerFilter};
use crate::models::team::Team;

#[derive(Debug, Clone, Default)]
struct Tables {
    seat: Option<AuctionSeat>,
    leagues: HashMap<Uuid, League>,
    teams: HashMap<Uuid, Team>,
    players: HashMap<Uuid, Player>,
    bids: Vec<Bid>,
}

impl Tables {
    fn live_league(&self, id: Uuid) -> Option<&League> {
        self.leagues.get(&id).filter(|l| !l.is_deleted)
    }

    fn live_team(&self, id: Uuid) -> Option<&Team> {
        self.teams.get(&id).filter(|t| !t.is_deleted)
    }

    fn live_player(&self, id: Uuid) -> Option<&Player> {
        self.players.get(&id).filter(|p| !p.is_deleted)
    }

    fn live_bids(&self, player_id: Uuid) -> Vec<Bid> {
        let mut bids: Vec<Bid> = self
            .bids
            .iter()
            .filter(|b| b.player_id == player_id && !b.is_deleted)
            .cloned()
            .collect();
        bids.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        bids
    }
}

const DEFAULT_WRITER_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct MemoryAuctionStore {
    committed: Arc<RwLock<Tables>>,
    writer: Arc<Mutex<()>>,
    writer_timeout: Duration,
}

impl Default for MemoryAuctionStore {
    fn default() -> Self {
        Self::with_lock_timeout(DEFAULT_WRITER_TIMEOUT)
    }
}

impl MemoryAuctionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `timeout` bounds how long `begin` waits for the transaction in flight
    pub fn with_lock_timeout(timeout: Duration) -> Self {
        Self {
            committed: Arc::new(RwLock::new(Tables::default())),
            writer: Arc::new(Mutex::new(())),
            writer_timeout: timeout,
        }
    }

    fn snapshot(&self) -> Result<Tables, StoreError> {
        self.committed
            .read()
            .map(|tables| tables.clone())
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        self.committed
            .read()
            .map(|tables| f(&*tables))
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

pub struct MemoryAuctionTx {
    committed: Arc<RwLock<Tables>>,
    working: Tables,
    _writer: OwnedMutexGuard<()>,
}

fn insert_new<T>(map: &mut HashMap<Uuid, T>, id: Uuid, value: T) -> Result<(), StoreError> {
    if map.contains_key(&id) {
        return Err(StoreError::Conflict(id));
    }
    map.insert(id, value);
    Ok(())
}

#[async_trait]
impl AuctionTx for MemoryAuctionTx {
    async fn seat_for_update(&mut self) -> Result<Option<AuctionSeat>, StoreError> {
        Ok(self.working.seat.clone())
    }

    async fn save_seat(&mut self, seat: &AuctionSeat) -> Result<(), StoreError> {
        self.working.seat = Some(seat.clone());
        Ok(())
    }

    async fn league(&mut self, id: Uuid) -> Result<Option<League>, StoreError> {
        Ok(self.working.live_league(id).cloned())
    }

    async fn league_name_taken(&mut self, name: &str, except: Option<Uuid>) -> Result<bool, StoreError> {
        let name = name.to_lowercase();
        Ok(self.working.leagues.values().any(|l| {
            !l.is_deleted && Some(l.id) != except && l.name.to_lowercase() == name
        }))
    }

    async fn insert_league(&mut self, league: &League) -> Result<(), StoreError> {
        insert_new(&mut self.working.leagues, league.id, league.clone())
    }

    async fn update_league(&mut self, league: &League) -> Result<(), StoreError> {
        self.working.leagues.insert(league.id, league.clone());
        Ok(())
    }

    async fn player_for_update(&mut self, id: Uuid) -> Result<Option<Player>, StoreError> {
        Ok(self.working.live_player(id).cloned())
    }

    async fn insert_player(&mut self, player: &Player) -> Result<(), StoreError> {
        insert_new(&mut self.working.players, player.id, player.clone())
    }

    async fn update_player(&mut self, player: &Player) -> Result<(), StoreError> {
        self.working.players.insert(player.id, player.clone());
        Ok(())
    }

    async fn team_for_update(&mut self, id: Uuid) -> Result<Option<Team>, StoreError> {
        Ok(self.working.live_team(id).cloned())
    }

    async fn team_name_taken(
        &mut self,
        league_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        let name = name.to_lowercase();
        Ok(self.working.teams.values().any(|t| {
            !t.is_deleted
                && t.league_id == league_id
                && Some(t.id) != except
                && t.name.to_lowercase() == name
        }))
    }

    async fn insert_team(&mut self, team: &Team) -> Result<(), StoreError> {
        insert_new(&mut self.working.teams, team.id, team.clone())
    }

    async fn update_team(&mut self, team: &Team) -> Result<(), StoreError> {
        self.working.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn count_live_bids(&mut self, player_id: Uuid) -> Result<i64, StoreError> {
        let count = self
            .working
            .bids
            .iter()
            .filter(|b| b.player_id == player_id && !b.is_deleted)
            .count();
        Ok(count as i64)
    }

    async fn highest_live_bid(&mut self, player_id: Uuid) -> Result<Option<Bid>, StoreError> {
        Ok(self.working.live_bids(player_id).into_iter().next())
    }

    async fn insert_bid(&mut self, bid: &Bid) -> Result<(), StoreError> {
        if self.working.bids.iter().any(|b| b.id == bid.id) {
            return Err(StoreError::Conflict(bid.id));
        }
        self.working.bids.push(bid.clone());
        Ok(())
    }

    async fn retract_bids_above(&mut self, player_id: Uuid, price: Money) -> Result<u64, StoreError> {
        let mut retracted = 0;
        for bid in self
            .working
            .bids
            .iter_mut()
            .filter(|b| b.player_id == player_id && !b.is_deleted && b.amount > price)
        {
            bid.is_deleted = true;
            retracted += 1;
        }
        Ok(retracted)
    }

    async fn retract_bids(&mut self, player_id: Uuid) -> Result<u64, StoreError> {
        let mut retracted = 0;
        for bid in self
            .working
            .bids
            .iter_mut()
            .filter(|b| b.player_id == player_id && !b.is_deleted)
        {
            bid.is_deleted = true;
            retracted += 1;
        }
        Ok(retracted)
    }

    async fn retract_team_bids(&mut self, player_id: Uuid, team_id: Uuid) -> Result<u64, StoreError> {
        let mut retracted = 0;
        for bid in self
            .working
            .bids
            .iter_mut()
            .filter(|b| b.player_id == player_id && b.team_id == team_id && !b.is_deleted)
        {
            bid.is_deleted = true;
            retracted += 1;
        }
        Ok(retracted)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryAuctionTx { committed, working, _writer } = *self;
        let mut tables = committed
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        *tables = working;
        Ok(())
    }
}

#[async_trait]
impl AuctionStore for MemoryAuctionStore {
    fn supports_row_locks(&self) -> bool {
        false
    }

    async fn begin(&self) -> Result<Box<dyn AuctionTx>, StoreError> {
        let writer = tokio::time::timeout(self.writer_timeout, self.writer.clone().lock_owned())
            .await
            .map_err(|_| StoreError::Unavailable("timed out waiting for the memory store writer".into()))?;
        let working = self.snapshot()?;
        Ok(Box::new(MemoryAuctionTx {
            committed: self.committed.clone(),
            working,
            _writer: writer,
        }))
    }

    async fn seat(&self) -> Result<Option<AuctionSeat>, StoreError> {
        self.read(|t| t.seat.clone())
    }

    async fn league(&self, id: Uuid) -> Result<Option<League>, StoreError> {
        self.read(|t| t.live_league(id).cloned())
    }

    async fn list_leagues(&self) -> Result<Vec<League>, StoreError> {
        self.read(|t| {
            let mut leagues: Vec<League> = t.leagues.values().filter(|l| !l.is_deleted).cloned().collect();
            leagues.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            leagues
        })
    }

    async fn team(&self, id: Uuid) -> Result<Option<Team>, StoreError> {
        self.read(|t| t.live_team(id).cloned())
    }

    async fn list_teams(&self, league_id: Uuid) -> Result<Vec<Team>, StoreError> {
        self.read(|t| {
            let mut teams: Vec<Team> = t
                .teams
                .values()
                .filter(|team| !team.is_deleted && team.league_id == league_id)
                .cloned()
                .collect();
            teams.sort_by(|a, b| a.name.cmp(&b.name));
            teams
        })
    }

    async fn player(&self, id: Uuid) -> Result<Option<Player>, StoreError> {
        self.read(|t| t.live_player(id).cloned())
    }

    async fn list_players(&self, league_id: Uuid, filter: &PlayerFilter) -> Result<Vec<Player>, StoreError> {
        self.read(|t| {
            let mut players: Vec<Player> = t
                .players
                .values()
                .filter(|p| !p.is_deleted && p.league_id == league_id && filter.matches(p))
                .cloned()
                .collect();
            players.sort_by(|a, b| a.name.cmp(&b.name));
            players
        })
    }

    async fn live_bids(&self, player_id: Uuid) -> Result<Vec<Bid>, StoreError> {
        self.read(|t| t.live_bids(player_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::league::{DEFAULT_MAX_SQUAD_SIZE, DEFAULT_MIN_SQUAD_SIZE, DEFAULT_PURSE};
    use chrono::Utc;

    fn league(name: &str) -> League {
        League {
            id: Uuid::new_v4(),
            name: name.to_string(),
            display_name: name.to_string(),
            default_purse: DEFAULT_PURSE,
            min_squad_size: DEFAULT_MIN_SQUAD_SIZE,
            max_squad_size: DEFAULT_MAX_SQUAD_SIZE,
            is_deleted: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn dropped_transaction_leaves_no_trace() {
        let store = MemoryAuctionStore::new();
        let wpl = league("WPL 2026");

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_league(&wpl).await.unwrap();
            // dropped without commit
        }

        assert!(store.league(wpl.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn committed_transaction_is_visible_to_readers() {
        let store = MemoryAuctionStore::new();
        let wpl = league("WPL 2026");

        let mut tx = store.begin().await.unwrap();
        tx.insert_league(&wpl).await.unwrap();
        // not visible before commit
        assert!(store.league(wpl.id).await.unwrap().is_none());
        tx.commit().await.unwrap();

        assert_eq!(store.league(wpl.id).await.unwrap(), Some(wpl));
    }

    #[tokio::test]
    async fn soft_deleted_rows_are_hidden() {
        let store = MemoryAuctionStore::new();
        let mut wpl = league("WPL 2026");

        let mut tx = store.begin().await.unwrap();
        tx.insert_league(&wpl).await.unwrap();
        wpl.is_deleted = true;
        tx.update_league(&wpl).await.unwrap();
        assert!(!tx.league_name_taken("wpl 2026", None).await.unwrap());
        tx.commit().await.unwrap();

        assert!(store.league(wpl.id).await.unwrap().is_none());
        assert!(store.list_leagues().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_conflict() {
        let store = MemoryAuctionStore::new();
        let wpl = league("WPL 2026");

        let mut tx = store.begin().await.unwrap();
        tx.insert_league(&wpl).await.unwrap();
        let err = tx.insert_league(&wpl).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(id) if id == wpl.id));
    }

    #[tokio::test]
    async fn begin_gives_up_while_another_transaction_is_open() {
        let store = MemoryAuctionStore::with_lock_timeout(Duration::from_millis(50));
        let held = store.begin().await.unwrap();

        let err = store.begin().await.err().unwrap();
        assert!(matches!(err, StoreError::Unavailable(_)));

        drop(held);
        assert!(store.begin().await.is_ok());
    }
}
