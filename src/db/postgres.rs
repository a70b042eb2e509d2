//! Postgres-backed store. Decision-feeding reads use `SELECT ... FOR UPDATE`,
//! so concurrent operations on the same rows serialize inside the database.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::db::store::{AuctionStore, AuctionTx, StoreError};
use crate::models::auction::AuctionSeat;
use crate::models::bid::Bid;
use crate::models::league::League;
use crate::models::money::Money;
use crate::models::player::{Player, PlayerFilter};
use crate::models::team::Team;

const LEAGUE_COLUMNS: &str =
    "id, name, display_name, default_purse, min_squad_size, max_squad_size, is_deleted, created_at";
const TEAM_COLUMNS: &str = "id, league_id, name, budget, initial_budget, is_deleted, created_at";
const PLAYER_COLUMNS: &str = "id, league_id, name, position, country, original_team, base_price, \
     current_price, status, team_id, is_deleted, created_at";
const BID_COLUMNS: &str = "id, player_id, team_id, amount, is_deleted, created_at";
const SEAT_COLUMNS: &str = "current_player_id, is_active, time_remaining, started_at";

#[derive(Debug, Clone)]
pub struct PgAuctionStore {
    pool: PgPool,
}

impl PgAuctionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub struct PgAuctionTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl AuctionTx for PgAuctionTx {
    async fn seat_for_update(&mut self) -> Result<Option<AuctionSeat>, StoreError> {
        let seat = sqlx::query_as::<_, AuctionSeat>(&format!(
            "SELECT {} FROM auction_state WHERE id = 1 FOR UPDATE",
            SEAT_COLUMNS
        ))
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(seat)
    }

    async fn save_seat(&mut self, seat: &AuctionSeat) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO auction_state (id, current_player_id, is_active, time_remaining, started_at)
            VALUES (1, $1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                current_player_id = EXCLUDED.current_player_id,
                is_active = EXCLUDED.is_active,
                time_remaining = EXCLUDED.time_remaining,
                started_at = EXCLUDED.started_at
            "#,
        )
        .bind(seat.current_player_id)
        .bind(seat.is_active)
        .bind(seat.time_remaining)
        .bind(seat.started_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn league(&mut self, id: Uuid) -> Result<Option<League>, StoreError> {
        let league = sqlx::query_as::<_, League>(&format!(
            "SELECT {} FROM leagues WHERE id = $1 AND is_deleted = FALSE",
            LEAGUE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(league)
    }

    async fn league_name_taken(&mut self, name: &str, except: Option<Uuid>) -> Result<bool, StoreError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM leagues
                WHERE LOWER(name) = LOWER($1)
                  AND is_deleted = FALSE
                  AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(except)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(taken)
    }

    async fn insert_league(&mut self, league: &League) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO leagues (id, name, display_name, default_purse, min_squad_size, max_squad_size, is_deleted, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(league.id)
        .bind(&league.name)
        .bind(&league.display_name)
        .bind(league.default_purse)
        .bind(league.min_squad_size)
        .bind(league.max_squad_size)
        .bind(league.is_deleted)
        .bind(league.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn update_league(&mut self, league: &League) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE leagues
            SET name = $2, display_name = $3, default_purse = $4,
                min_squad_size = $5, max_squad_size = $6, is_deleted = $7
            WHERE id = $1
            "#,
        )
        .bind(league.id)
        .bind(&league.name)
        .bind(&league.display_name)
        .bind(league.default_purse)
        .bind(league.min_squad_size)
        .bind(league.max_squad_size)
        .bind(league.is_deleted)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn player_for_update(&mut self, id: Uuid) -> Result<Option<Player>, StoreError> {
        let player = sqlx::query_as::<_, Player>(&format!(
            "SELECT {} FROM players WHERE id = $1 AND is_deleted = FALSE FOR UPDATE",
            PLAYER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(player)
    }

    async fn insert_player(&mut self, player: &Player) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO players (id, league_id, name, position, country, original_team, base_price,
                                 current_price, status, team_id, is_deleted, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(player.id)
        .bind(player.league_id)
        .bind(&player.name)
        .bind(player.position)
        .bind(&player.country)
        .bind(&player.original_team)
        .bind(player.base_price)
        .bind(player.current_price)
        .bind(player.status)
        .bind(player.team_id)
        .bind(player.is_deleted)
        .bind(player.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn update_player(&mut self, player: &Player) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE players
            SET name = $2, position = $3, country = $4, original_team = $5, base_price = $6,
                current_price = $7, status = $8, team_id = $9, is_deleted = $10
            WHERE id = $1
            "#,
        )
        .bind(player.id)
        .bind(&player.name)
        .bind(player.position)
        .bind(&player.country)
        .bind(&player.original_team)
        .bind(player.base_price)
        .bind(player.current_price)
        .bind(player.status)
        .bind(player.team_id)
        .bind(player.is_deleted)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn team_for_update(&mut self, id: Uuid) -> Result<Option<Team>, StoreError> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {} FROM teams WHERE id = $1 AND is_deleted = FALSE FOR UPDATE",
            TEAM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(team)
    }

    async fn team_name_taken(
        &mut self,
        league_id: Uuid,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM teams
                WHERE league_id = $1
                  AND LOWER(name) = LOWER($2)
                  AND is_deleted = FALSE
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(league_id)
        .bind(name)
        .bind(except)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(taken)
    }

    async fn insert_team(&mut self, team: &Team) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO teams (id, league_id, name, budget, initial_budget, is_deleted, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(team.id)
        .bind(team.league_id)
        .bind(&team.name)
        .bind(team.budget)
        .bind(team.initial_budget)
        .bind(team.is_deleted)
        .bind(team.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn update_team(&mut self, team: &Team) -> Result<(), StoreError> {
        sqlx::query("UPDATE teams SET name = $2, budget = $3, is_deleted = $4 WHERE id = $1")
            .bind(team.id)
            .bind(&team.name)
            .bind(team.budget)
            .bind(team.is_deleted)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn count_live_bids(&mut self, player_id: Uuid) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bids WHERE player_id = $1 AND is_deleted = FALSE",
        )
        .bind(player_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(count)
    }

    async fn highest_live_bid(&mut self, player_id: Uuid) -> Result<Option<Bid>, StoreError> {
        let bid = sqlx::query_as::<_, Bid>(&format!(
            r#"
            SELECT {} FROM bids
            WHERE player_id = $1 AND is_deleted = FALSE
            ORDER BY amount DESC, created_at ASC
            LIMIT 1
            "#,
            BID_COLUMNS
        ))
        .bind(player_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(bid)
    }

    async fn insert_bid(&mut self, bid: &Bid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO bids (id, player_id, team_id, amount, is_deleted, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(bid.id)
        .bind(bid.player_id)
        .bind(bid.team_id)
        .bind(bid.amount)
        .bind(bid.is_deleted)
        .bind(bid.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn retract_bids_above(&mut self, player_id: Uuid, price: Money) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE bids SET is_deleted = TRUE
            WHERE player_id = $1 AND amount > $2 AND is_deleted = FALSE
            "#,
        )
        .bind(player_id)
        .bind(price)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn retract_bids(&mut self, player_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE bids SET is_deleted = TRUE WHERE player_id = $1 AND is_deleted = FALSE",
        )
        .bind(player_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn retract_team_bids(&mut self, player_id: Uuid, team_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE bids SET is_deleted = TRUE
            WHERE player_id = $1 AND team_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(player_id)
        .bind(team_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl AuctionStore for PgAuctionStore {
    fn supports_row_locks(&self) -> bool {
        true
    }

    async fn begin(&self) -> Result<Box<dyn AuctionTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgAuctionTx { tx }))
    }

    async fn seat(&self) -> Result<Option<AuctionSeat>, StoreError> {
        let seat = sqlx::query_as::<_, AuctionSeat>(&format!(
            "SELECT {} FROM auction_state WHERE id = 1",
            SEAT_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;
        Ok(seat)
    }

    async fn league(&self, id: Uuid) -> Result<Option<League>, StoreError> {
        let league = sqlx::query_as::<_, League>(&format!(
            "SELECT {} FROM leagues WHERE id = $1 AND is_deleted = FALSE",
            LEAGUE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(league)
    }

    async fn list_leagues(&self) -> Result<Vec<League>, StoreError> {
        let leagues = sqlx::query_as::<_, League>(&format!(
            "SELECT {} FROM leagues WHERE is_deleted = FALSE ORDER BY created_at",
            LEAGUE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(leagues)
    }

    async fn team(&self, id: Uuid) -> Result<Option<Team>, StoreError> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {} FROM teams WHERE id = $1 AND is_deleted = FALSE",
            TEAM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(team)
    }

    async fn list_teams(&self, league_id: Uuid) -> Result<Vec<Team>, StoreError> {
        let teams = sqlx::query_as::<_, Team>(&format!(
            "SELECT {} FROM teams WHERE league_id = $1 AND is_deleted = FALSE ORDER BY name",
            TEAM_COLUMNS
        ))
        .bind(league_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(teams)
    }

    async fn player(&self, id: Uuid) -> Result<Option<Player>, StoreError> {
        let player = sqlx::query_as::<_, Player>(&format!(
            "SELECT {} FROM players WHERE id = $1 AND is_deleted = FALSE",
            PLAYER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(player)
    }

    async fn list_players(&self, league_id: Uuid, filter: &PlayerFilter) -> Result<Vec<Player>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM players WHERE is_deleted = FALSE AND league_id = ",
            PLAYER_COLUMNS
        ));
        query.push_bind(league_id);

        if !filter.statuses.is_empty() {
            let statuses: Vec<String> = filter
                .statuses
                .iter()
                .map(|s| s.as_str().to_string())
                .collect();
            query.push(" AND status = ANY(").push_bind(statuses).push(")");
        }
        if let Some(position) = filter.position {
            query.push(" AND position = ").push_bind(position);
        }
        if let Some(team_id) = filter.team_id {
            query.push(" AND team_id = ").push_bind(team_id);
        }
        query.push(" ORDER BY name");

        let players = query
            .build_query_as::<Player>()
            .fetch_all(&self.pool)
            .await?;
        Ok(players)
    }

    async fn live_bids(&self, player_id: Uuid) -> Result<Vec<Bid>, StoreError> {
        let bids = sqlx::query_as::<_, Bid>(&format!(
            r#"
            SELECT {} FROM bids
            WHERE player_id = $1 AND is_deleted = FALSE
            ORDER BY amount DESC, created_at ASC
            "#,
            BID_COLUMNS
        ))
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bids)
    }
}
