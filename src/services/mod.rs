pub mod auction_service;
pub mod error;
pub mod league_service;
pub mod locks;
pub mod player_service;
pub mod team_service;

pub use auction_service::AuctionService;
pub use error::{ErrorKind, ServiceError};
pub use league_service::LeagueService;
pub use locks::{AuctionLocks, LockName};
pub use player_service::PlayerService;
pub use team_service::TeamService;
