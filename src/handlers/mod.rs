pub mod auction_handler;
pub mod backend_health_handler;
pub mod error;
pub mod league_handler;
pub mod player_handler;
pub mod team_handler;
