pub mod auction;
pub mod bid;
pub mod common;
pub mod league;
pub mod money;
pub mod player;
pub mod team;

pub use money::Money;
