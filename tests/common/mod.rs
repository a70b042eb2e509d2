pub mod auction_helpers;
pub mod utils;
