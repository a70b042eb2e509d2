pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryAuctionStore;
pub use postgres::PgAuctionStore;
pub use store::{AuctionStore, AuctionTx, StoreError};
