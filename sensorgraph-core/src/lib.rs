pub mod analysis;
pub mod error;
pub mod export;
pub mod merge;
pub mod store;
pub mod units;
pub mod window;
