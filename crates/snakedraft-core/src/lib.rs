// Library root: re-exports all modules so integration tests and the simulator
// binary can access the crate's public API.

pub mod config;
pub mod draft;
pub mod error;
pub mod projections;
pub mod sim;
pub mod valuation;

pub use error::DraftError;
