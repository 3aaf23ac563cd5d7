//! Core domain types and logic.

pub mod error;
pub mod export;
pub mod fallback;
pub mod instrument;
pub mod market_chain;
pub mod merge;
pub mod params;
pub mod probe;
pub mod report;
pub mod resolver;
pub mod snapshot;
pub mod table;
