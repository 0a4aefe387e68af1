//! Market data access
//!
//! Handles:
//! - The `MarketDataProvider` seam the scanner depends on
//! - Yahoo Finance API for option chains and spot closes (free)
//! - A deterministic in-memory provider for tests and offline runs

pub mod fixture;
pub mod provider;
pub mod yahoo;

pub use fixture::*;
pub use provider::*;
pub use yahoo::*;
