//! Core data types for the scanner
//!
//! Defines fundamental types:
//! - OptionQuote / OptionChain: strikes and IVs for a single expiry
//! - IvObservation: one ATM IV estimate per ticker
//! - TickerOutcome: typed per-ticker result (available or skipped)

pub mod error;
pub mod observation;
pub mod quote;

pub use error::*;
pub use observation::*;
pub use quote::*;
