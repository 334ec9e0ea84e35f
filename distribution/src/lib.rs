//! Freehold Distribution Engine
//!
//! Proportional rental-income distribution and fee collection against the
//! property registry.
//!
//! Income is fanned out over the property's holder index: every index entry
//! is paid `floor(amount / share_supply)`, so a participant who bought three
//! times is paid three times. The division remainder is never redistributed;
//! it stays with the caller's funding source. Payout batches are
//! all-or-nothing.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod engine;
pub mod error;
pub mod types;

pub use config::{Config, MAX_FEE_PERCENTAGE};
pub use engine::DistributionEngine;
pub use error::{Error, Result};
pub use types::{DistributionReport, FeeRecord};
