//! Freehold Vesting & Lock Engine
//!
//! Percentage-gated share release and the aggregate per-property lock
//! counter.
//!
//! Vesting is an immediate release: each call transfers
//! `floor(amount * vesting_percent / 100)` shares from the issuer position,
//! gated by the property's enable flag. Locking only moves a per-property
//! counter — locks are not tracked per holder, and lock periods are
//! informational with no automatic expiry.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod engine;
pub mod error;

pub use engine::VestingLockEngine;
pub use error::{Error, Result};
