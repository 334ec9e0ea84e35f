//! Freehold Registry Service
//!
//! Single-writer front door for the property registry.
//!
//! # Architecture
//!
//! - **Single Writer**: one actor task owns the registry and both engines;
//!   every operation is one mailbox message processed to completion before
//!   the next begins, so no partial interleaving of two calls is observable
//! - **Bounded mailbox**: backpressure instead of unbounded queueing
//! - **Cloneable handle**: [`RegistryHandle`] is the async API handed to
//!   callers; dropping every handle shuts the actor down

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod actor;
pub mod config;
pub mod error;

pub use actor::{spawn_registry_service, RegistryHandle, ServiceMessage};
pub use config::ServiceConfig;
pub use error::{Error, Result};
