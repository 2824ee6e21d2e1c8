//! Core types and trait definitions for the Docket case/client record keeper.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

pub mod case;
pub mod client;
pub mod error;
pub mod identity;
pub mod patch;
pub mod reference;
pub mod service;
pub mod stats;
pub mod store;
pub mod validate;
pub mod view;

use chrono::{DateTime, SubsecRound as _, Utc};

pub use error::{Entity, Error, Result};

/// The current time at the precision every backend can round-trip
/// (microseconds).
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }
