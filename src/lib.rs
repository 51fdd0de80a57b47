//! Local hydration tracking.
//!
//! - [`state::HydrationState`] owns the intake log, cup catalog, selected cup,
//!   profile and daily target, writing each change through to a
//!   [`storage::KeyValueStore`].
//! - [`calculator::compute_daily_target`] derives the recommended intake from
//!   weight, climate and gender.
//! - [`commands`] is the text front end on top of the state.

pub mod calculator;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod state;
pub mod storage;
pub mod structs;

pub use error::{HydrationError, StoreError, ValidationError};
pub use state::HydrationState;
