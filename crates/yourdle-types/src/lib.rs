//! Shared domain types for the Yourdle client engine.

pub mod config;
pub mod events;
pub mod keyboard;
pub mod outcome;
pub mod rules;
pub mod state;
pub mod stats;

mod errors;

pub use errors::{DecodeError, Result, YourdleError};
