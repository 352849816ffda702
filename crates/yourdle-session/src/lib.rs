//! Game session orchestration: scoring, keyboard state, statistics and
//! persistence for one puzzle.

use yourdle_types::YourdleError;

mod restore;
mod session;
pub mod view;

pub use session::{GameSession, GuessOutcome, SessionSettings};
pub use view::{BoardRow, DistributionBar, StatsView, Tile};

pub fn session_error(message: impl Into<String>) -> YourdleError {
    YourdleError::InvalidState(message.into())
}
