//! Guess-result state machine building blocks: keyboard merging, the bounded
//! outcome log and running statistics.

mod merger;
mod outcome_log;
mod stats;

pub use merger::LetterStateMerger;
pub use outcome_log::OutcomeLog;
pub use stats::StatsAggregator;
