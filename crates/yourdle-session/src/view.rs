//! Read models handed to the UI: board rows, statistics panel, share text.

use chrono::NaiveDate;
use serde::Serialize;
use yourdle_types::{
    outcome::{LetterOutcome, OutcomeLogEntry},
    rules::{GameRules, MAX_GUESSES},
    stats::{percent_of, StatsRecord},
};

/// Minimum bar height in pixels; the win share is added on top.
const BAR_BASE_HEIGHT_PX: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub letter: Option<char>,
    pub outcome: Option<LetterOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardRow {
    pub tiles: Vec<Tile>,
    pub active: bool,
}

/// The full guess grid: scored rows, then blanks, at most one of them active.
pub fn board_rows(rules: &GameRules, log: &[OutcomeLogEntry], accepting: bool) -> Vec<BoardRow> {
    (0..rules.max_guesses())
        .map(|row| match log.get(row) {
            Some(entry) => BoardRow {
                tiles: entry
                    .letters()
                    .map(|(letter, outcome)| Tile {
                        letter: Some(letter),
                        outcome: Some(outcome),
                    })
                    .collect(),
                active: false,
            },
            None => BoardRow {
                tiles: vec![
                    Tile {
                        letter: None,
                        outcome: None,
                    };
                    rules.word_length
                ],
                active: accepting && row == log.len(),
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionBar {
    pub guesses: usize,
    pub count: u32,
    pub height_px: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsView {
    pub games_played: u32,
    pub win_rate: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub bars: Vec<DistributionBar>,
    /// Present only on the day of a win.
    pub share: Option<String>,
}

impl StatsView {
    pub fn build(
        stats: &StatsRecord,
        log: &[OutcomeLogEntry],
        today: NaiveDate,
        share_url: &str,
    ) -> Self {
        let bars = (1..=MAX_GUESSES)
            .map(|guesses| {
                let count = stats.wins_in(guesses);
                DistributionBar {
                    guesses,
                    count,
                    height_px: BAR_BASE_HEIGHT_PX + percent_of(count, stats.games_played),
                }
            })
            .collect();
        let won_today = stats.last_win_date == Some(today)
            && log.last().is_some_and(OutcomeLogEntry::is_win);
        Self {
            games_played: stats.games_played,
            win_rate: stats.win_rate(),
            current_streak: stats.current_streak,
            max_streak: stats.max_streak,
            bars,
            share: won_today.then(|| share_text(log, share_url)),
        }
    }
}

/// Spoiler-free summary of a game, e.g. for pasting into a chat.
pub fn share_text(log: &[OutcomeLogEntry], share_url: &str) -> String {
    let mut lines = Vec::with_capacity(log.len() + 2);
    lines.push(format!("I took {} guesses:", log.len()));
    lines.extend(log.iter().map(OutcomeLogEntry::emoji_row));
    lines.push(share_url.to_string());
    lines.join("\n")
}

pub fn share_url(base_url: &str, slug: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), slug)
}
