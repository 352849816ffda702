use std::{
    collections::VecDeque,
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Terminal,
};
use tokio::sync::mpsc::UnboundedSender;
use yourdle_session::{BoardRow, StatsView};
use yourdle_types::{
    events::{RejectionReason, SessionEvent, SessionPayload, SessionState},
    keyboard::KeyboardLetterState,
    outcome::LetterOutcome,
};

const MAX_LOG_ENTRIES: usize = 120;
const KEYBOARD_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

/// Everything the screen needs to draw the game.
pub struct Snapshot {
    pub board: Vec<BoardRow>,
    pub keyboard: KeyboardLetterState,
    pub state: SessionState,
    pub stats: Option<StatsView>,
}

pub enum UiMessage {
    Snapshot(Box<Snapshot>),
    Event(SessionEvent),
    Notice(String),
    Shutdown,
}

pub enum UiCommand {
    Guess(String),
    ShowStats,
}

pub fn run(
    receiver: Receiver<UiMessage>,
    commands: UnboundedSender<UiCommand>,
    summary: String,
    word_length: usize,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let res = run_loop(
        &mut terminal,
        receiver,
        commands,
        summary.as_str(),
        word_length,
    );

    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    res
}

fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    receiver: Receiver<UiMessage>,
    commands: UnboundedSender<UiCommand>,
    summary: &str,
    word_length: usize,
) -> Result<()> {
    let mut logs: VecDeque<String> = VecDeque::with_capacity(MAX_LOG_ENTRIES);
    let mut snapshot: Option<Box<Snapshot>> = None;
    let mut input = String::new();
    let mut status = String::from("Loading");
    // Set while a command is in flight; further submissions are ignored.
    let mut waiting = true;

    loop {
        let mut receiver_closed = false;
        loop {
            match receiver.try_recv() {
                Ok(UiMessage::Snapshot(next)) => {
                    // Typed letters stay put until the guess lands on the board.
                    if row_advanced(snapshot.as_deref(), &next) {
                        input.clear();
                    }
                    status = summarize_state(next.state);
                    snapshot = Some(next);
                    waiting = false;
                }
                Ok(UiMessage::Event(event)) => {
                    if logs.len() == MAX_LOG_ENTRIES {
                        logs.pop_front();
                    }
                    logs.push_back(format_event(&event));
                }
                Ok(UiMessage::Notice(notice)) => status = notice,
                Ok(UiMessage::Shutdown) => return Ok(()),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    receiver_closed = true;
                    break;
                }
            }
        }
        if receiver_closed {
            break;
        }

        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(3),
                        Constraint::Length(8),
                        Constraint::Length(5),
                        Constraint::Min(0),
                    ]
                    .as_ref(),
                )
                .split(f.size());

            let header = Paragraph::new(Line::from(vec![
                Span::styled(
                    "Yourdle",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::raw(summary),
                Span::raw("  "),
                Span::raw(status.clone()),
                Span::raw("  "),
                Span::styled("Enter", Style::default().fg(Color::Yellow)),
                Span::raw(" submit  "),
                Span::styled("Tab", Style::default().fg(Color::Yellow)),
                Span::raw(" stats  "),
                Span::styled("Esc", Style::default().fg(Color::Yellow)),
                Span::raw(" quit"),
            ]))
            .block(Block::default().borders(Borders::ALL).title("Game"));
            f.render_widget(header, chunks[0]);

            let middle = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(30), Constraint::Min(0)].as_ref())
                .split(chunks[1]);

            let board_lines = snapshot
                .as_ref()
                .map(|snap| board_lines(&snap.board, &input))
                .unwrap_or_default();
            let board =
                Paragraph::new(board_lines).block(Block::default().borders(Borders::ALL).title("Board"));
            f.render_widget(board, middle[0]);

            let stats_lines = snapshot
                .as_ref()
                .and_then(|snap| snap.stats.as_ref())
                .map(stats_lines)
                .unwrap_or_else(|| vec![Line::from("Press Tab for statistics")]);
            let stats =
                Paragraph::new(stats_lines).block(Block::default().borders(Borders::ALL).title("Statistics"));
            f.render_widget(stats, middle[1]);

            let keyboard_lines = snapshot
                .as_ref()
                .map(|snap| keyboard_lines(&snap.keyboard))
                .unwrap_or_default();
            let keyboard = Paragraph::new(keyboard_lines)
                .block(Block::default().borders(Borders::ALL).title("Keyboard"));
            f.render_widget(keyboard, chunks[2]);

            let items: Vec<ListItem> = logs
                .iter()
                .rev()
                .map(|entry| ListItem::new(entry.clone()))
                .collect();
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("Recent events"));
            f.render_widget(list, chunks[3]);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let accepting = snapshot
                    .as_ref()
                    .is_some_and(|snap| !snap.state.is_terminal());
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Tab if !waiting => {
                        waiting = commands.send(UiCommand::ShowStats).is_ok();
                    }
                    KeyCode::Enter if !waiting && accepting => {
                        if input.chars().count() == word_length {
                            waiting = commands
                                .send(UiCommand::Guess(input.clone()))
                                .is_ok();
                            status = String::from("Scoring...");
                        } else {
                            status = String::from("Not enough letters");
                        }
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Char(letter)
                        if accepting
                            && letter.is_ascii_alphabetic()
                            && input.chars().count() < word_length =>
                    {
                        input.push(letter.to_ascii_uppercase());
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

fn outcome_style(outcome: Option<LetterOutcome>) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    match outcome {
        Some(LetterOutcome::Correct) => base.fg(Color::Black).bg(Color::Green),
        Some(LetterOutcome::Near) => base.fg(Color::Black).bg(Color::Yellow),
        Some(LetterOutcome::Wrong) => base.fg(Color::White).bg(Color::DarkGray),
        None => base.fg(Color::White),
    }
}

fn scored_rows(board: &[BoardRow]) -> usize {
    board
        .iter()
        .filter(|row| row.tiles.iter().any(|tile| tile.outcome.is_some()))
        .count()
}

fn row_advanced(previous: Option<&Snapshot>, next: &Snapshot) -> bool {
    scored_rows(&next.board) > previous.map_or(0, |snap| scored_rows(&snap.board))
}

fn board_lines(board: &[BoardRow], input: &str) -> Vec<Line<'static>> {
    board
        .iter()
        .map(|row| {
            let mut typed = input.chars();
            let spans = row
                .tiles
                .iter()
                .map(|tile| {
                    let letter = tile
                        .letter
                        .or_else(|| row.active.then(|| typed.next()).flatten());
                    let text = format!(" {} ", letter.unwrap_or('_'));
                    Span::styled(text, outcome_style(tile.outcome))
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

fn keyboard_lines(keyboard: &KeyboardLetterState) -> Vec<Line<'static>> {
    KEYBOARD_ROWS
        .iter()
        .map(|row| {
            let spans = row
                .chars()
                .map(|letter| Span::styled(format!(" {letter} "), outcome_style(keyboard.get(letter))))
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

fn stats_lines(view: &StatsView) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(format!(
        "Played {}  Win % {}  Streak {}  Max {}",
        view.games_played, view.win_rate, view.current_streak, view.max_streak
    ))];
    lines.extend(view.bars.iter().map(|bar| {
        Line::from(vec![
            Span::raw(format!("{} ", bar.guesses)),
            Span::styled(
                "█".repeat((bar.height_px / 10) as usize),
                Style::default().fg(Color::Green),
            ),
            Span::raw(format!(" {}", bar.count)),
        ])
    }));
    if let Some(share) = &view.share {
        lines.extend(share.lines().map(|line| Line::from(line.to_string())));
    }
    lines
}

fn summarize_state(state: SessionState) -> String {
    match state {
        SessionState::AwaitingGuess => "Your guess".to_string(),
        SessionState::Won => "Solved!".to_string(),
        SessionState::Lost => "Out of guesses".to_string(),
    }
}

fn format_event(event: &SessionEvent) -> String {
    let timestamp = event.timestamp.format("%H:%M:%S");
    match &event.payload {
        SessionPayload::Restored(restored) => format!(
            "[{}] Restored {:?} replayed={} fresh={}",
            timestamp, restored.state, restored.replayed_guesses, restored.started_fresh
        ),
        SessionPayload::GuessRecorded(recorded) => format!(
            "[{}] Guess {} {} {}",
            timestamp,
            recorded.row + 1,
            recorded.entry.guess,
            recorded.entry.emoji_row()
        ),
        SessionPayload::GuessRejected(rejected) => {
            let reason = match rejected.reason {
                RejectionReason::InvalidLength => "wrong length",
                RejectionReason::InvalidCharacters => "not letters",
                RejectionReason::UnrecognizedWord => "not a word",
                RejectionReason::OracleUnavailable => "scorer unavailable",
            };
            format!("[{}] Rejected {} ({reason})", timestamp, rejected.guess)
        }
        SessionPayload::Completed(record) => format!(
            "[{}] Game over won={} guesses={}",
            timestamp,
            record.won,
            record.guess_count()
        ),
        SessionPayload::StatsViewed(stats) => format!(
            "[{}] Stats played={} wins={}",
            timestamp,
            stats.games_played,
            stats.wins()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yourdle_session::view::board_rows;
    use yourdle_types::{outcome::OutcomeLogEntry, rules::GameRules};

    fn snapshot_with(log: &[OutcomeLogEntry]) -> Snapshot {
        Snapshot {
            board: board_rows(&GameRules::classic(), log, true),
            keyboard: KeyboardLetterState::new(),
            state: SessionState::AwaitingGuess,
            stats: None,
        }
    }

    #[test]
    fn input_kept_until_guess_is_scored() {
        let crane = OutcomeLogEntry::new(
            "CRANE",
            vec![
                LetterOutcome::Correct,
                LetterOutcome::Correct,
                LetterOutcome::Correct,
                LetterOutcome::Wrong,
                LetterOutcome::Correct,
            ]
            .into(),
        );
        let empty = snapshot_with(&[]);
        let scored = snapshot_with(std::slice::from_ref(&crane));

        // A rejected guess comes back with the same board.
        assert!(!row_advanced(Some(&empty), &snapshot_with(&[])));
        assert!(!row_advanced(Some(&scored), &snapshot_with(&[crane.clone()])));
        assert!(row_advanced(Some(&empty), &scored));
        assert!(!row_advanced(None, &empty));
    }
}
