use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::mpsc,
};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use futures::{stream::BoxStream, StreamExt};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc as async_mpsc,
};
use tracing::{info, warn};
use yourdle_feed::{LocalFeed, SessionFeed};
use yourdle_oracle::LocalOracle;
use yourdle_ops::{ensure_state_dir, init_tracing, CookieSettings, FileStateStore};
use yourdle_session::{GameSession, SessionSettings, StatsView};
use yourdle_types::{
    config::{GameConfig, OpsConfig, OracleConfig, PuzzleConfig, StorageConfig, YourdleConfig},
    events::SessionEvent,
    outcome::LetterOutcome,
    YourdleError,
};

mod ui;

use ui::{Snapshot, UiCommand, UiMessage};

type CliSession = GameSession<LocalOracle, FileStateStore, LocalFeed>;

#[derive(Debug, Parser)]
#[command(name = "yourdle", about = "Play today's Yourdle puzzle in the terminal")]
struct Args {
    /// TOML config file.
    #[arg(long, env = "YOURDLE_CONFIG")]
    config: Option<PathBuf>,
    /// Puzzle to play instead of `game.slug`.
    #[arg(long)]
    slug: Option<String>,
    /// Where state tokens are kept instead of `storage.state_dir`.
    #[arg(long)]
    state_dir: Option<String>,
    /// Line-by-line play without the full-screen interface.
    #[arg(long)]
    plain: bool,
    /// Play as if it were this day (YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref());
    if let Some(slug) = args.slug {
        config.game.slug = slug;
    }
    if let Some(state_dir) = args.state_dir {
        config.storage.state_dir = state_dir;
    }
    init_tracing(&config.ops)?;

    let state_dir = ensure_state_dir(&config.storage.state_dir)?;
    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let settings = SessionSettings::from_config(&config, today);
    let store = FileStateStore::new(state_dir, CookieSettings::from_config(&config.storage));
    let oracle = LocalOracle::from_puzzles(&config.oracle.puzzles);
    let feed = LocalFeed::new(64);
    // Subscribed before restoring so the restore event reaches the event log.
    let events = feed.subscribe();

    let session = GameSession::restore(settings, oracle, store, feed)
        .await
        .context("failed to restore game state")?;
    info!("Playing {} for {}", session.slug(), today);

    if args.plain {
        run_plain(&session).await
    } else {
        run_tui(session, events).await
    }
}

/// Full-screen mode: the UI runs on a blocking thread and sends commands back.
async fn run_tui(session: CliSession, mut events: BoxStream<'static, SessionEvent>) -> Result<()> {
    let (ui_tx, ui_rx) = mpsc::channel();
    let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
    let summary = format!("{} / {}", session.slug(), session.today());
    let word_length = session.rules().word_length;
    let ui_handle =
        tokio::task::spawn_blocking(move || ui::run(ui_rx, cmd_tx, summary, word_length));

    let event_tx = ui_tx.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            if event_tx.send(UiMessage::Event(event)).is_err() {
                break;
            }
        }
    });

    let _ = ui_tx.send(UiMessage::Snapshot(snapshot(&session, None)));
    while let Some(command) = cmd_rx.recv().await {
        let mut notices = Vec::new();
        let stats = match command {
            UiCommand::Guess(guess) => {
                if let Err(err) = session.submit_guess(&guess).await {
                    notices.push(describe(&err));
                }
                if session.session_state().is_terminal() {
                    view_stats_or_notice(&session, &mut notices).await
                } else {
                    None
                }
            }
            UiCommand::ShowStats => view_stats_or_notice(&session, &mut notices).await,
        };
        // Notices go after the snapshot so they stay on screen.
        let messages = std::iter::once(UiMessage::Snapshot(snapshot(&session, stats)))
            .chain(notices.into_iter().map(UiMessage::Notice));
        if messages.map(|message| ui_tx.send(message)).any(|sent| sent.is_err()) {
            break;
        }
    }

    forwarder.abort();
    let _ = ui_tx.send(UiMessage::Shutdown);
    ui_handle.await.context("terminal ui task failed")??;
    Ok(())
}

async fn view_stats_or_notice(session: &CliSession, notices: &mut Vec<String>) -> Option<StatsView> {
    match session.view_stats().await {
        Ok(view) => Some(view),
        Err(err) => {
            warn!("Could not load statistics: {err}");
            notices.push(describe(&err));
            None
        }
    }
}

fn snapshot(session: &CliSession, stats: Option<StatsView>) -> Box<Snapshot> {
    Box::new(Snapshot {
        board: session.board(),
        keyboard: session.keyboard_state(),
        state: session.session_state(),
        stats,
    })
}

async fn run_plain(session: &CliSession) -> Result<()> {
    let rules = session.rules();
    println!(
        "Yourdle {} ({} letters, {} guesses). Commands: :stats, :quit",
        session.slug(),
        rules.word_length,
        rules.max_guesses()
    );
    for entry in session.outcome_log() {
        println!("{}  {}", entry.guess, entry.emoji_row());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(row) = session.active_row() {
        print!("guess {}/{}> ", row + 1, rules.max_guesses());
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        match line.trim() {
            "" => continue,
            ":q" | ":quit" => return Ok(()),
            ":stats" => print_stats(&session.view_stats().await?),
            guess => match session.submit_guess(guess).await {
                Ok(outcome) => {
                    println!("{}  {}", outcome.entry.guess, outcome.entry.emoji_row());
                    print_keyboard(session);
                }
                Err(err) if err.is_recoverable() => println!("{}", describe(&err)),
                Err(err) => return Err(err.into()),
            },
        }
    }

    print_stats(&session.view_stats().await?);
    Ok(())
}

fn print_keyboard(session: &CliSession) {
    let keyboard = session.keyboard_state();
    for outcome in [
        LetterOutcome::Correct,
        LetterOutcome::Near,
        LetterOutcome::Wrong,
    ] {
        let letters: String = keyboard
            .iter()
            .filter(|(_, state)| *state == outcome)
            .map(|(letter, _)| letter)
            .collect();
        if !letters.is_empty() {
            println!("  {} {}", outcome.emoji(), letters);
        }
    }
}

fn print_stats(view: &StatsView) {
    println!(
        "Played {}  Win % {}  Streak {}  Max streak {}",
        view.games_played, view.win_rate, view.current_streak, view.max_streak
    );
    for bar in &view.bars {
        println!("  {} {}", bar.guesses, bar.count);
    }
    if let Some(share) = &view.share {
        println!("\n{share}");
    }
}

fn describe(err: &YourdleError) -> String {
    match err {
        YourdleError::InvalidGuessLength { expected, .. } => {
            format!("Guesses must be {expected} letters")
        }
        YourdleError::InvalidGuessCharacters(_) => "Guesses may only use letters A-Z".into(),
        YourdleError::UnrecognizedWord(word) => format!("{word} is not in the word list"),
        YourdleError::OracleUnavailable(_) => "Could not reach the scorer, try again".into(),
        YourdleError::GuessPending => "Still scoring the last guess".into(),
        other => other.to_string(),
    }
}

fn load_config(explicit: Option<&Path>) -> YourdleConfig {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("configs/dev.toml"));
    match YourdleConfig::from_file(&path) {
        Ok(cfg) => {
            if let Err(err) = cfg.validate() {
                eprintln!(
                    "Invalid config in '{}': {err}. Falling back to internal defaults.",
                    path.display()
                );
                default_config()
            } else {
                cfg
            }
        }
        Err(err) => {
            eprintln!(
                "Failed to load config from '{}': {err}. Falling back to internal defaults.",
                path.display()
            );
            default_config()
        }
    }
}

fn default_config() -> YourdleConfig {
    let config = YourdleConfig {
        game: GameConfig {
            slug: "daily".into(),
            word_length: 5,
            base_url: "https://yourdle.edgecompute.app".into(),
        },
        oracle: OracleConfig {
            timeout_ms: 2_000,
            puzzles: vec![PuzzleConfig {
                slug: "daily".into(),
                secret: "CRATE".into(),
                words: Vec::new(),
            }],
        },
        storage: StorageConfig {
            state_dir: "state".into(),
            cookie_prefix: "yourdle".into(),
            cookie_max_age_secs: 30 * 24 * 60 * 60,
        },
        ops: OpsConfig {
            log_level: "warn".into(),
        },
    };
    debug_assert!(config.validate().is_ok());
    config
}
