mod board;
mod commands;

use alertme::prelude::*;
use alertme::{ENGINE_NAME, VERSION as LIB_VERSION};
use anyhow::Result;
use board::{next_event, DisplayBoard};
use clap::Parser;
use colored::Colorize;
use commands::{Command, HELP};
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Periodic rest reminder with an interactive prompt.
#[derive(Debug, Parser)]
#[command(name = "alertshell", version)]
struct Args {
    /// Rest timer interval in minutes.
    #[arg(long)]
    interval: Option<i64>,

    /// Path to a TOML configuration file.
    #[arg(long, env = "ALERTME_CONFIG")]
    config: Option<PathBuf>,
}

/// Highlights the command word of the current line.
#[derive(Completer, Helper, Hinter, Validator)]
struct CommandHighlighter;

impl Highlighter for CommandHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            Cow::Owned(format!("{} {}", command.yellow().bold(), rest.yellow()))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    let rule = "-".repeat(64);
    println!("{}", format!("  {} rest timer", ENGINE_NAME).cyan().bold());
    println!("{}", rule.dimmed());
    println!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );
    println!("{}", rule.dimmed());
}

/// Renders display effects as they arrive.
fn spawn_display_listener(
    scheduler: &RestScheduler,
    board: Arc<RwLock<DisplayBoard>>,
    watching: Arc<AtomicBool>,
) {
    let mut display_rx = scheduler.subscribe_display_events();
    tokio::spawn(async move {
        while let Some(event) = next_event(&mut display_rx).await {
            board.write().await.apply(&event);
            match &event {
                DisplayEvent::ShowNotification { message, .. } => {
                    println!("\n{}", "=".repeat(64).green());
                    println!("  {}", message.green().bold());
                    println!("  Type 'continue' after the rest, or 'skip'.");
                    println!("{}", "=".repeat(64).green());
                }
                DisplayEvent::HideNotification { .. } => {
                    println!("<-- Notification closed.");
                }
                DisplayEvent::ElapsedUpdated { text, .. } => {
                    if watching.load(Ordering::Relaxed) {
                        println!("<-- {}", text);
                    }
                }
                DisplayEvent::AccumulatedUpdated { text, .. } => {
                    println!("<-- {}", text.cyan());
                }
            }
        }
    });
}

/// Surfaces wiring anomalies reported by the scheduler.
fn spawn_system_listener(scheduler: &RestScheduler) {
    let mut system_rx = scheduler.subscribe_system_events();
    tokio::spawn(async move {
        while let Some(event) = next_event(&mut system_rx).await {
            if let SystemEvent::ProtocolViolation { signal, phase } = event {
                println!(
                    "{}",
                    format!("<-- '{}' is not available while {:?}.", signal, phase).yellow()
                );
            }
        }
    });
}

fn print_stats(stats: &RestStatistics, timezone: chrono_tz::Tz) {
    println!("Total Rest Time: {}", format_duration(stats.total_rest()).cyan());
    println!(
        "Sessions: {} rested, {} skipped",
        stats.rested_count(),
        stats.skipped_count()
    );
    for record in stats.sessions() {
        let started = record.started_at.with_timezone(&timezone);
        let outcome = match record.resolution {
            Resolution::Rested => "rested".green(),
            Resolution::Skipped => "skipped".dimmed(),
        };
        println!(
            "  {:<5} {}  {:<8} {}",
            record.session.to_string(),
            started.format("%Y-%m-%d %H:%M:%S"),
            outcome,
            format_duration(record.duration)
        );
    }
}

fn print_status(board: &DisplayBoard) {
    match board.visible {
        Some(session) => println!("Notification {} is open: {}", session, board.message),
        None => println!("Waiting for the next rest."),
    }
    println!("  {}", board.total_rest);
    println!("  {}", board.rest_duration);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RestConfig::load(
        args.config.as_deref(),
        ConfigOverrides {
            interval_minutes: args.interval,
        },
    )?;
    let timezone = config.timezone;

    let scheduler = RestScheduler::new(config);
    let board = Arc::new(RwLock::new(DisplayBoard::default()));
    let watching = Arc::new(AtomicBool::new(false));

    spawn_display_listener(&scheduler, board.clone(), watching.clone());
    spawn_system_listener(&scheduler);

    let runner = scheduler.clone();
    let run_handle = tokio::spawn(async move { runner.run().await });
    info!("Rest timer program successfully started!");

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CommandHighlighter));

    println!("{} is running. Type 'help' for commands or 'exit' to quit.", ENGINE_NAME.cyan());

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(_) => break,
        };
        rl.add_history_entry(line.as_str())?;

        match Command::parse(&line) {
            Ok(Command::Continue) => scheduler.user_continued(),
            Ok(Command::Skip) => scheduler.user_skipped(),
            Ok(Command::Rest) => scheduler.start_rest(),
            Ok(Command::Stats { json: false }) => print_stats(&scheduler.stats(), timezone),
            Ok(Command::Stats { json: true }) => {
                println!("{}", serde_json::to_string_pretty(&scheduler.stats())?)
            }
            Ok(Command::Status) => print_status(&*board.read().await),
            Ok(Command::Watch(on)) => {
                watching.store(on, Ordering::Relaxed);
                let state = if on { "Started" } else { "Stopped" };
                println!("--> {} streaming the rest duration.", state);
            }
            Ok(Command::Help) => {
                println!("Available commands:");
                for (usage, summary) in HELP {
                    println!("  {:<16} - {}", usage, summary);
                }
            }
            Ok(Command::Exit) => break,
            Ok(Command::Empty) => {}
            Err(message) => println!("{}", message),
        }
    }

    println!("Exiting {}...", ENGINE_NAME);
    scheduler.user_exited();
    run_handle.await??;

    info!(
        "Total rest time during the program: {}",
        format_duration(scheduler.stats().total_rest())
    );
    info!("Rest timer program successfully terminated!");
    Ok(())
}
