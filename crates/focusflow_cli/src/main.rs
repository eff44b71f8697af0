//! Terminal front end for FocusFlow.
//!
//! # Responsibility
//! - Turn command-line arguments into task store and timer operations.
//! - Act as the render sink: print the latest state to stdout.
//! - Feed stdin lines to a running countdown as pause/reset/mode controls.

use chrono::Local;
use clap::{Parser, Subcommand};
use focusflow_core::{
    category_color, init_logging, AppConfig, CategoryInfo, LogTarget, NewTask, PomodoroTimer,
    SqliteKvStore, StorageError, Task, TaskId, TaskSink, TaskStats, TaskStore, TimerMode,
    TimerSink, TimerSnapshot, EMPTY_TITLE_NOTICE, EXPIRED_NOTICE,
};
use log::{debug, warn};
use std::error::Error;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Instant;

const PROGRESS_BAR_WIDTH: usize = 30;

#[derive(Parser, Debug)]
#[command(name = "focusflow", version, about = "Task list with a pomodoro timer")]
struct Cli {
    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides `data_dir` from the config.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Overrides `log_level` from the config.
    #[arg(long)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    #[command(flatten)]
    Tasks(TaskCommand),
    /// Run a countdown in the foreground until it expires.
    ///
    /// While it runs, type `p` to pause or resume, `r` to reset,
    /// `m <mode>` to switch mode and `q` to quit.
    Timer {
        #[arg(long, default_value = "pomodoro")]
        mode: TimerMode,
    },
}

#[derive(Subcommand, Debug, Clone)]
enum TaskCommand {
    /// Add a task at the top of the list.
    Add {
        title: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, default_value = "Trabalho")]
        category: String,
    },
    /// Flip a task between pending and completed.
    Toggle { id: TaskId },
    /// Remove a task.
    Delete { id: TaskId },
    /// Show all tasks, newest first.
    List,
    /// Show completed/pending counters.
    Stats,
    /// Show the known categories.
    Categories,
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    start_logging(&config);

    match cli.command {
        Command::Timer { mode } => {
            run_timer(mode);
            Ok(ExitCode::SUCCESS)
        }
        Command::Tasks(command) => run_task_command(&config, command),
    }
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if config.data_dir.is_relative() {
        config.data_dir = std::env::current_dir()?.join(&config.data_dir);
    }
    config.validate()?;
    Ok(config)
}

fn start_logging(config: &AppConfig) {
    let target = if config.log_to_file {
        LogTarget::Dir(config.log_dir())
    } else {
        LogTarget::Stderr
    };
    if let Err(err) = init_logging(&config.log_level, target) {
        eprintln!("logging disabled: {err}");
    }
}

fn run_task_command(config: &AppConfig, command: TaskCommand) -> Result<ExitCode, Box<dyn Error>> {
    std::fs::create_dir_all(&config.data_dir)?;
    let storage = SqliteKvStore::open(config.db_path())?;
    let mut store = TaskStore::new(storage, TerminalTaskView::default());
    store.init();

    println!("{}", Local::now().format("%a, %d %B %Y"));
    match command {
        TaskCommand::Add {
            title,
            start,
            end,
            category,
        } => {
            let input = NewTask {
                title,
                start,
                end,
                category,
            };
            if store.create(input).is_err() {
                eprintln!("{EMPTY_TITLE_NOTICE}");
                return Ok(ExitCode::FAILURE);
            }
            store.sink().print_tasks();
            store.sink().print_stats();
        }
        TaskCommand::Toggle { id } => {
            store.toggle(id);
            store.sink().print_tasks();
            store.sink().print_stats();
        }
        TaskCommand::Delete { id } => {
            store.delete(id);
            store.sink().print_tasks();
            store.sink().print_stats();
        }
        TaskCommand::List => store.sink().print_tasks(),
        TaskCommand::Stats => store.sink().print_stats(),
        TaskCommand::Categories => store.sink().print_categories(),
    }
    Ok(ExitCode::SUCCESS)
}

/// One line of stdin typed while the countdown runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerControl {
    Toggle,
    Reset,
    Mode(TimerMode),
    Quit,
}

fn parse_timer_control(line: &str) -> Option<TimerControl> {
    let mut words = line.split_whitespace();
    let control = match words.next()? {
        "p" | "pause" => TimerControl::Toggle,
        "r" | "reset" => TimerControl::Reset,
        "q" | "quit" => TimerControl::Quit,
        "m" | "mode" => TimerControl::Mode(words.next()?.parse().ok()?),
        _ => return None,
    };
    words.next().is_none().then_some(control)
}

/// Forwards stdin lines until EOF; the channel disconnects afterwards.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn run_timer(mode: TimerMode) {
    println!("controls: p = pause/resume, r = reset, m <mode> = switch mode, q = quit");
    let mut timer = PomodoroTimer::new(TerminalTimerView::default());
    timer.set_mode(mode);
    timer.start();
    let controls = spawn_stdin_reader();

    while !timer.sink().expired {
        let line = match timer.next_due() {
            Some(due) => {
                match controls.recv_timeout(due.saturating_duration_since(Instant::now())) {
                    Ok(line) => Some(line),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => {
                        std::thread::sleep(due.saturating_duration_since(Instant::now()));
                        None
                    }
                }
            }
            // Paused with stdin closed: nothing can resume the countdown.
            None => match controls.recv() {
                Ok(line) => Some(line),
                Err(_) => break,
            },
        };

        let Some(line) = line else {
            timer.poll(Instant::now());
            continue;
        };
        match parse_timer_control(&line) {
            Some(TimerControl::Toggle) => timer.toggle(),
            Some(TimerControl::Reset) => timer.reset(),
            Some(TimerControl::Mode(mode)) => timer.set_mode(mode),
            Some(TimerControl::Quit) => {
                println!();
                break;
            }
            None if line.trim().is_empty() => {}
            None => {
                debug!("event=cli_timer_control module=cli status=ignored input={line:?}");
                eprintln!("\nunknown control {line:?}; use p, r, m <mode> or q");
            }
        }
    }
}

/// Keeps the latest task snapshot and prints it on demand.
#[derive(Default)]
struct TerminalTaskView {
    tasks: Vec<Task>,
    stats: TaskStats,
    categories: Vec<CategoryInfo>,
}

impl TerminalTaskView {
    fn print_tasks(&self) {
        if self.tasks.is_empty() {
            println!("(no tasks)");
            return;
        }
        for task in &self.tasks {
            let check = if task.completed { "x" } else { " " };
            let window = if task.has_time_window() {
                format!("  {} - {}", task.start, task.end)
            } else {
                String::new()
            };
            println!(
                "[{check}] {:>13}  {}  ({}, {}){window}",
                task.id,
                task.title,
                task.category,
                category_color(&task.category)
            );
        }
    }

    fn print_stats(&self) {
        println!(
            "completed: {}  pending: {}",
            self.stats.completed, self.stats.pending
        );
    }

    fn print_categories(&self) {
        for info in &self.categories {
            println!("{} ({})", info.name, info.color);
        }
    }
}

impl TaskSink for TerminalTaskView {
    fn render_tasks(&mut self, tasks: &[Task]) {
        self.tasks = tasks.to_vec();
    }

    fn render_stats(&mut self, stats: TaskStats) {
        self.stats = stats;
    }

    fn render_categories(&mut self, categories: &[CategoryInfo]) {
        self.categories = categories.to_vec();
    }

    fn storage_warning(&mut self, error: &StorageError) {
        warn!("event=cli_storage_warning module=cli status=error error={error}");
        eprintln!("warning: changes were not saved: {error}");
    }
}

/// Redraws one status line per timer change.
#[derive(Default)]
struct TerminalTimerView {
    expired: bool,
}

impl TimerSink for TerminalTimerView {
    fn render_timer(&mut self, snapshot: &TimerSnapshot) {
        let filled = (snapshot.progress * PROGRESS_BAR_WIDTH as f64).round() as usize;
        let bar = format!(
            "{}{}",
            "#".repeat(filled),
            "-".repeat(PROGRESS_BAR_WIDTH.saturating_sub(filled))
        );
        let state = if snapshot.running { "running" } else { "paused" };
        print!(
            "\r{:<8} {} [{bar}] {state}  ",
            snapshot.mode.label(),
            snapshot.remaining_formatted
        );
        if let Err(err) = std::io::stdout().flush() {
            debug!("event=cli_flush module=cli status=error error={err}");
        }
    }

    fn timer_expired(&mut self, _mode: TimerMode) {
        self.expired = true;
        println!("\n\x07{EXPIRED_NOTICE}");
    }
}
