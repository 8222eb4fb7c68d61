use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use connect_four::config::{AppConfig, StrategyKind};
use connect_four::game::Session;
use connect_four::ui::App;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect_four", about = "Play Connect Four against the computer or a friend")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Two players at one keyboard instead of an automated opponent
    #[arg(long)]
    local: bool,

    /// Override the opponent's difficulty (1-9)
    #[arg(long)]
    difficulty: Option<u32>,

    /// Override the opponent's strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// Override the seconds allowed per move (0 disables the clock)
    #[arg(long)]
    turn_seconds: Option<u64>,

    /// File that receives log output when RUST_LOG is set
    #[arg(long, default_value = "connect_four.log")]
    log_file: PathBuf,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

/// The terminal belongs to the UI, so log records go to a file instead of
/// stderr. Nothing is opened unless RUST_LOG asks for output.
fn init_logging(path: &Path) -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if cli.local {
        config.opponent.automated = false;
    }
    if let Some(difficulty) = cli.difficulty {
        config.opponent.difficulty = difficulty;
    }
    if let Some(strategy) = cli.strategy {
        config.opponent.strategy = strategy;
    }
    if let Some(seconds) = cli.turn_seconds {
        config.ui.turn_seconds = seconds;
    }
    config.validate().context("validating command-line overrides")?;

    log::info!(
        "starting session: automated={} strategy={:?} difficulty={}",
        config.opponent.automated,
        config.opponent.strategy,
        config.opponent.difficulty
    );
    let session = Session::from_config(&config);
    let mut app = App::new(session).with_turn_limit(config.ui.turn_limit());
    run(&mut app).context("running terminal UI")?;

    if app.timed_out() {
        bail!("no move within {} seconds", config.ui.turn_seconds);
    }
    Ok(())
}

fn run(app: &mut App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal even if the app returned an error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn logs_go_to_a_file_by_default() {
        let cli = Cli::try_parse_from(["connect_four"]).unwrap();
        assert_eq!(cli.log_file, PathBuf::from("connect_four.log"));
        assert_eq!(cli.turn_seconds, None);

        let cli = Cli::try_parse_from([
            "connect_four",
            "--log-file",
            "/tmp/c4.log",
            "--turn-seconds",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.log_file, PathBuf::from("/tmp/c4.log"));
        assert_eq!(cli.turn_seconds, Some(0));
    }
}
