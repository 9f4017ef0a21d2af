use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use coup_engine::GameConfig;

/// Play Coup in the terminal against bots.
#[derive(Parser, Debug)]
#[command(name = "coup")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON table configuration. Overrides --players, --name and --bots-only.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Number of seats, 2 to 6
    #[arg(short, long, default_value_t = 4)]
    players: usize,

    /// Your name at the table
    #[arg(short, long, default_value = "You")]
    name: String,

    /// Seat bots only and watch
    #[arg(long)]
    bots_only: bool,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Pause before each bot action
    #[arg(long)]
    bot_delay_ms: Option<u64>,

    /// Print the final table as JSON
    #[arg(long)]
    summary_json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // bots-only games narrate through the log
    let default_filter = if cli.bots_only { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::quick(cli.players, (!cli.bots_only).then(|| cli.name.clone())),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(delay) = cli.bot_delay_ms {
        config.bot_delay_ms = delay;
    }

    let mut game = config.into_game().context("setting up the table")?;
    info!(players = game.state().players().len(), "game started");

    let winner = game.play().context("playing")?;
    let view = game.view();
    println!("{} wins after {} turns", view.name(winner), view.turn);

    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    Ok(())
}
