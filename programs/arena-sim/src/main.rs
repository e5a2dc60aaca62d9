//! Headless Robot Arena
//!
//! Plays a scripted player against the UCB bot on the match clock and
//! reports how the bot's action values evolved.

mod script;

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use duel_logic::{ArenaConfig, ArmStats, BanditReset, MatchController, Snapshot};
use serde::Serialize;

use crate::script::{Player, PlayerScript};

/// Headless Robot Arena - scripted player against the learning bot
#[derive(Parser, Debug)]
#[command(name = "arena-sim")]
#[command(about = "Run a Robot Arena match without a renderer and report the bot's learning")]
struct Args {
    /// TOML file with an ArenaConfig; missing keys use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Player script: cycle, random, or an action tag (attack, defend, dodge, charge)
    #[arg(long, default_value = "random")]
    player: PlayerScript,

    /// Rounds to play
    #[arg(long, default_value_t = 5)]
    rounds: u32,

    /// Stop after this many ticks even if rounds remain
    #[arg(long, default_value_t = 2_000_000)]
    max_ticks: u64,

    /// Override the config seed
    #[arg(long)]
    seed: Option<u64>,

    /// Wipe the bot's statistics at every round reset
    #[arg(long)]
    reset_per_round: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    rounds_played: u32,
    player_wins: u32,
    bot_wins: u32,
    exchanges: u32,
    ticks: u64,
    hit_tick_limit: bool,
    arms: Vec<ArmStats>,
}

fn load_config(path: Option<&Path>) -> Result<ArenaConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(ArenaConfig::default());
    };
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}

fn parse_config(content: &str) -> Result<ArenaConfig, toml::de::Error> {
    toml::from_str(content)
}

fn main() -> Result<(), Box<dyn Error>> {
    // stdout carries the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let report = run(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn run(args: &Args) -> Result<Report, Box<dyn Error>> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.reset_per_round {
        config.bandit_reset = BanditReset::PerRound;
    }

    let mut player = Player::new(args.player.clone(), config.seed);
    let mut controller = MatchController::new(config)?;
    let mut exchanges = 0u32;

    tracing::info!(player = ?args.player, rounds = args.rounds, "match starting");

    while controller.round() <= args.rounds && controller.now() < args.max_ticks {
        if controller.gate_open() {
            let action = player.next_action();
            if controller.submit_action(action) {
                exchanges += 1;
            }
        }
        controller.tick();

        for snapshot in controller.drain_snapshots() {
            log_snapshot(&snapshot);
        }
    }

    let hit_tick_limit = controller.round() <= args.rounds;
    if hit_tick_limit {
        tracing::warn!(ticks = controller.now(), "tick limit reached before the last round ended");
    }

    let snapshot = controller.snapshot();
    Ok(Report {
        rounds_played: snapshot.player_wins + snapshot.bot_wins,
        player_wins: snapshot.player_wins,
        bot_wins: snapshot.bot_wins,
        exchanges,
        ticks: controller.now(),
        hit_tick_limit,
        arms: controller.arms().to_vec(),
    })
}

fn log_snapshot(snapshot: &Snapshot) {
    tracing::debug!(
        round = snapshot.round,
        phase = ?snapshot.phase,
        player_health = snapshot.player_health,
        bot_health = snapshot.bot_health,
        bot_action = ?snapshot.last_bot_action,
        message = snapshot.last_outcome_message.as_deref().unwrap_or(""),
        "snapshot"
    );
}

fn print_report(report: &Report) {
    println!("\n=== ROBOT ARENA ===");
    println!(
        "Rounds: {}  Player wins: {}  Bot wins: {}",
        report.rounds_played, report.player_wins, report.bot_wins
    );
    println!("Exchanges: {}  Ticks: {}", report.exchanges, report.ticks);
    if report.hit_tick_limit {
        println!("(stopped at tick limit)");
    }
    println!();
    println!("{:<8} {:>6} {:>8}", "action", "pulls", "value");
    for arm in &report.arms {
        println!("{:<8} {:>6} {:>8.3}", arm.action.name(), arm.pulls, arm.value);
    }
}
