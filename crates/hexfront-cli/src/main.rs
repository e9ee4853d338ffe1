//! Hexfront CLI - headless games.
//!
//! - `hexfront selfplay` - AI-vs-AI games, optionally writing a replay
//! - `hexfront replay <file>` - re-run a replay and verify its final state hash

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use hexfront_core::{
    ai::ActionRegistry, load_rules, run_batch_selfplay, run_selfplay, GameEngine, Rules,
    RulesSource, ScenarioConfig, SelfPlayConfig, MAX_PLAYERS,
};
use hexfront_protocol::wire;

#[derive(Parser)]
#[command(name = "hexfront")]
#[command(about = "Headless Hexfront simulation", version)]
struct Cli {
    /// Rules file to load instead of the built-in rules
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play AI-vs-AI games
    Selfplay {
        #[arg(long, default_value_t = 2)]
        players: u8,

        /// Turn limit per game
        #[arg(long, default_value_t = 100)]
        turns: u32,

        #[arg(long, default_value_t = 16)]
        width: i32,

        #[arg(long, default_value_t = 12)]
        height: i32,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Games to play; seeds increase by one per game
        #[arg(long, default_value_t = 1)]
        games: u32,

        /// Write the replay of a single game to this file
        #[arg(long)]
        replay_out: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-run a replay file and check its final state hash
    Replay { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_target(false).init();

    let rules = match &cli.rules {
        Some(path) => load_rules(RulesSource::Path(path.display().to_string())),
        None => load_rules(RulesSource::Embedded),
    }
    .context("loading rules")?;

    match cli.command {
        Commands::Selfplay {
            players,
            turns,
            width,
            height,
            seed,
            games,
            replay_out,
            json,
        } => {
            if players == 0 || players > MAX_PLAYERS {
                bail!("players must be between 1 and {MAX_PLAYERS}");
            }
            let config = SelfPlayConfig {
                scenario: ScenarioConfig {
                    width,
                    height,
                    players,
                    seed,
                    ..ScenarioConfig::default()
                },
                max_turns: turns,
            };
            if games > 1 {
                if replay_out.is_some() {
                    bail!("--replay-out needs a single game");
                }
                run_batch(&config, games, &rules, json)
            } else {
                run_single(&config, &rules, replay_out, json)
            }
        }
        Commands::Replay { path } => verify_replay(&path, rules),
    }
}

fn run_single(
    config: &SelfPlayConfig,
    rules: &Rules,
    replay_out: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let registry = ActionRegistry::standard();
    let result = run_selfplay(config, &registry, rules)?;

    if let Some(path) = replay_out {
        let replay = result
            .replay
            .as_ref()
            .context("game produced no replay")?;
        std::fs::write(&path, wire::replay_to_json(replay)?)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), commands = replay.commands.len(), "replay written");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    let m = &result.metrics;
    println!("seed:        {}", result.seed);
    println!("result:      {:?}", result.victory);
    println!("turns:       {}", m.turns_played);
    println!("commands:    {}", m.total_commands);
    println!("cities:      {}", m.total_cities_founded);
    println!("units built: {}", m.total_units_produced);
    println!("combats:     {}", m.total_combats);
    println!("state hash:  {:#018x}", m.final_state_hash);
    println!("took:        {} ms", result.duration_ms);
    Ok(())
}

fn run_batch(config: &SelfPlayConfig, games: u32, rules: &Rules, json: bool) -> Result<()> {
    let registry = ActionRegistry::standard();
    let batch = run_batch_selfplay(config, games, &registry, rules)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }
    let a = &batch.aggregate;
    println!("games:            {}", batch.games_played);
    println!(
        "avg length:       {:.1} turns (std {:.1})",
        a.avg_game_length, a.game_length_std
    );
    println!("win rates:        {:?}", a.win_rates);
    println!("win balance:      {:.2}", a.win_rate_balance);
    println!("domination rate:  {:.2}", a.domination_rate);
    println!("avg combats:      {:.1}", a.avg_combats);
    println!("avg cities:       {:.1}", a.avg_cities);
    Ok(())
}

fn verify_replay(path: &Path, rules: Rules) -> Result<()> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let replay = wire::replay_from_json(&text)?;
    let commands = replay.commands.len();
    let engine = GameEngine::replay(replay, rules)?;
    println!(
        "ok: {} commands, turn {}, state hash {:#018x}",
        commands,
        engine.state().turn,
        engine.state_hash()
    );
    Ok(())
}
