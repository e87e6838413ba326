// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for the live bot, replays and benchmarks
//
// stdout carries the action protocol and nothing else; logs go to stderr.
// ═══════════════════════════════════════════════════════════════════════

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cof_agents::{Agent, GreedyAgent, PlannerConfig, RandomAgent};
use cof_engine::input::{self, TokenReader};
use cof_engine::setup::{self, RandomBoardSpec};
use cof_engine::types::{Action, Session, TurnRecord};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cof-bot", about = "Territory-control bot: greedy gold planner over a 12x12 grid")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play turns read from stdin until end of input
    Play {
        /// Read turns from this file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Append every turn snapshot as a JSON line to this file
        #[arg(short, long)]
        record: Option<PathBuf>,
        /// Agent type: "greedy" or "random"
        #[arg(short, long, default_value = "greedy")]
        agent: String,
        /// Planner thresholds as JSON
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Seed for the random agent
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
    },
    /// Re-plan recorded snapshots and print each action line
    Replay {
        #[arg(long)]
        snapshots: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Time the planner on seeded random boards
    Bench {
        #[arg(short, long, default_value_t = 1000)]
        boards: u32,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(short, long, default_value_t = 120)]
        gold: i32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { input, record, agent, config, seed } => {
            cmd_play(input.as_deref(), record.as_deref(), &agent, config.as_deref(), seed)
        }
        Commands::Replay { snapshots, config } => cmd_replay(&snapshots, config.as_deref()),
        Commands::Bench { boards, seed, gold } => cmd_bench(boards, seed, gold),
    }
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = PlannerConfig::from_json(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    info!(?config, "loaded planner config");
    Ok(config)
}

fn make_agent(agent_type: &str, config: PlannerConfig, seed: u64) -> Result<Box<dyn Agent>> {
    let agent: Box<dyn Agent> = match agent_type {
        "greedy" => Box::new(GreedyAgent::new(config)),
        "random" => Box::new(RandomAgent::new(seed)),
        other => anyhow::bail!("unknown agent type: {} (expected greedy or random)", other),
    };
    Ok(agent)
}

// ── play ───────────────────────────────────────────────────────────────

fn cmd_play(
    input: Option<&Path>,
    record: Option<&Path>,
    agent_type: &str,
    config: Option<&Path>,
    seed: u64,
) -> Result<()> {
    let mut agent = make_agent(agent_type, load_config(config)?, seed)?;
    info!(agent = agent.name(), "starting");

    let source: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening input {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let mut recorder = match record {
        Some(path) => Some(BufWriter::new(
            OpenOptions::new().create(true).append(true).open(path)
                .with_context(|| format!("opening record file {}", path.display()))?,
        )),
        None => None,
    };

    let mut reader = TokenReader::new(source);
    let mut session = Session {
        mine_spots: input::read_mine_spots(&mut reader).context("reading mine spots")?,
        last_id: 0,
    };
    debug!(spots = session.mine_spots.len(), "header read");

    let stdout = io::stdout();
    let mut turns = 0u32;
    while let Some(mut turn) = input::read_turn(&mut reader, session.last_id)
        .with_context(|| format!("reading turn {}", turns + 1))?
    {
        turns += 1;
        if let Some(out) = recorder.as_mut() {
            let entry = TurnRecord { mine_spots: session.mine_spots.clone(), turn: turn.clone() };
            serde_json::to_writer(&mut *out, &entry)?;
            writeln!(out)?;
            out.flush()?;
        }

        let started = Instant::now();
        let line = agent.play(&mut turn, &session.mine_spots);
        session.last_id = turn.board.last_id;
        debug!(turn = turns, elapsed_us = started.elapsed().as_micros() as u64, %line, "planned");

        let mut out = stdout.lock();
        writeln!(out, "{}", line)?;
        out.flush()?;
    }

    info!(turns, "input closed");
    Ok(())
}

// ── replay ─────────────────────────────────────────────────────────────

fn cmd_replay(snapshots: &Path, config: Option<&Path>) -> Result<()> {
    let mut agent = GreedyAgent::new(load_config(config)?);
    let file = File::open(snapshots)
        .with_context(|| format!("opening snapshots {}", snapshots.display()))?;

    for (n, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut record: TurnRecord = serde_json::from_str(&line)
            .with_context(|| format!("snapshot line {}", n + 1))?;
        println!("{}", agent.play(&mut record.turn, &record.mine_spots));
    }
    Ok(())
}

// ── bench ──────────────────────────────────────────────────────────────

fn cmd_bench(boards: u32, seed: u64, gold: i32) -> Result<()> {
    println!("=== Planner benchmark: {} boards, seed={}, gold={} ===\n", boards, seed, gold);

    let spec = RandomBoardSpec { gold, ..RandomBoardSpec::default() };
    let mut agent = GreedyAgent::default();
    let mut total = Duration::ZERO;
    let mut slowest = Duration::ZERO;
    let mut actions = 0usize;
    let mut waits = 0u32;

    for i in 0..boards {
        let board_seed = seed + i as u64;
        let mut turn = setup::random_turn(board_seed, &spec);
        let spots = setup::random_mine_spots(board_seed, &turn.board, 6);

        let started = Instant::now();
        let plan = agent.plan(&mut turn, &spots);
        let elapsed = started.elapsed();

        total += elapsed;
        if elapsed > slowest {
            slowest = elapsed;
            debug!(seed = board_seed, us = elapsed.as_micros() as u64, "new slowest board");
        }
        if plan.iter().all(|a| *a == Action::Wait) {
            waits += 1;
        } else {
            actions += plan.len();
        }
    }

    if boards == 0 {
        warn!("no boards to plan");
        return Ok(());
    }
    let mean = total / boards;
    println!("  Mean plan time:    {:>10.1} us", mean.as_secs_f64() * 1e6);
    println!("  Slowest plan:      {:>10.1} us", slowest.as_secs_f64() * 1e6);
    println!("  Actions per board: {:>10.2}", actions as f64 / boards as f64);
    println!("  WAIT turns:        {:>10}", waits);
    Ok(())
}
