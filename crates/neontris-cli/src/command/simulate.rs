use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use neontris_engine::PieceSeed;
use neontris_game::{GameSession, SessionConfig};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{config::CliConfig, util};

/// Simulated thinking time per piece, fed to the session clock.
const PIECE_TIME: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Number of games to play
    #[clap(long, default_value_t = 10)]
    pub(super) games: usize,
    /// Stop a game after this many pieces
    #[clap(long, default_value_t = 1000)]
    max_pieces: usize,
    /// Base seed (32 hex digits); every game's seed is derived from it
    #[clap(long)]
    pub(super) seed: Option<PieceSeed>,
    /// Write the JSON report to this file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct GameReport {
    seed: PieceSeed,
    score: usize,
    level: usize,
    lines: usize,
    pieces: usize,
    /// Locks that cleared 0, 1, 2, 3 and 4 lines.
    line_clears: [usize; 5],
    topped_out: bool,
    final_drop_interval_ms: u128,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Summary {
    games: usize,
    top_outs: usize,
    mean_score: f64,
    max_score: usize,
    mean_lines: f64,
    mean_pieces: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct SimulationReport {
    base_seed: PieceSeed,
    max_pieces: usize,
    summary: Summary,
    games: Vec<GameReport>,
}

pub(crate) fn run(arg: &SimulateArg, config: &CliConfig) -> anyhow::Result<()> {
    let SimulateArg {
        games,
        max_pieces,
        seed,
        output,
    } = arg;

    let base_seed = seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(games, max_pieces, %base_seed, "simulation started");

    let mut session_config = config.session_config();
    session_config.game.advisor = true;
    let report = simulate(&session_config, base_seed, *games, *max_pieces)?;

    tracing::info!(
        mean_score = report.summary.mean_score,
        top_outs = report.summary.top_outs,
        "simulation finished"
    );
    util::save_json(&report, output.as_deref())
}

fn simulate(
    session_config: &SessionConfig,
    base_seed: PieceSeed,
    games: usize,
    max_pieces: usize,
) -> anyhow::Result<SimulationReport> {
    let mut seeds = Pcg32::from_seed(base_seed.to_bytes());
    let reports = (0..games)
        .map(|game| {
            let seed = seeds.random();
            let mut config = session_config.clone();
            config.game.seed = Some(seed);
            let report = play_game(config, max_pieces)
                .with_context(|| format!("Failed to simulate game {game} (seed {seed})"))?;
            tracing::debug!(game, score = report.score, lines = report.lines, "game simulated");
            Ok(report)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(SimulationReport {
        base_seed,
        max_pieces,
        summary: summarize(&reports),
        games: reports,
    })
}

fn play_game(config: SessionConfig, max_pieces: usize) -> anyhow::Result<GameReport> {
    let seed = config.game.seed;
    let mut session = GameSession::new(config)?;
    while session.state().is_playing() && session.stats().completed_pieces() < max_pieces {
        session.tick(PIECE_TIME);
        if !session.state().is_playing() {
            break;
        }
        if !session.follow_advice() {
            session.hard_drop();
        }
        // Nobody listens to a headless game.
        session.drain_events().for_each(drop);
    }

    let stats = session.stats();
    Ok(GameReport {
        seed: seed.unwrap_or(session.seed()),
        score: stats.score(),
        level: stats.level(),
        lines: stats.total_cleared_lines(),
        pieces: stats.completed_pieces(),
        line_clears: *stats.line_cleared_counter(),
        topped_out: session.state().is_game_over(),
        final_drop_interval_ms: session.drop_interval().as_millis(),
    })
}

#[expect(clippy::cast_precision_loss)]
fn summarize(reports: &[GameReport]) -> Summary {
    let mean = |value: fn(&GameReport) -> usize| {
        if reports.is_empty() {
            0.0
        } else {
            reports.iter().map(value).sum::<usize>() as f64 / reports.len() as f64
        }
    };
    Summary {
        games: reports.len(),
        top_outs: reports.iter().filter(|r| r.topped_out).count(),
        mean_score: mean(|r| r.score),
        max_score: reports.iter().map(|r| r.score).max().unwrap_or(0),
        mean_lines: mean(|r| r.lines),
        mean_pieces: mean(|r| r.pieces),
    }
}
