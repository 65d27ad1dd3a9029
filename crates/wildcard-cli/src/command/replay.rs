use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use wildcard_engine::{Board, CardLayout, GameConfig, GameState, RecordedMove, Transcript};

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub struct ReplayArg {
    /// Path to the transcript file (CSV format)
    transcript: PathBuf,
    /// Index of the first state to dump
    #[arg(long, default_value_t = 0)]
    start: usize,
    /// Index of the last state to dump [default: after the last move]
    #[arg(long)]
    end: Option<usize>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ReplayDump<'a> {
    replayed_at: DateTime<Utc>,
    transcript: &'a Path,
    board: &'a Board,
    initial_cards: CardLayout,
    config: &'a GameConfig,
    /// Moves between the first and the last dumped state.
    moves: &'a [RecordedMove],
    states: Vec<GameState>,
}

pub fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg {
        transcript: path,
        start,
        end,
        output,
    } = arg;

    log::info!("loading transcript from {}", path.display());
    let transcript = Transcript::from_path(path)
        .with_context(|| format!("Failed to parse transcript: {}", path.display()))?;
    log::info!("loaded {} moves", transcript.num_moves());

    let end = end.unwrap_or(transcript.num_moves());
    let states = transcript
        .evolve(*start, end)
        .with_context(|| format!("Failed to replay {}", path.display()))?;
    let inconsistencies = states.last().map_or(0, GameState::inconsistencies);
    if inconsistencies > 0 {
        log::warn!("{inconsistencies} moves did not match the replayed cards");
    }

    let dump = ReplayDump {
        replayed_at: Utc::now(),
        transcript: path,
        board: transcript.board(),
        initial_cards: transcript.placement().layout(),
        config: transcript.config(),
        moves: &transcript.moves()[*start..end],
        states,
    };
    Output::save_json(&dump, output.as_deref())?;
    Ok(())
}
