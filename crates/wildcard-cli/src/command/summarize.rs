use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use wildcard_engine::{Card, Corpus, PlayerId, Transcript};

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub struct SummarizeArg {
    /// Corpus directory containing transcript CSV files
    corpus_dir: PathBuf,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CorpusSummary {
    summarized_at: DateTime<Utc>,
    corpus_dir: PathBuf,
    num_transcripts: usize,
    num_failed: usize,
    transcripts: Vec<TranscriptSummary>,
    failures: Vec<Failure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct TranscriptSummary {
    path: PathBuf,
    num_moves: usize,
    num_chat_messages: usize,
    num_card_mentions: usize,
    num_cards: usize,
    duplicate_card_ids: usize,
    final_hands: [Vec<Card>; 2],
    inconsistencies: usize,
}

#[derive(Debug, Serialize)]
struct Failure {
    path: PathBuf,
    error: String,
}

pub fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let SummarizeArg { corpus_dir, output } = arg;

    let corpus = Corpus::open(corpus_dir)
        .with_context(|| format!("Failed to read corpus directory: {}", corpus_dir.display()))?;

    let mut transcripts = vec![];
    let mut failures = vec![];
    for entry in corpus.load_all() {
        match entry.transcript {
            Ok(transcript) => transcripts.push(summarize(&entry.path, &transcript)?),
            Err(e) => failures.push(Failure {
                path: entry.path,
                error: e.to_string(),
            }),
        }
    }
    log::info!(
        "summarized {} transcripts, {} failed",
        transcripts.len(),
        failures.len()
    );

    let summary = CorpusSummary {
        summarized_at: Utc::now(),
        corpus_dir: corpus_dir.clone(),
        num_transcripts: corpus.len(),
        num_failed: failures.len(),
        transcripts,
        failures,
    };
    Output::save_json(&summary, output.as_deref())?;
    Ok(())
}

fn summarize(path: &Path, transcript: &Transcript) -> anyhow::Result<TranscriptSummary> {
    let last = transcript
        .step(None, transcript.num_moves())
        .with_context(|| format!("Failed to replay {}", path.display()))?;
    let moves = transcript.moves();
    Ok(TranscriptSummary {
        path: path.to_path_buf(),
        num_moves: moves.len(),
        num_chat_messages: moves.iter().filter(|m| m.action.is_chat_message()).count(),
        num_card_mentions: moves.iter().filter(|m| m.action.mentions_card()).count(),
        num_cards: transcript.placement().num_cards(),
        duplicate_card_ids: transcript.placement().duplicate_ids(),
        final_hands: PlayerId::ALL.map(|player| last.hand(player).to_vec()),
        inconsistencies: last.inconsistencies(),
    })
}
