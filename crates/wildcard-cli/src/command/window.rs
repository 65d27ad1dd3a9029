use std::path::PathBuf;

use wildcard_analysis::edit_distance::compute_edit_distance;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub struct WindowArg {
    /// Card of interest, e.g. `5H`
    coi: String,
    /// Cards held by player 1, comma separated
    #[arg(long, value_delimiter = ',')]
    p1: Vec<String>,
    /// Cards held by player 2, comma separated
    #[arg(long, value_delimiter = ',')]
    p2: Vec<String>,
    /// Feature configuration file (JSON format)
    #[arg(long)]
    config: Option<PathBuf>,
}

pub fn run(arg: &WindowArg) -> anyhow::Result<()> {
    let WindowArg {
        coi,
        p1,
        p2,
        config,
    } = arg;

    let config = util::read_feature_config(config.as_deref())?;
    let hands = [p1.clone(), p2.clone()];
    let result = compute_edit_distance(&hands, coi, &config)?;
    log::debug!(
        "{coi}: best window {} with {} edits",
        result.optimal_window,
        result.min_edit
    );

    Output::stdout().write_json(&result)?;
    Ok(())
}
