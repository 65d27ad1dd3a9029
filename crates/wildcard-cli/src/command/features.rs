use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use wildcard_analysis::{
    annotation::{self, AnnotationRecord},
    edit_distance::FeatureConfig,
    features::UtteranceFeatures,
};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub struct FeaturesArg {
    /// Annotation CSV file, or a directory of them
    annotations: PathBuf,
    /// Feature configuration file (JSON format)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FeatureDump {
    computed_at: DateTime<Utc>,
    config: FeatureConfig,
    utterances: Vec<Utterance>,
    failures: Vec<Failure>,
}

#[derive(Debug, Serialize)]
struct Utterance {
    file: PathBuf,
    text: String,
    dialogue: String,
    features: UtteranceFeatures,
}

#[derive(Debug, Serialize)]
struct Failure {
    file: PathBuf,
    /// Line of the utterance, absent when the whole file failed.
    line: Option<usize>,
    error: String,
}

pub fn run(arg: &FeaturesArg) -> anyhow::Result<()> {
    let FeaturesArg {
        annotations,
        config,
        output,
    } = arg;

    let config = util::read_feature_config(config.as_deref())?;
    let files = if annotations.is_dir() {
        annotation::parse_annotation_dir(annotations).with_context(|| {
            format!(
                "Failed to read annotation directory: {}",
                annotations.display()
            )
        })?
    } else {
        vec![(
            annotations.clone(),
            annotation::parse_annotation_file(annotations),
        )]
    };

    let mut dump = FeatureDump {
        computed_at: Utc::now(),
        config,
        utterances: vec![],
        failures: vec![],
    };
    for (file, records) in files {
        match records {
            Ok(records) => featurize(&file, &records, &mut dump),
            Err(e) => dump.failures.push(Failure {
                file,
                line: None,
                error: e.to_string(),
            }),
        }
    }
    log::info!(
        "computed features for {} utterances, {} failures",
        dump.utterances.len(),
        dump.failures.len()
    );

    Output::save_json(&dump, output.as_deref())?;
    Ok(())
}

fn featurize(file: &Path, records: &[AnnotationRecord], dump: &mut FeatureDump) {
    for record in records {
        match UtteranceFeatures::from_record(record, &dump.config) {
            Ok(features) => dump.utterances.push(Utterance {
                file: file.to_path_buf(),
                text: record.text.clone(),
                dialogue: record.dialogue.clone(),
                features,
            }),
            Err(e) => {
                log::warn!("{}:{}: {e}", file.display(), record.line);
                dump.failures.push(Failure {
                    file: file.to_path_buf(),
                    line: Some(record.line),
                    error: e.to_string(),
                });
            }
        }
    }
}
