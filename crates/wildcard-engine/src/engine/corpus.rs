use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::TranscriptError;

use super::transcript::Transcript;

/// A directory of transcript files.
///
/// Transcripts are the `*.csv` files directly inside the root and inside its
/// immediate subdirectories, visited in path order.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

/// Outcome of parsing one corpus file.
#[derive(Debug)]
pub struct CorpusEntry {
    pub path: PathBuf,
    pub transcript: Result<Transcript, TranscriptError>,
}

impl Corpus {
    pub fn open<P>(root: P) -> io::Result<Self>
    where
        P: AsRef<Path>,
    {
        let root = root.as_ref().to_path_buf();
        let paths = transcript_paths(&root)?;
        log::info!("found {} transcripts under {}", paths.len(), root.display());
        Ok(Self { root, paths })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Parses every transcript. A file that fails to parse is reported in its
    /// entry and does not stop the others.
    pub fn load_all(&self) -> impl Iterator<Item = CorpusEntry> + '_ {
        self.paths.iter().map(|path| {
            let transcript = Transcript::from_path(path);
            if let Err(e) = &transcript {
                log::warn!("skipping {}: {e}", path.display());
            }
            CorpusEntry {
                path: path.clone(),
                transcript,
            }
        })
    }
}

/// Lists `<root>/*.csv` and `<root>/*/*.csv`, sorted.
pub fn transcript_paths(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = vec![];
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            for inner in fs::read_dir(&path)? {
                let inner = inner?.path();
                if is_csv(&inner) {
                    paths.push(inner);
                }
            }
        } else if is_csv(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_csv(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "csv")
}
