//! Annotated utterances.
//!
//! Annotation files are transcripts extended with twelve columns of common
//! ground annotation after the four event columns:
//!
//! ```text
//! agent, time, event, text,
//! P1_HAND, P2_HAND, P1_LOC, P2_LOC, P1_KNOW, P2_KNOW,
//! P1_NEED, P2_NEED, P1_ABLE, P2_ABLE, CARD_LOC, POINTER
//! ```
//!
//! A row is an annotated utterance when its `POINTER` column is filled in
//! (and is not the header). Every chat row and every annotated row adds its
//! text to a running dialogue, and each annotated utterance keeps the
//! dialogue up to and including itself.
//!
//! The pointer names the player who acts on the utterance (e.g. `P2:341`),
//! or `NONE`/`NULL` when nobody does. It is binned into a [`Label`]: the
//! speaker (or no one) acting, versus the addressee acting.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;
use serde::Serialize;
use wildcard_engine::{PlayerId, event_type};

/// Number of columns in an annotation row.
pub const NUM_COLUMNS: usize = 16;

const POINTER_COLUMN: usize = NUM_COLUMNS - 1;

static CARD_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"EXISTS\((.*),.*\)",
        r"EXISTS\((.*)\)",
        r"NEED\((.*)\)",
        r"NEED\((.*),.*\)",
    ]
    .map(|pattern| Regex::new(pattern).expect("card pattern is a valid regex"))
});

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnnotationError {
    #[display("line {line}: expected at most 16 columns, found {actual}")]
    ColumnCount { line: usize, actual: usize },
    #[display("line {line}: speaker has no KNOW entry to take the card of interest from")]
    MissingKnowledge { line: usize },
    #[display("line {line}: no card in annotation entry '{entry}'")]
    NoCard { line: usize, entry: String },
    #[display("{source}")]
    Csv { source: csv::Error },
}

impl From<csv::Error> for AnnotationError {
    fn from(source: csv::Error) -> Self {
        Self::Csv { source }
    }
}

/// Who acts on an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Label {
    /// The speaker acts, or nobody does.
    Speaker,
    Addressee,
}

impl Label {
    /// Bins a pointer annotation for an utterance by `speaker`.
    #[must_use]
    pub fn from_pointer(speaker: PlayerId, pointer: &str) -> Self {
        if pointer.contains(&player_tag(speaker)) || pointer == "NONE" || pointer == "NULL" {
            Label::Speaker
        } else {
            Label::Addressee
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Label::Speaker => 0,
            Label::Addressee => 1,
        }
    }
}

/// Serialized as `0` (speaker) or `1` (addressee).
impl Serialize for Label {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

/// One annotated utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationRecord {
    /// 1-based CSV record number.
    pub line: usize,
    pub speaker: PlayerId,
    pub time: String,
    pub event_type: String,
    pub text: String,
    /// Card ids per player as written, placeholders included.
    pub hands: [Vec<String>; 2],
    pub locations: [String; 2],
    pub know: [Vec<String>; 2],
    pub need: [Vec<String>; 2],
    pub able: [String; 2],
    pub card_locations: String,
    pub pointer: String,
    pub label: Label,
    /// Card of interest, taken from the speaker's first KNOW entry.
    pub coi: String,
    /// Dialogue so far, this utterance included.
    pub dialogue: String,
}

impl AnnotationRecord {
    #[must_use]
    pub fn addressee(&self) -> PlayerId {
        self.speaker.other()
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[String] {
        &self.hands[player.index()]
    }

    #[must_use]
    pub fn need(&self, player: PlayerId) -> &[String] {
        &self.need[player.index()]
    }

    /// Parses an annotated row. `dialogue` must already include the row's text.
    pub fn from_fields(
        line: usize,
        fields: &[&str],
        dialogue: String,
    ) -> Result<Self, AnnotationError> {
        if fields.len() > NUM_COLUMNS {
            return Err(AnnotationError::ColumnCount {
                line,
                actual: fields.len(),
            });
        }
        let column = |i: usize| fields.get(i).copied().unwrap_or_default();

        let speaker = speaker_of(column(0));
        let know = [split_entries(column(8)), split_entries(column(9))];
        let coi_entry = know[speaker.index()]
            .first()
            .ok_or(AnnotationError::MissingKnowledge { line })?;
        let coi = extract_card(coi_entry)
            .ok_or_else(|| AnnotationError::NoCard {
                line,
                entry: coi_entry.clone(),
            })?
            .to_owned();
        let pointer = column(POINTER_COLUMN);

        Ok(Self {
            line,
            speaker,
            time: column(1).to_owned(),
            event_type: column(2).to_owned(),
            text: column(3).to_owned(),
            hands: [split_hand(column(4)), split_hand(column(5))],
            locations: [column(6).to_owned(), column(7).to_owned()],
            know,
            need: [split_entries(column(10)), split_entries(column(11))],
            able: [column(12).to_owned(), column(13).to_owned()],
            card_locations: column(14).to_owned(),
            pointer: pointer.to_owned(),
            label: Label::from_pointer(speaker, pointer),
            coi,
            dialogue,
        })
    }
}

/// Pulls the card id out of an entry such as `EXISTS(5H,P1)` or `NEED(XD)`.
///
/// Patterns are greedy, so in `EXISTS(5H,1,2)` the id is `5H,1`.
#[must_use]
pub fn extract_card(entry: &str) -> Option<&str> {
    CARD_PATTERNS
        .iter()
        .find_map(|re| re.captures(entry))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Reads annotated utterances from CSV data.
pub fn parse_annotations<R>(reader: R) -> Result<Vec<AnnotationRecord>, AnnotationError>
where
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = vec![];
    let mut dialogue = String::new();
    for (i, row) in reader.records().enumerate() {
        let line = i + 1;
        let row = row?;
        let fields = row.iter().collect::<Vec<_>>();
        let text = fields.get(3).copied().unwrap_or_default();

        if is_annotated(&fields) {
            dialogue.push_str(text);
            dialogue.push(' ');
            records.push(AnnotationRecord::from_fields(line, &fields, dialogue.clone())?);
        } else if fields.get(2) == Some(&event_type::CHAT_MESSAGE_PREFIX) {
            dialogue.push_str(text);
            dialogue.push(' ');
        }
    }
    log::debug!("{} annotated utterances", records.len());
    Ok(records)
}

pub fn parse_annotation_file<P>(path: P) -> Result<Vec<AnnotationRecord>, AnnotationError>
where
    P: AsRef<Path>,
{
    let file = fs::File::open(path.as_ref()).map_err(csv::Error::from)?;
    parse_annotations(io::BufReader::new(file))
}

/// Parses every `*.csv` file in `dir`, in path order, one result per file.
pub fn parse_annotation_dir(
    dir: &Path,
) -> io::Result<Vec<(PathBuf, Result<Vec<AnnotationRecord>, AnnotationError>)>> {
    let mut paths = vec![];
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| {
            let records = parse_annotation_file(&path);
            match &records {
                Ok(records) => log::info!("{}: {} utterances", path.display(), records.len()),
                Err(e) => log::warn!("skipping {}: {e}", path.display()),
            }
            (path, records)
        })
        .collect())
}

fn is_annotated(fields: &[&str]) -> bool {
    fields.len() > POINTER_COLUMN
        && fields
            .last()
            .is_some_and(|pointer| !pointer.is_empty() && !pointer.eq_ignore_ascii_case("pointer"))
}

fn speaker_of(agent: &str) -> PlayerId {
    if agent.contains('1') {
        PlayerId::One
    } else {
        PlayerId::Two
    }
}

fn player_tag(player: PlayerId) -> String {
    format!("P{}", player.number())
}

fn split_hand(value: &str) -> Vec<String> {
    value.split(';').map(str::to_owned).collect()
}

fn split_entries(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}
