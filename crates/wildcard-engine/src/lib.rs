//! Replay engine for Cards corpus transcripts.
//!
//! A transcript is a CSV log of a two-player game in which both players walk
//! a walled grid, pick up and drop playing cards, and chat. This crate turns
//! such a log into:
//!
//! - a static [`Board`] and the initial [`CardPlacement`],
//! - an append-only sequence of typed [`Move`]s,
//! - immutable [`GameState`] snapshots produced on demand by
//!   [`Transcript::step`] and [`Transcript::evolve`].
//!
//! # Example
//!
//! ```
//! use wildcard_engine::{PlayerId, Position, Transcript};
//!
//! let csv = "\
//! Server,0,CREATE_ENVIRONMENT,\"----;-  -;----;NEW_SECTION1,1:5H;\"
//! Player 1,0,PLAYER_INITIAL_LOCATION,\"1,2\"
//! Player 2,0,PLAYER_INITIAL_LOCATION,\"1,1\"
//! Player 1,3,PLAYER_MOVE,\"1,1\"
//! Player 1,4,PLAYER_PICKUP_CARD,\"1,1:5H\"
//! Player 1,9,CHAT_MESSAGE_PREFIX,I have the five of hearts
//! ";
//! let transcript = Transcript::from_reader(csv.as_bytes())?;
//! let states = transcript.evolve(0, transcript.num_moves())?;
//!
//! let last = states.last().unwrap();
//! assert_eq!(last.position(PlayerId::One), Some(Position::new(1, 1)));
//! assert_eq!(last.hand(PlayerId::One)[0].to_string(), "5H");
//! assert!(last.layout().cards_at(Position::new(1, 1)).is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Fatal problem with a single transcript.
///
/// `line` is the 1-based record number in the CSV input, or 0 when the
/// problem is not tied to a record (e.g. the file cannot be opened).
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("malformed transcript (line {line}): {kind}")]
pub struct TranscriptError {
    pub line: usize,
    pub kind: TranscriptErrorKind,
}

impl TranscriptError {
    #[must_use]
    pub fn new(line: usize, kind: TranscriptErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, derive_more::Display)]
pub enum TranscriptErrorKind {
    #[display("expected 4 fields, found {_0}")]
    FieldCount(usize),
    #[display("invalid timestamp '{_0}'")]
    InvalidTimestamp(String),
    #[display("invalid coordinates '{_0}', expected '<row>,<col>'")]
    InvalidCoordinates(String),
    #[display("invalid card payload '{_0}', expected '<row>,<col>:<card>'")]
    InvalidCardPayload(String),
    #[display("{_0}")]
    InvalidCard(CardParseError),
    #[display("invalid integer '{value}' for {event_type}")]
    InvalidInteger { event_type: String, value: String },
    #[display("{event_type} sent by non-player agent '{agent}'")]
    UnknownAgent { event_type: String, agent: String },
    #[display("initial location given before the environment was created")]
    BoardNotCreated,
    #[display("location {_0} lies outside the board")]
    OutOfBounds(Position),
    #[display("{_0}")]
    RaggedBoard(RaggedBoardError),
    #[display("no CREATE_ENVIRONMENT event")]
    MissingEnvironment,
    #[display("{_0}")]
    Csv(csv::Error),
}

impl From<CardParseError> for TranscriptErrorKind {
    fn from(err: CardParseError) -> Self {
        Self::InvalidCard(err)
    }
}

impl From<RaggedBoardError> for TranscriptErrorKind {
    fn from(err: RaggedBoardError) -> Self {
        Self::RaggedBoard(err)
    }
}

impl From<csv::Error> for TranscriptErrorKind {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Recoverable mismatch between a card move and the replayed state.
///
/// Stepping never fails with this error: it is logged, counted on the
/// produced [`GameState`], and replay continues.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InconsistentStateError {
    #[display("{player} picked up {card} at {at}, but it is not there")]
    CardNotAtPosition {
        player: PlayerId,
        card: Card,
        at: Position,
    },
    #[display("{player} dropped {card} at {at}, but it is not in their hand")]
    CardNotInHand {
        player: PlayerId,
        card: Card,
        at: Position,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StepError {
    #[display("cannot apply {num_moves} moves from index {start}: only {available} moves recorded")]
    OutOfRange {
        start: usize,
        num_moves: usize,
        available: usize,
    },
    #[display("invalid range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },
}
