//! Transcript parsing and replay.
//!
//! - [`Transcript`] - Board, initial cards, header config and move log
//! - [`Move`] / [`RecordedMove`] - Typed game events
//! - [`GameState`] - Immutable snapshot after a number of moves
//! - [`ReplaySession`] - Forward/backward cursor over a transcript
//! - [`Corpus`] - Batch loading of a transcript directory
//!
//! # Replay
//!
//! A transcript is parsed once. States are then derived from it on demand:
//! [`Transcript::step`] applies a number of moves to a prior state, and
//! [`Transcript::evolve`] produces every state in an index range. Neither
//! changes the transcript or any state passed in.

pub use self::{corpus::*, game_state::*, moves::*, session::*, transcript::*};

mod corpus;
mod game_state;
mod moves;
mod replay;
mod session;
mod transcript;
