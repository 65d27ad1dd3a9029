//! Card-window features for Cards corpus utterances
//!
//! This crate turns the players' hands at the moment of an utterance into
//! numeric and boolean features describing how close the pair is to
//! completing a straight around the card being talked about.
//!
//! # Overview
//!
//! 1. **Windows** ([`window`]): enumerate the runs of consecutive ranks that
//!    contain the card of interest (COI)
//! 2. **Edit distance** ([`edit_distance`]): score each window by the pickups
//!    and drops needed to complete it, and keep the best one
//! 3. **Hand capacity** ([`hand`]): decide whether a hand is still free or
//!    already committed to a run
//! 4. **Annotations** ([`annotation`]): read annotated utterances with hands,
//!    knowledge, needs and the acting-player label
//! 5. **Utterance features** ([`features`]): combine all of the above into one
//!    feature record per utterance
//!
//! # Example
//!
//! ```
//! use wildcard_analysis::{
//!     annotation::parse_annotations, edit_distance::FeatureConfig,
//!     features::UtteranceFeatures,
//! };
//!
//! let csv = "Player 1,20,CHAT_MESSAGE_PREFIX,need the 5h,3H;4H,,,,EXISTS(5H),,,,,,,P2:31\n";
//! let records = parse_annotations(csv.as_bytes())?;
//! let features = UtteranceFeatures::from_record(&records[0], &FeatureConfig::default())?;
//!
//! assert_eq!(features.edit, 1);
//! assert_eq!(features.optimal_window.to_string(), "{3H,4H,5H}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Window Width
//!
//! Windows are three ranks wide by default, the length of a winning run.
//! [`edit_distance::FeatureConfig::window_width`] widens them; a width of six
//! reproduces the wider search used by earlier feature sets.

use wildcard_engine::{Card, CardParseError};

pub mod annotation;
pub mod edit_distance;
pub mod features;
pub mod hand;
pub mod window;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FeatureError {
    #[display("{source}")]
    Card { source: CardParseError },
    #[display("card of interest {card} has no rank")]
    WildcardTarget { card: Card },
    #[display("window width {width} is outside 1..=13")]
    InvalidWindowWidth { width: usize },
    #[display("cannot rank wildcard {card} in a single-suit hand")]
    WildcardRank { card: Card },
}

impl From<CardParseError> for FeatureError {
    fn from(source: CardParseError) -> Self {
        Self::Card { source }
    }
}
