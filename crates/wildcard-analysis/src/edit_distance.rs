//! Scoring how far two hands are from completing a run around a card.
//!
//! For a card of interest (COI) the candidate [windows](crate::window) are
//! scored by the number of single-card edits that would turn the players'
//! combined holdings into exactly that window:
//!
//! - every window card neither player holds must be picked up (`missing`),
//! - every held card outside the window must be dropped (`overflow`).
//!
//! The best window is the first one, in enumeration order, with the lowest
//! score. Per-player scores are then computed against that window.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use wildcard_engine::{Card, PlayerId};

use crate::{
    FeatureError,
    window::{CardWindow, candidate_windows},
};

/// Parameters of the window scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Number of consecutive ranks in a window.
    pub window_width: usize,
    /// Hand size a player is expected to end up with.
    pub hand_target: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            window_width: 3,
            hand_target: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditDistance {
    pub optimal_window: CardWindow,
    /// Score of the optimal window for both hands together.
    pub min_edit: usize,
    /// Per-player score against the optimal window. Negative when a hand is
    /// larger than the target size and mostly inside the window.
    pub player_edit: [i32; 2],
    /// Whether every card of a hand lies in the optimal window.
    pub all_in_window: [bool; 2],
}

impl EditDistance {
    #[must_use]
    pub fn player_edit(&self, player: PlayerId) -> i32 {
        self.player_edit[player.index()]
    }

    #[must_use]
    pub fn all_in_window(&self, player: PlayerId) -> bool {
        self.all_in_window[player.index()]
    }
}

/// Parses a hand given as card ids, skipping empty placeholders.
pub fn parse_hand<S>(ids: &[S]) -> Result<Vec<Card>, FeatureError>
where
    S: AsRef<str>,
{
    ids.iter()
        .map(|id| id.as_ref())
        .filter(|id| !id.trim().is_empty())
        .map(|id| id.parse::<Card>().map_err(FeatureError::from))
        .collect()
}

/// Scores the windows around `coi` for two hands of card ids.
///
/// # Example
///
/// ```
/// use wildcard_analysis::edit_distance::{FeatureConfig, compute_edit_distance};
///
/// let hands = [vec!["2H", "3H", "4H"], vec!["6D", "7D"]];
/// let result = compute_edit_distance(&hands, "5H", &FeatureConfig::default()).unwrap();
/// assert_eq!(result.optimal_window.to_string(), "{3H,4H,5H}");
/// assert_eq!(result.min_edit, 4);
/// assert_eq!(result.player_edit, [2, 5]);
/// ```
pub fn compute_edit_distance<S>(
    hands: &[Vec<S>; 2],
    coi: &str,
    config: &FeatureConfig,
) -> Result<EditDistance, FeatureError>
where
    S: AsRef<str>,
{
    let coi: Card = coi.parse()?;
    let hands = [parse_hand(&hands[0])?, parse_hand(&hands[1])?];
    score_hands([hands[0].as_slice(), hands[1].as_slice()], coi, config)
}

/// Same as [`compute_edit_distance`] for already parsed hands.
///
/// Repeated cards in a hand count once.
pub fn score_hands(
    hands: [&[Card]; 2],
    coi: Card,
    config: &FeatureConfig,
) -> Result<EditDistance, FeatureError> {
    let windows = candidate_windows(coi, config.window_width)?;
    let hands = hands.map(|hand| hand.iter().copied().collect::<BTreeSet<_>>());
    let held = hands[0].union(&hands[1]).copied().collect::<BTreeSet<_>>();

    let mut best: Option<(usize, &CardWindow)> = None;
    for window in &windows {
        let edit = window_edit(&held, window);
        log::trace!("window {window}: edit {edit}");
        if best.is_none_or(|(min, _)| edit < min) {
            best = Some((edit, window));
        }
    }
    let Some((min_edit, window)) = best else {
        return Err(FeatureError::InvalidWindowWidth {
            width: config.window_width,
        });
    };

    let player_edit = hands.each_ref().map(|hand| hand_edit(hand, window, config));
    let all_in_window = hands
        .each_ref()
        .map(|hand| hand.iter().all(|card| window.contains(*card)));

    Ok(EditDistance {
        optimal_window: window.clone(),
        min_edit,
        player_edit,
        all_in_window,
    })
}

/// Edits to turn the cards held by either player into `window`.
fn window_edit(held: &BTreeSet<Card>, window: &CardWindow) -> usize {
    let missing = window.cards().filter(|card| !held.contains(card)).count();
    let overflow = held.iter().filter(|card| !window.contains(**card)).count();
    missing + overflow
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn hand_edit(hand: &BTreeSet<Card>, window: &CardWindow, config: &FeatureConfig) -> i32 {
    let intersection = hand.iter().filter(|card| window.contains(**card)).count() as i32;
    let diff = hand.len() as i32 - intersection;
    2 * diff + (config.hand_target as i32 - diff - intersection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compute(p1: &[&str], p2: &[&str], coi: &str) -> Result<EditDistance, FeatureError> {
        compute_edit_distance(
            &[p1.to_vec(), p2.to_vec()],
            coi,
            &FeatureConfig::default(),
        )
    }

    #[test]
    fn test_regression_values() {
        let result = compute(&["2H", "3H", "4H"], &["6D", "7D"], "5H").unwrap();
        assert_eq!(result.optimal_window.to_string(), "{3H,4H,5H}");
        assert_eq!(result.min_edit, 4);
        assert_eq!(result.player_edit, [2, 5]);
        assert_eq!(result.all_in_window, [false, false]);
    }

    #[test]
    fn test_complete_run_needs_no_edits() {
        let result = compute(&["3H", "4H", "5H"], &[], "5H").unwrap();
        assert_eq!(result.optimal_window.to_string(), "{3H,4H,5H}");
        assert_eq!(result.min_edit, 0);
        assert_eq!(result.player_edit, [0, 3]);
        assert_eq!(result.all_in_window, [true, true]);
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        // {4,5,6} and {5,6,7} both need 2 edits; the lower window comes first
        let result = compute(&["6H"], &[], "5H").unwrap();
        assert_eq!(result.min_edit, 2);
        assert_eq!(result.optimal_window.to_string(), "{4H,5H,6H}");

        // every window scores 3 for empty hands
        let result = compute(&[], &[], "5H").unwrap();
        assert_eq!(result.min_edit, 3);
        assert_eq!(result.optimal_window.to_string(), "{3H,4H,5H}");
    }

    #[test]
    fn test_hands_are_sets_and_placeholders_are_skipped() {
        let result = compute(&["3H", "3h", "", " "], &["4H", "4H"], "5H").unwrap();
        assert_eq!(result.min_edit, 1);
        assert_eq!(result.player_edit, [2, 2]);
    }

    #[test]
    fn test_card_held_by_both_players_counts_once() {
        let result = compute(&["9H"], &["9H"], "5H").unwrap();
        assert_eq!(result.optimal_window.to_string(), "{3H,4H,5H}");
        assert_eq!(result.min_edit, 4);
        assert_eq!(result.player_edit, [4, 4]);

        let result = compute(&["3H", "4H"], &["4H", "5H"], "5H").unwrap();
        assert_eq!(result.min_edit, 0);
        assert_eq!(result.all_in_window, [true, true]);
    }

    #[test]
    fn test_wildcards_count_as_overflow() {
        let result = compute(&["3H", "XH"], &["4H"], "5H").unwrap();
        assert_eq!(result.optimal_window.to_string(), "{3H,4H,5H}");
        assert_eq!(result.min_edit, 2);
        assert_eq!(result.all_in_window, [false, true]);
    }

    #[test]
    fn test_oversized_hand_gives_negative_player_edit() {
        let config = FeatureConfig {
            window_width: 6,
            hand_target: 3,
        };
        let hands = [vec!["2S", "3S", "4S", "5S", "6S"], vec![]];
        let result = compute_edit_distance(&hands, "4S", &config).unwrap();
        assert_eq!(result.optimal_window.to_string(), "{AS,2S,3S,4S,5S,6S}");
        assert_eq!(result.min_edit, 1);
        assert_eq!(result.player_edit, [-2, 3]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            compute(&["ZZ"], &[], "5H"),
            Err(FeatureError::Card { .. })
        ));
        assert!(matches!(
            compute(&[], &[], "5Q"),
            Err(FeatureError::Card { .. })
        ));
        assert!(matches!(
            compute(&[], &[], "XH"),
            Err(FeatureError::WildcardTarget { .. })
        ));
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: FeatureConfig = serde_json::from_str(r#"{"window_width": 6}"#).unwrap();
        assert_eq!(config.window_width, 6);
        assert_eq!(config.hand_target, 3);
    }
}
