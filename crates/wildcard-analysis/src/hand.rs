//! Whether a player still has room to change strategy.

use std::collections::BTreeSet;

use wildcard_engine::Card;

use crate::{
    FeatureError,
    window::{RankSet, STRATEGY_WINDOWS},
};

/// Cards a hand can hold before it counts as full.
pub const HAND_LIMIT: usize = 3;

/// A hand is free while it holds fewer than [`HAND_LIMIT`] cards.
#[must_use]
pub fn free_hand(hand: &[Card]) -> bool {
    hand.len() < HAND_LIMIT
}

/// A strategic view of [`free_hand`].
///
/// A full hand is still free when it mixes suits, or when its ranks do not
/// put exactly three of them inside any six-rank strategy window. A single
/// suit hand with three ranks in one such window is committed to that run.
///
/// Wildcard cards have no rank, so a single-suit hand holding one cannot be
/// judged.
///
/// # Example
///
/// ```
/// use wildcard_analysis::hand::free_hand_strategic;
///
/// let hand: Vec<_> = ["3H", "4H", "5H"].iter().map(|c| c.parse().unwrap()).collect();
/// assert!(!free_hand_strategic(&hand).unwrap());
/// ```
pub fn free_hand_strategic(hand: &[Card]) -> Result<bool, FeatureError> {
    if free_hand(hand) {
        return Ok(true);
    }
    let suits = hand.iter().map(|c| c.suit()).collect::<BTreeSet<_>>();
    if suits.len() > 1 {
        return Ok(true);
    }

    let ranks = hand
        .iter()
        .map(|card| {
            card.rank()
                .ok_or(FeatureError::WildcardRank { card: *card })
        })
        .collect::<Result<RankSet, _>>()?;
    let committed = STRATEGY_WINDOWS
        .iter()
        .any(|window| window.intersection(ranks).len() == 3);
    Ok(!committed)
}
