//! Rank windows: runs of consecutive ranks of one suit.
//!
//! Ranks live on a 13-rank cycle (`Q K A 2` is a valid run). A window of
//! width `w` around a target card is one of the `w` runs of length `w` in the
//! target's suit that contain the target rank.
//!
//! Candidate windows are always listed in the same order: the window that
//! *ends* at the target first, then sliding one rank up at a time, and the
//! window that *starts* at the target last. Scoring picks the first window
//! with the minimal score, so this order is part of the contract.

use std::fmt;

use arrayvec::ArrayVec;
use serde::Serialize;
use wildcard_engine::{Card, Rank, Suit};

use crate::FeatureError;

const NUM_RANKS: usize = Rank::COUNT as usize;

/// A set of ranks stored as a bitmask (bit `r` for rank `r`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RankSet(u16);

impl RankSet {
    pub const EMPTY: Self = Self(0);

    /// The `len` consecutive ranks starting at `start`, wrapping past the King.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn run(start: Rank, len: usize) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < len {
            bits |= 1 << start.offset(i as i32).value();
            i += 1;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn with(self, rank: Rank) -> Self {
        Self(self.0 | 1 << rank.value())
    }

    #[must_use]
    pub const fn contains(self, rank: Rank) -> bool {
        self.0 & (1 << rank.value()) != 0
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Rank> {
        Rank::all().filter(move |r| self.contains(*r))
    }
}

impl FromIterator<Rank> for RankSet {
    fn from_iter<T: IntoIterator<Item = Rank>>(iter: T) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Width of the windows used to judge whether a hand is committed to a run.
pub const STRATEGY_WINDOW_WIDTH: usize = 6;

/// The 13 six-rank runs, one starting at each rank from the Ace up.
pub const STRATEGY_WINDOWS: [RankSet; NUM_RANKS] = strategy_windows();

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn strategy_windows() -> [RankSet; NUM_RANKS] {
    let mut windows = [RankSet::EMPTY; NUM_RANKS];
    let mut i = 0;
    while i < windows.len() {
        windows[i] = RankSet::run(Rank::ACE.offset(i as i32), STRATEGY_WINDOW_WIDTH);
        i += 1;
    }
    windows
}

/// A run of consecutive ranks in one suit.
///
/// Serialized as the list of its cards, e.g. `["3H", "4H", "5H"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardWindow {
    suit: Suit,
    ranks: ArrayVec<Rank, NUM_RANKS>,
}

impl CardWindow {
    /// Builds the window of `width` ranks starting at `start`.
    pub fn new(suit: Suit, start: Rank, width: usize) -> Result<Self, FeatureError> {
        check_width(width)?;
        let ranks = (0..width).map(|i| start.offset(offset(i))).collect();
        Ok(Self { suit, ranks })
    }

    #[must_use]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Ranks in run order, lowest first (an Ace after a King counts as higher).
    #[must_use]
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    #[must_use]
    pub fn rank_set(&self) -> RankSet {
        self.ranks.iter().copied().collect()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.ranks.len()
    }

    /// Checks whether `card` is one of the window's cards. Wildcards never are.
    #[must_use]
    pub fn contains(&self, card: Card) -> bool {
        card.suit() == self.suit && card.rank().is_some_and(|r| self.ranks.contains(&r))
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.ranks.iter().map(|r| Card::new(*r, self.suit))
    }
}

impl fmt::Display for CardWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, card) in self.cards().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{card}")?;
        }
        write!(f, "}}")
    }
}

impl Serialize for CardWindow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.cards())
    }
}

/// Lists the `width` windows containing `target`, in enumeration order.
///
/// # Example
///
/// ```
/// use wildcard_analysis::window::candidate_windows;
///
/// let windows = candidate_windows("2S".parse().unwrap(), 3).unwrap();
/// let names: Vec<_> = windows.iter().map(ToString::to_string).collect();
/// assert_eq!(names, ["{KS,AS,2S}", "{AS,2S,3S}", "{2S,3S,4S}"]);
/// ```
pub fn candidate_windows(
    target: Card,
    width: usize,
) -> Result<ArrayVec<CardWindow, NUM_RANKS>, FeatureError> {
    check_width(width)?;
    let rank = target
        .rank()
        .ok_or(FeatureError::WildcardTarget { card: target })?;
    let first = rank.offset(-offset(width - 1));
    (0..width)
        .map(|k| CardWindow::new(target.suit(), first.offset(offset(k)), width))
        .collect()
}

fn check_width(width: usize) -> Result<(), FeatureError> {
    if (1..=NUM_RANKS).contains(&width) {
        Ok(())
    } else {
        Err(FeatureError::InvalidWindowWidth { width })
    }
}

// callers keep `i` below 13
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn offset(i: usize) -> i32 {
    i as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn rank(v: u8) -> Rank {
        Rank::new(v).unwrap()
    }

    #[test]
    fn test_candidate_windows_order() {
        let windows = candidate_windows(card("5H"), 3).unwrap();
        let ranks: Vec<Vec<u8>> = windows
            .iter()
            .map(|w| w.ranks().iter().map(|r| r.value()).collect())
            .collect();
        assert_eq!(ranks, [vec![3, 4, 5], vec![4, 5, 6], vec![5, 6, 7]]);
        assert!(windows.iter().all(|w| w.suit() == Suit::Hearts));
        assert!(windows.iter().all(|w| w.contains(card("5H"))));
    }

    #[test]
    fn test_candidate_windows_wrap_around() {
        let windows = candidate_windows(card("KD"), 3).unwrap();
        assert_eq!(windows[2].to_string(), "{KD,AD,2D}");
        assert!(windows[2].contains(card("AD")));
        assert!(!windows[2].contains(card("AH")));
    }

    #[test]
    fn test_six_wide_windows() {
        let windows = candidate_windows(card("5C"), 6).unwrap();
        assert_eq!(windows.len(), 6);
        assert_eq!(windows[0].to_string(), "{KC,AC,2C,3C,4C,5C}");
        assert_eq!(windows[5].to_string(), "{5C,6C,7C,8C,9C,10C}");
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            candidate_windows(card("XH"), 3).unwrap_err(),
            FeatureError::WildcardTarget { card: card("XH") }
        );
        assert_eq!(
            candidate_windows(card("2H"), 0).unwrap_err(),
            FeatureError::InvalidWindowWidth { width: 0 }
        );
        assert_eq!(
            candidate_windows(card("2H"), 14).unwrap_err(),
            FeatureError::InvalidWindowWidth { width: 14 }
        );
        assert_eq!(candidate_windows(card("2H"), 13).unwrap().len(), 13);
    }

    #[test]
    fn test_wildcard_is_never_in_window() {
        let window = CardWindow::new(Suit::Spades, rank(2), 3).unwrap();
        assert!(!window.contains(card("XS")));
        assert!(window.contains(card("4S")));
        assert!(!window.contains(card("5S")));
    }

    #[test]
    fn test_rank_set() {
        let set: RankSet = [rank(3), rank(4), rank(3)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(rank(4)));
        assert!(!set.contains(rank(5)));
        assert_eq!(set.iter().map(Rank::value).collect::<Vec<_>>(), [3, 4]);
        assert_eq!(RankSet::run(Rank::KING, 2), RankSet::EMPTY.with(Rank::KING).with(Rank::ACE));
    }

    #[test]
    fn test_strategy_windows() {
        assert_eq!(STRATEGY_WINDOWS.len(), 13);
        assert!(STRATEGY_WINDOWS.iter().all(|w| w.len() == 6));
        assert_eq!(STRATEGY_WINDOWS[0], RankSet::run(Rank::ACE, 6));
        // the last window wraps: K A 2 3 4 5
        assert!(STRATEGY_WINDOWS[12].contains(Rank::ACE));
        assert!(STRATEGY_WINDOWS[12].contains(rank(5)));
        assert!(!STRATEGY_WINDOWS[12].contains(rank(6)));
    }
}
