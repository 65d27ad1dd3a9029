use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Error returned when a card identifier cannot be split into rank and suit.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown card '{id}'")]
pub struct CardParseError {
    pub id: String,
}

/// One of the four card suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Hearts,
    Diamonds,
    Spades,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Spades, Suit::Clubs];

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Spades => 'S',
            Suit::Clubs => 'C',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'H' => Some(Suit::Hearts),
            'D' => Some(Suit::Diamonds),
            'S' => Some(Suit::Spades),
            'C' => Some(Suit::Clubs),
            _ => None,
        }
    }
}

/// A card rank on the 13-rank cycle, 1 (Ace) through 13 (King).
///
/// Ranks wrap around: stepping one past the King lands on the Ace, which is
/// what lets a straight run through `Q K A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(u8);

impl Rank {
    pub const COUNT: u8 = 13;
    pub const ACE: Self = Self(1);
    pub const KING: Self = Self(13);

    const SYMBOLS: [&'static str; 13] = [
        "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
    ];

    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= Self::COUNT {
            Some(Self(value))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the rank `delta` steps away on the cycle.
    #[must_use]
    #[allow(
        clippy::cast_lossless,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub const fn offset(self, delta: i32) -> Self {
        let zero_based = (self.0 as i32 - 1 + delta).rem_euclid(Self::COUNT as i32);
        Self(zero_based as u8 + 1)
    }

    pub fn all() -> impl Iterator<Item = Rank> {
        (1..=Self::COUNT).map(Self)
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        Self::SYMBOLS[usize::from(self.0 - 1)]
    }

    /// Parses a rank symbol. `1` is accepted as an alias of the Ace.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        if symbol == "1" {
            return Some(Self::ACE);
        }
        Self::SYMBOLS
            .iter()
            .position(|s| s.eq_ignore_ascii_case(symbol))
            .and_then(|i| u8::try_from(i + 1).ok())
            .map(Self)
    }
}

/// A playing card identified as `<rank><suit>`, e.g. `10H` or `QS`.
///
/// The rank may be the wildcard `X`, which stands for any rank of its suit.
/// Cards order by suit first so a sorted hand groups suits together.
///
/// # Example
///
/// ```
/// use wildcard_engine::{Card, Rank, Suit};
///
/// let card: Card = "10h".parse().unwrap();
/// assert_eq!(card, Card::new(Rank::new(10).unwrap(), Suit::Hearts));
/// assert_eq!(card.to_string(), "10H");
///
/// let any_heart: Card = "XH".parse().unwrap();
/// assert!(any_heart.matches(card));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    suit: Suit,
    rank: Option<Rank>,
}

impl Card {
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            suit,
            rank: Some(rank),
        }
    }

    #[must_use]
    pub const fn wildcard(suit: Suit) -> Self {
        Self { suit, rank: None }
    }

    #[must_use]
    pub const fn rank(self) -> Option<Rank> {
        self.rank
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        self.suit
    }

    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        self.rank.is_none()
    }

    /// Checks whether two cards may denote the same card, treating a wildcard
    /// rank as matching every rank of its suit.
    #[must_use]
    pub fn matches(self, other: Card) -> bool {
        self.suit == other.suit
            && match (self.rank, other.rank) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            Some(rank) => write!(f, "{}{}", rank.symbol(), self.suit.as_char()),
            None => write!(f, "X{}", self.suit.as_char()),
        }
    }
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CardParseError { id: s.to_owned() };
        let id = s.trim();
        let mut chars = id.chars();
        let suit = chars.next_back().and_then(Suit::from_char).ok_or_else(err)?;
        let rank_symbol = chars.as_str();
        if rank_symbol.eq_ignore_ascii_case("X") {
            return Ok(Self::wildcard(suit));
        }
        let rank = Rank::from_symbol(rank_symbol).ok_or_else(err)?;
        Ok(Self::new(rank, suit))
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_every_rank_and_suit() {
        for suit in Suit::ALL {
            for rank in Rank::all() {
                let id = format!("{}{}", rank.symbol(), suit.as_char());
                let parsed = card(&id);
                assert_eq!(parsed, Card::new(rank, suit), "failed to parse {id}");
                assert_eq!(parsed.to_string(), id);
            }
        }
    }

    #[test]
    fn test_parse_is_lenient_on_case_and_whitespace() {
        assert_eq!(card(" qs "), card("QS"));
        assert_eq!(card("1H"), card("AH"));
        assert_eq!(card("10d").to_string(), "10D");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for id in ["", "H", "11H", "5Z", "ZH", "10", "JOKER"] {
            assert_eq!(
                id.parse::<Card>(),
                Err(CardParseError { id: id.to_owned() }),
                "{id:?} should not parse",
            );
        }
    }

    #[test]
    fn test_wildcard_matches_same_suit_only() {
        let wild = card("XH");
        assert!(wild.is_wildcard());
        assert_eq!(wild.rank(), None);
        assert!(wild.matches(card("2H")));
        assert!(card("KH").matches(wild));
        assert!(!wild.matches(card("2S")));
        assert!(!card("2H").matches(card("3H")));
        assert_eq!(wild.to_string(), "XH");
    }

    #[test]
    fn test_rank_offset_wraps_around() {
        assert_eq!(Rank::KING.offset(1), Rank::ACE);
        assert_eq!(Rank::ACE.offset(-1), Rank::KING);
        assert_eq!(Rank::ACE.offset(-5), Rank::new(9).unwrap());
        assert_eq!(Rank::new(5).unwrap().offset(26), Rank::new(5).unwrap());
    }

    #[test]
    fn test_serde_uses_card_id() {
        let json = serde_json::to_string(&card("10H")).unwrap();
        assert_eq!(json, "\"10H\"");
        let back: Card = serde_json::from_str("\"xc\"").unwrap();
        assert_eq!(back, Card::wildcard(Suit::Clubs));
        assert!(serde_json::from_str::<Card>("\"1Z\"").is_err());
    }
}
