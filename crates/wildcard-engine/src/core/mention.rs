//! Detection of card references in chat messages.
//!
//! Utterances are lower-cased and split with a small card-aware tokenizer that
//! keeps emoticons, words and short rank/suit combinations such as `5h` or
//! `h5` intact. A message mentions a card when any token belongs to the fixed
//! vocabulary returned by [`card_expressions`].
//!
//! This is a presence test only: it says nothing about *which* card is meant.

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

// Alternatives are tried left to right, so emoticons win over punctuation
// and dashed words win over plain word runs.
const TOKEN_PATTERN: &str = r"(?x)
    (?:
        [<>]? [:;=8] [-o*']? [)\](\[dDpP/:}{@|\\]
        |
        [)\](\[dDpP/:}{@|\\] [-o*']? [:;=8] [<>]?
    )
    |
    (?:[a-zA-Z][a-zA-Z'\-_]+[a-zA-Z])
    |
    (?:\w+)
    |
    (?:[+\-]?\d+[,/.:\-]\d+[+\-]?)
    |
    (?:\.(?:\s*\.)+)
    |
    (?:\S)
";

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"));

const RANK_WORDS: [&str; 13] = [
    "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "jack", "queen",
    "king", "ace",
];
const RANK_SHORTHANDS: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "j", "q", "k", "a",
];
const SUIT_SHORTHANDS: [&str; 4] = ["h", "s", "d", "c"];
const SUIT_WORDS: [&str; 4] = ["heart", "diamond", "spade", "club"];

static CARD_EXPRESSIONS: LazyLock<HashSet<String>> = LazyLock::new(|| {
    let mut expressions: HashSet<String> = RANK_WORDS.iter().map(|w| (*w).to_owned()).collect();
    for rank in RANK_SHORTHANDS {
        for suit in SUIT_SHORTHANDS {
            expressions.insert(format!("{rank}{suit}"));
            expressions.insert(format!("{suit}{rank}"));
        }
    }
    for suit in SUIT_WORDS {
        expressions.insert(suit.to_owned());
        expressions.insert(format!("{suit}s"));
    }
    expressions
});

/// Splits `text` into tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> + '_ {
    TOKEN_RE.find_iter(text).map(|m| m.as_str())
}

/// The vocabulary of card-referring expressions, all lower case.
#[must_use]
pub fn card_expressions() -> &'static HashSet<String> {
    &CARD_EXPRESSIONS
}

/// Checks whether an utterance refers to a card at all.
///
/// # Example
///
/// ```
/// use wildcard_engine::mention::mentions_card;
///
/// assert!(mentions_card("do you have the queen of hearts"));
/// assert!(mentions_card("got 5H here"));
/// assert!(!mentions_card("hello there"));
/// ```
#[must_use]
pub fn mentions_card(utterance: &str) -> bool {
    let lowered = utterance.to_lowercase();
    let expressions = card_expressions();
    tokenize(&lowered).any(|token| expressions.contains(token))
}
