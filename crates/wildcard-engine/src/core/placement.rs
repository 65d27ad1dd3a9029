use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;

use super::{board::Position, card::Card};

/// The initial distribution of cards on the board.
///
/// Keeps both directions of the mapping: the ordered stack of cards on each
/// cell, and the cell holding each card. Card identifiers are expected to be
/// unique; a repeated identifier overwrites the reverse entry and is counted
/// as a data-quality problem rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPlacement {
    by_position: BTreeMap<Position, Vec<Card>>,
    by_card: BTreeMap<Card, Position>,
    duplicate_ids: usize,
}

impl CardPlacement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: Position, card: Card) {
        self.by_position.entry(pos).or_default().push(card);
        if let Some(previous) = self.by_card.insert(card, pos) {
            log::warn!("card {card} placed twice (at {previous} and {pos})");
            self.duplicate_ids += 1;
        }
    }

    #[must_use]
    pub fn cards_at(&self, pos: Position) -> &[Card] {
        self.by_position
            .get(&pos)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn position_of(&self, card: Card) -> Option<Position> {
        self.by_card.get(&card).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &[Card])> + '_ {
        self.by_position
            .iter()
            .map(|(pos, cards)| (*pos, cards.as_slice()))
    }

    #[must_use]
    pub fn num_cards(&self) -> usize {
        self.by_position.values().map(Vec::len).sum()
    }

    /// Number of card identifiers that appeared more than once.
    #[must_use]
    pub fn duplicate_ids(&self) -> usize {
        self.duplicate_ids
    }

    /// Returns the copy-on-write layout replay states start from.
    #[must_use]
    pub fn layout(&self) -> CardLayout {
        let cells = self
            .by_position
            .iter()
            .filter(|(_, cards)| !cards.is_empty())
            .map(|(pos, cards)| (*pos, Arc::new(cards.clone())))
            .collect();
        CardLayout {
            cells: Arc::new(cells),
        }
    }
}

/// Position → stacked cards, shared between game states.
///
/// Cloning a layout is a reference-count bump. Mutation goes through
/// [`Arc::make_mut`] twice: once for the cell map (cloning only the `Arc`
/// handles of each cell) and once for the touched cell, so a state derived by
/// one move shares every untouched cell with its predecessor and never
/// changes it. Empty cells are removed so equal layouts compare equal.
///
/// Serialized as a list of `[[row, col], [cards...]]` entries in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardLayout {
    cells: Arc<BTreeMap<Position, Arc<Vec<Card>>>>,
}

impl CardLayout {
    #[must_use]
    pub fn cards_at(&self, pos: Position) -> &[Card] {
        self.cells
            .get(&pos)
            .map(|cards| cards.as_slice())
            .unwrap_or_default()
    }

    /// Finds the first cell (row-major) holding `card`.
    #[must_use]
    pub fn position_of(&self, card: Card) -> Option<Position> {
        self.iter()
            .find(|(_, cards)| cards.contains(&card))
            .map(|(pos, _)| pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &[Card])> + '_ {
        self.cells
            .iter()
            .map(|(pos, cards)| (*pos, cards.as_slice()))
    }

    #[must_use]
    pub fn num_cards(&self) -> usize {
        self.cells.values().map(|cards| cards.len()).sum()
    }

    /// Checks whether both layouts hold the very same allocation for `pos`.
    #[must_use]
    pub fn shares_cell(&self, other: &CardLayout, pos: Position) -> bool {
        match (self.cells.get(&pos), other.cells.get(&pos)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn push(&mut self, pos: Position, card: Card) {
        let cells = Arc::make_mut(&mut self.cells);
        Arc::make_mut(cells.entry(pos).or_default()).push(card);
    }

    /// Removes the first occurrence of `card` at `pos`, reporting whether it was there.
    pub(crate) fn remove_one(&mut self, pos: Position, card: Card) -> bool {
        let Some(index) = self.cards_at(pos).iter().position(|c| *c == card) else {
            return false;
        };
        let cells = Arc::make_mut(&mut self.cells);
        let Some(stack) = cells.get_mut(&pos) else {
            return false;
        };
        let stack = Arc::make_mut(stack);
        stack.remove(index);
        if stack.is_empty() {
            cells.remove(&pos);
        }
        true
    }
}

impl Serialize for CardLayout {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn sample_placement() -> CardPlacement {
        let mut placement = CardPlacement::new();
        placement.insert(Position::new(1, 1), card("5H"));
        placement.insert(Position::new(1, 1), card("KS"));
        placement.insert(Position::new(2, 3), card("AD"));
        placement
    }

    #[test]
    fn test_placement_keeps_both_directions() {
        let placement = sample_placement();
        assert_eq!(
            placement.cards_at(Position::new(1, 1)),
            &[card("5H"), card("KS")]
        );
        assert_eq!(placement.position_of(card("AD")), Some(Position::new(2, 3)));
        assert_eq!(placement.position_of(card("2C")), None);
        assert_eq!(placement.num_cards(), 3);
        assert_eq!(placement.duplicate_ids(), 0);
    }

    #[test]
    fn test_duplicate_id_is_counted_and_last_write_wins() {
        let mut placement = sample_placement();
        placement.insert(Position::new(4, 4), card("5H"));
        assert_eq!(placement.duplicate_ids(), 1);
        assert_eq!(placement.position_of(card("5H")), Some(Position::new(4, 4)));
        assert_eq!(placement.num_cards(), 4);
    }

    #[test]
    fn test_layout_copy_on_write() {
        let original = sample_placement().layout();
        let mut changed = original.clone();
        assert!(changed.remove_one(Position::new(1, 1), card("5H")));

        assert_eq!(
            original.cards_at(Position::new(1, 1)),
            &[card("5H"), card("KS")]
        );
        assert_eq!(changed.cards_at(Position::new(1, 1)), &[card("KS")]);
        assert!(changed.shares_cell(&original, Position::new(2, 3)));
        assert!(!changed.shares_cell(&original, Position::new(1, 1)));
    }

    #[test]
    fn test_layout_remove_missing_card_leaves_layout_untouched() {
        let original = sample_placement().layout();
        let mut changed = original.clone();
        assert!(!changed.remove_one(Position::new(1, 1), card("AD")));
        assert!(!changed.remove_one(Position::new(9, 9), card("AD")));
        assert_eq!(changed, original);
        assert!(changed.shares_cell(&original, Position::new(1, 1)));
    }

    #[test]
    fn test_layout_drops_emptied_cells() {
        let mut layout = sample_placement().layout();
        assert!(layout.remove_one(Position::new(2, 3), card("AD")));
        assert_eq!(layout.cards_at(Position::new(2, 3)), &[] as &[Card]);
        assert_eq!(layout.position_of(card("AD")), None);
        layout.push(Position::new(2, 3), card("AD"));
        assert_eq!(layout, sample_placement().layout());
    }

    #[test]
    fn test_layout_serializes_as_entries() {
        let layout = sample_placement().layout();
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(json, r#"[[[1,1],["5H","KS"]],[[2,3],["AD"]]]"#);
    }
}
