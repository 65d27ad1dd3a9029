use serde::Serialize;

use crate::{
    InconsistentStateError,
    core::{Card, CardLayout, PlayerId, Position},
};

use super::moves::Move;

/// Snapshot of a game after a number of moves.
///
/// States are never changed once handed out: stepping clones the state and
/// applies moves to the clone. The card layout is shared copy-on-write, so a
/// clone is cheap and only the cells a move touches are copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    index: usize,
    positions: [Option<Position>; 2],
    hands: [Vec<Card>; 2],
    layout: CardLayout,
    inconsistencies: usize,
}

impl GameState {
    pub(crate) fn new(positions: [Option<Position>; 2], layout: CardLayout) -> Self {
        Self {
            index: 0,
            positions,
            hands: [vec![], vec![]],
            layout,
            inconsistencies: 0,
        }
    }

    /// Number of moves applied since the initial state.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn position(&self, player: PlayerId) -> Option<Position> {
        self.positions[player.index()]
    }

    /// Cards held by `player`, in pickup order.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Card] {
        &self.hands[player.index()]
    }

    #[must_use]
    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// Pickups and drops that did not match the replayed state so far.
    #[must_use]
    pub fn inconsistencies(&self) -> usize {
        self.inconsistencies
    }

    /// Applies one move in place and advances the index.
    ///
    /// A pickup of a card that is not at the given cell is skipped. A drop of a
    /// card the player does not hold still places the card on the board.
    /// Either case is reported and counted.
    pub(crate) fn apply(&mut self, action: &Move) -> Result<(), InconsistentStateError> {
        self.index += 1;
        let result = match *action {
            Move::PlayerMove { player, to } => {
                self.positions[player.index()] = Some(to);
                Ok(())
            }
            Move::PickupCard { player, at, card } => {
                if self.layout.remove_one(at, card) {
                    self.hands[player.index()].push(card);
                    Ok(())
                } else {
                    Err(InconsistentStateError::CardNotAtPosition { player, card, at })
                }
            }
            Move::DropCard { player, at, card } => {
                let hand = &mut self.hands[player.index()];
                let result = match hand.iter().position(|c| *c == card) {
                    Some(i) => {
                        hand.remove(i);
                        Ok(())
                    }
                    None => Err(InconsistentStateError::CardNotInHand { player, card, at }),
                };
                self.layout.push(at, card);
                result
            }
            Move::ChatMessage { .. } | Move::TaskComplete { .. } | Move::Unrecognized { .. } => {
                Ok(())
            }
        };
        if result.is_err() {
            self.inconsistencies += 1;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::core::CardPlacement;

    use super::*;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    fn initial() -> GameState {
        let mut placement = CardPlacement::new();
        placement.insert(Position::new(1, 1), card("5H"));
        placement.insert(Position::new(2, 2), card("QC"));
        GameState::new([Some(Position::new(1, 2)), None], placement.layout())
    }

    #[test]
    fn test_pickup_then_drop_restores_cell_and_hand() {
        let start = initial();
        let mut state = start.clone();
        let at = Position::new(1, 1);
        state
            .apply(&Move::PickupCard {
                player: PlayerId::One,
                at,
                card: card("5H"),
            })
            .unwrap();
        assert_eq!(state.hand(PlayerId::One), &[card("5H")]);
        assert!(state.layout().cards_at(at).is_empty());

        state
            .apply(&Move::DropCard {
                player: PlayerId::One,
                at,
                card: card("5H"),
            })
            .unwrap();
        assert!(state.hand(PlayerId::One).is_empty());
        assert_eq!(state.layout(), start.layout());
        assert_eq!(state.index(), 2);
        assert_eq!(state.inconsistencies(), 0);
    }

    #[test]
    fn test_drop_on_stacked_cell_goes_on_top() {
        let at = Position::new(1, 1);
        let mut placement = CardPlacement::new();
        placement.insert(at, card("5H"));
        placement.insert(at, card("KS"));
        let mut state = GameState::new([Some(at), None], placement.layout());

        let pickup = Move::PickupCard {
            player: PlayerId::One,
            at,
            card: card("5H"),
        };
        let drop = Move::DropCard {
            player: PlayerId::One,
            at,
            card: card("5H"),
        };
        state.apply(&pickup).unwrap();
        assert_eq!(state.layout().cards_at(at), &[card("KS")]);

        // same cards on the cell, but the dropped one is now last
        state.apply(&drop).unwrap();
        assert_eq!(state.layout().cards_at(at), &[card("KS"), card("5H")]);
        assert!(state.hand(PlayerId::One).is_empty());
        assert_eq!(state.inconsistencies(), 0);
    }

    #[test]
    fn test_pickup_of_missing_card_is_skipped_and_counted() {
        let mut state = initial();
        let err = state
            .apply(&Move::PickupCard {
                player: PlayerId::Two,
                at: Position::new(1, 1),
                card: card("QC"),
            })
            .unwrap_err();
        assert!(matches!(err, InconsistentStateError::CardNotAtPosition { .. }));
        assert!(state.hand(PlayerId::Two).is_empty());
        assert_eq!(state.layout(), initial().layout());
        assert_eq!(state.inconsistencies(), 1);
        assert_eq!(state.index(), 1);
    }

    #[test]
    fn test_drop_of_unheld_card_still_places_it() {
        let mut state = initial();
        let err = state
            .apply(&Move::DropCard {
                player: PlayerId::One,
                at: Position::new(3, 3),
                card: card("2S"),
            })
            .unwrap_err();
        assert!(matches!(err, InconsistentStateError::CardNotInHand { .. }));
        assert_eq!(state.layout().cards_at(Position::new(3, 3)), &[card("2S")]);
        assert_eq!(state.inconsistencies(), 1);
    }

    #[test]
    fn test_move_and_chat() {
        let mut state = initial();
        state
            .apply(&Move::PlayerMove {
                player: PlayerId::Two,
                to: Position::new(4, 5),
            })
            .unwrap();
        state
            .apply(&Move::ChatMessage {
                player: PlayerId::Two,
                text: "here".into(),
                mentions_card: false,
            })
            .unwrap();
        assert_eq!(state.position(PlayerId::Two), Some(Position::new(4, 5)));
        assert_eq!(state.position(PlayerId::One), Some(Position::new(1, 2)));
        assert_eq!(state.layout(), initial().layout());
        assert_eq!(state.index(), 2);
    }
}
