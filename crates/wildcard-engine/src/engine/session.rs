use crate::StepError;

use super::{game_state::GameState, moves::RecordedMove, transcript::Transcript};

/// A cursor over a transcript that can step both ways.
///
/// Every state visited is kept, so stepping back returns exactly the state
/// seen before and stepping forward again reuses the cached states.
#[derive(Debug, Clone)]
pub struct ReplaySession<'a> {
    transcript: &'a Transcript,
    history: Vec<GameState>,
    cursor: usize,
}

impl<'a> ReplaySession<'a> {
    #[must_use]
    pub fn new(transcript: &'a Transcript) -> Self {
        Self {
            transcript,
            history: vec![transcript.initial_state()],
            cursor: 0,
        }
    }

    #[must_use]
    pub fn transcript(&self) -> &'a Transcript {
        self.transcript
    }

    #[must_use]
    pub fn current(&self) -> &GameState {
        &self.history[self.cursor]
    }

    /// The move that produced the current state, if any.
    #[must_use]
    pub fn last_move(&self) -> Option<&'a RecordedMove> {
        let index = self.current().index();
        index
            .checked_sub(1)
            .and_then(|i| self.transcript.moves().get(i))
    }

    #[must_use]
    pub fn is_at_start(&self) -> bool {
        self.current().index() == 0
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.current().index() == self.transcript.num_moves()
    }

    /// Advances by one move. Returns `None` at the end of the transcript.
    pub fn forward(&mut self) -> Option<&GameState> {
        if self.is_at_end() {
            return None;
        }
        if self.cursor + 1 == self.history.len() {
            let next = self.transcript.step(Some(self.current()), 1).ok()?;
            self.history.push(next);
        }
        self.cursor += 1;
        Some(self.current())
    }

    /// Goes back by one move. Returns `None` at the initial state.
    pub fn back(&mut self) -> Option<&GameState> {
        self.cursor = self.cursor.checked_sub(1)?;
        Some(self.current())
    }

    /// Moves the cursor to the state after `index` moves.
    pub fn seek(&mut self, index: usize) -> Result<&GameState, StepError> {
        let available = self.transcript.num_moves();
        if index > available {
            // replay would continue from the last cached state
            let start = self.history.len() - 1;
            return Err(StepError::OutOfRange {
                start,
                num_moves: index - start,
                available,
            });
        }
        while self.history.len() <= index {
            let next = self.transcript.step(self.history.last(), 1)?;
            self.history.push(next);
        }
        self.cursor = index;
        Ok(self.current())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{PlayerId, Position};

    use super::*;

    fn sample() -> Transcript {
        Transcript::from_rows([
            ["Server", "0", "CREATE_ENVIRONMENT", "----;-  -;----;NEW_SECTION1,1:AS"],
            ["Player 1", "0", "PLAYER_INITIAL_LOCATION", "1,2"],
            ["Player 1", "1", "PLAYER_MOVE", "1,1"],
            ["Player 1", "2", "PLAYER_PICKUP_CARD", "1,1:AS"],
            ["Player 1", "3", "PLAYER_MOVE", "1,2"],
        ])
        .unwrap()
    }

    #[test]
    fn test_forward_and_back() {
        let transcript = sample();
        let mut session = ReplaySession::new(&transcript);
        assert!(session.is_at_start());
        assert!(session.back().is_none());
        assert!(session.last_move().is_none());

        let first = session.forward().unwrap().clone();
        assert_eq!(first.position(PlayerId::One), Some(Position::new(1, 1)));
        assert!(session.last_move().unwrap().action.is_player_move());

        session.forward().unwrap();
        session.forward().unwrap();
        assert!(session.is_at_end());
        assert!(session.forward().is_none());
        assert_eq!(session.current().hand(PlayerId::One).len(), 1);

        session.back().unwrap();
        assert_eq!(session.back().unwrap(), &first);
        assert_eq!(session.forward().unwrap().index(), 2);
    }

    #[test]
    fn test_seek() {
        let transcript = sample();
        let mut session = ReplaySession::new(&transcript);
        let state = session.seek(3).unwrap().clone();
        assert_eq!(state, transcript.step(None, 3).unwrap());
        assert_eq!(session.seek(0).unwrap(), &transcript.initial_state());
        assert_eq!(
            session.seek(5).unwrap_err(),
            StepError::OutOfRange {
                start: 3,
                num_moves: 2,
                available: 3,
            }
        );
        assert_eq!(session.current().index(), 0);

        let mut fresh = ReplaySession::new(&transcript);
        fresh.forward();
        assert_eq!(
            fresh.seek(4).unwrap_err(),
            StepError::OutOfRange {
                start: 1,
                num_moves: 3,
                available: 3,
            }
        );
    }
}
