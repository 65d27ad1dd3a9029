use crate::StepError;

use super::{game_state::GameState, transcript::Transcript};

impl Transcript {
    /// State before any move: players at their announced start cells, empty
    /// hands, cards as placed by the environment.
    #[must_use]
    pub fn initial_state(&self) -> GameState {
        GameState::new(
            self.config().initial_locations,
            self.placement().layout(),
        )
    }

    /// Applies the next `num_moves` moves after `prior` (or after the initial
    /// state when `prior` is `None`) and returns the resulting state.
    ///
    /// `prior` is left untouched. Pickups and drops that do not match the
    /// replayed cards are logged and counted on the returned state instead of
    /// failing the step.
    pub fn step(&self, prior: Option<&GameState>, num_moves: usize) -> Result<GameState, StepError> {
        let mut state = match prior {
            Some(state) => state.clone(),
            None => self.initial_state(),
        };
        let start = state.index();
        let end = start
            .checked_add(num_moves)
            .filter(|end| *end <= self.num_moves())
            .ok_or(StepError::OutOfRange {
                start,
                num_moves,
                available: self.num_moves(),
            })?;

        for recorded in &self.moves()[start..end] {
            log::trace!("line {}: {:?}", recorded.line, recorded.action);
            if let Err(e) = state.apply(&recorded.action) {
                log::warn!("line {}: {e}", recorded.line);
            }
        }
        Ok(state)
    }

    /// Returns the states at every index in `start..=end`.
    ///
    /// The first element is the state after `start` moves; each following
    /// element is one move further. The result depends only on the move log
    /// and the indices.
    pub fn evolve(&self, start: usize, end: usize) -> Result<Vec<GameState>, StepError> {
        if start > end {
            return Err(StepError::InvalidRange { start, end });
        }
        let first = self.step(None, start)?;
        let mut states = Vec::with_capacity(end - start + 1);
        states.push(first);
        for _ in start..end {
            let next = self.step(states.last(), 1)?;
            states.push(next);
        }
        Ok(states)
    }
}
