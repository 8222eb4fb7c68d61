use crate::error::MoveError;
use crate::game::{Board, COLS};

/// Chooses a column for the side to move.
///
/// Implementations receive a read-only snapshot and may be called any number
/// of times; anything speculative has to happen on a clone. The answer is not
/// trusted: the session still applies it through [`Board::drop_piece`] and
/// reports an illegal column as [`MoveError::InvalidMove`].
pub trait MoveStrategy: Send {
    /// Select a column given the current board and an opaque difficulty level.
    fn select_column(&mut self, board: &Board, difficulty: u32) -> usize;

    /// Return the strategy's display name.
    fn name(&self) -> &str;
}

/// The opponent's seat in a session: where its columns come from.
///
/// Human and automated opponents share this one interface, so the session has
/// a single code path for the opponent's turn.
pub trait Opponent: Send {
    /// Check the caller's column before the session looks at the game state.
    /// Automated opponents accept anything, since they ignore it.
    fn validate_provided(&self, _provided: Option<i32>) -> Result<(), MoveError> {
        Ok(())
    }

    /// Produce the column to play. `provided` is the caller's column, which an
    /// automated opponent ignores.
    fn choose_column(
        &mut self,
        board: &Board,
        level: u32,
        provided: Option<i32>,
    ) -> Result<usize, MoveError>;

    /// Whether columns are computed rather than supplied by a person.
    fn is_automated(&self) -> bool;

    fn name(&self) -> &str;
}

/// Validate a caller-supplied column.
pub fn checked_column(column: i32) -> Result<usize, MoveError> {
    usize::try_from(column)
        .ok()
        .filter(|&col| col < COLS)
        .ok_or(MoveError::OutOfRange(column))
}

/// A second person at the same keyboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanOpponent;

impl HumanOpponent {
    fn provided_column(provided: Option<i32>) -> Result<usize, MoveError> {
        let column = provided.ok_or(MoveError::NoColumnProvided)?;
        checked_column(column)
    }
}

impl Opponent for HumanOpponent {
    fn validate_provided(&self, provided: Option<i32>) -> Result<(), MoveError> {
        Self::provided_column(provided).map(|_| ())
    }

    fn choose_column(
        &mut self,
        _board: &Board,
        _level: u32,
        provided: Option<i32>,
    ) -> Result<usize, MoveError> {
        Self::provided_column(provided)
    }

    fn is_automated(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "Human"
    }
}

/// An opponent whose moves come from a [`MoveStrategy`].
pub struct AutomatedOpponent {
    strategy: Box<dyn MoveStrategy>,
}

impl AutomatedOpponent {
    pub fn new(strategy: Box<dyn MoveStrategy>) -> Self {
        AutomatedOpponent { strategy }
    }
}

impl Opponent for AutomatedOpponent {
    fn choose_column(
        &mut self,
        board: &Board,
        level: u32,
        _provided: Option<i32>,
    ) -> Result<usize, MoveError> {
        let column = self.strategy.select_column(board, level);
        log::debug!(
            "{} picked column {} at level {}",
            self.strategy.name(),
            column,
            level
        );
        Ok(column)
    }

    fn is_automated(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        self.strategy.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStrategy(usize);

    impl MoveStrategy for FixedStrategy {
        fn select_column(&mut self, _board: &Board, _difficulty: u32) -> usize {
            self.0
        }

        fn name(&self) -> &str {
            "Fixed"
        }
    }

    #[test]
    fn test_checked_column_bounds() {
        assert_eq!(checked_column(0), Ok(0));
        assert_eq!(checked_column(6), Ok(6));
        assert_eq!(checked_column(-1), Err(MoveError::OutOfRange(-1)));
        assert_eq!(checked_column(7), Err(MoveError::OutOfRange(7)));
    }

    #[test]
    fn test_human_requires_column() {
        let mut human = HumanOpponent;
        let board = Board::new();
        assert_eq!(
            human.choose_column(&board, 0, None),
            Err(MoveError::NoColumnProvided)
        );
        assert_eq!(
            human.choose_column(&board, 0, Some(9)),
            Err(MoveError::OutOfRange(9))
        );
        assert_eq!(human.choose_column(&board, 0, Some(2)), Ok(2));
        assert!(!human.is_automated());

        assert_eq!(
            human.validate_provided(None),
            Err(MoveError::NoColumnProvided)
        );
        assert_eq!(human.validate_provided(Some(-3)), Err(MoveError::OutOfRange(-3)));
        assert_eq!(human.validate_provided(Some(6)), Ok(()));
    }

    #[test]
    fn test_automated_ignores_provided_column() {
        let mut opponent = AutomatedOpponent::new(Box::new(FixedStrategy(4)));
        let board = Board::new();
        assert_eq!(opponent.choose_column(&board, 3, Some(1)), Ok(4));
        assert_eq!(opponent.choose_column(&board, 3, None), Ok(4));
        assert!(opponent.is_automated());
        assert_eq!(opponent.name(), "Fixed");
    }
}
