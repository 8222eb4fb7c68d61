use crate::ai::{self, checked_column, AutomatedOpponent, HumanOpponent, MoveStrategy, Opponent};
use crate::config::AppConfig;
use crate::error::MoveError;

use super::board::{Board, Connection, MAX_MOVES};
use super::player::{Cell, Marker};

/// Outcome of the current game, seen from the player's seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Running,
    Win,
    Lose,
    Tie,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        self != SessionState::Running
    }
}

/// Which side of the table made a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seat {
    Player,
    Opponent,
}

/// One match between "the player" and an opponent: the live board, whose turn
/// it is, the outcome of the current game, and the running score.
///
/// Markers alternate with the turn index (even turns drop `PlayerOne`), so the
/// player's marker depends on who opened the game. Win and Lose always refer
/// to the player seat. The score survives [`Session::reset_game`].
pub struct Session {
    board: Board,
    opponent: Box<dyn Opponent>,
    automation_level: u32,
    turn: usize,
    state: SessionState,
    winner: Option<Marker>,
    games_won: u32,
    games_lost: u32,
}

impl Session {
    pub fn new(opponent: Box<dyn Opponent>, automation_level: u32) -> Self {
        Session {
            board: Board::new(),
            opponent,
            automation_level,
            turn: 0,
            state: SessionState::Running,
            winner: None,
            games_won: 0,
            games_lost: 0,
        }
    }

    /// Two people sharing one keyboard.
    pub fn local() -> Self {
        Self::new(Box::new(HumanOpponent), 0)
    }

    /// Play against `strategy` at the given level.
    pub fn against(strategy: Box<dyn MoveStrategy>, level: u32) -> Self {
        Self::new(Box::new(AutomatedOpponent::new(strategy)), level)
    }

    /// Build a session from the `[opponent]` and `[search]` sections.
    pub fn from_config(config: &AppConfig) -> Self {
        if config.opponent.automated {
            Self::against(ai::build_strategy(config), config.opponent.automation_level())
        } else {
            Self::local()
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Marker that the next move, by either seat, will drop.
    pub fn current_marker(&self) -> Marker {
        Marker::for_turn(self.turn)
    }

    pub fn winner(&self) -> Option<Marker> {
        self.winner
    }

    pub fn games_won(&self) -> u32 {
        self.games_won
    }

    pub fn games_lost(&self) -> u32 {
        self.games_lost
    }

    pub fn is_automated(&self) -> bool {
        self.opponent.is_automated()
    }

    pub fn automation_level(&self) -> u32 {
        self.automation_level
    }

    pub fn opponent_name(&self) -> &str {
        self.opponent.name()
    }

    /// Contents of the hole at (row, col); `None` outside the board.
    pub fn hole_color(&self, row: i32, col: i32) -> Option<Cell> {
        self.board.cell_at(row, col)
    }

    /// Drop the current marker for the player.
    ///
    /// A bad column is reported before `GameOver`, so errors about the
    /// argument do not depend on the game state.
    pub fn make_player_turn(&mut self, column: i32) -> Result<(), MoveError> {
        let column = checked_column(column)?;
        self.ensure_running()?;
        self.apply(column, Seat::Player)
    }

    /// Play the opponent's move and return the column it went into.
    ///
    /// An automated opponent ignores `provided` and asks its strategy; a human
    /// opponent must supply an in-range column. As with
    /// [`Session::make_player_turn`], a bad column is reported before
    /// `GameOver`.
    pub fn make_opponent_turn(&mut self, provided: Option<i32>) -> Result<usize, MoveError> {
        self.opponent.validate_provided(provided)?;
        self.ensure_running()?;
        let column = self
            .opponent
            .choose_column(&self.board, self.automation_level, provided)?;
        self.apply(column, Seat::Opponent)?;
        Ok(column)
    }

    /// Location of the winning line. Only meaningful once a winner is recorded.
    pub fn where_connected(&self) -> Option<Connection> {
        self.winner
            .and_then(|marker| self.board.where_connected(marker))
    }

    /// Start a new game on an empty board. The score is kept.
    pub fn reset_game(&mut self) {
        self.board = Board::new();
        self.turn = 0;
        self.state = SessionState::Running;
        self.winner = None;
        log::debug!("game reset, score {}:{}", self.games_won, self.games_lost);
    }

    fn ensure_running(&self) -> Result<(), MoveError> {
        if self.state.is_terminal() {
            return Err(MoveError::GameOver);
        }
        Ok(())
    }

    fn apply(&mut self, column: usize, seat: Seat) -> Result<(), MoveError> {
        let marker = self.current_marker();
        if !self.board.drop_piece(column, marker) {
            return Err(MoveError::InvalidMove { column });
        }
        log::debug!("turn {}: {:?} dropped {} into column {}", self.turn, seat, marker, column);

        if self.board.is_four_connected(marker) {
            self.winner = Some(marker);
            match seat {
                Seat::Player => {
                    self.state = SessionState::Win;
                    self.games_won += 1;
                }
                Seat::Opponent => {
                    self.state = SessionState::Lose;
                    self.games_lost += 1;
                }
            }
            log::info!("{} connected four; player {:?}", marker, self.state);
        }

        self.turn += 1;
        if self.turn == MAX_MOVES && self.state == SessionState::Running {
            self.state = SessionState::Tie;
            log::info!("board full, game tied");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("opponent", &self.opponent.name())
            .field("automation_level", &self.automation_level)
            .field("turn", &self.turn)
            .field("state", &self.state)
            .field("winner", &self.winner)
            .field("games_won", &self.games_won)
            .field("games_lost", &self.games_lost)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{NegamaxStrategy, RandomStrategy};
    use crate::game::{COLS, ROWS};

    /// Alternating moves that fill the board without a four-in-a-row.
    const DRAWN_GAME: [i32; MAX_MOVES] = [
        5, 4, 5, 0, 6, 2, 4, 5, 5, 0, 4, 1, 1, 0, 4, 5, 6, 5, 3, 1, 1, 2, 2, 6, 2, 6, 6, 3, 6,
        2, 0, 3, 0, 3, 3, 4, 3, 1, 4, 2, 1, 0,
    ];

    /// Alternating moves whose 42nd move completes a four-in-a-row.
    const WON_ON_LAST_MOVE: [i32; MAX_MOVES] = [
        4, 6, 0, 2, 6, 5, 1, 2, 5, 2, 3, 4, 1, 1, 4, 0, 3, 5, 5, 6, 2, 4, 3, 0, 1, 3, 1, 5, 0,
        1, 3, 0, 2, 6, 2, 4, 3, 0, 4, 6, 6, 5,
    ];

    struct FixedStrategy(usize);

    impl MoveStrategy for FixedStrategy {
        fn select_column(&mut self, _board: &Board, _difficulty: u32) -> usize {
            self.0
        }

        fn name(&self) -> &str {
            "Fixed"
        }
    }

    /// Records the level it was called with and checks it sees the live board.
    struct LevelProbe {
        expected_moves: usize,
    }

    impl MoveStrategy for LevelProbe {
        fn select_column(&mut self, board: &Board, difficulty: u32) -> usize {
            assert_eq!(board.move_count(), self.expected_moves);
            assert_eq!(difficulty, 7);
            2
        }

        fn name(&self) -> &str {
            "Probe"
        }
    }

    #[test]
    fn test_session_can_move_to_another_thread() {
        fn assert_send<T: Send>() {}
        assert_send::<Session>();
        assert_send::<Board>();
    }

    #[test]
    fn test_new_session_defaults() {
        let session = Session::local();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.turn(), 0);
        assert_eq!(session.winner(), None);
        assert_eq!(session.games_won(), 0);
        assert_eq!(session.games_lost(), 0);
        assert!(!session.is_automated());
        assert_eq!(session.hole_color(0, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_hole_color_outside_board_is_absent() {
        let session = Session::local();
        for row in -2..(ROWS as i32 + 2) {
            for col in -2..(COLS as i32 + 2) {
                let inside = (0..ROWS as i32).contains(&row) && (0..COLS as i32).contains(&col);
                assert_eq!(session.hole_color(row, col).is_some(), inside, "({row}, {col})");
            }
        }
        assert_eq!(session.hole_color(i32::MIN, i32::MAX), None);
    }

    #[test]
    fn test_player_turn_out_of_range() {
        let mut session = Session::local();
        session.make_player_turn(3).unwrap();
        let before = session.board().clone();

        assert_eq!(session.make_player_turn(-1), Err(MoveError::OutOfRange(-1)));
        assert_eq!(session.make_player_turn(7), Err(MoveError::OutOfRange(7)));
        assert_eq!(session.turn(), 1);
        assert_eq!(session.board(), &before);
    }

    #[test]
    fn test_player_turn_full_column_is_invalid() {
        let mut session = Session::local();
        for _ in 0..ROWS {
            session.make_player_turn(0).unwrap();
        }
        assert_eq!(session.turn(), ROWS);
        assert_eq!(
            session.make_player_turn(0),
            Err(MoveError::InvalidMove { column: 0 })
        );
        assert_eq!(session.turn(), ROWS);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_markers_alternate_with_turn() {
        let mut session = Session::local();
        session.make_player_turn(0).unwrap();
        session.make_opponent_turn(Some(0)).unwrap();
        session.make_player_turn(1).unwrap();
        assert_eq!(session.hole_color(5, 0), Some(Cell::PlayerOne));
        assert_eq!(session.hole_color(4, 0), Some(Cell::PlayerTwo));
        assert_eq!(session.hole_color(5, 1), Some(Cell::PlayerOne));
        assert_eq!(session.current_marker(), Marker::PlayerTwo);
    }

    #[test]
    fn test_player_win_then_reset_keeps_score() {
        let mut session = Session::local();
        // Player stacks column 0, opponent stacks column 1
        for _ in 0..3 {
            session.make_player_turn(0).unwrap();
            session.make_opponent_turn(Some(1)).unwrap();
        }
        session.make_player_turn(0).unwrap();

        assert_eq!(session.state(), SessionState::Win);
        assert_eq!(session.games_won(), 1);
        assert_eq!(session.games_lost(), 0);
        assert_eq!(session.winner(), Some(Marker::PlayerOne));
        let line = session.where_connected().unwrap();
        assert_eq!(line.rows, [2, 3, 4, 5]);
        assert_eq!(line.cols, [0, 0, 0, 0]);

        session.reset_game();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.turn(), 0);
        assert_eq!(session.winner(), None);
        assert_eq!(session.where_connected(), None);
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.games_won(), 1);
    }

    #[test]
    fn test_opponent_win_counts_as_loss() {
        let mut session = Session::local();
        session.make_player_turn(6).unwrap();
        for (opp, player) in [(0, 6), (1, 5), (2, 4)] {
            session.make_opponent_turn(Some(opp)).unwrap();
            session.make_player_turn(player).unwrap();
        }
        // Opponent completes the bottom row 0..=3
        let played = session.make_opponent_turn(Some(3)).unwrap();

        assert_eq!(played, 3);
        assert_eq!(session.state(), SessionState::Lose);
        assert_eq!(session.games_lost(), 1);
        assert_eq!(session.games_won(), 0);
        assert_eq!(session.winner(), Some(Marker::PlayerTwo));
        let line = session.where_connected().unwrap();
        assert_eq!(line.rows, [5, 5, 5, 5]);
        assert_eq!(line.cols, [0, 1, 2, 3]);
    }

    #[test]
    fn test_turns_rejected_after_game_over() {
        let mut session = Session::local();
        for _ in 0..3 {
            session.make_player_turn(0).unwrap();
            session.make_opponent_turn(Some(1)).unwrap();
        }
        session.make_player_turn(0).unwrap();
        let board = session.board().clone();

        assert_eq!(session.make_player_turn(2), Err(MoveError::GameOver));
        assert_eq!(session.make_opponent_turn(Some(2)), Err(MoveError::GameOver));
        assert_eq!(session.board(), &board);
        assert_eq!(session.games_won(), 1);
    }

    #[test]
    fn test_argument_errors_take_precedence_over_game_over() {
        let mut session = Session::local();
        for _ in 0..3 {
            session.make_player_turn(0).unwrap();
            session.make_opponent_turn(Some(1)).unwrap();
        }
        session.make_player_turn(0).unwrap();
        assert_eq!(session.state(), SessionState::Win);

        assert_eq!(session.make_player_turn(-1), Err(MoveError::OutOfRange(-1)));
        assert_eq!(session.make_opponent_turn(Some(7)), Err(MoveError::OutOfRange(7)));
        assert_eq!(
            session.make_opponent_turn(None),
            Err(MoveError::NoColumnProvided)
        );

        // An automated seat has no argument to check
        let mut session = Session::against(Box::new(FixedStrategy(0)), 1);
        for _ in 0..3 {
            session.make_player_turn(1).unwrap();
            session.make_opponent_turn(None).unwrap();
        }
        session.make_player_turn(2).unwrap();
        session.make_opponent_turn(None).unwrap();
        assert_eq!(session.state(), SessionState::Lose);
        assert_eq!(session.make_opponent_turn(None), Err(MoveError::GameOver));
    }

    #[test]
    fn test_full_board_without_line_is_tie() {
        let mut session = Session::local();
        for (i, &col) in DRAWN_GAME.iter().enumerate() {
            assert_eq!(session.state(), SessionState::Running);
            if i % 2 == 0 {
                session.make_player_turn(col).unwrap();
            } else {
                session.make_opponent_turn(Some(col)).unwrap();
            }
        }
        assert_eq!(session.turn(), MAX_MOVES);
        assert_eq!(session.state(), SessionState::Tie);
        assert_eq!(session.winner(), None);
        assert_eq!(session.where_connected(), None);
        assert_eq!(session.games_won() + session.games_lost(), 0);
    }

    #[test]
    fn test_win_on_last_move_beats_tie() {
        let mut session = Session::local();
        for &col in &WON_ON_LAST_MOVE {
            session.make_player_turn(col).unwrap();
        }
        assert_eq!(session.turn(), MAX_MOVES);
        assert_eq!(session.state(), SessionState::Win);
        assert_eq!(session.games_won(), 1);
        assert_eq!(session.winner(), Some(Marker::PlayerTwo));
    }

    #[test]
    fn test_human_opponent_requires_column() {
        let mut session = Session::local();
        assert_eq!(
            session.make_opponent_turn(None),
            Err(MoveError::NoColumnProvided)
        );
        assert_eq!(
            session.make_opponent_turn(Some(-1)),
            Err(MoveError::OutOfRange(-1))
        );
        assert_eq!(session.turn(), 0);
        assert_eq!(session.make_opponent_turn(Some(2)), Ok(2));
        assert_eq!(session.turn(), 1);
    }

    #[test]
    fn test_from_config_builds_seat() {
        let mut config = AppConfig::default();
        config.opponent.difficulty = 2;
        let session = Session::from_config(&config);
        assert!(session.is_automated());
        assert_eq!(session.automation_level(), 5);
        assert_eq!(session.opponent_name(), "Negamax");

        config.opponent.automated = false;
        let session = Session::from_config(&config);
        assert!(!session.is_automated());
    }

    #[test]
    fn test_automated_opponent_ignores_provided_column() {
        let mut session = Session::against(Box::new(FixedStrategy(5)), 3);
        assert!(session.is_automated());
        assert_eq!(session.make_opponent_turn(Some(1)), Ok(5));
        assert_eq!(session.hole_color(5, 5), Some(Cell::PlayerOne));
        assert_eq!(session.turn(), 1);
    }

    #[test]
    fn test_strategy_receives_board_and_level() {
        let mut session = Session::against(Box::new(LevelProbe { expected_moves: 1 }), 7);
        session.make_player_turn(3).unwrap();
        assert_eq!(session.make_opponent_turn(None), Ok(2));
    }

    #[test]
    fn test_illegal_strategy_column_is_invalid_move() {
        let mut session = Session::against(Box::new(FixedStrategy(9)), 1);
        assert_eq!(
            session.make_opponent_turn(None),
            Err(MoveError::InvalidMove { column: 9 })
        );
        assert_eq!(session.turn(), 0);

        let mut session = Session::against(Box::new(FixedStrategy(0)), 1);
        for _ in 0..ROWS {
            session.make_opponent_turn(None).unwrap();
        }
        assert_eq!(
            session.make_opponent_turn(None),
            Err(MoveError::InvalidMove { column: 0 })
        );
        assert_eq!(session.turn(), ROWS);
    }

    #[test]
    fn test_random_opponent_plays_legal_columns_to_the_end() {
        let mut session = Session::against(Box::new(RandomStrategy::seeded(7)), 1);
        let mut player = RandomStrategy::seeded(11);
        let mut player_turn = true;
        while !session.state().is_terminal() {
            if player_turn {
                let col = player.select_column(session.board(), 1);
                session.make_player_turn(col as i32).unwrap();
            } else {
                session.make_opponent_turn(None).unwrap();
            }
            player_turn = !player_turn;
        }
        assert_eq!(
            session.games_won() + session.games_lost(),
            u32::from(session.state() != SessionState::Tie)
        );
    }

    #[test]
    fn test_negamax_opponent_finishes_game() {
        let mut session = Session::against(Box::new(NegamaxStrategy::new()), 3);
        let mut player = RandomStrategy::seeded(3);
        while !session.state().is_terminal() {
            let col = player.select_column(session.board(), 0);
            session.make_player_turn(col as i32).unwrap();
            if session.state().is_terminal() {
                break;
            }
            let played = session.make_opponent_turn(None).unwrap();
            assert!(played < COLS);
        }
        assert!(session.board().is_game_over());
    }
}
