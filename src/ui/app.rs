use crate::error::MoveError;
use crate::game::{Session, SessionState, COLS};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::{Duration, Instant};

/// Which side of the table the host is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Player,
    Opponent,
}

impl Seat {
    fn other(self) -> Seat {
        match self {
            Seat::Player => Seat::Opponent,
            Seat::Opponent => Seat::Player,
        }
    }
}

pub struct App {
    session: Session,
    to_move: Seat,
    selected_column: usize,
    last_opponent_column: Option<usize>,
    opponent_stalled: bool,
    should_quit: bool,
    message: Option<String>,
    turn_limit: Option<Duration>,
    turn_started: Instant,
    timed_out: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        App {
            session,
            to_move: Seat::Player,
            selected_column: COLS / 2, // Start in middle
            last_opponent_column: None,
            opponent_stalled: false,
            should_quit: false,
            message: None,
            turn_limit: None,
            turn_started: Instant::now(),
            timed_out: false,
        }
    }

    /// Give each move at most `limit`; running out ends the program.
    pub fn with_turn_limit(mut self, limit: Option<Duration>) -> Self {
        self.turn_limit = limit;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn to_move(&self) -> Seat {
        self.to_move
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn last_opponent_column(&self) -> Option<usize> {
        self.last_opponent_column
    }

    /// Whether the program stopped because a move was not made in time.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    fn clock_running(&self) -> bool {
        self.session.state() == SessionState::Running && !self.opponent_stalled
    }

    /// Time left for the current move, if the clock is on and running.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let limit = self.turn_limit?;
        if !self.clock_running() {
            return None;
        }
        Some(limit.saturating_sub(now.saturating_duration_since(self.turn_started)))
    }

    /// Quit once the side to move has used up its time.
    pub fn check_deadline(&mut self, now: Instant) {
        if self.remaining(now) == Some(Duration::ZERO) {
            log::info!("{:?} ran out of time on turn {}", self.to_move, self.session.turn());
            self.timed_out = true;
            self.should_quit = true;
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.check_deadline(Instant::now());
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.awaiting_automated_move() {
                self.play_automated_move();
                continue;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Whether the next step belongs to the computer rather than a key press.
    pub fn awaiting_automated_move(&self) -> bool {
        self.to_move == Seat::Opponent
            && self.session.is_automated()
            && self.session.state() == SessionState::Running
            && !self.opponent_stalled
    }

    /// Let the automated opponent take its turn.
    pub fn play_automated_move(&mut self) {
        match self.session.make_opponent_turn(None) {
            Ok(col) => {
                self.last_opponent_column = Some(col);
                self.after_move();
            }
            Err(err) => {
                // Stop polling the strategy until the next game.
                log::error!("opponent move failed: {err}");
                self.opponent_stalled = true;
                self.message = Some(format!("Opponent failed: {err}. Press 'r' to restart."));
            }
        }
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.next_game();
            }
            _ => {}
        }
    }

    /// Drop a piece in the selected column for whoever is at the keyboard.
    fn drop_piece(&mut self) {
        if self.session.state().is_terminal() {
            self.message = Some("Game over! Press 'r' to play again.".to_string());
            return;
        }

        let column = self.selected_column as i32;
        let result = match self.to_move {
            Seat::Player => self.session.make_player_turn(column),
            Seat::Opponent if self.session.is_automated() => {
                self.message = Some("Wait for the opponent's move.".to_string());
                return;
            }
            Seat::Opponent => self.session.make_opponent_turn(Some(column)).map(|_| ()),
        };

        match result {
            Ok(()) => self.after_move(),
            Err(MoveError::InvalidMove { .. }) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(err) => {
                self.message = Some(err.to_string());
            }
        }
    }

    fn after_move(&mut self) {
        self.turn_started = Instant::now();
        match self.session.state() {
            SessionState::Running => self.to_move = self.to_move.other(),
            SessionState::Win => self.message = Some(self.win_message()),
            SessionState::Lose => self.message = Some(self.lose_message()),
            SessionState::Tie => self.message = Some("Tie.".to_string()),
        }
    }

    fn win_message(&self) -> String {
        if self.session.is_automated() {
            "You win!".to_string()
        } else {
            "Player wins!".to_string()
        }
    }

    fn lose_message(&self) -> String {
        if self.session.is_automated() {
            "You lost.".to_string()
        } else {
            "Opponent wins!".to_string()
        }
    }

    /// Start the next game. After a player win the opponent opens; otherwise
    /// the player does.
    fn next_game(&mut self) {
        let opener = if self.session.state() == SessionState::Win {
            Seat::Opponent
        } else {
            Seat::Player
        };
        self.session.reset_game();
        self.to_move = opener;
        self.last_opponent_column = None;
        self.opponent_stalled = false;
        self.turn_started = Instant::now();
        self.selected_column = COLS / 2;
        self.message = Some("New game started!".to_string());
        log::info!(
            "new game, {:?} opens, score {}:{}",
            opener,
            self.session.games_won(),
            self.session.games_lost()
        );
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, self);
    }
}
