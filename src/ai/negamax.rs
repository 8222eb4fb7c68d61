use crate::game::{Board, Cell, Marker, COLS, ROWS};

use super::strategy::MoveStrategy;

/// Trait for evaluating a board position from a marker's perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, marker: Marker) -> f64;
}

/// Default heuristic that scans all 4-cell windows and scores threats.
pub struct ConnectFourHeuristic;

/// Starting cells and direction of every 4-cell window on the board.
const WINDOWS: [(std::ops::Range<usize>, std::ops::Range<usize>, (isize, isize)); 4] = [
    (0..ROWS, 0..COLS - 3, (0, 1)),
    (0..ROWS - 3, 0..COLS, (1, 0)),
    (0..ROWS - 3, 0..COLS - 3, (1, 1)),
    (3..ROWS, 0..COLS - 3, (-1, 1)),
];

const CENTER_COL: usize = COLS / 2;

impl ConnectFourHeuristic {
    fn score_window(own: usize, opp: usize, empty: usize) -> f64 {
        if own == 3 && empty == 1 {
            50.0
        } else if own == 2 && empty == 2 {
            10.0
        } else if opp == 3 && empty == 1 {
            -80.0
        } else if opp == 2 && empty == 2 {
            -10.0
        } else {
            0.0
        }
    }
}

impl Heuristic for ConnectFourHeuristic {
    fn evaluate(&self, board: &Board, marker: Marker) -> f64 {
        let own_cell = marker.to_cell();
        let opp_cell = marker.other().to_cell();
        let mut score = 0.0;

        // Center column bonus
        for row in 0..ROWS {
            let cell = board.get(row, CENTER_COL);
            if cell == own_cell {
                score += 3.0;
            } else if cell == opp_cell {
                score -= 3.0;
            }
        }

        for (rows, cols, (dr, dc)) in WINDOWS.iter() {
            for row in rows.clone() {
                for col in cols.clone() {
                    let (mut own, mut opp, mut empty) = (0, 0, 0);
                    for i in 0..4 {
                        let r = (row as isize + dr * i) as usize;
                        let c = (col as isize + dc * i) as usize;
                        match board.get(r, c) {
                            Cell::Empty => empty += 1,
                            cell if cell == own_cell => own += 1,
                            _ => opp += 1,
                        }
                    }
                    score += Self::score_window(own, opp, empty);
                }
            }
        }

        score
    }
}

/// Column ordering: center-first for better alpha-beta pruning.
const MOVE_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

/// Score of a win found at the search horizon; wins found sooner score higher.
const WIN_SCORE: f64 = 100_000.0;

/// Deepest search any difficulty level maps to, unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: u32 = 12;

/// Negamax search with alpha-beta pruning.
///
/// The automation level is the search depth in plies, clamped to
/// `1..=max_depth`.
pub struct NegamaxStrategy {
    max_depth: u32,
    heuristic: Box<dyn Heuristic>,
}

impl NegamaxStrategy {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: u32) -> Self {
        NegamaxStrategy {
            max_depth: max_depth.max(1),
            heuristic: Box::new(ConnectFourHeuristic),
        }
    }

    pub fn with_heuristic(max_depth: u32, heuristic: Box<dyn Heuristic>) -> Self {
        NegamaxStrategy {
            max_depth: max_depth.max(1),
            heuristic,
        }
    }

    /// Search depth used for a difficulty level.
    pub fn depth_for(&self, difficulty: u32) -> u32 {
        difficulty.clamp(1, self.max_depth)
    }

    fn best_move(&self, board: &Board, depth: u32) -> usize {
        let mut scratch = board.clone();
        let mover = scratch.next_marker();

        let mut best_action = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut alpha = f64::NEG_INFINITY;

        for &col in &MOVE_ORDER {
            if !scratch.drop_piece(col, mover) {
                continue;
            }
            let score = self.score_drop(&mut scratch, col, mover, depth, alpha, f64::INFINITY);
            scratch.undo_drop(col);

            if best_action.is_none() || score > best_score {
                best_score = score;
                best_action = Some(col);
            }
            alpha = alpha.max(score);
        }

        // A full board has no legal reply; the centre column will be rejected.
        best_action.unwrap_or(MOVE_ORDER[0])
    }

    /// Value, for `mover`, of the piece just dropped into `col`.
    fn score_drop(
        &self,
        board: &mut Board,
        col: usize,
        mover: Marker,
        depth: u32,
        alpha: f64,
        beta: f64,
    ) -> f64 {
        if board.last_drop_wins(col) {
            WIN_SCORE + depth as f64
        } else if board.is_full() {
            0.0
        } else if depth <= 1 {
            self.heuristic.evaluate(board, mover)
        } else {
            // Negamax: opponent's score is negated
            -self.negamax(board, depth - 1, -beta, -alpha)
        }
    }

    fn negamax(&self, board: &mut Board, depth: u32, mut alpha: f64, beta: f64) -> f64 {
        let mover = board.next_marker();
        let mut best = f64::NEG_INFINITY;

        for &col in &MOVE_ORDER {
            if !board.drop_piece(col, mover) {
                continue;
            }
            let score = self.score_drop(board, col, mover, depth, alpha, beta);
            board.undo_drop(col);

            if score > best {
                best = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        best
    }
}

impl Default for NegamaxStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveStrategy for NegamaxStrategy {
    fn select_column(&mut self, board: &Board, difficulty: u32) -> usize {
        self.best_move(board, self.depth_for(difficulty))
    }

    fn name(&self) -> &str {
        "Negamax"
    }
}
