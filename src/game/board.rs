use std::fmt;

use super::player::{Cell, Marker};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of holes on the board; a game that fills them all is a tie.
pub const MAX_MOVES: usize = ROWS * COLS;

/// Row and column indices of a four-in-a-row, in the order they were scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub rows: [usize; 4],
    pub cols: [usize; 4],
}

impl Connection {
    /// Iterate the four `(row, col)` positions.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().copied().zip(self.cols.iter().copied())
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.cells().any(|cell| cell == (row, col))
    }

    /// Flatten an optional connection into `(found, rows, cols)`, using `-1`
    /// for every coordinate when nothing was found.
    pub fn sentinel_coords(connection: Option<&Connection>) -> (bool, [i32; 4], [i32; 4]) {
        match connection {
            Some(c) => (
                true,
                c.rows.map(|r| r as i32),
                c.cols.map(|col| col as i32),
            ),
            None => (false, [-1; 4], [-1; 4]),
        }
    }
}

/// Row/column deltas of the four scan directions, paired with the ranges of
/// starting cells. The order of this table is the tie-break when a board holds
/// more than one line.
struct Scan {
    rows: std::ops::Range<usize>,
    cols: std::ops::Range<usize>,
    step: (isize, isize),
    /// Horizontal scans iterate columns in the outer loop.
    cols_outer: bool,
}

const SCANS: [Scan; 4] = [
    // Horizontal, left to right
    Scan {
        rows: 0..ROWS,
        cols: 0..COLS - 3,
        step: (0, 1),
        cols_outer: true,
    },
    // Vertical, top to bottom
    Scan {
        rows: 0..ROWS - 3,
        cols: 0..COLS,
        step: (1, 0),
        cols_outer: false,
    },
    // Ascending diagonal, bottom-left to top-right
    Scan {
        rows: 3..ROWS,
        cols: 0..COLS - 3,
        step: (-1, 1),
        cols_outer: false,
    },
    // Descending diagonal, both indices decreasing
    Scan {
        rows: 3..ROWS,
        cols: 3..COLS,
        step: (-1, -1),
        cols_outer: false,
    },
];

/// A 6x7 grid with gravity. Row 0 is the top, row 5 is the bottom.
///
/// `heights[c]` always equals the number of filled cells in column `c`, and
/// `move_count` is their sum. Cloning produces a fully independent board,
/// which is how search strategies explore hypothetical moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    heights: [usize; COLS],
    move_count: usize,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
            heights: [0; COLS],
            move_count: 0,
        }
    }

    /// Get the cell at a specific position. Panics outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Like [`Board::get`], but returns `None` for any coordinate outside the
    /// grid instead of panicking.
    pub fn cell_at(&self, row: i32, col: i32) -> Option<Cell> {
        let row = usize::try_from(row).ok().filter(|&r| r < ROWS)?;
        let col = usize::try_from(col).ok().filter(|&c| c < COLS)?;
        Some(self.cells[row][col])
    }

    /// Filled cells in `col`.
    pub fn height(&self, col: usize) -> usize {
        self.heights[col]
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Marker to move next, by move-count parity.
    pub fn next_marker(&self) -> Marker {
        Marker::for_turn(self.move_count)
    }

    /// Check if a column is full. Columns outside the grid count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        col >= COLS || self.heights[col] == ROWS
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.move_count == MAX_MOVES
    }

    /// Columns that can still take a piece, left to right.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Drop `marker` into `col`. Returns false and leaves the board untouched
    /// if the column is out of range or full.
    pub fn drop_piece(&mut self, col: usize, marker: Marker) -> bool {
        if self.is_column_full(col) {
            return false;
        }
        let row = ROWS - 1 - self.heights[col];
        self.cells[row][col] = marker.to_cell();
        self.heights[col] += 1;
        self.move_count += 1;
        true
    }

    /// Remove the topmost piece of `col`.
    ///
    /// The caller must guarantee the column is non-empty; calling this on an
    /// empty column is a logic error and panics.
    pub fn undo_drop(&mut self, col: usize) {
        debug_assert!(self.heights[col] > 0, "undo_drop on empty column {col}");
        self.heights[col] -= 1;
        let row = ROWS - 1 - self.heights[col];
        self.cells[row][col] = Cell::Empty;
        self.move_count -= 1;
    }

    /// Find the first four-in-a-row of `marker`.
    ///
    /// Scans horizontal lines first, then vertical, then ascending and
    /// descending diagonals; within a direction the starting cells are visited
    /// in a fixed order. When several lines exist, the one reached first is
    /// reported.
    pub fn where_connected(&self, marker: Marker) -> Option<Connection> {
        let cell = marker.to_cell();
        for scan in &SCANS {
            if scan.cols_outer {
                for col in scan.cols.clone() {
                    for row in scan.rows.clone() {
                        if let Some(line) = self.line_from((row, col), scan.step, cell) {
                            return Some(line);
                        }
                    }
                }
            } else {
                for row in scan.rows.clone() {
                    for col in scan.cols.clone() {
                        if let Some(line) = self.line_from((row, col), scan.step, cell) {
                            return Some(line);
                        }
                    }
                }
            }
        }
        None
    }

    /// The four cells starting at `start` along `step`, if all hold `cell`.
    fn line_from(
        &self,
        (row, col): (usize, usize),
        (dr, dc): (isize, isize),
        cell: Cell,
    ) -> Option<Connection> {
        let mut rows = [0; 4];
        let mut cols = [0; 4];
        for i in 0..4 {
            let r = row.checked_add_signed(dr * i as isize)?;
            let c = col.checked_add_signed(dc * i as isize)?;
            if r >= ROWS || c >= COLS || self.cells[r][c] != cell {
                return None;
            }
            rows[i] = r;
            cols[i] = c;
        }
        Some(Connection { rows, cols })
    }

    pub fn is_four_connected(&self, marker: Marker) -> bool {
        self.where_connected(marker).is_some()
    }

    /// True once the board is full or either side has four connected.
    pub fn is_game_over(&self) -> bool {
        self.is_full()
            || Marker::ALL
                .iter()
                .any(|&marker| self.is_four_connected(marker))
    }

    /// Whether the topmost piece of `col` belongs to a four-in-a-row.
    ///
    /// Only looks at lines through that one cell, so it is much cheaper than
    /// [`Board::where_connected`] when the last move is known.
    pub fn last_drop_wins(&self, col: usize) -> bool {
        if col >= COLS || self.heights[col] == 0 {
            return false;
        }
        let row = ROWS - self.heights[col];
        let cell = self.cells[row][col];

        [(0, 1), (1, 0), (1, 1), (1, -1)]
            .iter()
            .any(|&(dr, dc)| {
                1 + self.run_length(row, col, dr, dc, cell)
                    + self.run_length(row, col, -dr, -dc, cell)
                    >= 4
            })
    }

    /// Count consecutive `cell`s from (row, col), exclusive, along (dr, dc).
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, cell: Cell) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while r >= 0
            && r < ROWS as isize
            && c >= 0
            && c < COLS as isize
            && self.cells[r as usize][c as usize] == cell
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for col in 0..COLS {
            write!(f, "{col} ")?;
        }
        writeln!(f)?;
        for row in &self.cells {
            for cell in row {
                write!(f, "{} ", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
