use std::fmt;

/// Contents of a single hole on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl Cell {
    /// The marker occupying this cell, if any.
    pub fn marker(self) -> Option<Marker> {
        match self {
            Cell::Empty => None,
            Cell::PlayerOne => Some(Marker::PlayerOne),
            Cell::PlayerTwo => Some(Marker::PlayerTwo),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Single-character rendering used by the text board.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::PlayerOne => '◯',
            Cell::PlayerTwo => '⬤',
        }
    }
}

/// The token a side drops. `PlayerOne` always moves on even turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    PlayerOne,
    PlayerTwo,
}

impl Marker {
    /// Both markers, in turn order.
    pub const ALL: [Marker; 2] = [Marker::PlayerOne, Marker::PlayerTwo];

    /// Marker that moves on the given turn index.
    pub fn for_turn(turn: usize) -> Marker {
        if turn % 2 == 0 {
            Marker::PlayerOne
        } else {
            Marker::PlayerTwo
        }
    }

    /// Get the other marker
    pub fn other(self) -> Marker {
        match self {
            Marker::PlayerOne => Marker::PlayerTwo,
            Marker::PlayerTwo => Marker::PlayerOne,
        }
    }

    /// Convert marker to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Marker::PlayerOne => Cell::PlayerOne,
            Marker::PlayerTwo => Cell::PlayerTwo,
        }
    }

    /// Get marker name for display
    pub fn name(self) -> &'static str {
        match self {
            Marker::PlayerOne => "Player one",
            Marker::PlayerTwo => "Player two",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
