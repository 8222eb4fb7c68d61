use crate::game::{Board, COLS};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::strategy::MoveStrategy;

/// A strategy that selects uniformly at random from legal columns.
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        RandomStrategy {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence of choices, for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        RandomStrategy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveStrategy for RandomStrategy {
    fn select_column(&mut self, board: &Board, _difficulty: u32) -> usize {
        let columns = board.legal_columns();
        if columns.is_empty() {
            // Nothing to choose from; the caller rejects any column.
            return COLS;
        }
        columns[self.rng.random_range(0..columns.len())]
    }

    fn name(&self) -> &str {
        "Random"
    }
}
