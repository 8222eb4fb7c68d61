//! Opponent seats and move-selection strategies: the [`MoveStrategy`]
//! contract, human and automated [`Opponent`] seats, negamax search and a
//! uniform-random baseline.

mod negamax;
mod random;
mod strategy;

pub use negamax::{ConnectFourHeuristic, Heuristic, NegamaxStrategy, DEFAULT_MAX_DEPTH};
pub use random::RandomStrategy;
pub use strategy::{checked_column, AutomatedOpponent, HumanOpponent, MoveStrategy, Opponent};

use crate::config::{AppConfig, StrategyKind};

/// Build the strategy named in the `[opponent]` section.
pub fn build_strategy(config: &AppConfig) -> Box<dyn MoveStrategy> {
    match config.opponent.strategy {
        StrategyKind::Negamax => Box::new(NegamaxStrategy::with_max_depth(config.search.max_depth)),
        StrategyKind::Random => Box::new(RandomStrategy::new()),
    }
}
