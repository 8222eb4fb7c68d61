//! # Connect Four
//!
//! A Connect Four game-state engine with a terminal front end. A [`Session`]
//! runs games between "the player" and either a second person or an automated
//! opponent, keeping score across games.
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, markers, session state machine
//! - [`ai`]: Move-selection contract, opponent seats, negamax and random strategies
//! - [`ui`]: Terminal UI host that owns one session
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types
//!
//! [`Session`]: game::Session

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod ui;
