//! Terminal UI: a game view driven by an [`App`] that owns a single session.

mod app;
mod game_view;

pub use app::{App, Seat};
