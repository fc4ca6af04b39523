//! Terminal rendering
//!
//! [`canvas`] turns game state into a grid of colored cells; [`terminal`]
//! pushes that grid to the screen, redrawing only what changed.

pub mod canvas;
pub mod terminal;

pub use canvas::{Canvas, Cell, Viewport, draw_menu, draw_round};
pub use terminal::TerminalRenderer;
