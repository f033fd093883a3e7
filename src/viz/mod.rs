//! Terminal UI: a training dashboard and a demo player
//!
//! Everything here runs on the calling thread. The dashboard is a [`TrainingHook`](crate::train::TrainingHook)
//! that redraws between episodes, and the player paces itself at a fixed frame rate.

use log::{LevelFilter, SetLoggerError};

mod components;
mod dashboard;
mod player;
mod tui;
mod util;

pub use dashboard::Dashboard;
pub use player::{play, DEFAULT_FPS};
pub use tui::{init, restore, Tui};

/// Install [`tui_logger`] as the [`log`] backend, capturing records up to `level`
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    tui_logger::init_logger(level)?;
    tui_logger::set_default_level(level);
    Ok(())
}
