pub mod board;
pub mod help;
pub mod log;
pub mod plot;

use crossterm::event::Event;
pub use board::Board;
pub use log::Logs;
pub use plot::Plots;
use ratatui::widgets::WidgetRef;

pub trait Component: WidgetRef {
    /// **Returns** `true` if the event was consumed
    fn handle_ui_event(&mut self, event: &Event) -> bool;
}
