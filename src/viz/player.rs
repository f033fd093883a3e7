use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use super::{components::Board, tui::Tui, util::demo_event};
use crate::demo::Demo;

pub const DEFAULT_FPS: u32 = 10;

/// Play `demo` on `terminal` at `fps` ticks per second until the user quits
///
/// Input is polled for the remainder of each frame, so key presses never wait a full tick.
///
/// **Returns** the score shown when the user quit
pub fn play(terminal: &mut Tui, mut demo: Demo, fps: u32) -> io::Result<u32> {
    let tick = Duration::from_secs(1) / fps.max(1);
    let mut frame = demo.frame();

    loop {
        terminal.draw(|f| f.render_widget(Board::new(&frame), f.size()))?;

        let deadline = Instant::now() + tick;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            let Some(input) = demo_event(&event::read()?) else {
                continue;
            };
            if !demo.apply(input) {
                return Ok(frame.score);
            }
            frame = demo.frame();
            terminal.draw(|f| f.render_widget(Board::new(&frame), f.size()))?;
        }

        frame = demo.tick();
    }
}
