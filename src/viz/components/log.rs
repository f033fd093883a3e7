use crossterm::event::{Event, KeyCode};
use log::LevelFilter;
use ratatui::{prelude::*, widgets::WidgetRef};
use tui_logger::{TuiLoggerSmartWidget, TuiWidgetEvent, TuiWidgetState};

use crate::viz::util::event_keycode;

use super::Component;

/// Logs tab: training progress lines on the right, log targets on the left
pub struct Logs {
    state: TuiWidgetState,
}

impl Logs {
    /// `level` is the most verbose level shown until changed with `←/→`
    pub fn new(level: LevelFilter) -> Self {
        Self {
            state: TuiWidgetState::new().set_default_display_level(level),
        }
    }
}

/// Keys understood by the logger widget
fn widget_event(key: KeyCode) -> Option<TuiWidgetEvent> {
    Some(match key {
        KeyCode::Char(' ') => TuiWidgetEvent::SpaceKey,
        KeyCode::Esc => TuiWidgetEvent::EscapeKey,
        KeyCode::PageUp => TuiWidgetEvent::PrevPageKey,
        KeyCode::PageDown => TuiWidgetEvent::NextPageKey,
        KeyCode::Up => TuiWidgetEvent::UpKey,
        KeyCode::Down => TuiWidgetEvent::DownKey,
        KeyCode::Left => TuiWidgetEvent::LeftKey,
        KeyCode::Right => TuiWidgetEvent::RightKey,
        KeyCode::Char('+' | '=') => TuiWidgetEvent::PlusKey,
        KeyCode::Char('-' | '_') => TuiWidgetEvent::MinusKey,
        KeyCode::Char('s') => TuiWidgetEvent::HideKey,
        KeyCode::Char('f') => TuiWidgetEvent::FocusKey,
        _ => return None,
    })
}

impl WidgetRef for Logs {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        TuiLoggerSmartWidget::default()
            .title_log("Training log")
            .title_target("Targets")
            .style(Style::default().white())
            .style_error(Style::default().light_red().bold())
            .style_warn(Style::default().light_yellow())
            .style_info(Style::default().cyan())
            .style_debug(Style::default().dark_gray())
            .output_separator('|')
            .output_target(false)
            .state(&self.state)
            .render(area, buf);
    }
}

impl Component for Logs {
    fn handle_ui_event(&mut self, event: &Event) -> bool {
        match event_keycode(event).and_then(widget_event) {
            Some(widget_event) => {
                self.state.transition(widget_event);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_keys_pass_through() {
        for key in [KeyCode::Char('q'), KeyCode::Char('h'), KeyCode::Tab] {
            assert!(widget_event(key).is_none(), "{key:?} belongs to the dashboard");
        }
    }

    #[test]
    fn logger_keys_are_mapped() {
        assert!(matches!(
            widget_event(KeyCode::Char('=')),
            Some(TuiWidgetEvent::PlusKey)
        ));
        assert!(matches!(
            widget_event(KeyCode::Char('_')),
            Some(TuiWidgetEvent::MinusKey)
        ));
        assert!(matches!(
            widget_event(KeyCode::PageUp),
            Some(TuiWidgetEvent::PrevPageKey)
        ));
    }
}
