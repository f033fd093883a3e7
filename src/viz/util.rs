use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::demo::DemoEvent;

/// Takes an event, checks if it is a key press event, and returns the [`KeyCode`]
pub(super) fn event_keycode(event: &Event) -> Option<KeyCode> {
    let Event::Key(key) = event else {
        return None;
    };

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyCode::Esc);
    }

    Some(key.code)
}

/// Map a terminal event to a demo input
pub(super) fn demo_event(event: &Event) -> Option<DemoEvent> {
    match event_keycode(event)? {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(DemoEvent::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(DemoEvent::Restart),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyEventState};

    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc] {
            assert_eq!(
                demo_event(&press(code, KeyModifiers::NONE)),
                Some(DemoEvent::Quit)
            );
        }
        assert_eq!(
            demo_event(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(DemoEvent::Quit),
            "ctrl-c quits"
        );
    }

    #[test]
    fn restart_key() {
        assert_eq!(
            demo_event(&press(KeyCode::Char('r'), KeyModifiers::NONE)),
            Some(DemoEvent::Restart)
        );
        assert_eq!(
            demo_event(&press(KeyCode::Char('R'), KeyModifiers::SHIFT)),
            Some(DemoEvent::Restart)
        );
    }

    #[test]
    fn ignores_other_input() {
        assert_eq!(demo_event(&press(KeyCode::Char('x'), KeyModifiers::NONE)), None);
        assert_eq!(demo_event(&Event::FocusGained), None);

        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(demo_event(&release), None, "only presses count");
    }
}
