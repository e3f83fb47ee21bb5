// Event Handling
// Application event types and handler infrastructure

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

/// Application events that can be handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Quit the application
    Quit,

    /// Focus the next list panel
    FocusNext,

    /// Focus the previous list panel
    FocusPrevious,

    /// Move selection up
    SelectPrevious,

    /// Move selection down
    SelectNext,

    /// Activate the selected row (commit input, remove, toggle)
    Activate,

    /// Type a character into the active input
    Input(char),

    /// Delete the last input character
    Backspace,

    /// Re-fetch the focused list
    Refresh,

    /// Re-fetch every list
    RefreshAll,

    /// Start renaming the selected device
    Rename,

    /// Cancel a prompt or dismiss the latest notice
    Back,

    /// No operation
    None,
}

/// Event handler that converts terminal events to application events
pub struct EventHandler;

impl EventHandler {
    /// Convert a crossterm event to an application event.
    ///
    /// While `typing` is set, printable keys go to the input instead of
    /// triggering commands.
    pub fn handle(event: Event, typing: bool) -> AppEvent {
        match event {
            Event::Key(key) => Self::handle_key(key, typing),
            Event::Mouse(mouse) => Self::handle_mouse(mouse),
            _ => AppEvent::None,
        }
    }

    /// Handle keyboard events
    fn handle_key(key: KeyEvent, typing: bool) -> AppEvent {
        // Only handle key press events
        if key.kind != KeyEventKind::Press {
            return AppEvent::None;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return AppEvent::Quit;
        }

        match key.code {
            KeyCode::Tab => return AppEvent::FocusNext,
            KeyCode::BackTab => return AppEvent::FocusPrevious,
            KeyCode::Up => return AppEvent::SelectPrevious,
            KeyCode::Down => return AppEvent::SelectNext,
            KeyCode::Enter => return AppEvent::Activate,
            KeyCode::Esc => return AppEvent::Back,
            _ => {}
        }

        if typing {
            return match key.code {
                KeyCode::Char(c) => AppEvent::Input(c),
                KeyCode::Backspace => AppEvent::Backspace,
                _ => AppEvent::None,
            };
        }

        match key.code {
            KeyCode::Char('q') => AppEvent::Quit,
            KeyCode::Char('k') => AppEvent::SelectPrevious,
            KeyCode::Char('j') => AppEvent::SelectNext,
            KeyCode::Char(' ') => AppEvent::Activate,
            KeyCode::Char('r') => AppEvent::Refresh,
            KeyCode::Char('R') => AppEvent::RefreshAll,
            KeyCode::Char('n') => AppEvent::Rename,
            _ => AppEvent::None,
        }
    }

    /// Handle mouse events
    fn handle_mouse(mouse: MouseEvent) -> AppEvent {
        match mouse.kind {
            MouseEventKind::ScrollUp => AppEvent::SelectPrevious,
            MouseEventKind::ScrollDown => AppEvent::SelectNext,
            _ => AppEvent::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn commands_when_browsing() {
        assert_eq!(EventHandler::handle(press(KeyCode::Char('q')), false), AppEvent::Quit);
        assert_eq!(EventHandler::handle(press(KeyCode::Char('R')), false), AppEvent::RefreshAll);
        assert_eq!(EventHandler::handle(press(KeyCode::Enter), false), AppEvent::Activate);
    }

    #[test]
    fn characters_go_to_input_when_typing() {
        assert_eq!(EventHandler::handle(press(KeyCode::Char('q')), true), AppEvent::Input('q'));
        assert_eq!(EventHandler::handle(press(KeyCode::Backspace), true), AppEvent::Backspace);
        assert_eq!(EventHandler::handle(press(KeyCode::Tab), true), AppEvent::FocusNext);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(EventHandler::handle(event, true), AppEvent::Quit);
    }
}
