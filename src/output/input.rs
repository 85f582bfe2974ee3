//! Keyboard handling for the terminal surface.
//!
//! Raw mode swallows Ctrl-C, so the terminal surface needs its own quit keys.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::thread;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Actions that can be performed based on user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Quit the application
    Quit,
    /// No action
    None,
}

/// Map a key event to an application action
fn map_key_to_action(key_event: KeyEvent) -> InputAction {
    match key_event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputAction::Quit,
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            InputAction::Quit
        }
        _ => InputAction::None,
    }
}

/// Watch the keyboard on a background thread and cancel `shutdown` on a quit key
pub fn spawn_quit_listener(shutdown: CancellationToken) -> std::io::Result<()> {
    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            while !shutdown.is_cancelled() {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => {
                        if let Ok(Event::Key(key_event)) = event::read() {
                            if map_key_to_action(key_event) == InputAction::Quit {
                                tracing::info!("Quit requested from keyboard");
                                shutdown.cancel();
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!("Keyboard polling failed: {}", e);
                        break;
                    }
                }
            }
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_actions() {
        assert_eq!(
            map_key_to_action(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::empty())),
            InputAction::Quit
        );
        assert_eq!(
            map_key_to_action(KeyEvent::new(KeyCode::Esc, KeyModifiers::empty())),
            InputAction::Quit
        );
        assert_eq!(
            map_key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            InputAction::Quit
        );
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(
            map_key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::empty())),
            InputAction::None
        );
        assert_eq!(
            map_key_to_action(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty())),
            InputAction::None
        );
    }
}
