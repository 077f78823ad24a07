//! Input state tracking

use tracing::trace;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::Key;

/// Characters typed since the last frame, key repeats excluded
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub typed: Vec<String>,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame data (typed characters)
    pub fn clear_frame_data(&mut self) {
        self.typed.clear();
    }

    /// Handle a keyboard event
    pub fn handle_keyboard_event(&mut self, event: &KeyEvent) {
        let text = match &event.logical_key {
            Key::Character(text) => Some(text.as_str()),
            _ => None,
        };
        self.record_key(text, event.state, event.repeat);
    }

    /// Apply one key transition
    pub fn record_key(&mut self, text: Option<&str>, state: ElementState, repeat: bool) {
        if let (Some(text), ElementState::Pressed, false) = (text, state, repeat) {
            trace!(text, "Key typed");
            self.typed.push(text.to_string());
        }
    }

    /// Whether `text` was typed this frame (case-sensitive, like a browser `key`)
    pub fn was_typed(&self, text: &str) -> bool {
        self.typed_count(text) > 0
    }

    /// Number of separate presses of `text` this frame
    pub fn typed_count(&self, text: &str) -> usize {
        self.typed.iter().filter(|typed| *typed == text).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_until_frame_ends() {
        let mut state = InputState::new();

        state.record_key(Some("h"), ElementState::Pressed, false);
        assert!(state.was_typed("h"));

        state.record_key(Some("h"), ElementState::Released, false);
        assert!(state.was_typed("h"));

        state.clear_frame_data();
        assert!(!state.was_typed("h"));
    }

    #[test]
    fn test_key_repeat_is_not_typed() {
        let mut state = InputState::new();
        state.record_key(Some("h"), ElementState::Pressed, true);
        assert!(!state.was_typed("h"));
        assert_eq!(state.typed_count("h"), 0);
    }

    #[test]
    fn test_typed_is_case_sensitive() {
        let mut state = InputState::new();
        state.record_key(Some("H"), ElementState::Pressed, false);
        assert!(!state.was_typed("h"));
        assert!(state.was_typed("H"));
    }

    #[test]
    fn test_typed_count_per_press() {
        let mut state = InputState::new();
        state.record_key(Some("h"), ElementState::Pressed, false);
        state.record_key(Some("h"), ElementState::Released, false);
        state.record_key(Some("x"), ElementState::Pressed, false);
        state.record_key(Some("h"), ElementState::Pressed, false);
        state.record_key(Some("h"), ElementState::Pressed, true);
        state.record_key(None, ElementState::Pressed, false);
        assert_eq!(state.typed_count("h"), 2);
        assert_eq!(state.typed_count("x"), 1);
    }
}
