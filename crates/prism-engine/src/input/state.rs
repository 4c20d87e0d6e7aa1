use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// Current input state for one window.
///
/// Holds "is down" information and the pointer position in physical pixels
/// (physical, because the letterbox inverse mapping operates on framebuffer
/// coordinates).
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
    pub pointer_pos: Option<(f32, f32)>,
}

impl InputState {
    pub fn on_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons_down.insert(button);
        } else {
            self.buttons_down.remove(&button);
        }
    }

    pub fn on_pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer_pos = Some((x, y));
    }

    pub fn on_pointer_left(&mut self) {
        self.pointer_pos = None;
    }

    /// Focus loss clears the "down" sets so keys cannot stick mid-press.
    pub fn on_focus(&mut self, focused: bool) {
        if !focused {
            self.keys_down.clear();
            self.buttons_down.clear();
        }
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_and_release_round_trip() {
        let mut state = InputState::default();
        state.on_key(Key::W, true);
        assert!(state.is_key_down(Key::W));
        state.on_key(Key::W, false);
        assert!(!state.is_key_down(Key::W));
    }

    #[test]
    fn focus_loss_clears_held_input() {
        let mut state = InputState::default();
        state.on_key(Key::Space, true);
        state.on_mouse_button(MouseButton::Left, true);
        state.on_focus(false);
        assert!(!state.is_key_down(Key::Space));
        assert!(!state.is_button_down(MouseButton::Left));
    }

    #[test]
    fn function_keys_track_like_any_key() {
        let mut state = InputState::default();
        state.on_key(Key::F5, true);
        state.on_key(Key::F12, true);
        assert!(state.is_key_down(Key::F5));
        state.on_key(Key::F5, false);
        assert!(!state.is_key_down(Key::F5));
        assert!(state.is_key_down(Key::F12));
    }

    #[test]
    fn pointer_leaving_clears_position() {
        let mut state = InputState::default();
        state.on_pointer_moved(10.0, 20.0);
        assert_eq!(state.pointer_pos, Some((10.0, 20.0)));
        state.on_pointer_left();
        assert_eq!(state.pointer_pos, None);
    }
}
