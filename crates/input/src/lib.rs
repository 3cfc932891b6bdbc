//! Input handling for keyboard and pointer, plus hover/click tracking over pickable objects.

pub mod pointer;

pub use pointer::*;

use glam::Vec2;
use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,

    /// Mouse buttons currently held.
    mouse_held: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_pressed: HashSet<MouseButton>,
    /// Mouse buttons released this frame.
    mouse_released: HashSet<MouseButton>,

    /// Cursor position in window coordinates.
    cursor_position: Vec2,
    /// Cursor movement this frame.
    cursor_delta: Vec2,
    /// Movement accumulated since the last `begin_frame`.
    accumulated_delta: Vec2,

    /// Scroll lines this frame (positive = away from the user).
    scroll: f32,
    accumulated_scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.mouse_released.clear();
        self.cursor_delta = self.accumulated_delta;
        self.accumulated_delta = Vec2::ZERO;
        self.scroll = self.accumulated_scroll;
        self.accumulated_scroll = 0.0;
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    /// Process a mouse button event.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.mouse_held.contains(&button) {
                    self.mouse_pressed.insert(button);
                }
                self.mouse_held.insert(button);
            }
            ElementState::Released => {
                self.mouse_held.remove(&button);
                self.mouse_released.insert(button);
            }
        }
    }

    /// Process cursor position update. Movement feeds the per-frame delta.
    pub fn process_cursor_position(&mut self, position: (f64, f64)) {
        let next = Vec2::new(position.0 as f32, position.1 as f32);
        self.accumulated_delta += next - self.cursor_position;
        self.cursor_position = next;
    }

    /// Process a wheel event in lines.
    pub fn process_scroll(&mut self, lines: f32) {
        self.accumulated_scroll += lines;
    }

    // Query methods

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a mouse button is held.
    pub fn is_mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Check if a mouse button was released this frame.
    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released.contains(&button)
    }

    /// Get the cursor position in window coordinates.
    pub fn cursor_position(&self) -> Vec2 {
        self.cursor_position
    }

    /// Cursor movement during the last frame.
    pub fn cursor_delta(&self) -> Vec2 {
        self.cursor_delta
    }

    /// Drag delta for orbiting: cursor movement while the primary button is held.
    pub fn drag_delta(&self) -> Vec2 {
        if self.is_mouse_held(MouseButton::Left) {
            self.cursor_delta
        } else {
            Vec2::ZERO
        }
    }

    /// Scroll lines during the last frame.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Toggle mute (M).
    pub fn is_mute_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyM)
    }

    /// Toggle weather (R).
    pub fn is_weather_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::KeyR)
    }

    /// Close the open modal (Escape).
    pub fn is_close_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_is_one_shot() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyM, ElementState::Pressed);
        assert!(input.is_mute_pressed());
        input.begin_frame();
        input.process_keyboard(KeyCode::KeyM, ElementState::Pressed);
        assert!(!input.is_mute_pressed(), "held key must not repeat");
    }

    #[test]
    fn drag_delta_only_while_button_held() {
        let mut input = InputState::new();
        input.process_cursor_position((100.0, 100.0));
        input.begin_frame();
        input.process_cursor_position((110.0, 95.0));
        input.begin_frame();
        assert_eq!(input.cursor_delta(), Vec2::new(10.0, -5.0));
        assert_eq!(input.drag_delta(), Vec2::ZERO);

        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        input.process_cursor_position((120.0, 95.0));
        input.begin_frame();
        assert_eq!(input.drag_delta(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn scroll_accumulates_per_frame() {
        let mut input = InputState::new();
        input.process_scroll(1.0);
        input.process_scroll(2.0);
        input.begin_frame();
        assert_eq!(input.scroll(), 3.0);
        input.begin_frame();
        assert_eq!(input.scroll(), 0.0);
    }
}
