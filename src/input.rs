//! Input handling for the viewer.
//!
//! [`Input`] turns raw winit window events into the few things the viewer
//! cares about: the pointer in normalized device coordinates, toggle requests,
//! left-drag orbit deltas and scroll.
//!
//! ```ignore
//! input.handle_event(&event);
//! // ... on redraw:
//! if input.toggle_requested() {
//!     state = state.toggled();
//! }
//! input.begin_frame();
//! ```

use glam::Vec2;
use std::collections::HashSet;
use std::hash::Hash;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Pointer buttons the viewer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Orbit while held.
    Left,
    /// Toggles the tree.
    Right,
    Middle,
}

impl TryFrom<WinitMouseButton> for MouseButton {
    type Error = ();

    fn try_from(button: WinitMouseButton) -> Result<Self, ()> {
        Ok(match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => return Err(()),
        })
    }
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Enter,
    Escape,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => KeyCode::Enter,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// Down/up tracking for one kind of button. `pressed` only holds edges seen
/// since the last [`ButtonSet::clear_edges`].
#[derive(Debug)]
struct ButtonSet<T> {
    down: HashSet<T>,
    pressed: HashSet<T>,
}

impl<T> Default for ButtonSet<T> {
    fn default() -> Self {
        Self {
            down: HashSet::new(),
            pressed: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> ButtonSet<T> {
    fn apply(&mut self, button: T, state: ElementState) {
        match state {
            // OS key repeat arrives as more presses; only the first one is an edge.
            ElementState::Pressed => {
                if self.down.insert(button) {
                    self.pressed.insert(button);
                }
            }
            ElementState::Released => {
                self.down.remove(&button);
            }
        }
    }

    fn is_down(&self, button: T) -> bool {
        self.down.contains(&button)
    }

    fn went_down(&self, button: T) -> bool {
        self.pressed.contains(&button)
    }

    fn clear_edges(&mut self) {
        self.pressed.clear();
    }

    fn release_all(&mut self) {
        self.down.clear();
    }
}

/// Keyboard and pointer state for one window.
#[derive(Debug)]
pub struct Input {
    keys: ButtonSet<KeyCode>,
    buttons: ButtonSet<MouseButton>,

    /// Last cursor position in physical pixels.
    cursor: Vec2,
    ndc: Vec2,
    /// Cursor travel since the last `begin_frame`.
    travel: Vec2,
    wheel: f32,

    width: u32,
    height: u32,
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Input {
    /// The pointer sits at the window centre (NDC origin) until the cursor moves.
    pub fn new() -> Self {
        Self {
            keys: ButtonSet::default(),
            buttons: ButtonSet::default(),
            cursor: Vec2::ZERO,
            ndc: Vec2::ZERO,
            travel: Vec2::ZERO,
            wheel: 0.0,
            width: 800,
            height: 600,
        }
    }

    /// `true` on the frame `key` went down.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys.went_down(key)
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys.is_down(key)
    }

    /// `true` on the frame `button` went down.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.buttons.went_down(button)
    }

    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.buttons.is_down(button)
    }

    /// Whether the user asked to flip between chaos and formed this frame.
    ///
    /// Space, Enter or a right click.
    pub fn toggle_requested(&self) -> bool {
        self.key_pressed(KeyCode::Space)
            || self.key_pressed(KeyCode::Enter)
            || self.mouse_pressed(MouseButton::Right)
    }

    /// Pointer in normalized device coordinates (-1 to 1, Y up).
    pub fn pointer_ndc(&self) -> Vec2 {
        self.ndc
    }

    /// Pointer in window pixels.
    pub fn pointer_position(&self) -> Vec2 {
        self.cursor
    }

    pub fn pointer_delta(&self) -> Vec2 {
        self.travel
    }

    /// Cursor travel this frame, or zero unless the left button is down.
    pub fn drag_delta(&self) -> Vec2 {
        if self.mouse_held(MouseButton::Left) {
            self.travel
        } else {
            Vec2::ZERO
        }
    }

    /// Wheel notches this frame, positive away from the user.
    pub fn scroll_delta(&self) -> f32 {
        self.wheel
    }

    /// Drop this frame's edges and deltas. Call once the frame has read them.
    pub fn begin_frame(&mut self) {
        self.keys.clear_edges();
        self.buttons.clear_edges();
        self.travel = Vec2::ZERO;
        self.wheel = 0.0;
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Fold one winit window event into the tracked state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.keys.apply(KeyCode::from(code), event.state);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Ok(button) = MouseButton::try_from(*button) {
                    self.buttons.apply(button, *state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_pointer(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.wheel += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }
            WindowEvent::Focused(false) => {
                // Releases that happen while unfocused never arrive.
                self.keys.release_all();
                self.buttons.release_all();
            }
            _ => {}
        }
    }

    fn move_pointer(&mut self, position: Vec2) {
        self.travel += position - self.cursor;
        self.cursor = position;

        if self.width == 0 || self.height == 0 {
            return;
        }
        let size = Vec2::new(self.width as f32, self.height as f32);
        let uv = position / size;
        self.ndc = Vec2::new(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_fires_once_per_press() {
        let mut input = Input::new();
        assert!(!input.toggle_requested());

        input.keys.apply(KeyCode::Space, ElementState::Pressed);
        assert!(input.toggle_requested());

        // Key repeat while held is not a new press.
        input.begin_frame();
        input.keys.apply(KeyCode::Space, ElementState::Pressed);
        assert!(input.key_held(KeyCode::Space));
        assert!(!input.toggle_requested());

        input.keys.apply(KeyCode::Space, ElementState::Released);
        input.keys.apply(KeyCode::Space, ElementState::Pressed);
        assert!(input.toggle_requested());
    }

    #[test]
    fn test_toggle_from_right_click() {
        let mut input = Input::new();
        input.buttons.apply(MouseButton::Right, ElementState::Pressed);
        assert!(input.toggle_requested());
    }

    #[test]
    fn test_pointer_ndc_flips_y() {
        let mut input = Input::new();
        input.set_window_size(800, 600);

        input.move_pointer(Vec2::new(400.0, 300.0));
        assert!(input.pointer_ndc().abs().max_element() < 0.01);

        input.move_pointer(Vec2::new(800.0, 0.0));
        assert!((input.pointer_ndc() - Vec2::new(1.0, 1.0)).length() < 0.01);

        input.move_pointer(Vec2::new(0.0, 600.0));
        assert!((input.pointer_ndc() - Vec2::new(-1.0, -1.0)).length() < 0.01);
    }

    #[test]
    fn test_drag_requires_left_button() {
        let mut input = Input::new();
        input.move_pointer(Vec2::new(10.0, 10.0));
        input.begin_frame();
        input.move_pointer(Vec2::new(15.0, 12.0));
        assert_eq!(input.pointer_delta(), Vec2::new(5.0, 2.0));
        assert_eq!(input.drag_delta(), Vec2::ZERO);

        input.buttons.apply(MouseButton::Left, ElementState::Pressed);
        assert_eq!(input.drag_delta(), Vec2::new(5.0, 2.0));
    }

    #[test]
    fn test_focus_loss_releases_held_buttons() {
        let mut input = Input::new();
        input.buttons.apply(MouseButton::Left, ElementState::Pressed);
        input.handle_event(&WindowEvent::Focused(false));
        assert!(!input.mouse_held(MouseButton::Left));
    }
}
