use crate::action::Action;

/// Turntable rotation per frame while the left mouse button is held.
pub const ROTATE_PER_FRAME: f32 = 0.01;
/// Rotation or tilt per arrow key press.
pub const KEY_STEP: f32 = 0.05;
/// Extent factor per zoom key press.
pub const ZOOM_STEP: f32 = 1.1;

/// Window-system independent key identifiers the desktop app binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Plus,
    Minus,
    G,
    R,
    Tab,
    F1,
    Escape,
}

/// Map a key press to its action.
pub fn key_action(key: Key) -> Action {
    match key {
        Key::Left => Action::Rotate(-KEY_STEP),
        Key::Right => Action::Rotate(KEY_STEP),
        Key::Up => Action::Tilt(-KEY_STEP),
        Key::Down => Action::Tilt(KEY_STEP),
        Key::Plus => Action::Zoom(1.0 / ZOOM_STEP),
        Key::Minus => Action::Zoom(ZOOM_STEP),
        Key::G => Action::GrowRing,
        Key::R => Action::Reset,
        Key::Tab => Action::ToggleRule,
        Key::F1 => Action::ToggleInspector,
        Key::Escape => Action::Quit,
    }
}

/// Held-button state sampled once per frame.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    rotating: bool,
    pending: Vec<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rotating(&mut self, held: bool) {
        self.rotating = held;
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn press(&mut self, key: Key) {
        let action = key_action(key);
        tracing::debug!(?key, ?action, "key pressed");
        self.pending.push(action);
    }

    /// Drain the actions for one frame: key presses in order, then the
    /// continuous mouse rotation.
    pub fn frame_actions(&mut self) -> Vec<Action> {
        let mut actions = std::mem::take(&mut self.pending);
        if self.rotating {
            actions.push(Action::Rotate(ROTATE_PER_FRAME));
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_frame_is_empty() {
        let mut state = InputState::new();
        assert!(state.frame_actions().is_empty());
    }

    #[test]
    fn held_mouse_rotates_every_frame() {
        let mut state = InputState::new();
        state.set_rotating(true);
        for _ in 0..3 {
            assert_eq!(state.frame_actions(), vec![Action::Rotate(ROTATE_PER_FRAME)]);
        }
        state.set_rotating(false);
        assert!(state.frame_actions().is_empty());
    }

    #[test]
    fn key_presses_drain_once() {
        let mut state = InputState::new();
        state.press(Key::G);
        state.press(Key::Tab);
        assert_eq!(state.frame_actions(), vec![Action::GrowRing, Action::ToggleRule]);
        assert!(state.frame_actions().is_empty());
    }

    #[test]
    fn zoom_keys_are_inverse() {
        let (Action::Zoom(a), Action::Zoom(b)) = (key_action(Key::Plus), key_action(Key::Minus)) else {
            panic!("zoom keys must zoom");
        };
        assert!(a < 1.0 && b > 1.0);
        assert!((a * b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn escape_quits() {
        assert_eq!(key_action(Key::Escape), Action::Quit);
        assert_eq!(key_action(Key::F1), Action::ToggleInspector);
    }
}
