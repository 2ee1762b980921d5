use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held buttons, pointer position).
/// `InputFrame` provides the events and accumulated motion of the current frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Pointer motion accumulated this frame, in logical pixels.
    pub pointer_delta: (f32, f32),

    /// Vertical wheel motion accumulated this frame, in lines (positive = away from user).
    pub wheel_lines: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.pointer_delta = (0.0, 0.0);
        self.wheel_lines = 0.0;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Key presses of this frame in arrival order, key repeats included, with
    /// the modifiers held at each press.
    pub fn key_presses(&self) -> impl Iterator<Item = (Key, Modifiers)> + '_ {
        self.events.iter().filter_map(|ev| match ev {
            InputEvent::Key { key, state: KeyState::Pressed, modifiers, .. } => {
                Some((*key, *modifiers))
            }
            _ => None,
        })
    }
}
