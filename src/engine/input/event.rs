// Platform-agnostic raw input events

use super::keys::{Keycode, Modifiers};

/// One raw event from the platform queue
///
/// Positions are in device (window) pixels; `InputState` converts them to
/// logical surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    /// Window close or other platform-level termination request
    Quit,

    KeyDown {
        code: Keycode,
        modifiers: Modifiers,
        /// Text produced by the key, if any
        text: Option<String>,
    },

    KeyUp {
        code: Keycode,
        modifiers: Modifiers,
    },

    ButtonDown {
        /// Button number, 1 = left
        button: u16,
        modifiers: Modifiers,
        position: (f32, f32),
    },

    ButtonUp {
        button: u16,
        modifiers: Modifiers,
        position: (f32, f32),
    },

    PointerMoved {
        position: (f32, f32),
    },

    /// The set of held modifier keys changed
    ModifiersChanged(Modifiers),
}

impl RawEvent {
    /// Key-down without text or modifiers
    pub fn key_down(code: Keycode) -> Self {
        RawEvent::KeyDown {
            code,
            modifiers: Modifiers::empty(),
            text: None,
        }
    }

    /// Key-down that produced `text`
    pub fn key_typed(code: Keycode, text: &str) -> Self {
        RawEvent::KeyDown {
            code,
            modifiers: Modifiers::empty(),
            text: Some(text.to_string()),
        }
    }

    pub fn key_up(code: Keycode) -> Self {
        RawEvent::KeyUp {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, RawEvent::Quit)
    }
}
