// Translation of winit window events into raw input events

use super::event::RawEvent;
use super::keys::{button_number, Keycode, Modifiers};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{ModifiersState, PhysicalKey};

/// Stateful winit -> `RawEvent` translator
///
/// winit reports modifier changes and cursor motion as separate events, so
/// the translator remembers both and stamps them onto key and button events.
#[derive(Debug, Default)]
pub struct EventTranslator {
    modifiers: Modifiers,
    cursor: (f32, f32),
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a window event, returning `None` for events input does not track
    pub fn translate(&mut self, event: &WindowEvent) -> Option<RawEvent> {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(RawEvent::Quit),

            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = map_modifiers(m.state());
                Some(RawEvent::ModifiersChanged(self.modifiers))
            }

            WindowEvent::Focused(false) => {
                // Modifier releases are not delivered while unfocused
                self.modifiers = Modifiers::empty();
                Some(RawEvent::ModifiersChanged(self.modifiers))
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                Some(RawEvent::PointerMoved {
                    position: self.cursor,
                })
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let button = button_number(*button);
                Some(match state {
                    ElementState::Pressed => RawEvent::ButtonDown {
                        button,
                        modifiers: self.modifiers,
                        position: self.cursor,
                    },
                    ElementState::Released => RawEvent::ButtonUp {
                        button,
                        modifiers: self.modifiers,
                        position: self.cursor,
                    },
                })
            }

            WindowEvent::KeyboardInput { event, .. } => {
                // Only physical keys get a stable code
                let PhysicalKey::Code(key_code) = event.physical_key else {
                    return None;
                };
                let code = Keycode::key(key_code);

                match event.state {
                    // Auto-repeat is not a new press
                    ElementState::Pressed if event.repeat => None,
                    ElementState::Pressed => Some(RawEvent::KeyDown {
                        code,
                        modifiers: self.modifiers,
                        text: event.text.as_ref().map(|t| t.to_string()),
                    }),
                    ElementState::Released => Some(RawEvent::KeyUp {
                        code,
                        modifiers: self.modifiers,
                    }),
                }
            }

            _ => None,
        }
    }

    /// Modifiers currently held according to the platform
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

/// Map winit modifier state to the engine's mask
pub fn map_modifiers(state: ModifiersState) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::SHIFT, state.shift_key());
    modifiers.set(Modifiers::CTRL, state.control_key());
    modifiers.set(Modifiers::ALT, state.alt_key());
    modifiers.set(Modifiers::META, state.super_key());
    modifiers
}
