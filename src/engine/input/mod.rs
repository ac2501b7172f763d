// Input handling system
//
// Turns the raw platform event stream into per-frame queries: what is held,
// what was pressed or released this frame (with modifiers), and where the
// pointer is.
//
// ## Architecture
//
// - `keys`: Keycodes, modifier masks and `KeyRef` (code or typed alias)
// - `event`: Platform-agnostic raw events
// - `state`: Per-frame aggregation and queries
// - `platform`: winit -> raw event translation
//
// ## Usage Example
//
// ```rust
// use simple_engine::input::{InputState, Modifiers, RawEvent};
//
// let mut input = InputState::new(pixel_size);
//
// // Once per frame, before the frame callback
// input.process_frame(&events);
//
// if input.was_pressed_with("s", Modifiers::CTRL) {
//     // Ctrl+S this frame
// }
// ```

pub mod event;
pub mod keys;
pub mod platform;
pub mod state;

// Re-export commonly used types
pub use event::RawEvent;
pub use keys::{KeyRef, Keycode, Modifiers};
pub use platform::EventTranslator;
pub use state::InputState;

// Physical key names for building keycodes
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
