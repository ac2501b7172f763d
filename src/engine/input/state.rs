// Per-frame input aggregation

use super::event::RawEvent;
use super::keys::{KeyRef, Keycode, Modifiers};
use std::collections::{HashMap, HashSet};

/// Aggregated input state
///
/// `down` and the alias table persist for the whole session. The pressed and
/// released sets only describe the current frame and are emptied at the
/// start of every frame's event processing.
#[derive(Debug)]
pub struct InputState {
    /// Keys and buttons currently held
    down: HashSet<Keycode>,

    /// (code, modifiers) pressed this frame
    pressed: HashSet<(Keycode, Modifiers)>,

    /// (code, modifiers) released this frame
    released: HashSet<(Keycode, Modifiers)>,

    /// Text -> keycode, learned from key-down events
    aliases: HashMap<String, Keycode>,

    /// Pointer position in logical coordinates
    pointer: (f32, f32),

    /// Modifier keys currently held
    modifiers: Modifiers,

    /// Device pixels per logical pixel
    scale: f32,
}

impl InputState {
    /// Create input state for a display scaled by `scale`
    pub fn new(scale: u32) -> Self {
        Self {
            down: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
            aliases: HashMap::new(),
            pointer: (0.0, 0.0),
            modifiers: Modifiers::empty(),
            scale: scale.max(1) as f32,
        }
    }

    /// Replace the transient sets with this frame's events
    ///
    /// Must run exactly once per frame, before the frame callback.
    pub fn process_frame<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a RawEvent>,
    {
        self.begin_frame();
        for event in events {
            self.apply(event);
        }
    }

    /// Empty the pressed and released sets
    pub fn begin_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }

    /// Apply a single raw event
    pub fn apply(&mut self, event: &RawEvent) {
        match event {
            RawEvent::KeyDown {
                code,
                modifiers,
                text,
            } => {
                self.press(*code, *modifiers);
                if let Some(text) = text.as_deref().filter(|t| !t.is_empty()) {
                    self.learn_alias(text, *code);
                }
            }
            RawEvent::KeyUp { code, modifiers } => {
                self.release(*code, *modifiers);
            }
            RawEvent::ButtonDown {
                button,
                modifiers,
                position,
            } => {
                self.press(Keycode::button(*button), *modifiers);
                self.move_pointer(*position);
            }
            RawEvent::ButtonUp {
                button,
                modifiers,
                position,
            } => {
                self.release(Keycode::button(*button), *modifiers);
                self.move_pointer(*position);
            }
            RawEvent::PointerMoved { position } => {
                self.move_pointer(*position);
            }
            RawEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
            }
            RawEvent::Quit => {}
        }
    }

    fn press(&mut self, code: Keycode, modifiers: Modifiers) {
        self.modifiers = modifiers;
        self.down.insert(code);
        self.pressed.insert((code, modifiers));
    }

    fn release(&mut self, code: Keycode, modifiers: Modifiers) {
        self.modifiers = modifiers;
        self.released.insert((code, modifiers));
        // Releasing a key that was never seen going down is a no-op
        self.down.remove(&code);
    }

    fn learn_alias(&mut self, text: &str, code: Keycode) {
        if !self.aliases.contains_key(text) {
            log::debug!("learned key alias {:?} -> {}", text, code);
            self.aliases.insert(text.to_string(), code);
        }
    }

    fn move_pointer(&mut self, (x, y): (f32, f32)) {
        self.pointer = (x / self.scale, y / self.scale);
    }

    /// Resolve a key reference to a code
    ///
    /// Returns `None` for an alias whose text has never been typed.
    pub fn resolve(&self, key: KeyRef<'_>) -> Option<Keycode> {
        match key {
            KeyRef::Code(code) => Some(code),
            KeyRef::Alias(text) => self.aliases.get(text).copied(),
        }
    }

    /// Check if a key or button is currently held
    pub fn is_down<'a>(&self, key: impl Into<KeyRef<'a>>) -> bool {
        self.resolve(key.into())
            .is_some_and(|code| self.down.contains(&code))
    }

    /// Check if a key was pressed this frame, with any modifiers
    pub fn was_pressed<'a>(&self, key: impl Into<KeyRef<'a>>) -> bool {
        self.was_pressed_with(key, Modifiers::empty())
    }

    /// Check if a key was pressed this frame while all `required` modifiers were held
    pub fn was_pressed_with<'a, M>(&self, key: impl Into<KeyRef<'a>>, required: M) -> bool
    where
        M: IntoIterator<Item = Modifiers>,
    {
        Self::matches(&self.pressed, self.resolve(key.into()), required)
    }

    /// Check if a key was released this frame, with any modifiers
    pub fn was_released<'a>(&self, key: impl Into<KeyRef<'a>>) -> bool {
        self.was_released_with(key, Modifiers::empty())
    }

    /// Check if a key was released this frame while all `required` modifiers were held
    pub fn was_released_with<'a, M>(&self, key: impl Into<KeyRef<'a>>, required: M) -> bool
    where
        M: IntoIterator<Item = Modifiers>,
    {
        Self::matches(&self.released, self.resolve(key.into()), required)
    }

    fn matches<M>(
        transitions: &HashSet<(Keycode, Modifiers)>,
        code: Option<Keycode>,
        required: M,
    ) -> bool
    where
        M: IntoIterator<Item = Modifiers>,
    {
        let Some(code) = code else {
            return false;
        };
        let required = Modifiers::combine(required);

        transitions
            .iter()
            .any(|&(c, mods)| c == code && mods.satisfies(required))
    }

    /// Pointer position in logical coordinates
    pub fn pointer_position(&self) -> (f32, f32) {
        self.pointer
    }

    /// Modifier keys currently held
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Look up the code learned for `text`
    pub fn alias(&self, text: &str) -> Option<Keycode> {
        self.aliases.get(text).copied()
    }

    /// Get all currently held codes
    pub fn down_codes(&self) -> Vec<Keycode> {
        self.down.iter().copied().collect()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(1)
    }
}
