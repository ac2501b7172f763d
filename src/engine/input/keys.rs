// Key identifiers, modifier masks and key references

use std::fmt;

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Identifier for a keyboard key or a pointer button
///
/// Keyboard keys are non-negative; pointer button `n` is `-n`, so both live
/// in one namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keycode(pub i32);

impl Keycode {
    /// Keycode of a physical keyboard key
    pub fn key(code: KeyCode) -> Self {
        Self(code as i32)
    }

    /// Keycode of pointer button number `button` (1 = left)
    pub fn button(button: u16) -> Self {
        Self(-i32::from(button))
    }

    /// Keycode of a winit mouse button
    pub fn mouse(button: MouseButton) -> Self {
        Self::button(button_number(button))
    }

    pub fn is_button(&self) -> bool {
        self.0 < 0
    }

    pub fn raw(&self) -> i32 {
        self.0
    }
}

impl From<KeyCode> for Keycode {
    fn from(code: KeyCode) -> Self {
        Self::key(code)
    }
}

impl From<MouseButton> for Keycode {
    fn from(button: MouseButton) -> Self {
        Self::mouse(button)
    }
}

impl fmt::Display for Keycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_button() {
            write!(f, "button{}", -self.0)
        } else {
            write!(f, "key{}", self.0)
        }
    }
}

/// Pointer button numbering: left 1, middle 2, right 3, back 4, forward 5
pub fn button_number(button: MouseButton) -> u16 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Middle => 2,
        MouseButton::Right => 3,
        MouseButton::Back => 4,
        MouseButton::Forward => 5,
        MouseButton::Other(n) => n.saturating_add(6),
    }
}

bitflags::bitflags! {
    /// Modifier keys held while a key or button event happened.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

impl Modifiers {
    /// OR together every modifier a query requires
    pub fn combine<I: IntoIterator<Item = Modifiers>>(required: I) -> Self {
        required
            .into_iter()
            .fold(Modifiers::empty(), |acc, flag| acc | flag)
    }

    /// Whether an event carrying `self` satisfies `required`
    ///
    /// Extra held modifiers are allowed; an empty requirement matches anything.
    pub fn satisfies(self, required: Modifiers) -> bool {
        self.contains(required)
    }
}

/// A key named either by code or by a printable alias such as `"a"`
///
/// Aliases only resolve once a key-down producing that text has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRef<'a> {
    Code(Keycode),
    Alias(&'a str),
}

impl From<Keycode> for KeyRef<'_> {
    fn from(code: Keycode) -> Self {
        KeyRef::Code(code)
    }
}

impl From<KeyCode> for KeyRef<'_> {
    fn from(code: KeyCode) -> Self {
        KeyRef::Code(Keycode::key(code))
    }
}

impl From<MouseButton> for KeyRef<'_> {
    fn from(button: MouseButton) -> Self {
        KeyRef::Code(Keycode::mouse(button))
    }
}

impl<'a> From<&'a str> for KeyRef<'a> {
    fn from(alias: &'a str) -> Self {
        KeyRef::Alias(alias)
    }
}

impl<'a> From<&'a String> for KeyRef<'a> {
    fn from(alias: &'a String) -> Self {
        KeyRef::Alias(alias.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_are_negative() {
        assert_eq!(Keycode::mouse(MouseButton::Left), Keycode(-1));
        assert_eq!(Keycode::mouse(MouseButton::Middle), Keycode(-2));
        assert_eq!(Keycode::mouse(MouseButton::Right), Keycode(-3));
        assert!(Keycode::button(1).is_button());
    }

    #[test]
    fn test_keys_are_non_negative() {
        let code = Keycode::key(KeyCode::KeyA);
        assert!(code.raw() >= 0);
        assert!(!code.is_button());
        assert_ne!(Keycode::key(KeyCode::KeyA), Keycode::key(KeyCode::KeyB));
    }

    #[test]
    fn test_other_buttons_do_not_collide_with_named_ones() {
        let named: Vec<u16> = [
            MouseButton::Left,
            MouseButton::Middle,
            MouseButton::Right,
            MouseButton::Back,
            MouseButton::Forward,
        ]
        .into_iter()
        .map(button_number)
        .collect();

        for n in 0..4 {
            assert!(!named.contains(&button_number(MouseButton::Other(n))));
        }
    }

    #[test]
    fn test_combine_ors_flags() {
        let combined = Modifiers::combine([Modifiers::CTRL, Modifiers::SHIFT]);
        assert_eq!(combined, Modifiers::CTRL | Modifiers::SHIFT);
        assert_eq!(Modifiers::combine([]), Modifiers::empty());
        assert_eq!(Modifiers::combine(Modifiers::ALT), Modifiers::ALT);
    }

    #[test]
    fn test_satisfies() {
        let held = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(held.satisfies(Modifiers::CTRL));
        assert!(held.satisfies(Modifiers::empty()));
        assert!(!Modifiers::SHIFT.satisfies(Modifiers::CTRL));
        assert!(!Modifiers::CTRL.satisfies(Modifiers::CTRL | Modifiers::ALT));
    }

    #[test]
    fn test_key_ref_conversions() {
        assert_eq!(KeyRef::from("a"), KeyRef::Alias("a"));
        assert_eq!(KeyRef::from(Keycode(7)), KeyRef::Code(Keycode(7)));
        assert_eq!(
            KeyRef::from(MouseButton::Left),
            KeyRef::Code(Keycode::button(1))
        );
    }

    #[test]
    fn test_keycode_display() {
        assert_eq!(Keycode::button(2).to_string(), "button2");
        assert_eq!(Keycode(12).to_string(), "key12");
    }
}
