//! Raw input events delivered by the platform layer

use enum_map::Enum;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A raw device event, applied to the device tables in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor moved (window coordinates, logical pixels)
    MouseMove { position: Vec2, delta: Vec2 },

    /// Mouse button changed state
    MouseButton { button: MouseButton, down: bool },

    /// Mouse wheel scrolled (x, y) in wheel units
    MouseWheel { delta: Vec2 },

    /// Key changed state. Platform key-repeat events must not be sent.
    Key { key: Key, down: bool },

    /// Committed text input
    Text(String),

    /// A controller was plugged in
    ControllerConnected {
        id: ControllerId,
        descriptor: ControllerDescriptor,
    },

    /// A controller was removed
    ControllerDisconnected { id: ControllerId },

    /// Controller button changed state
    ControllerButton {
        id: ControllerId,
        button: u16,
        down: bool,
    },

    /// Controller axis moved; raw value in the full `i16` range
    ControllerAxis { id: ControllerId, axis: u16, value: i16 },
}

/// Stable identity the platform assigns to a physical controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub u32);

/// Controller family, as reported by the platform's gamepad database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamepadType {
    #[default]
    Unknown,
    Xbox360,
    XboxOne,
    Ps3,
    Ps4,
    Ps5,
    SwitchPro,
    SwitchJoyconLeft,
    SwitchJoyconRight,
    SwitchJoyconPair,
}

/// Static description of a connected controller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerDescriptor {
    pub name: String,
    pub button_count: u16,
    pub axis_count: u16,
    /// True when the device has a standard gamepad mapping
    pub is_gamepad: bool,
    pub gamepad_type: GamepadType,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}

impl ControllerDescriptor {
    /// Descriptor for a standard-mapped gamepad
    pub fn gamepad(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            button_count: GamepadButton::COUNT as u16,
            axis_count: GamepadAxis::COUNT as u16,
            is_gamepad: true,
            ..Default::default()
        }
    }

    /// Descriptor for a raw joystick with the given capabilities
    pub fn joystick(name: impl Into<String>, button_count: u16, axis_count: u16) -> Self {
        Self {
            name: name.into(),
            button_count,
            axis_count,
            ..Default::default()
        }
    }
}

/// Mouse button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

/// Standard gamepad buttons, numbered in SDL game controller order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamepadButton {
    South,
    East,
    West,
    North,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl GamepadButton {
    pub const COUNT: usize = 15;

    /// Index of this button in the controller's button table
    pub fn index(self) -> u16 {
        self as u16
    }
}

/// Standard gamepad axes, numbered in SDL game controller order
///
/// Stick axes span -1..1, triggers 0..1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamepadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

impl GamepadAxis {
    pub const COUNT: usize = 6;

    /// Index of this axis in the controller's axis table
    pub fn index(self) -> u16 {
        self as u16
    }
}

/// Physical key identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    // Common keys
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    CapsLock,

    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Numbers
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Arrows
    Left,
    Right,
    Up,
    Down,

    // Navigation
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    // Modifiers
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    LeftSuper,
    RightSuper,

    // Punctuation
    Minus,
    Equal,
    Comma,
    Period,
    Slash,
    Backslash,
    Semicolon,
    Quote,
    Backquote,
    BracketLeft,
    BracketRight,

    // Other
    Other,
}

/// Convert from winit key code
impl From<winit::keyboard::KeyCode> for Key {
    fn from(key: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode as WK;
        match key {
            WK::Space => Self::Space,
            WK::Enter | WK::NumpadEnter => Self::Enter,
            WK::Escape => Self::Escape,
            WK::Backspace => Self::Backspace,
            WK::Tab => Self::Tab,
            WK::CapsLock => Self::CapsLock,

            WK::KeyA => Self::A,
            WK::KeyB => Self::B,
            WK::KeyC => Self::C,
            WK::KeyD => Self::D,
            WK::KeyE => Self::E,
            WK::KeyF => Self::F,
            WK::KeyG => Self::G,
            WK::KeyH => Self::H,
            WK::KeyI => Self::I,
            WK::KeyJ => Self::J,
            WK::KeyK => Self::K,
            WK::KeyL => Self::L,
            WK::KeyM => Self::M,
            WK::KeyN => Self::N,
            WK::KeyO => Self::O,
            WK::KeyP => Self::P,
            WK::KeyQ => Self::Q,
            WK::KeyR => Self::R,
            WK::KeyS => Self::S,
            WK::KeyT => Self::T,
            WK::KeyU => Self::U,
            WK::KeyV => Self::V,
            WK::KeyW => Self::W,
            WK::KeyX => Self::X,
            WK::KeyY => Self::Y,
            WK::KeyZ => Self::Z,

            WK::Digit0 => Self::Num0,
            WK::Digit1 => Self::Num1,
            WK::Digit2 => Self::Num2,
            WK::Digit3 => Self::Num3,
            WK::Digit4 => Self::Num4,
            WK::Digit5 => Self::Num5,
            WK::Digit6 => Self::Num6,
            WK::Digit7 => Self::Num7,
            WK::Digit8 => Self::Num8,
            WK::Digit9 => Self::Num9,

            WK::F1 => Self::F1,
            WK::F2 => Self::F2,
            WK::F3 => Self::F3,
            WK::F4 => Self::F4,
            WK::F5 => Self::F5,
            WK::F6 => Self::F6,
            WK::F7 => Self::F7,
            WK::F8 => Self::F8,
            WK::F9 => Self::F9,
            WK::F10 => Self::F10,
            WK::F11 => Self::F11,
            WK::F12 => Self::F12,

            WK::ArrowLeft => Self::Left,
            WK::ArrowRight => Self::Right,
            WK::ArrowUp => Self::Up,
            WK::ArrowDown => Self::Down,

            WK::Insert => Self::Insert,
            WK::Delete => Self::Delete,
            WK::Home => Self::Home,
            WK::End => Self::End,
            WK::PageUp => Self::PageUp,
            WK::PageDown => Self::PageDown,

            WK::ShiftLeft => Self::LeftShift,
            WK::ShiftRight => Self::RightShift,
            WK::ControlLeft => Self::LeftControl,
            WK::ControlRight => Self::RightControl,
            WK::AltLeft => Self::LeftAlt,
            WK::AltRight => Self::RightAlt,
            WK::SuperLeft => Self::LeftSuper,
            WK::SuperRight => Self::RightSuper,

            WK::Minus => Self::Minus,
            WK::Equal => Self::Equal,
            WK::Comma => Self::Comma,
            WK::Period => Self::Period,
            WK::Slash => Self::Slash,
            WK::Backslash => Self::Backslash,
            WK::Semicolon => Self::Semicolon,
            WK::Quote => Self::Quote,
            WK::Backquote => Self::Backquote,
            WK::BracketLeft => Self::BracketLeft,
            WK::BracketRight => Self::BracketRight,

            _ => Self::Other,
        }
    }
}

impl TryFrom<winit::event::MouseButton> for MouseButton {
    type Error = ();

    fn try_from(button: winit::event::MouseButton) -> Result<Self, Self::Error> {
        use winit::event::MouseButton as WM;
        match button {
            WM::Left => Ok(Self::Left),
            WM::Right => Ok(Self::Right),
            WM::Middle => Ok(Self::Middle),
            WM::Back => Ok(Self::Back),
            WM::Forward => Ok(Self::Forward),
            WM::Other(_) => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamepad_indices_follow_sdl_order() {
        assert_eq!(GamepadButton::South.index(), 0);
        assert_eq!(GamepadButton::DpadRight.index(), 14);
        assert_eq!(GamepadAxis::LeftX.index(), 0);
        assert_eq!(GamepadAxis::RightTrigger.index(), 5);
    }

    #[test]
    fn gamepad_descriptor_covers_standard_layout() {
        let d = ControllerDescriptor::gamepad("Pad");
        assert!(d.is_gamepad);
        assert_eq!(d.button_count as usize, GamepadButton::COUNT);
        assert_eq!(d.axis_count as usize, GamepadAxis::COUNT);
    }

    #[test]
    fn winit_keys_map_to_keys() {
        use winit::keyboard::KeyCode as WK;
        assert_eq!(Key::from(WK::KeyW), Key::W);
        assert_eq!(Key::from(WK::ShiftLeft), Key::LeftShift);
        assert_eq!(Key::from(WK::NumpadEnter), Key::Enter);
        assert_eq!(Key::from(WK::MediaPlayPause), Key::Other);
    }
}
