//! Controller events from gilrs

use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use tracing::{info, warn};

use crate::input::{
    ControllerDescriptor, ControllerId, GamepadAxis, GamepadButton, GamepadType, InputEvent,
};

/// Polls gilrs and translates its events into controller [`InputEvent`]s
pub struct GamepadSource {
    gilrs: Gilrs,
}

impl GamepadSource {
    /// Opens the platform gamepad backend
    ///
    /// Already-connected pads are reported by the first [`Self::poll`].
    pub fn new() -> Result<Self, gilrs::Error> {
        let gilrs = Gilrs::new()?;
        info!(
            count = gilrs.gamepads().count(),
            "Gamepad backend initialized"
        );
        Ok(Self { gilrs })
    }

    /// Connect events for pads that were present before the first poll
    pub fn connected(&self) -> Vec<InputEvent> {
        self.gilrs
            .gamepads()
            .map(|(id, _)| self.connect_event(id))
            .collect()
    }

    /// Drains pending gilrs events, appending the translation to `out`
    pub fn poll(&mut self, out: &mut Vec<InputEvent>) {
        while let Some(event) = self.gilrs.next_event() {
            let id = controller_id(event.id);
            match event.event {
                EventType::Connected => out.push(self.connect_event(event.id)),
                EventType::Disconnected => out.push(InputEvent::ControllerDisconnected { id }),
                EventType::ButtonPressed(button, _) => {
                    if let Some(button) = map_button(button) {
                        out.push(InputEvent::ControllerButton {
                            id,
                            button: button.index(),
                            down: true,
                        });
                    }
                }
                EventType::ButtonReleased(button, _) => {
                    if let Some(button) = map_button(button) {
                        out.push(InputEvent::ControllerButton {
                            id,
                            button: button.index(),
                            down: false,
                        });
                    }
                }
                // Analog triggers arrive as button values
                EventType::ButtonChanged(button, value, _) => {
                    if let Some(axis) = trigger_axis(button) {
                        out.push(InputEvent::ControllerAxis {
                            id,
                            axis: axis.index(),
                            value: axis_to_raw(value),
                        });
                    }
                }
                EventType::AxisChanged(axis, value, _) => {
                    if let Some((axis, value)) = map_axis(axis, value) {
                        out.push(InputEvent::ControllerAxis {
                            id,
                            axis: axis.index(),
                            value: axis_to_raw(value),
                        });
                    }
                }
                EventType::Dropped => warn!(?id, "Gamepad events dropped"),
                _ => {}
            }
        }
    }

    fn connect_event(&self, id: GamepadId) -> InputEvent {
        let gamepad = self.gilrs.gamepad(id);
        let vendor = gamepad.vendor_id().unwrap_or_default();
        let descriptor = ControllerDescriptor {
            vendor,
            product: gamepad.product_id().unwrap_or_default(),
            gamepad_type: gamepad_type(vendor),
            ..ControllerDescriptor::gamepad(gamepad.name())
        };
        InputEvent::ControllerConnected {
            id: controller_id(id),
            descriptor,
        }
    }
}

fn controller_id(id: GamepadId) -> ControllerId {
    ControllerId(usize::from(id) as u32)
}

/// Maps a gilrs button onto the standard gamepad layout
pub fn map_button(button: Button) -> Option<GamepadButton> {
    Some(match button {
        Button::South => GamepadButton::South,
        Button::East => GamepadButton::East,
        Button::West => GamepadButton::West,
        Button::North => GamepadButton::North,
        Button::Select => GamepadButton::Back,
        Button::Mode => GamepadButton::Guide,
        Button::Start => GamepadButton::Start,
        Button::LeftThumb => GamepadButton::LeftStick,
        Button::RightThumb => GamepadButton::RightStick,
        Button::LeftTrigger => GamepadButton::LeftShoulder,
        Button::RightTrigger => GamepadButton::RightShoulder,
        Button::DPadUp => GamepadButton::DpadUp,
        Button::DPadDown => GamepadButton::DpadDown,
        Button::DPadLeft => GamepadButton::DpadLeft,
        Button::DPadRight => GamepadButton::DpadRight,
        _ => return None,
    })
}

fn trigger_axis(button: Button) -> Option<GamepadAxis> {
    match button {
        Button::LeftTrigger2 => Some(GamepadAxis::LeftTrigger),
        Button::RightTrigger2 => Some(GamepadAxis::RightTrigger),
        _ => None,
    }
}

/// Maps a gilrs axis onto the standard layout, where stick y grows downwards
pub fn map_axis(axis: Axis, value: f32) -> Option<(GamepadAxis, f32)> {
    match axis {
        Axis::LeftStickX => Some((GamepadAxis::LeftX, value)),
        Axis::LeftStickY => Some((GamepadAxis::LeftY, -value)),
        Axis::RightStickX => Some((GamepadAxis::RightX, value)),
        Axis::RightStickY => Some((GamepadAxis::RightY, -value)),
        _ => None,
    }
}

/// Converts a -1..1 value back to the raw `i16` range
pub fn axis_to_raw(value: f32) -> i16 {
    let value = value.clamp(-1.0, 1.0);
    if value >= 0.0 {
        (value * 32767.0).round() as i16
    } else {
        (value * 32768.0).round() as i16
    }
}

/// Best-effort controller family from the USB vendor id
pub fn gamepad_type(vendor: u16) -> GamepadType {
    match vendor {
        0x045e => GamepadType::XboxOne,
        0x054c => GamepadType::Ps4,
        0x057e => GamepadType::SwitchPro,
        _ => GamepadType::Unknown,
    }
}
