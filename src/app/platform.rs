//! Translation of winit window events into [`InputEvent`]s

use enum_map::EnumMap;
use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, Ime, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

use crate::input::{InputEvent, Key, MouseButton};

/// Pixels per wheel line, for touchpads that report pixel deltas
const PIXELS_PER_LINE: f32 = 20.0;

/// Stateful winit → input event translator
///
/// Tracks the last cursor position so moves carry a delta, the DPI scale so
/// positions are reported in logical pixels, and held controls so losing focus
/// releases them.
#[derive(Debug, Clone)]
pub struct PlatformInput {
    last_cursor: Option<Vec2>,
    scale_factor: f32,
    held_keys: EnumMap<Key, bool>,
    held_buttons: EnumMap<MouseButton, bool>,
}

impl PlatformInput {
    pub fn new() -> Self {
        Self {
            last_cursor: None,
            scale_factor: 1.0,
            held_keys: EnumMap::default(),
            held_buttons: EnumMap::default(),
        }
    }

    /// Update scale factor (DPI scaling)
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    /// Translates one window event, appending the results to `out`
    pub fn translate(&mut self, event: &WindowEvent, out: &mut Vec<InputEvent>) {
        match event {
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale_factor(*scale_factor as f32);
            }

            WindowEvent::CursorMoved { position, .. } => {
                out.push(self.cursor_moved(*position));
            }

            WindowEvent::CursorLeft { .. } => {
                self.last_cursor = None;
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Ok(button) = MouseButton::try_from(*button) {
                    let down = state.is_pressed();
                    self.held_buttons[button] = down;
                    out.push(InputEvent::MouseButton { button, down });
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                out.push(InputEvent::MouseWheel {
                    delta: wheel_units(*delta),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                for translated in key_events(
                    event.physical_key,
                    event.state,
                    event.repeat,
                    event.text.as_deref(),
                ) {
                    if let InputEvent::Key { key, down } = translated {
                        self.held_keys[key] = down;
                    }
                    out.push(translated);
                }
            }

            WindowEvent::Ime(Ime::Commit(text)) if !text.is_empty() => {
                out.push(InputEvent::Text(text.clone()));
            }

            // Releases for held controls never arrive once focus is gone
            WindowEvent::Focused(false) => {
                self.last_cursor = None;
                self.release_all(out);
            }

            _ => {}
        }
    }

    /// Emits a release for every key and mouse button still held
    pub fn release_all(&mut self, out: &mut Vec<InputEvent>) {
        for (key, held) in self.held_keys.iter_mut() {
            if std::mem::take(held) {
                out.push(InputEvent::Key { key, down: false });
            }
        }
        for (button, held) in self.held_buttons.iter_mut() {
            if std::mem::take(held) {
                out.push(InputEvent::MouseButton {
                    button,
                    down: false,
                });
            }
        }
    }

    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> InputEvent {
        let position = Vec2::new(position.x as f32, position.y as f32) / self.scale_factor;
        let delta = self
            .last_cursor
            .map_or(Vec2::ZERO, |last| position - last);
        self.last_cursor = Some(position);
        InputEvent::MouseMove { position, delta }
    }
}

impl Default for PlatformInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts a wheel delta to line units
pub fn wheel_units(delta: MouseScrollDelta) -> Vec2 {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => Vec2::new(x, y),
        MouseScrollDelta::PixelDelta(pos) => {
            Vec2::new(pos.x as f32, pos.y as f32) / PIXELS_PER_LINE
        }
    }
}

/// Key state change and committed text for one keyboard event
///
/// Auto-repeats produce text but no key event; unmapped keys produce nothing.
pub fn key_events(
    physical_key: PhysicalKey,
    state: ElementState,
    repeat: bool,
    text: Option<&str>,
) -> Vec<InputEvent> {
    let mut events = Vec::new();

    if !repeat
        && let PhysicalKey::Code(code) = physical_key
    {
        let key = Key::from(code);
        if key != Key::Other {
            events.push(InputEvent::Key {
                key,
                down: state.is_pressed(),
            });
        }
    }

    if state.is_pressed()
        && let Some(text) = text
        && text.chars().any(|c| !c.is_control())
    {
        events.push(InputEvent::Text(text.to_string()));
    }

    events
}
