//! Device state tables
//!
//! One keyboard, one mouse and a fixed pool of controller slots. Every control
//! records its current value and the time of its last change. Frame-scoped
//! fields (edges, mouse delta, wheel, text) are cleared by [`DeviceTables::advance_frame`].

use std::time::Duration;

use enum_map::EnumMap;
use glam::Vec2;

use super::events::{ControllerDescriptor, ControllerId, Key, MouseButton};

/// Normalizes a raw controller axis reading to -1..1
///
/// Negative readings are divided by 32768 and positive ones by 32767 so both
/// extremes land exactly on the unit range.
pub fn normalize_axis(raw: i16) -> f32 {
    if raw >= 0 {
        raw as f32 / 32767.0
    } else {
        raw as f32 / 32768.0
    }
}

/// Edge-tracked state of a single digital control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonRecord {
    /// Currently held
    pub down: bool,
    /// Went down since the last frame boundary
    pub pressed: bool,
    /// Went up since the last frame boundary
    pub released: bool,
    /// When the control last went down
    pub last_down: Duration,
    /// When the control last went up
    pub last_up: Duration,
}

impl ButtonRecord {
    /// Applies a new state, returning true if it changed
    ///
    /// Re-reporting the current state leaves the timestamps untouched.
    pub fn set(&mut self, down: bool, now: Duration) -> bool {
        if self.down == down {
            return false;
        }

        self.down = down;
        if down {
            self.pressed = true;
            self.last_down = now;
        } else {
            self.released = true;
            self.last_up = now;
        }
        true
    }

    /// Clears the per-frame edges
    pub fn advance(&mut self) {
        self.pressed = false;
        self.released = false;
    }

    /// Time of the most recent transition
    pub fn timestamp(&self) -> Duration {
        self.last_down.max(self.last_up)
    }
}

/// Analog control value with its last change time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisRecord {
    pub value: f32,
    pub changed_at: Duration,
}

/// Keyboard table
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pub keys: EnumMap<Key, ButtonRecord>,
    /// Text committed this frame
    pub text: String,
}

impl KeyboardState {
    pub fn down(&self, key: Key) -> bool {
        self.keys[key].down
    }

    pub fn pressed(&self, key: Key) -> bool {
        self.keys[key].pressed
    }

    pub fn released(&self, key: Key) -> bool {
        self.keys[key].released
    }

    /// Keys currently held, in declaration order
    pub fn down_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.keys
            .iter()
            .filter(|(_, record)| record.down)
            .map(|(key, _)| key)
    }

    /// True if either shift key is held
    pub fn shift(&self) -> bool {
        self.down(Key::LeftShift) || self.down(Key::RightShift)
    }

    /// True if either control key is held
    pub fn ctrl(&self) -> bool {
        self.down(Key::LeftControl) || self.down(Key::RightControl)
    }

    /// True if either alt key is held
    pub fn alt(&self) -> bool {
        self.down(Key::LeftAlt) || self.down(Key::RightAlt)
    }
}

/// Mouse table
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    /// Window coordinates (logical pixels)
    pub position: Vec2,
    /// Movement accumulated this frame
    pub delta: Vec2,
    /// Wheel movement accumulated this frame
    pub wheel: Vec2,
    pub buttons: EnumMap<MouseButton, ButtonRecord>,
}

impl MouseState {
    pub fn down(&self, button: MouseButton) -> bool {
        self.buttons[button].down
    }

    pub fn pressed(&self, button: MouseButton) -> bool {
        self.buttons[button].pressed
    }

    pub fn released(&self, button: MouseButton) -> bool {
        self.buttons[button].released
    }
}

/// A connected controller occupying a slot
#[derive(Debug, Clone)]
pub struct Controller {
    pub id: ControllerId,
    pub descriptor: ControllerDescriptor,
    pub buttons: Vec<ButtonRecord>,
    pub axes: Vec<AxisRecord>,
}

impl Controller {
    /// Creates a controller with all dynamic state zeroed
    pub fn new(id: ControllerId, descriptor: ControllerDescriptor) -> Self {
        Self {
            id,
            buttons: vec![ButtonRecord::default(); descriptor.button_count as usize],
            axes: vec![AxisRecord::default(); descriptor.axis_count as usize],
            descriptor,
        }
    }

    /// Button record, or `None` when the device has no such button
    pub fn button(&self, index: u16) -> Option<&ButtonRecord> {
        self.buttons.get(index as usize)
    }

    /// Axis record, or `None` when the device has no such axis
    pub fn axis(&self, index: u16) -> Option<&AxisRecord> {
        self.axes.get(index as usize)
    }

    pub fn is_gamepad(&self) -> bool {
        self.descriptor.is_gamepad
    }

    fn advance(&mut self) {
        for button in &mut self.buttons {
            button.advance();
        }
    }
}

/// Result of a controller connect request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connect {
    /// Placed into the given slot
    Slot(usize),
    /// The id already occupies the given slot
    AlreadyConnected(usize),
    /// Every slot is taken
    Full,
}

/// All device tables owned by the input coordinator
#[derive(Debug, Clone)]
pub struct DeviceTables {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
    /// Fixed pool of controller slots; `None` marks a vacant slot
    controllers: Vec<Option<Controller>>,
}

impl DeviceTables {
    /// Creates empty tables with `slots` controller slots
    pub fn new(slots: usize) -> Self {
        Self {
            keyboard: KeyboardState::default(),
            mouse: MouseState::default(),
            controllers: vec![None; slots],
        }
    }

    /// Number of controller slots
    pub fn slot_count(&self) -> usize {
        self.controllers.len()
    }

    /// Controller in a slot, if connected
    pub fn controller(&self, slot: usize) -> Option<&Controller> {
        self.controllers.get(slot).and_then(|c| c.as_ref())
    }

    /// Connected controllers with their slot index, lowest slot first
    pub fn controllers(&self) -> impl Iterator<Item = (usize, &Controller)> {
        self.controllers
            .iter()
            .enumerate()
            .filter_map(|(slot, c)| c.as_ref().map(|c| (slot, c)))
    }

    /// Slot occupied by a controller id
    pub fn slot_of(&self, id: ControllerId) -> Option<usize> {
        self.controllers
            .iter()
            .position(|c| c.as_ref().is_some_and(|c| c.id == id))
    }

    fn controller_mut(&mut self, id: ControllerId) -> Option<&mut Controller> {
        let slot = self.slot_of(id)?;
        self.controllers[slot].as_mut()
    }

    pub fn set_key(&mut self, key: Key, down: bool, now: Duration) -> bool {
        self.keyboard.keys[key].set(down, now)
    }

    pub fn push_text(&mut self, text: &str) {
        self.keyboard.text.push_str(text);
    }

    pub fn set_mouse_button(&mut self, button: MouseButton, down: bool, now: Duration) -> bool {
        self.mouse.buttons[button].set(down, now)
    }

    pub fn move_mouse(&mut self, position: Vec2, delta: Vec2) {
        self.mouse.position = position;
        self.mouse.delta += delta;
    }

    pub fn scroll(&mut self, delta: Vec2) {
        self.mouse.wheel += delta;
    }

    /// Places a controller into the lowest free slot
    pub fn connect(&mut self, id: ControllerId, descriptor: ControllerDescriptor) -> Connect {
        if let Some(slot) = self.slot_of(id) {
            return Connect::AlreadyConnected(slot);
        }

        match self.controllers.iter().position(Option::is_none) {
            Some(slot) => {
                self.controllers[slot] = Some(Controller::new(id, descriptor));
                Connect::Slot(slot)
            }
            None => Connect::Full,
        }
    }

    /// Vacates the slot held by `id`, returning the freed slot
    pub fn disconnect(&mut self, id: ControllerId) -> Option<usize> {
        let slot = self.slot_of(id)?;
        self.controllers[slot] = None;
        Some(slot)
    }

    /// Applies a controller button change; unknown ids and buttons are ignored
    pub fn set_controller_button(
        &mut self,
        id: ControllerId,
        button: u16,
        down: bool,
        now: Duration,
    ) -> bool {
        self.controller_mut(id)
            .and_then(|c| c.buttons.get_mut(button as usize))
            .is_some_and(|record| record.set(down, now))
    }

    /// Applies a raw controller axis reading; unknown ids and axes are ignored
    pub fn set_controller_axis(
        &mut self,
        id: ControllerId,
        axis: u16,
        raw: i16,
        now: Duration,
    ) -> bool {
        let value = normalize_axis(raw);
        let Some(record) = self
            .controller_mut(id)
            .and_then(|c| c.axes.get_mut(axis as usize))
        else {
            return false;
        };

        if record.value == value {
            return false;
        }
        record.value = value;
        record.changed_at = now;
        true
    }

    /// Clears frame-scoped state for the next frame
    pub fn advance_frame(&mut self) {
        for record in self.keyboard.keys.values_mut() {
            record.advance();
        }
        self.keyboard.text.clear();

        for record in self.mouse.buttons.values_mut() {
            record.advance();
        }
        self.mouse.delta = Vec2::ZERO;
        self.mouse.wheel = Vec2::ZERO;

        for controller in self.controllers.iter_mut().flatten() {
            controller.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T1: Duration = Duration::from_millis(10);
    const T2: Duration = Duration::from_millis(20);

    #[test]
    fn normalize_axis_hits_unit_range() {
        assert_eq!(normalize_axis(32767), 1.0);
        assert_eq!(normalize_axis(-32768), -1.0);
        assert_eq!(normalize_axis(0), 0.0);
        assert!((normalize_axis(16384) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn repeated_state_keeps_timestamp() {
        let mut record = ButtonRecord::default();
        assert!(record.set(true, T1));
        assert!(!record.set(true, T2));
        assert_eq!(record.last_down, T1);
        assert!(record.pressed);
    }

    #[test]
    fn tap_within_frame_keeps_both_edges() {
        let mut tables = DeviceTables::new(1);
        tables.set_key(Key::Space, true, T1);
        tables.set_key(Key::Space, false, T1);

        assert!(!tables.keyboard.down(Key::Space));
        assert!(tables.keyboard.pressed(Key::Space));
        assert!(tables.keyboard.released(Key::Space));

        tables.advance_frame();
        assert!(!tables.keyboard.pressed(Key::Space));
        assert!(!tables.keyboard.released(Key::Space));
    }

    #[test]
    fn advance_frame_resets_mouse_deltas_and_text() {
        let mut tables = DeviceTables::new(1);
        tables.move_mouse(Vec2::new(10.0, 5.0), Vec2::new(2.0, 1.0));
        tables.move_mouse(Vec2::new(12.0, 6.0), Vec2::new(2.0, 1.0));
        tables.scroll(Vec2::new(0.0, 1.0));
        tables.push_text("hi");

        assert_eq!(tables.mouse.delta, Vec2::new(4.0, 2.0));

        tables.advance_frame();
        assert_eq!(tables.mouse.position, Vec2::new(12.0, 6.0));
        assert_eq!(tables.mouse.delta, Vec2::ZERO);
        assert_eq!(tables.mouse.wheel, Vec2::ZERO);
        assert!(tables.keyboard.text.is_empty());
    }

    #[test]
    fn connect_fills_lowest_free_slot() {
        let mut tables = DeviceTables::new(3);
        let pad = ControllerDescriptor::gamepad("Pad");

        assert_eq!(tables.connect(ControllerId(7), pad.clone()), Connect::Slot(0));
        assert_eq!(tables.connect(ControllerId(8), pad.clone()), Connect::Slot(1));
        assert_eq!(tables.connect(ControllerId(9), pad.clone()), Connect::Slot(2));
        assert_eq!(tables.connect(ControllerId(10), pad.clone()), Connect::Full);
        assert_eq!(
            tables.connect(ControllerId(8), pad.clone()),
            Connect::AlreadyConnected(1)
        );

        assert_eq!(tables.disconnect(ControllerId(8)), Some(1));
        assert_eq!(tables.connect(ControllerId(10), pad), Connect::Slot(1));
    }

    #[test]
    fn out_of_range_controls_are_ignored() {
        let mut tables = DeviceTables::new(1);
        tables.connect(ControllerId(1), ControllerDescriptor::joystick("Stick", 2, 1));

        assert!(!tables.set_controller_button(ControllerId(1), 5, true, T1));
        assert!(!tables.set_controller_axis(ControllerId(1), 3, 1000, T1));
        assert!(!tables.set_controller_button(ControllerId(2), 0, true, T1));
        assert!(tables.set_controller_axis(ControllerId(1), 0, 32767, T1));
        assert!(!tables.set_controller_axis(ControllerId(1), 0, 32767, T2));
        assert_eq!(tables.controller(0).and_then(|c| c.axis(0)).map(|a| a.changed_at), Some(T1));
    }

    #[test]
    fn reconnect_starts_from_zeroed_state() {
        let mut tables = DeviceTables::new(1);
        tables.connect(ControllerId(1), ControllerDescriptor::gamepad("Old"));
        tables.set_controller_button(ControllerId(1), 0, true, T1);
        tables.set_controller_axis(ControllerId(1), 0, -20000, T1);
        tables.disconnect(ControllerId(1));

        tables.connect(ControllerId(2), ControllerDescriptor::gamepad("New"));
        let controller = tables.controller(0).unwrap();
        assert_eq!(controller.descriptor.name, "New");
        assert!(controller.buttons.iter().all(|b| *b == ButtonRecord::default()));
        assert!(controller.axes.iter().all(|a| a.value == 0.0));
    }
}
