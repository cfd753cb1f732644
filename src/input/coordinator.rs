//! Input coordinator
//!
//! Owns the device tables and the registry of virtual inputs. Events mutate the
//! live tables as they arrive; [`InputCoordinator::step`] snapshots them and
//! refreshes every virtual input in registration order.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::binding::{ActionBinding, AxisBinding, Device, MaskSet, StickBinding};
use super::events::InputEvent;
use super::resolve::ResolveContext;
use super::state::{Connect, Controller, DeviceTables, KeyboardState, MouseState};
use super::virtual_input::{
    ButtonTiming, FrameTime, VirtualAxis, VirtualButton, VirtualInput, VirtualStick,
};

/// Default number of controller slots
pub const DEFAULT_CONTROLLER_SLOTS: usize = 8;

/// Coordinator construction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct InputSettings {
    /// Size of the controller slot pool
    pub controller_slots: usize,
    /// Timing given to buttons created without explicit timing
    pub button_timing: ButtonTiming,
    /// Masks active from the start
    pub masks: MaskSet,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            controller_slots: DEFAULT_CONTROLLER_SLOTS,
            button_timing: ButtonTiming {
                buffer: Duration::ZERO,
                repeat_delay: Duration::from_millis(400),
                repeat_interval: Duration::from_millis(50),
            },
            masks: MaskSet::new(),
        }
    }
}

static NEXT_OWNER: AtomicU32 = AtomicU32::new(0);

/// Registry key of a virtual input
///
/// Ids are only meaningful to the coordinator that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId {
    owner: u32,
    serial: u32,
}

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(InputId);

        impl $name {
            pub fn id(self) -> InputId {
                self.0
            }
        }

        impl From<$name> for InputId {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }
    };
}

handle!(
    /// Handle to a registered [`VirtualButton`]
    ButtonHandle
);
handle!(
    /// Handle to a registered [`VirtualAxis`]
    AxisHandle
);
handle!(
    /// Handle to a registered [`VirtualStick`]
    StickHandle
);

/// Central input state owner
#[derive(Debug)]
pub struct InputCoordinator {
    settings: InputSettings,
    /// Tables mutated by incoming events
    live: DeviceTables,
    /// Snapshot evaluated this frame
    current: DeviceTables,
    /// Snapshot evaluated last frame
    previous: DeviceTables,
    masks: MaskSet,
    time: FrameTime,
    frame: u64,
    inputs: IndexMap<InputId, VirtualInput>,
    owner: u32,
    next_serial: u32,
}

impl Default for InputCoordinator {
    fn default() -> Self {
        Self::new(InputSettings::default())
    }
}

impl InputCoordinator {
    /// Creates a coordinator
    ///
    /// # Panics
    /// If `settings.controller_slots` is zero.
    pub fn new(settings: InputSettings) -> Self {
        assert!(
            settings.controller_slots > 0,
            "input coordinator needs at least one controller slot"
        );

        let tables = DeviceTables::new(settings.controller_slots);
        Self {
            masks: settings.masks.clone(),
            live: tables.clone(),
            current: tables.clone(),
            previous: tables,
            settings,
            time: FrameTime::default(),
            frame: 0,
            inputs: IndexMap::new(),
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            next_serial: 0,
        }
    }

    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    // === Event ingestion ===

    /// Applies a raw event, stamped with the current frame time
    pub fn handle(&mut self, event: InputEvent) {
        self.handle_at(event, self.time.now);
    }

    /// Applies a raw event with an explicit timestamp
    pub fn handle_at(&mut self, event: InputEvent, at: Duration) {
        match event {
            InputEvent::MouseMove { position, delta } => self.live.move_mouse(position, delta),
            InputEvent::MouseButton { button, down } => {
                self.live.set_mouse_button(button, down, at);
            }
            InputEvent::MouseWheel { delta } => self.live.scroll(delta),
            InputEvent::Key { key, down } => {
                self.live.set_key(key, down, at);
            }
            InputEvent::Text(text) => self.live.push_text(&text),
            InputEvent::ControllerConnected { id, descriptor } => {
                match self.live.connect(id, descriptor) {
                    Connect::Slot(slot) => {
                        if let Some(controller) = self.live.controller(slot) {
                            let d = &controller.descriptor;
                            info!(
                                slot,
                                controller = id.0,
                                name = %d.name,
                                gamepad = d.is_gamepad,
                                buttons = d.button_count,
                                axes = d.axis_count,
                                "Controller connected"
                            );
                        }
                    }
                    Connect::AlreadyConnected(slot) => {
                        warn!(slot, controller = id.0, "Controller already connected, ignoring");
                    }
                    Connect::Full => {
                        warn!(
                            controller = id.0,
                            slots = self.live.slot_count(),
                            "No free controller slot, ignoring device"
                        );
                    }
                }
            }
            InputEvent::ControllerDisconnected { id } => match self.live.disconnect(id) {
                Some(slot) => info!(slot, controller = id.0, "Controller disconnected"),
                None => debug!(controller = id.0, "Disconnect for unknown controller"),
            },
            InputEvent::ControllerButton { id, button, down } => {
                self.live.set_controller_button(id, button, down, at);
            }
            InputEvent::ControllerAxis { id, axis, value } => {
                self.live.set_controller_axis(id, axis, value, at);
            }
        }
    }

    /// Applies a batch of events in order
    pub fn handle_all(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    // === Frame advance ===

    /// Advances one frame
    ///
    /// Snapshots the live tables, clears their frame-scoped fields and
    /// refreshes every virtual input in registration order. Call once per
    /// frame, before game logic reads its inputs.
    ///
    /// # Panics
    /// In debug builds, if `now` is earlier than the previous step.
    pub fn step(&mut self, now: Duration) {
        debug_assert!(
            now >= self.time.now,
            "input step time moved backwards ({:?} < {:?})",
            now,
            self.time.now
        );

        self.time = FrameTime {
            now,
            last: self.time.now,
        };
        self.frame += 1;

        std::mem::swap(&mut self.previous, &mut self.current);
        self.current.clone_from(&self.live);
        self.live.advance_frame();

        let ctx = ResolveContext {
            current: &self.current,
            previous: &self.previous,
            device: Device::Any,
            masks: &self.masks,
        };
        for input in self.inputs.values_mut() {
            input.update(ctx, self.time);
        }
    }

    /// Time passed to the latest step
    pub fn time(&self) -> Duration {
        self.time.now
    }

    /// Number of steps taken
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // === Masks ===

    pub fn masks(&self) -> &MaskSet {
        &self.masks
    }

    /// Replaces the active masks; takes effect on the next step
    pub fn set_masks<S: Into<String>>(&mut self, masks: impl IntoIterator<Item = S>) {
        self.masks = masks.into_iter().map(Into::into).collect();
    }

    pub fn add_mask(&mut self, mask: impl Into<String>) {
        self.masks.insert(mask.into());
    }

    pub fn remove_mask(&mut self, mask: &str) -> bool {
        self.masks.remove(mask)
    }

    // === Device queries (as of the latest step) ===

    pub fn tables(&self) -> &DeviceTables {
        &self.current
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.current.keyboard
    }

    pub fn mouse(&self) -> &MouseState {
        &self.current.mouse
    }

    /// Text committed during the latest frame
    pub fn text(&self) -> &str {
        &self.current.keyboard.text
    }

    pub fn controller(&self, slot: usize) -> Option<&Controller> {
        self.current.controller(slot)
    }

    /// Number of connected controllers
    pub fn controller_count(&self) -> usize {
        self.current.controllers().count()
    }

    // === Virtual input registry ===

    fn register(&mut self, input: VirtualInput) -> InputId {
        let id = InputId {
            owner: self.owner,
            serial: self.next_serial,
        };
        self.next_serial = self
            .next_serial
            .checked_add(1)
            .expect("virtual input serials exhausted for this coordinator");
        debug!(name = input.name(), ?id, "Registered virtual input");
        self.inputs.insert(id, input);
        id
    }

    /// Creates a virtual button using the default timing
    ///
    /// The button reads neutral until the next step.
    pub fn create_button(
        &mut self,
        name: impl Into<String>,
        binding: ActionBinding,
        device: Device,
    ) -> ButtonHandle {
        let timing = self.settings.button_timing;
        self.create_button_with(name, binding, device, timing)
    }

    /// Creates a virtual button with explicit buffer and repeat timing
    pub fn create_button_with(
        &mut self,
        name: impl Into<String>,
        binding: ActionBinding,
        device: Device,
        timing: ButtonTiming,
    ) -> ButtonHandle {
        let button = VirtualButton::new(name, binding, device, timing);
        ButtonHandle(self.register(VirtualInput::Button(button)))
    }

    /// Creates a virtual axis
    pub fn create_axis(
        &mut self,
        name: impl Into<String>,
        binding: AxisBinding,
        device: Device,
    ) -> AxisHandle {
        let axis = VirtualAxis::new(name, binding, device);
        AxisHandle(self.register(VirtualInput::Axis(axis)))
    }

    /// Creates a virtual stick
    pub fn create_stick(
        &mut self,
        name: impl Into<String>,
        binding: StickBinding,
        device: Device,
    ) -> StickHandle {
        let stick = VirtualStick::new(name, binding, device);
        StickHandle(self.register(VirtualInput::Stick(stick)))
    }

    fn check_owner(&self, id: InputId) {
        assert_eq!(
            id.owner, self.owner,
            "input handle used with a coordinator that did not issue it"
        );
    }

    fn entry(&self, id: InputId) -> Option<&VirtualInput> {
        self.check_owner(id);
        self.inputs.get(&id)
    }

    fn entry_mut(&mut self, id: InputId) -> Option<&mut VirtualInput> {
        self.check_owner(id);
        self.inputs.get_mut(&id)
    }

    /// Removes a virtual input; later handles to it resolve to `None`
    pub fn unregister(&mut self, id: impl Into<InputId>) -> Option<VirtualInput> {
        let id = id.into();
        self.check_owner(id);
        self.inputs.shift_remove(&id)
    }

    pub fn button(&self, handle: ButtonHandle) -> Option<&VirtualButton> {
        match self.entry(handle.0)? {
            VirtualInput::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn button_mut(&mut self, handle: ButtonHandle) -> Option<&mut VirtualButton> {
        match self.entry_mut(handle.0)? {
            VirtualInput::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn axis(&self, handle: AxisHandle) -> Option<&VirtualAxis> {
        match self.entry(handle.0)? {
            VirtualInput::Axis(axis) => Some(axis),
            _ => None,
        }
    }

    pub fn axis_mut(&mut self, handle: AxisHandle) -> Option<&mut VirtualAxis> {
        match self.entry_mut(handle.0)? {
            VirtualInput::Axis(axis) => Some(axis),
            _ => None,
        }
    }

    pub fn stick(&self, handle: StickHandle) -> Option<&VirtualStick> {
        match self.entry(handle.0)? {
            VirtualInput::Stick(stick) => Some(stick),
            _ => None,
        }
    }

    pub fn stick_mut(&mut self, handle: StickHandle) -> Option<&mut VirtualStick> {
        match self.entry_mut(handle.0)? {
            VirtualInput::Stick(stick) => Some(stick),
            _ => None,
        }
    }

    /// Consumes a button's buffered press; false for unknown handles
    pub fn consume_press(&mut self, handle: ButtonHandle) -> bool {
        self.button_mut(handle)
            .is_some_and(|button| button.consume_press())
    }

    /// Consumes a button's buffered release; false for unknown handles
    pub fn consume_release(&mut self, handle: ButtonHandle) -> bool {
        self.button_mut(handle)
            .is_some_and(|button| button.consume_release())
    }

    /// Virtual input by registry id
    pub fn get(&self, id: InputId) -> Option<&VirtualInput> {
        self.entry(id)
    }

    /// First virtual input registered under `name`
    pub fn find(&self, name: &str) -> Option<InputId> {
        self.inputs
            .iter()
            .find(|(_, input)| input.name() == name)
            .map(|(id, _)| *id)
    }

    /// Registered inputs in evaluation order
    pub fn inputs(&self) -> impl Iterator<Item = (InputId, &VirtualInput)> {
        self.inputs.iter().map(|(id, input)| (*id, input))
    }

    /// Number of registered virtual inputs
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Clears the cached state of every virtual input
    pub fn clear_inputs(&mut self) {
        for input in self.inputs.values_mut() {
            input.clear();
        }
    }
}
