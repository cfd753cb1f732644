//! Virtual input objects
//!
//! Frame-cached views over bindings. The coordinator refreshes each one exactly
//! once per step; callers only read them (and consume buffered presses).

use std::time::Duration;

use glam::{IVec2, Vec2};

use super::binding::{ActionBinding, AxisBinding, DeadzoneShape, Device, StickBinding};
use super::resolve::{self, ResolveContext, ResolvedAxis};

/// Frame times handed to every update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Time of this step
    pub now: Duration,
    /// Time of the previous step
    pub last: Duration,
}

/// Press buffering and repeat timing for a virtual button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonTiming {
    /// How long a press stays consumable after it is observed
    pub buffer: Duration,
    /// Hold time before the first repeat
    pub repeat_delay: Duration,
    /// Time between repeats; zero disables repeating
    pub repeat_interval: Duration,
}

/// True if a held duration crossed a repeat boundary between two frames
fn crossed_repeat(previous: Duration, current: Duration, timing: ButtonTiming) -> bool {
    if timing.repeat_interval.is_zero() || current < timing.repeat_delay {
        return false;
    }
    if previous < timing.repeat_delay {
        return true;
    }

    let interval = timing.repeat_interval.as_nanos();
    let before = (previous - timing.repeat_delay).as_nanos() / interval;
    let after = (current - timing.repeat_delay).as_nanos() / interval;
    after != before
}

/// A digital virtual input
#[derive(Debug, Clone)]
pub struct VirtualButton {
    name: String,
    binding: ActionBinding,
    device: Device,
    timing: ButtonTiming,
    now: Duration,
    down: bool,
    pressed: bool,
    released: bool,
    repeated: bool,
    pressed_at: Option<Duration>,
    released_at: Option<Duration>,
    press_consumed: bool,
    release_consumed: bool,
}

impl VirtualButton {
    pub fn new(
        name: impl Into<String>,
        binding: ActionBinding,
        device: Device,
        timing: ButtonTiming,
    ) -> Self {
        Self {
            name: name.into(),
            binding,
            device,
            timing,
            now: Duration::ZERO,
            down: false,
            pressed: false,
            released: false,
            repeated: false,
            pressed_at: None,
            released_at: None,
            press_consumed: true,
            release_consumed: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> &ActionBinding {
        &self.binding
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn timing(&self) -> ButtonTiming {
        self.timing
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    pub fn set_timing(&mut self, timing: ButtonTiming) {
        self.timing = timing;
    }

    /// Held this frame
    pub fn down(&self) -> bool {
        self.down
    }

    /// Went down this frame
    pub fn pressed(&self) -> bool {
        self.pressed
    }

    /// Went up this frame
    pub fn released(&self) -> bool {
        self.released
    }

    /// Pressed this frame, or held across a repeat boundary
    pub fn repeated(&self) -> bool {
        self.repeated
    }

    /// Frame time the last press was observed
    pub fn pressed_at(&self) -> Option<Duration> {
        self.pressed_at
    }

    /// Frame time the last release was observed
    pub fn released_at(&self) -> Option<Duration> {
        self.released_at
    }

    /// True while an unconsumed press is within the buffer window
    pub fn buffered_press(&self) -> bool {
        !self.press_consumed && self.within_buffer(self.pressed_at, self.pressed)
    }

    /// True while an unconsumed release is within the buffer window
    pub fn buffered_release(&self) -> bool {
        !self.release_consumed && self.within_buffer(self.released_at, self.released)
    }

    fn within_buffer(&self, at: Option<Duration>, this_frame: bool) -> bool {
        at.is_some_and(|at| this_frame || self.now.saturating_sub(at) < self.timing.buffer)
    }

    /// Takes the buffered press, if any. Returns true at most once per press.
    pub fn consume_press(&mut self) -> bool {
        let available = self.buffered_press();
        self.press_consumed = true;
        available
    }

    /// Takes the buffered release, if any. Returns true at most once per release.
    pub fn consume_release(&mut self) -> bool {
        let available = self.buffered_release();
        self.release_consumed = true;
        available
    }

    /// Resets every field and drops buffered edges
    pub fn clear(&mut self) {
        self.down = false;
        self.pressed = false;
        self.released = false;
        self.repeated = false;
        self.pressed_at = None;
        self.released_at = None;
        self.press_consumed = true;
        self.release_consumed = true;
    }

    pub(crate) fn update(&mut self, ctx: ResolveContext<'_>, time: FrameTime) {
        let state = resolve::resolve_action(&self.binding, ctx.with_device(self.device));
        self.now = time.now;
        self.down = state.down;
        self.pressed = state.pressed;
        self.released = state.released;

        if state.pressed {
            self.pressed_at = Some(time.now);
            self.press_consumed = false;
        }
        if state.released {
            self.released_at = Some(time.now);
            self.release_consumed = false;
        }

        self.repeated = self.pressed
            || match (self.down, self.pressed_at) {
                (true, Some(at)) => crossed_repeat(
                    time.last.saturating_sub(at),
                    time.now.saturating_sub(at),
                    self.timing,
                ),
                _ => false,
            };
    }
}

/// Per-frame state of one signed axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisState {
    /// -1..1, deadzones applied
    pub value: f32,
    /// -1..1, deadzones ignored
    pub value_no_deadzone: f32,
    /// A direction was pressed this frame and now drives the value
    pub pressed: bool,
    /// Direction of that press: -1, 0 or 1
    pub pressed_sign: i32,
}

impl AxisState {
    fn from_resolved(resolved: &ResolvedAxis) -> Self {
        Self {
            value: resolved.value,
            value_no_deadzone: resolved.value_no_deadzone,
            pressed: resolved.pressed_sign != 0,
            pressed_sign: resolved.pressed_sign,
        }
    }

    /// Value truncated toward zero: only a fully deflected axis reports ±1
    pub fn int_value(&self) -> i32 {
        self.value.trunc() as i32
    }

    /// Direction of the value: -1, 0 or 1
    pub fn sign(&self) -> i32 {
        if self.value > 0.0 {
            1
        } else if self.value < 0.0 {
            -1
        } else {
            0
        }
    }
}

/// A signed analog virtual input
#[derive(Debug, Clone)]
pub struct VirtualAxis {
    name: String,
    binding: AxisBinding,
    device: Device,
    state: AxisState,
}

impl VirtualAxis {
    pub fn new(name: impl Into<String>, binding: AxisBinding, device: Device) -> Self {
        Self {
            name: name.into(),
            binding,
            device,
            state: AxisState::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> &AxisBinding {
        &self.binding
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    pub fn state(&self) -> AxisState {
        self.state
    }

    pub fn value(&self) -> f32 {
        self.state.value
    }

    pub fn value_no_deadzone(&self) -> f32 {
        self.state.value_no_deadzone
    }

    pub fn int_value(&self) -> i32 {
        self.state.int_value()
    }

    pub fn sign(&self) -> i32 {
        self.state.sign()
    }

    pub fn pressed(&self) -> bool {
        self.state.pressed
    }

    pub fn pressed_sign(&self) -> i32 {
        self.state.pressed_sign
    }

    /// Zeroes the cached state; the devices are untouched
    pub fn clear(&mut self) {
        self.state = AxisState::default();
    }

    pub(crate) fn update(&mut self, ctx: ResolveContext<'_>) {
        let resolved = resolve::resolve_axis(&self.binding, ctx.with_device(self.device));
        self.state = AxisState::from_resolved(&resolved);
    }
}

/// Applies a stick deadzone to a combined vector
pub fn shape_stick(raw: Vec2, shape: DeadzoneShape, radius: f32) -> Vec2 {
    match shape {
        DeadzoneShape::Circular => {
            let length = raw.length();
            if length <= radius {
                return Vec2::ZERO;
            }
            raw / length * resolve::apply_deadzone(length.min(1.0), radius)
        }
        DeadzoneShape::Square => Vec2::new(
            raw.x.signum() * resolve::apply_deadzone(raw.x.abs(), radius),
            raw.y.signum() * resolve::apply_deadzone(raw.y.abs(), radius),
        ),
    }
}

/// A two-dimensional virtual input
#[derive(Debug, Clone)]
pub struct VirtualStick {
    name: String,
    binding: StickBinding,
    device: Device,
    value: Vec2,
    value_no_deadzone: Vec2,
    x: AxisState,
    y: AxisState,
    last_direction: Option<IVec2>,
}

/// Press direction of one shaped stick component
///
/// A press is the component leaving zero or flipping sign. A release and press
/// of the same direction inside one frame is kept from the resolved edge.
fn stick_press(sign: i32, last: Option<i32>, resolved: i32) -> i32 {
    let edge = match last {
        Some(last) => sign != last || resolved == sign,
        None => resolved == sign,
    };
    if sign != 0 && edge { sign } else { 0 }
}

impl VirtualStick {
    pub fn new(name: impl Into<String>, binding: StickBinding, device: Device) -> Self {
        Self {
            name: name.into(),
            binding,
            device,
            value: Vec2::ZERO,
            value_no_deadzone: Vec2::ZERO,
            x: AxisState::default(),
            y: AxisState::default(),
            last_direction: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binding(&self) -> &StickBinding {
        &self.binding
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    /// Stick vector with the deadzone shape applied
    pub fn value(&self) -> Vec2 {
        self.value
    }

    pub fn value_no_deadzone(&self) -> Vec2 {
        self.value_no_deadzone
    }

    /// Horizontal component state
    pub fn x(&self) -> AxisState {
        self.x
    }

    /// Vertical component state
    pub fn y(&self) -> AxisState {
        self.y
    }

    /// Per-axis truncation toward zero
    pub fn int_value(&self) -> IVec2 {
        IVec2::new(self.x.int_value(), self.y.int_value())
    }

    /// Eight-way direction from the component signs
    pub fn direction(&self) -> IVec2 {
        IVec2::new(self.x.sign(), self.y.sign())
    }

    /// Per-axis press directions this frame, for menu navigation
    pub fn pressed_sign(&self) -> IVec2 {
        IVec2::new(self.x.pressed_sign, self.y.pressed_sign)
    }

    pub fn pressed(&self) -> bool {
        self.x.pressed || self.y.pressed
    }

    pub fn clear(&mut self) {
        self.value = Vec2::ZERO;
        self.value_no_deadzone = Vec2::ZERO;
        self.x = AxisState::default();
        self.y = AxisState::default();
    }

    pub(crate) fn update(&mut self, ctx: ResolveContext<'_>) {
        let ctx = ctx.with_device(self.device);
        let x = resolve::resolve_axis(&self.binding.x, ctx);
        let y = resolve::resolve_axis(&self.binding.y, ctx);

        let raw = Vec2::new(x.value, y.value);
        self.value = match self.binding.deadzone {
            Some(deadzone) => shape_stick(raw, deadzone.shape, deadzone.radius),
            None => raw,
        };
        self.value_no_deadzone = Vec2::new(x.value_no_deadzone, y.value_no_deadzone);

        self.x = AxisState::from_resolved(&x);
        self.y = AxisState::from_resolved(&y);
        self.x.value = self.value.x;
        self.y.value = self.value.y;

        // Edges follow the shaped vector so the stick deadzone decides when a press lands
        let direction = self.direction();
        let last = self.last_direction;
        self.x.pressed_sign = stick_press(direction.x, last.map(|d| d.x), x.pressed_sign);
        self.y.pressed_sign = stick_press(direction.y, last.map(|d| d.y), y.pressed_sign);
        self.x.pressed = self.x.pressed_sign != 0;
        self.y.pressed = self.y.pressed_sign != 0;
        self.last_direction = Some(direction);
    }
}

/// Any registered virtual input
#[derive(Debug, Clone)]
pub enum VirtualInput {
    Button(VirtualButton),
    Axis(VirtualAxis),
    Stick(VirtualStick),
}

impl VirtualInput {
    pub fn name(&self) -> &str {
        match self {
            VirtualInput::Button(button) => button.name(),
            VirtualInput::Axis(axis) => axis.name(),
            VirtualInput::Stick(stick) => stick.name(),
        }
    }

    /// Refreshes the cached state for this frame
    pub fn update(&mut self, ctx: ResolveContext<'_>, time: FrameTime) {
        match self {
            VirtualInput::Button(button) => button.update(ctx, time),
            VirtualInput::Axis(axis) => axis.update(ctx),
            VirtualInput::Stick(stick) => stick.update(ctx),
        }
    }

    pub fn clear(&mut self) {
        match self {
            VirtualInput::Button(button) => button.clear(),
            VirtualInput::Axis(axis) => axis.clear(),
            VirtualInput::Stick(stick) => stick.clear(),
        }
    }
}
