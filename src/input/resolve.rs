//! Binding evaluation
//!
//! Pure functions from device tables and a binding to a resolved state. The
//! previous frame's tables are consulted only to find edges on analog controls;
//! digital edges come from the per-frame flags in the tables.

use std::time::Duration;

use super::binding::{ActionBinding, AxisBinding, Binding, Device, MaskSet, Overlap};
use super::state::{ButtonRecord, DeviceTables};

/// Everything an evaluation reads
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Tables as of this frame
    pub current: &'a DeviceTables,
    /// Tables as of the previous frame
    pub previous: &'a DeviceTables,
    /// Controller slot(s) to read
    pub device: Device,
    /// Active profile masks
    pub masks: &'a MaskSet,
}

impl<'a> ResolveContext<'a> {
    /// Same context reading a different device
    pub fn with_device(self, device: Device) -> Self {
        Self { device, ..self }
    }
}

/// The state of a binding or action for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedState {
    pub down: bool,
    /// Went down this frame
    pub pressed: bool,
    /// Went up this frame
    pub released: bool,
    /// 0..1, deadzone applied
    pub value: f32,
    /// 0..1, deadzone ignored
    pub raw_value: f32,
    /// Latest change among the contributing controls
    pub timestamp: Duration,
}

impl ResolvedState {
    fn digital(record: &ButtonRecord) -> Self {
        let value = if record.down { 1.0 } else { 0.0 };
        Self {
            down: record.down,
            pressed: record.pressed,
            released: record.released,
            value,
            raw_value: value,
            timestamp: if record.down {
                record.last_down
            } else {
                record.timestamp()
            },
        }
    }

    /// Logical OR of two states
    ///
    /// The combined value is the most extreme held value and the timestamp is
    /// the latest among held members (or among all members when none is held).
    pub fn or(self, other: Self) -> Self {
        let down = self.down || other.down;
        let timestamp = match (self.down, other.down) {
            (true, false) => self.timestamp,
            (false, true) => other.timestamp,
            _ => self.timestamp.max(other.timestamp),
        };

        Self {
            down,
            pressed: self.pressed || other.pressed,
            released: (self.released || other.released) && !down,
            value: self.value.max(other.value),
            raw_value: self.raw_value.max(other.raw_value),
            timestamp,
        }
    }
}

/// Slots a device selector reads, lowest first
fn slots(tables: &DeviceTables, device: Device) -> impl Iterator<Item = usize> + '_ {
    let (start, end) = match device {
        Device::Any => (0, tables.slot_count()),
        Device::Slot(slot) if slot < tables.slot_count() => (slot, slot + 1),
        Device::Slot(_) => (0, 0),
    };
    (start..end).filter(|&slot| tables.controller(slot).is_some())
}

/// Remaps a magnitude beyond the deadzone onto 0..1
pub fn apply_deadzone(magnitude: f32, deadzone: f32) -> f32 {
    if magnitude <= deadzone {
        return 0.0;
    }
    ((magnitude - deadzone) / (1.0 - deadzone)).clamp(0.0, 1.0)
}

/// Resolves a single binding
pub fn resolve_binding(binding: &Binding, ctx: ResolveContext<'_>) -> ResolvedState {
    match *binding {
        Binding::Key { key } => ResolvedState::digital(&ctx.current.keyboard.keys[key]),
        Binding::MouseButton { button } => ResolvedState::digital(&ctx.current.mouse.buttons[button]),
        Binding::Button { button } => slots(ctx.current, ctx.device)
            .filter_map(|slot| ctx.current.controller(slot)?.button(button))
            .map(ResolvedState::digital)
            .fold(ResolvedState::default(), ResolvedState::or),
        Binding::Axis {
            axis,
            sign,
            deadzone,
        } => slots(ctx.current, ctx.device)
            .filter_map(|slot| {
                let controller = ctx.current.controller(slot)?;
                let record = controller.axis(axis)?;
                // A different device in the slot last frame contributes nothing
                let previous = ctx
                    .previous
                    .controller(slot)
                    .filter(|prev| prev.id == controller.id)
                    .and_then(|prev| prev.axis(axis))
                    .map_or(0.0, |prev| prev.value);

                let magnitude = sign.project(record.value);
                let down = magnitude > deadzone;
                let was_down = sign.project(previous) > deadzone;

                Some(ResolvedState {
                    down,
                    pressed: down && !was_down,
                    released: !down && was_down,
                    value: apply_deadzone(magnitude, deadzone),
                    raw_value: magnitude,
                    timestamp: record.changed_at,
                })
            })
            .fold(ResolvedState::default(), ResolvedState::or),
    }
}

/// Resolves an action as the OR of its entries that pass the mask filter
pub fn resolve_action(action: &ActionBinding, ctx: ResolveContext<'_>) -> ResolvedState {
    action
        .entries()
        .iter()
        .filter(|entry| entry.applies(ctx.masks))
        .map(|entry| resolve_binding(&entry.binding, ctx))
        .fold(ResolvedState::default(), ResolvedState::or)
}

/// Resolved state of a two-direction axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedAxis {
    /// -1..1, deadzones applied
    pub value: f32,
    /// -1..1, deadzones ignored
    pub value_no_deadzone: f32,
    /// Direction pressed this frame, if it now drives the value
    pub pressed_sign: i32,
    pub negative: ResolvedState,
    pub positive: ResolvedState,
}

/// Picks a signed value when either or both directions are active
///
/// Equal timestamps favor positive for `TakeNewer` and negative for
/// `TakeOlder`.
fn arbitrate(
    overlap: Overlap,
    negative: (bool, f32),
    positive: (bool, f32),
    negative_at: Duration,
    positive_at: Duration,
) -> f32 {
    match (negative.0, positive.0) {
        (false, false) => 0.0,
        (true, false) => -negative.1,
        (false, true) => positive.1,
        (true, true) => match overlap {
            Overlap::CancelOut => (positive.1 - negative.1).clamp(-1.0, 1.0),
            Overlap::TakeNewer => {
                if negative_at > positive_at {
                    -negative.1
                } else {
                    positive.1
                }
            }
            Overlap::TakeOlder => {
                if positive_at < negative_at {
                    positive.1
                } else {
                    -negative.1
                }
            }
        },
    }
}

/// Resolves an axis binding, applying its overlap policy
pub fn resolve_axis(binding: &AxisBinding, ctx: ResolveContext<'_>) -> ResolvedAxis {
    let negative = resolve_action(&binding.negative, ctx);
    let positive = resolve_action(&binding.positive, ctx);

    let value = arbitrate(
        binding.overlap,
        (negative.down, negative.value),
        (positive.down, positive.value),
        negative.timestamp,
        positive.timestamp,
    );
    let value_no_deadzone = arbitrate(
        binding.overlap,
        (negative.raw_value > 0.0, negative.raw_value),
        (positive.raw_value > 0.0, positive.raw_value),
        negative.timestamp,
        positive.timestamp,
    );

    let pressed_sign = if positive.pressed && value > 0.0 {
        1
    } else if negative.pressed && value < 0.0 {
        -1
    } else {
        0
    };

    ResolvedAxis {
        value,
        value_no_deadzone,
        pressed_sign,
        negative,
        positive,
    }
}
