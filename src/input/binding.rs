//! Binding primitives
//!
//! Immutable descriptions of which physical controls drive a logical action.
//! Nothing here reads live state; see [`super::resolve`] for evaluation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::{InputError, InputResult};
use super::events::{GamepadAxis, GamepadButton, Key, MouseButton};

/// Active profile tags used to filter masked binding entries
pub type MaskSet = BTreeSet<String>;

/// Direction of a controller axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSign {
    Negative,
    Positive,
}

impl AxisSign {
    /// Projects a signed axis value onto this direction (0 when opposite)
    pub fn project(self, value: f32) -> f32 {
        match self {
            AxisSign::Negative => (-value).max(0.0),
            AxisSign::Positive => value.max(0.0),
        }
    }
}

/// Which controller slot a virtual input reads
///
/// Keyboard and mouse bindings ignore this and always read the single
/// logical keyboard and mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    /// Every connected controller, lowest slot first
    #[default]
    Any,
    /// A single controller slot
    Slot(usize),
}

/// A single physical control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Binding {
    Key {
        key: Key,
    },
    MouseButton {
        button: MouseButton,
    },
    /// Controller button by index
    Button {
        button: u16,
    },
    /// One direction of a controller axis, treated as a digital control
    Axis {
        axis: u16,
        sign: AxisSign,
        #[serde(default)]
        deadzone: f32,
    },
}

impl Binding {
    pub fn key(key: Key) -> Self {
        Binding::Key { key }
    }

    pub fn mouse(button: MouseButton) -> Self {
        Binding::MouseButton { button }
    }

    pub fn button(button: u16) -> Self {
        Binding::Button { button }
    }

    pub fn gamepad(button: GamepadButton) -> Self {
        Binding::Button {
            button: button.index(),
        }
    }

    pub fn axis(axis: u16, sign: AxisSign, deadzone: f32) -> Self {
        Binding::Axis {
            axis,
            sign,
            deadzone,
        }
    }

    pub fn gamepad_axis(axis: GamepadAxis, sign: AxisSign, deadzone: f32) -> Self {
        Self::axis(axis.index(), sign, deadzone)
    }

    /// True for bindings that read a controller slot
    pub fn is_controller(&self) -> bool {
        matches!(self, Binding::Button { .. } | Binding::Axis { .. })
    }

    fn validate(&self, action: &str) -> InputResult<()> {
        if let Binding::Axis { deadzone, .. } = *self
            && !(0.0..1.0).contains(&deadzone)
        {
            return Err(InputError::InvalidDeadzone {
                action: action.to_string(),
                value: deadzone,
            });
        }
        Ok(())
    }
}

/// A binding plus the profile masks it is restricted to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingEntry {
    #[serde(flatten)]
    pub binding: Binding,
    /// Empty means the entry always applies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub masks: Vec<String>,
}

impl BindingEntry {
    /// True if this entry is active under the given mask set
    pub fn applies(&self, active: &MaskSet) -> bool {
        self.masks.is_empty() || self.masks.iter().any(|m| active.contains(m))
    }
}

impl From<Binding> for BindingEntry {
    fn from(binding: Binding) -> Self {
        Self {
            binding,
            masks: Vec::new(),
        }
    }
}

/// A digital action: the logical OR of its entries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionBinding {
    entries: Vec<BindingEntry>,
}

impl ActionBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an unmasked binding
    pub fn add(mut self, binding: Binding) -> Self {
        self.entries.push(binding.into());
        self
    }

    /// Appends a binding restricted to the given masks
    pub fn add_masked<S: Into<String>>(
        mut self,
        binding: Binding,
        masks: impl IntoIterator<Item = S>,
    ) -> Self {
        self.entries.push(BindingEntry {
            binding,
            masks: masks.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn key(self, key: Key) -> Self {
        self.add(Binding::key(key))
    }

    pub fn mouse(self, button: MouseButton) -> Self {
        self.add(Binding::mouse(button))
    }

    pub fn button(self, button: u16) -> Self {
        self.add(Binding::button(button))
    }

    pub fn gamepad(self, button: GamepadButton) -> Self {
        self.add(Binding::gamepad(button))
    }

    pub fn axis(self, axis: u16, sign: AxisSign, deadzone: f32) -> Self {
        self.add(Binding::axis(axis, sign, deadzone))
    }

    pub fn gamepad_axis(self, axis: GamepadAxis, sign: AxisSign, deadzone: f32) -> Self {
        self.add(Binding::gamepad_axis(axis, sign, deadzone))
    }

    pub fn entries(&self) -> &[BindingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn validate(&self, action: &str) -> InputResult<()> {
        self.entries
            .iter()
            .try_for_each(|entry| entry.binding.validate(action))
    }
}

/// What an axis reports when both directions are held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlap {
    /// The direction pressed most recently wins
    #[default]
    TakeNewer,
    /// The direction held longest wins
    TakeOlder,
    /// Directions subtract from each other
    CancelOut,
}

/// A signed axis built from two digital actions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisBinding {
    pub negative: ActionBinding,
    pub positive: ActionBinding,
    #[serde(default)]
    pub overlap: Overlap,
}

impl AxisBinding {
    pub fn new(negative: ActionBinding, positive: ActionBinding, overlap: Overlap) -> Self {
        Self {
            negative,
            positive,
            overlap,
        }
    }

    /// Axis driven by a pair of keys
    pub fn keys(negative: Key, positive: Key) -> Self {
        Self::new(
            ActionBinding::new().key(negative),
            ActionBinding::new().key(positive),
            Overlap::default(),
        )
    }

    /// Axis driven by both directions of one gamepad axis
    pub fn gamepad_axis(axis: GamepadAxis, deadzone: f32) -> Self {
        Self::new(
            ActionBinding::new().gamepad_axis(axis, AxisSign::Negative, deadzone),
            ActionBinding::new().gamepad_axis(axis, AxisSign::Positive, deadzone),
            Overlap::default(),
        )
    }

    pub fn with_overlap(mut self, overlap: Overlap) -> Self {
        self.overlap = overlap;
        self
    }

    /// Merges another axis' entries into this one, keeping this overlap policy
    pub fn merge(mut self, other: AxisBinding) -> Self {
        self.negative.entries.extend(other.negative.entries);
        self.positive.entries.extend(other.positive.entries);
        self
    }

    pub(crate) fn validate(&self, action: &str) -> InputResult<()> {
        self.negative.validate(action)?;
        self.positive.validate(action)
    }
}

/// Shape of a stick's combined deadzone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadzoneShape {
    /// Applied to the vector magnitude
    Circular,
    /// Applied to each axis independently
    Square,
}

/// Stick deadzone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickDeadzone {
    pub shape: DeadzoneShape,
    pub radius: f32,
}

/// A 2D input built from two axes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StickBinding {
    pub x: AxisBinding,
    pub y: AxisBinding,
    #[serde(default)]
    pub deadzone: Option<StickDeadzone>,
}

impl StickBinding {
    pub fn new(x: AxisBinding, y: AxisBinding) -> Self {
        Self {
            x,
            y,
            deadzone: None,
        }
    }

    /// Four-key stick; up is negative y
    pub fn keys(left: Key, right: Key, up: Key, down: Key) -> Self {
        Self::new(AxisBinding::keys(left, right), AxisBinding::keys(up, down))
    }

    /// Gamepad left stick with a circular deadzone
    pub fn left_stick(radius: f32) -> Self {
        Self::new(
            AxisBinding::gamepad_axis(GamepadAxis::LeftX, 0.0),
            AxisBinding::gamepad_axis(GamepadAxis::LeftY, 0.0),
        )
        .with_deadzone(DeadzoneShape::Circular, radius)
    }

    /// Gamepad right stick with a circular deadzone
    pub fn right_stick(radius: f32) -> Self {
        Self::new(
            AxisBinding::gamepad_axis(GamepadAxis::RightX, 0.0),
            AxisBinding::gamepad_axis(GamepadAxis::RightY, 0.0),
        )
        .with_deadzone(DeadzoneShape::Circular, radius)
    }

    pub fn with_deadzone(mut self, shape: DeadzoneShape, radius: f32) -> Self {
        self.deadzone = Some(StickDeadzone { shape, radius });
        self
    }

    /// Merges another stick's axes into this one, keeping this deadzone
    pub fn merge(mut self, other: StickBinding) -> Self {
        self.x = self.x.merge(other.x);
        self.y = self.y.merge(other.y);
        self
    }

    pub(crate) fn validate(&self, action: &str) -> InputResult<()> {
        self.x.validate(action)?;
        self.y.validate(action)?;
        if let Some(deadzone) = self.deadzone
            && !(0.0..1.0).contains(&deadzone.radius)
        {
            return Err(InputError::InvalidRadius {
                action: action.to_string(),
                value: deadzone.radius,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masks(tags: &[&str]) -> MaskSet {
        tags.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn axis_sign_projects_matching_direction() {
        assert_eq!(AxisSign::Positive.project(0.5), 0.5);
        assert_eq!(AxisSign::Positive.project(-0.5), 0.0);
        assert_eq!(AxisSign::Negative.project(-0.75), 0.75);
        assert_eq!(AxisSign::Negative.project(0.75), 0.0);
    }

    #[test]
    fn unmasked_entries_always_apply() {
        let entry = BindingEntry::from(Binding::key(Key::Space));
        assert!(entry.applies(&MaskSet::new()));
        assert!(entry.applies(&masks(&["gamepad"])));
    }

    #[test]
    fn masked_entries_need_an_intersection() {
        let action = ActionBinding::new().add_masked(Binding::key(Key::Space), ["keyboard", "debug"]);
        let entry = &action.entries()[0];
        assert!(!entry.applies(&MaskSet::new()));
        assert!(!entry.applies(&masks(&["gamepad"])));
        assert!(entry.applies(&masks(&["debug"])));
    }

    #[test]
    fn deadzone_outside_unit_range_is_rejected() {
        let axis = AxisBinding::gamepad_axis(GamepadAxis::LeftX, 1.5);
        assert!(matches!(
            axis.validate("move"),
            Err(InputError::InvalidDeadzone { .. })
        ));

        let stick = StickBinding::left_stick(-0.1);
        assert!(matches!(
            stick.validate("move"),
            Err(InputError::InvalidRadius { .. })
        ));

        assert!(StickBinding::left_stick(0.2).validate("move").is_ok());
    }

    #[test]
    fn merge_keeps_both_sources() {
        let stick = StickBinding::keys(Key::A, Key::D, Key::W, Key::S).merge(StickBinding::left_stick(0.1));
        assert_eq!(stick.x.negative.entries().len(), 2);
        assert_eq!(stick.y.positive.entries().len(), 2);
        assert!(stick.deadzone.is_none());
    }
}
