//! Binding sets loaded from configuration
//!
//! A binding set names every virtual input a game uses and the controls that
//! drive it:
//!
//! ```toml
//! [buttons.jump]
//! buffer_ms = 120
//! binding = [
//!     { type = "key", key = "space" },
//!     { type = "button", button = 0, masks = ["gamepad"] },
//! ]
//!
//! [axes.horizontal]
//! overlap = "cancel_out"
//! negative = [{ type = "key", key = "a" }]
//! positive = [{ type = "key", key = "d" }]
//!
//! [sticks.move]
//! deadzone = { shape = "circular", radius = 0.2 }
//! x.negative = [{ type = "axis", axis = 0, sign = "negative" }]
//! x.positive = [{ type = "axis", axis = 0, sign = "positive" }]
//! y.negative = [{ type = "axis", axis = 1, sign = "negative" }]
//! y.positive = [{ type = "axis", axis = 1, sign = "positive" }]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::binding::{
    ActionBinding, AxisBinding, DeadzoneShape, Device, Overlap, StickBinding, StickDeadzone,
};
use super::coordinator::{AxisHandle, ButtonHandle, InputCoordinator, StickHandle};
use super::error::{InputError, InputResult};
use super::events::{GamepadAxis, GamepadButton, Key, MouseButton};
use super::virtual_input::ButtonTiming;

/// A named virtual button
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ButtonSpec {
    pub binding: ActionBinding,
    #[serde(default)]
    pub device: Device,
    /// Overrides the coordinator's press buffer
    #[serde(default)]
    pub buffer_ms: Option<u64>,
    #[serde(default)]
    pub repeat_delay_ms: Option<u64>,
    #[serde(default)]
    pub repeat_interval_ms: Option<u64>,
}

impl ButtonSpec {
    fn timing(&self, defaults: ButtonTiming) -> ButtonTiming {
        ButtonTiming {
            buffer: self
                .buffer_ms
                .map_or(defaults.buffer, Duration::from_millis),
            repeat_delay: self
                .repeat_delay_ms
                .map_or(defaults.repeat_delay, Duration::from_millis),
            repeat_interval: self
                .repeat_interval_ms
                .map_or(defaults.repeat_interval, Duration::from_millis),
        }
    }
}

/// A named virtual axis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisSpec {
    pub negative: ActionBinding,
    pub positive: ActionBinding,
    #[serde(default)]
    pub overlap: Overlap,
    #[serde(default)]
    pub device: Device,
}

impl AxisSpec {
    pub fn binding(&self) -> AxisBinding {
        AxisBinding::new(self.negative.clone(), self.positive.clone(), self.overlap)
    }
}

/// A named virtual stick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StickSpec {
    pub x: AxisBinding,
    pub y: AxisBinding,
    #[serde(default)]
    pub deadzone: Option<StickDeadzone>,
    #[serde(default)]
    pub device: Device,
}

impl StickSpec {
    pub fn binding(&self) -> StickBinding {
        StickBinding {
            x: self.x.clone(),
            y: self.y.clone(),
            deadzone: self.deadzone,
        }
    }
}

/// Every virtual input a game declares, keyed by name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BindingSet {
    #[serde(default)]
    pub buttons: BTreeMap<String, ButtonSpec>,
    #[serde(default)]
    pub axes: BTreeMap<String, AxisSpec>,
    #[serde(default)]
    pub sticks: BTreeMap<String, StickSpec>,
}

impl BindingSet {
    /// Parses and validates a binding set from TOML text
    pub fn from_toml(text: &str) -> InputResult<Self> {
        let set: Self = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        set.validate()?;
        Ok(set)
    }

    /// Loads and validates a binding set file (format chosen by extension)
    pub fn load(path: &Path) -> InputResult<Self> {
        let set: Self = Config::builder()
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        set.validate()?;
        debug!(
            path = %path.display(),
            buttons = set.buttons.len(),
            axes = set.axes.len(),
            sticks = set.sticks.len(),
            "Loaded binding set"
        );
        Ok(set)
    }

    /// Keyboard, mouse and gamepad defaults used when no file is configured
    pub fn builtin() -> Self {
        let mut set = Self::default();

        set.buttons.insert(
            "confirm".to_string(),
            ButtonSpec {
                binding: ActionBinding::new()
                    .key(Key::Enter)
                    .key(Key::Space)
                    .gamepad(GamepadButton::South),
                ..Default::default()
            },
        );
        set.buttons.insert(
            "cancel".to_string(),
            ButtonSpec {
                binding: ActionBinding::new()
                    .key(Key::Escape)
                    .key(Key::Backspace)
                    .gamepad(GamepadButton::East),
                ..Default::default()
            },
        );
        set.buttons.insert(
            "action".to_string(),
            ButtonSpec {
                binding: ActionBinding::new()
                    .key(Key::X)
                    .mouse(MouseButton::Left)
                    .gamepad(GamepadButton::West),
                buffer_ms: Some(150),
                ..Default::default()
            },
        );

        let horizontal = AxisBinding::keys(Key::A, Key::D)
            .merge(AxisBinding::keys(Key::Left, Key::Right))
            .merge(AxisBinding::gamepad_axis(GamepadAxis::LeftX, 0.25));
        set.axes.insert(
            "horizontal".to_string(),
            AxisSpec {
                negative: horizontal.negative,
                positive: horizontal.positive,
                overlap: Overlap::TakeNewer,
                device: Device::Any,
            },
        );

        let stick = StickBinding::keys(Key::A, Key::D, Key::W, Key::S)
            .merge(StickBinding::left_stick(0.0))
            .with_deadzone(DeadzoneShape::Circular, 0.2);
        set.sticks.insert(
            "move".to_string(),
            StickSpec {
                x: stick.x,
                y: stick.y,
                deadzone: stick.deadzone,
                device: Device::Any,
            },
        );

        set
    }

    /// Checks deadzones and radii are within range
    pub fn validate(&self) -> InputResult<()> {
        for (name, spec) in &self.buttons {
            spec.binding.validate(name)?;
        }
        for (name, spec) in &self.axes {
            spec.binding().validate(name)?;
        }
        for (name, spec) in &self.sticks {
            spec.binding().validate(name)?;
        }
        Ok(())
    }

    /// Total number of declared inputs
    pub fn len(&self) -> usize {
        self.buttons.len() + self.axes.len() + self.sticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn names(&self) -> impl Iterator<Item = &String> {
        self.buttons
            .keys()
            .chain(self.axes.keys())
            .chain(self.sticks.keys())
    }

    /// Creates every declared input on the coordinator
    ///
    /// Buttons register first, then axes, then sticks, each in name order.
    /// Nothing is registered if a name is already taken.
    pub fn register(&self, input: &mut InputCoordinator) -> InputResult<RegisteredInputs> {
        self.validate()?;

        let mut seen = BTreeSet::new();
        for name in self.names() {
            if !seen.insert(name.as_str()) || input.find(name).is_some() {
                return Err(InputError::DuplicateName(name.clone()));
            }
        }

        let defaults = input.settings().button_timing;
        let mut registered = RegisteredInputs::default();

        for (name, spec) in &self.buttons {
            let handle = input.create_button_with(
                name.clone(),
                spec.binding.clone(),
                spec.device,
                spec.timing(defaults),
            );
            registered.buttons.insert(name.clone(), handle);
        }
        for (name, spec) in &self.axes {
            let handle = input.create_axis(name.clone(), spec.binding(), spec.device);
            registered.axes.insert(name.clone(), handle);
        }
        for (name, spec) in &self.sticks {
            let handle = input.create_stick(name.clone(), spec.binding(), spec.device);
            registered.sticks.insert(name.clone(), handle);
        }

        debug!(count = self.len(), "Registered binding set");
        Ok(registered)
    }
}

/// Handles created by [`BindingSet::register`], by name
#[derive(Debug, Clone, Default)]
pub struct RegisteredInputs {
    buttons: BTreeMap<String, ButtonHandle>,
    axes: BTreeMap<String, AxisHandle>,
    sticks: BTreeMap<String, StickHandle>,
}

impl RegisteredInputs {
    pub fn button(&self, name: &str) -> InputResult<ButtonHandle> {
        self.buttons
            .get(name)
            .copied()
            .ok_or_else(|| InputError::UnknownName(name.to_string()))
    }

    pub fn axis(&self, name: &str) -> InputResult<AxisHandle> {
        self.axes
            .get(name)
            .copied()
            .ok_or_else(|| InputError::UnknownName(name.to_string()))
    }

    pub fn stick(&self, name: &str) -> InputResult<StickHandle> {
        self.sticks
            .get(name)
            .copied()
            .ok_or_else(|| InputError::UnknownName(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.buttons.len() + self.axes.len() + self.sticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::binding::{AxisSign, Binding};

    const SAMPLE: &str = r#"
[buttons.jump]
buffer_ms = 120
binding = [
    { type = "key", key = "space" },
    { type = "button", button = 0, masks = ["gamepad"] },
]

[axes.horizontal]
overlap = "cancel_out"
device = { slot = 1 }
negative = [{ type = "key", key = "a" }]
positive = [{ type = "key", key = "d" }, { type = "axis", axis = 0, sign = "positive", deadzone = 0.25 }]

[sticks.move]
deadzone = { shape = "circular", radius = 0.2 }
x.negative = [{ type = "axis", axis = 0, sign = "negative" }]
x.positive = [{ type = "axis", axis = 0, sign = "positive" }]
y.negative = [{ type = "axis", axis = 1, sign = "negative" }]
y.positive = [{ type = "axis", axis = 1, sign = "positive" }]
"#;

    #[test]
    fn parses_sample() {
        let set = BindingSet::from_toml(SAMPLE).unwrap();
        assert_eq!(set.len(), 3);

        let jump = &set.buttons["jump"];
        assert_eq!(jump.buffer_ms, Some(120));
        assert_eq!(jump.device, Device::Any);
        assert_eq!(jump.binding.entries()[0].binding, Binding::key(Key::Space));
        assert_eq!(jump.binding.entries()[1].masks, vec!["gamepad".to_string()]);

        let horizontal = &set.axes["horizontal"];
        assert_eq!(horizontal.overlap, Overlap::CancelOut);
        assert_eq!(horizontal.device, Device::Slot(1));
        assert_eq!(
            horizontal.positive.entries()[1].binding,
            Binding::axis(0, AxisSign::Positive, 0.25)
        );

        let stick = &set.sticks["move"];
        assert_eq!(
            stick.deadzone,
            Some(StickDeadzone {
                shape: DeadzoneShape::Circular,
                radius: 0.2
            })
        );
        assert_eq!(stick.y.negative.entries().len(), 1);
    }

    #[test]
    fn rejects_bad_deadzone() {
        let text = r#"
[axes.bad]
negative = [{ type = "axis", axis = 0, sign = "negative", deadzone = 1.5 }]
positive = []
"#;
        assert!(matches!(
            BindingSet::from_toml(text),
            Err(InputError::InvalidDeadzone { .. })
        ));
    }

    #[test]
    fn rejects_unknown_binding_type() {
        let text = r#"
[buttons.jump]
binding = [{ type = "pedal", pedal = 1 }]
"#;
        assert!(matches!(BindingSet::from_toml(text), Err(InputError::Config(_))));
    }

    #[test]
    fn registers_into_coordinator() {
        let set = BindingSet::from_toml(SAMPLE).unwrap();
        let mut input = InputCoordinator::default();
        let handles = set.register(&mut input).unwrap();

        assert_eq!(handles.len(), 3);
        assert_eq!(input.input_count(), 3);

        let jump = handles.button("jump").unwrap();
        assert_eq!(
            input.button(jump).unwrap().timing().buffer,
            Duration::from_millis(120)
        );
        assert!(handles.axis("horizontal").is_ok());
        assert!(handles.stick("move").is_ok());
        assert!(matches!(handles.button("move"), Err(InputError::UnknownName(_))));
    }

    #[test]
    fn duplicate_names_register_nothing() {
        let set = BindingSet::from_toml(SAMPLE).unwrap();
        let mut input = InputCoordinator::default();
        input.create_button("move", ActionBinding::new(), Device::Any);

        assert!(matches!(
            set.register(&mut input),
            Err(InputError::DuplicateName(name)) if name == "move"
        ));
        assert_eq!(input.input_count(), 1);
    }

    #[test]
    fn builtin_set_is_valid() {
        let set = BindingSet::builtin();
        assert!(set.validate().is_ok());
        assert!(set.buttons.contains_key("confirm"));
        assert!(set.sticks.contains_key("move"));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bindings.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let set = BindingSet::load(&path).unwrap();
        assert_eq!(set, BindingSet::from_toml(SAMPLE).unwrap());

        assert!(BindingSet::load(&dir.path().join("missing.toml")).is_err());
    }
}
