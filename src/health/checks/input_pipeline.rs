//! Input pipeline health check
//!
//! Drives a scratch coordinator through a short scripted session and verifies
//! the virtual inputs it produces.

use std::time::Duration;

use crate::health::check::{CheckResult, CheckStatus, SystemCheck};
use crate::input::{
    ActionBinding, AxisBinding, ControllerDescriptor, ControllerId, Device, GamepadAxis,
    GamepadButton, InputCoordinator, InputEvent, Key, Overlap, StickBinding,
};

/// Runs scripted events through the input engine
pub struct InputPipelineCheck;

impl InputPipelineCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InputPipelineCheck {
    fn default() -> Self {
        Self::new()
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn expect(lines: &mut Vec<(CheckStatus, String)>, ok: bool, what: &str) {
    let status = if ok {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };
    lines.push((status, what.to_string()));
}

impl SystemCheck for InputPipelineCheck {
    fn name(&self) -> &'static str {
        "Input Pipeline"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates edge detection, axis arbitration and controller hot-plug")
    }

    fn check(&self) -> CheckResult {
        let mut lines = Vec::new();
        let mut input = InputCoordinator::default();

        let jump = input.create_button(
            "jump",
            ActionBinding::new()
                .key(Key::Space)
                .gamepad(GamepadButton::South),
            Device::Any,
        );
        let horizontal = input.create_axis(
            "horizontal",
            AxisBinding::keys(Key::A, Key::D).with_overlap(Overlap::CancelOut),
            Device::Any,
        );
        let stick = input.create_stick("move", StickBinding::left_stick(0.2), Device::Any);

        input.handle(InputEvent::Key {
            key: Key::Space,
            down: true,
        });
        input.step(ms(16));
        let pressed_once = input.button(jump).is_some_and(|b| b.pressed());
        input.step(ms(32));
        let held = input
            .button(jump)
            .is_some_and(|b| b.down() && !b.pressed());
        expect(
            &mut lines,
            pressed_once && held,
            "Key press reported once, then held",
        );

        input.handle_all([
            InputEvent::Key {
                key: Key::A,
                down: true,
            },
            InputEvent::Key {
                key: Key::D,
                down: true,
            },
        ]);
        input.step(ms(48));
        expect(
            &mut lines,
            input.axis(horizontal).is_some_and(|a| a.value() == 0.0),
            "Opposing keys cancel out",
        );

        let pad = ControllerId(7);
        input.handle_all([
            InputEvent::ControllerConnected {
                id: pad,
                descriptor: ControllerDescriptor::gamepad("Health Check Pad"),
            },
            InputEvent::ControllerAxis {
                id: pad,
                axis: GamepadAxis::LeftX.index(),
                value: i16::MAX,
            },
        ]);
        input.step(ms(64));
        expect(
            &mut lines,
            input.controller_count() == 1
                && input.stick(stick).is_some_and(|s| s.value().x == 1.0),
            "Controller connects and full deflection reads 1.0",
        );

        input.handle(InputEvent::ControllerDisconnected { id: pad });
        input.step(ms(80));
        expect(
            &mut lines,
            input.controller_count() == 0
                && input.stick(stick).is_some_and(|s| s.value().x == 0.0),
            "Disconnect returns inputs to neutral",
        );

        let message = if lines.iter().any(|(s, _)| s.is_fail()) {
            "Input engine produced unexpected state"
        } else {
            "Input engine operational"
        };
        CheckResult::from_lines(&lines, message)
    }
}
