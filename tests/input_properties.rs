//! End-to-end behavior of the input engine through its public API

use std::time::Duration;

use glam::IVec2;

use kiln::input::{
    ActionBinding, AxisBinding, ButtonTiming, ControllerDescriptor, ControllerId, DeadzoneShape,
    Device, GamepadAxis, GamepadButton, InputCoordinator, InputEvent, InputSettings, Key, Overlap,
    StickBinding, normalize_axis,
};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn key(key: Key, down: bool) -> InputEvent {
    InputEvent::Key { key, down }
}

fn connect(id: u32, name: &str) -> InputEvent {
    InputEvent::ControllerConnected {
        id: ControllerId(id),
        descriptor: ControllerDescriptor::gamepad(name),
    }
}

#[test]
fn press_is_reported_exactly_once() {
    let mut input = InputCoordinator::default();
    let jump = input.create_button("jump", ActionBinding::new().key(Key::Space), Device::Any);

    input.handle(key(Key::Space, true));
    input.step(ms(16));
    assert!(input.button(jump).unwrap().pressed());

    for frame in 2..6 {
        input.step(ms(16 * frame));
        let button = input.button(jump).unwrap();
        assert!(button.down());
        assert!(!button.pressed());
    }

    input.handle(key(Key::Space, false));
    input.step(ms(100));
    assert!(input.button(jump).unwrap().released());

    input.handle(key(Key::Space, true));
    input.step(ms(116));
    assert!(input.button(jump).unwrap().pressed());
}

#[test]
fn tap_within_one_frame_is_not_lost() {
    let mut input = InputCoordinator::default();
    let jump = input.create_button("jump", ActionBinding::new().key(Key::Space), Device::Any);

    input.handle_all([key(Key::Space, true), key(Key::Space, false)]);
    input.step(ms(16));

    let button = input.button(jump).unwrap();
    assert!(button.pressed());
    assert!(button.released());
    assert!(!button.down());
}

#[test]
fn cancel_out_with_both_directions_is_zero() {
    let mut input = InputCoordinator::default();
    let axis = input.create_axis(
        "horizontal",
        AxisBinding::keys(Key::A, Key::D).with_overlap(Overlap::CancelOut),
        Device::Any,
    );

    input.handle_all([key(Key::A, true), key(Key::D, true)]);
    input.step(ms(16));
    assert_eq!(input.axis(axis).unwrap().value(), 0.0);

    input.handle(key(Key::A, false));
    input.step(ms(32));
    assert_eq!(input.axis(axis).unwrap().value(), 1.0);
}

fn overlap_value(overlap: Overlap, first: Key, second: Key) -> f32 {
    let mut input = InputCoordinator::default();
    let axis = input.create_axis(
        "horizontal",
        AxisBinding::keys(Key::A, Key::D).with_overlap(overlap),
        Device::Any,
    );

    input.step(ms(10));
    input.handle(key(first, true));
    input.step(ms(20));
    input.handle(key(second, true));
    input.step(ms(30));

    input.axis(axis).unwrap().value()
}

#[test]
fn take_newer_follows_latest_press() {
    assert_eq!(overlap_value(Overlap::TakeNewer, Key::A, Key::D), 1.0);
    assert_eq!(overlap_value(Overlap::TakeNewer, Key::D, Key::A), -1.0);
}

#[test]
fn take_older_follows_earliest_press() {
    assert_eq!(overlap_value(Overlap::TakeOlder, Key::A, Key::D), -1.0);
    assert_eq!(overlap_value(Overlap::TakeOlder, Key::D, Key::A), 1.0);
}

#[test]
fn simultaneous_presses_break_ties_by_policy() {
    let mut newer = InputCoordinator::default();
    let newer_axis = newer.create_axis("h", AxisBinding::keys(Key::A, Key::D), Device::Any);
    let mut older = InputCoordinator::default();
    let older_axis = older.create_axis(
        "h",
        AxisBinding::keys(Key::A, Key::D).with_overlap(Overlap::TakeOlder),
        Device::Any,
    );

    for input in [&mut newer, &mut older] {
        input.handle_all([key(Key::A, true), key(Key::D, true)]);
        input.step(ms(16));
    }

    assert_eq!(newer.axis(newer_axis).unwrap().value(), 1.0);
    assert_eq!(older.axis(older_axis).unwrap().value(), -1.0);
}

#[test]
fn axis_normalization_hits_unit_range() {
    assert_eq!(normalize_axis(i16::MAX), 1.0);
    assert_eq!(normalize_axis(i16::MIN), -1.0);
    assert_eq!(normalize_axis(0), 0.0);

    let mut input = InputCoordinator::default();
    let axis = input.create_axis(
        "x",
        AxisBinding::gamepad_axis(GamepadAxis::LeftX, 0.0),
        Device::Any,
    );
    input.handle_all([
        connect(1, "Pad"),
        InputEvent::ControllerAxis {
            id: ControllerId(1),
            axis: GamepadAxis::LeftX.index(),
            value: i16::MIN,
        },
    ]);
    input.step(ms(16));
    assert_eq!(input.axis(axis).unwrap().value(), -1.0);
}

#[test]
fn reconnect_into_freed_slot_has_no_residue() {
    let mut input = InputCoordinator::default();
    let fire = input.create_button(
        "fire",
        ActionBinding::new().gamepad(GamepadButton::South),
        Device::Slot(0),
    );
    let aim = input.create_stick("aim", StickBinding::right_stick(0.0), Device::Slot(0));

    input.handle_all([
        connect(1, "First"),
        InputEvent::ControllerButton {
            id: ControllerId(1),
            button: GamepadButton::South.index(),
            down: true,
        },
        InputEvent::ControllerAxis {
            id: ControllerId(1),
            axis: GamepadAxis::RightX.index(),
            value: 20000,
        },
    ]);
    input.step(ms(16));
    assert!(input.button(fire).unwrap().down());
    assert!(input.stick(aim).unwrap().value().x > 0.0);

    input.handle_all([
        InputEvent::ControllerDisconnected { id: ControllerId(1) },
        connect(2, "Second"),
    ]);
    input.step(ms(32));

    let controller = input.controller(0).unwrap();
    assert_eq!(controller.id, ControllerId(2));
    assert!(controller.buttons.iter().all(|b| !b.down));
    assert!(controller.axes.iter().all(|a| a.value == 0.0));

    let fire = input.button(fire).unwrap();
    assert!(!fire.down());
    assert!(!fire.pressed());
    assert_eq!(input.stick(aim).unwrap().value().x, 0.0);
}

#[test]
fn held_button_across_reconnect_is_a_new_press() {
    let mut input = InputCoordinator::default();
    let fire = input.create_button(
        "fire",
        ActionBinding::new().gamepad(GamepadButton::South),
        Device::Any,
    );
    let press = |id| InputEvent::ControllerButton {
        id: ControllerId(id),
        button: GamepadButton::South.index(),
        down: true,
    };

    input.handle_all([connect(1, "First"), press(1)]);
    input.step(ms(16));
    assert!(input.button(fire).unwrap().pressed());

    input.handle_all([
        InputEvent::ControllerDisconnected { id: ControllerId(1) },
        connect(2, "Second"),
        press(2),
    ]);
    input.step(ms(32));
    assert!(input.button(fire).unwrap().pressed());
}

fn buffered_settings(buffer: u64) -> InputSettings {
    InputSettings {
        button_timing: ButtonTiming {
            buffer: ms(buffer),
            ..InputSettings::default().button_timing
        },
        ..Default::default()
    }
}

#[test]
fn press_buffer_is_consumed_once() {
    let mut input = InputCoordinator::new(buffered_settings(100));
    let jump = input.create_button("jump", ActionBinding::new().key(Key::Space), Device::Any);

    input.handle(key(Key::Space, true));
    input.step(ms(10));
    input.handle(key(Key::Space, false));
    input.step(ms(50));

    assert!(!input.button(jump).unwrap().pressed());
    assert!(input.consume_press(jump));
    assert!(!input.consume_press(jump));
}

#[test]
fn press_buffer_expires() {
    let mut input = InputCoordinator::new(buffered_settings(100));
    let jump = input.create_button("jump", ActionBinding::new().key(Key::Space), Device::Any);

    input.handle(key(Key::Space, true));
    input.step(ms(10));
    assert!(input.button(jump).unwrap().buffered_press());

    input.step(ms(60));
    assert!(input.button(jump).unwrap().buffered_press());

    input.step(ms(200));
    assert!(!input.button(jump).unwrap().buffered_press());
    assert!(!input.consume_press(jump));
}

#[test]
fn zero_buffer_only_covers_the_press_frame() {
    let mut input = InputCoordinator::default();
    let jump = input.create_button("jump", ActionBinding::new().key(Key::Space), Device::Any);

    input.handle(key(Key::Space, true));
    input.step(ms(10));
    input.step(ms(20));
    assert!(!input.consume_press(jump));

    input.handle(key(Key::Space, false));
    input.step(ms(30));
    input.handle(key(Key::Space, true));
    input.step(ms(40));
    assert!(input.consume_press(jump));
}

#[test]
fn int_value_truncates_toward_zero() {
    let mut input = InputCoordinator::default();
    let axis = input.create_axis(
        "x",
        AxisBinding::gamepad_axis(GamepadAxis::LeftX, 0.0),
        Device::Any,
    );
    let set = |input: &mut InputCoordinator, value: i16, at: u64| {
        input.handle(InputEvent::ControllerAxis {
            id: ControllerId(1),
            axis: GamepadAxis::LeftX.index(),
            value,
        });
        input.step(ms(at));
    };

    input.handle(connect(1, "Pad"));
    set(&mut input, 30000, 16);
    assert_eq!(input.axis(axis).unwrap().int_value(), 0);
    assert_eq!(input.axis(axis).unwrap().sign(), 1);

    set(&mut input, -30000, 32);
    assert_eq!(input.axis(axis).unwrap().int_value(), 0);
    assert_eq!(input.axis(axis).unwrap().sign(), -1);

    set(&mut input, i16::MAX, 48);
    assert_eq!(input.axis(axis).unwrap().int_value(), 1);
}

#[test]
fn device_slot_ignores_other_controllers() {
    let mut input = InputCoordinator::default();
    let second = input.create_button(
        "second",
        ActionBinding::new().gamepad(GamepadButton::South),
        Device::Slot(1),
    );
    let any = input.create_button(
        "any",
        ActionBinding::new().gamepad(GamepadButton::South),
        Device::Any,
    );

    input.handle_all([
        connect(10, "First"),
        connect(11, "Second"),
        InputEvent::ControllerButton {
            id: ControllerId(10),
            button: GamepadButton::South.index(),
            down: true,
        },
    ]);
    input.step(ms(16));

    assert!(!input.button(second).unwrap().down());
    assert!(input.button(any).unwrap().down());
}

#[test]
fn repeat_fires_after_delay_then_at_interval() {
    let settings = InputSettings {
        button_timing: ButtonTiming {
            buffer: Duration::ZERO,
            repeat_delay: ms(300),
            repeat_interval: ms(100),
        },
        ..Default::default()
    };
    let mut input = InputCoordinator::new(settings);
    let down = input.create_button("down", ActionBinding::new().key(Key::Down), Device::Any);

    input.step(ms(0));
    input.handle(key(Key::Down, true));

    let mut repeats = Vec::new();
    for t in (50..=600).step_by(50) {
        input.step(ms(t));
        if input.button(down).unwrap().repeated() {
            repeats.push(t);
        }
    }

    // Pressed at 50: repeats at 350, 450, 550
    assert_eq!(repeats, vec![50, 350, 450, 550]);
}

#[test]
fn masks_select_binding_profiles() {
    let mut input = InputCoordinator::default();
    let confirm = input.create_button(
        "confirm",
        ActionBinding::new()
            .add_masked(kiln::input::Binding::key(Key::Enter), ["keyboard"])
            .add_masked(kiln::input::Binding::key(Key::Z), ["retro"]),
        Device::Any,
    );

    input.set_masks(["retro"]);
    input.handle(key(Key::Enter, true));
    input.step(ms(16));
    assert!(!input.button(confirm).unwrap().down());

    input.set_masks(["keyboard"]);
    input.step(ms(32));
    assert!(input.button(confirm).unwrap().down());
}

#[test]
fn release_buffer_is_consumed_once() {
    let mut input = InputCoordinator::new(buffered_settings(100));
    let charge = input.create_button("charge", ActionBinding::new().key(Key::Space), Device::Any);

    input.handle(key(Key::Space, true));
    input.step(ms(10));
    assert!(!input.button(charge).unwrap().buffered_release());

    input.handle(key(Key::Space, false));
    input.step(ms(20));
    assert!(input.button(charge).unwrap().released());

    input.step(ms(50));
    let button = input.button(charge).unwrap();
    assert!(!button.released());
    assert!(button.buffered_release());

    assert!(input.consume_release(charge));
    assert!(!input.consume_release(charge));
    assert!(!input.button(charge).unwrap().buffered_release());
}

#[test]
fn release_buffer_expires() {
    let mut input = InputCoordinator::new(buffered_settings(100));
    let charge = input.create_button("charge", ActionBinding::new().key(Key::Space), Device::Any);

    input.handle(key(Key::Space, true));
    input.step(ms(10));
    input.handle(key(Key::Space, false));
    input.step(ms(20));
    input.step(ms(200));

    assert!(!input.button(charge).unwrap().buffered_release());
    assert!(!input.consume_release(charge));
}

#[test]
fn keyboard_stick_reports_direction_edges() {
    let mut input = InputCoordinator::default();
    let cursor = input.create_stick(
        "cursor",
        StickBinding::keys(Key::A, Key::D, Key::W, Key::S),
        Device::Any,
    );

    input.handle(key(Key::D, true));
    input.step(ms(16));
    let stick = input.stick(cursor).unwrap();
    assert!(stick.pressed());
    assert_eq!(stick.pressed_sign(), IVec2::new(1, 0));
    assert_eq!(stick.direction(), IVec2::new(1, 0));

    input.step(ms(32));
    let stick = input.stick(cursor).unwrap();
    assert!(!stick.pressed());
    assert_eq!(stick.direction(), IVec2::new(1, 0));

    input.handle(key(Key::W, true));
    input.step(ms(48));
    let stick = input.stick(cursor).unwrap();
    assert_eq!(stick.pressed_sign(), IVec2::new(0, -1));
    assert_eq!(stick.direction(), IVec2::new(1, -1));

    // The newer left press takes over the horizontal axis
    input.handle(key(Key::A, true));
    input.step(ms(64));
    let stick = input.stick(cursor).unwrap();
    assert_eq!(stick.pressed_sign(), IVec2::new(-1, 0));
    assert_eq!(stick.direction(), IVec2::new(-1, -1));
}

#[test]
fn analog_stick_presses_when_leaving_the_deadzone() {
    let mut input = InputCoordinator::default();
    let walk = input.create_stick("walk", StickBinding::left_stick(0.2), Device::Any);
    input.handle(connect(1, "Pad"));

    let mut frames = Vec::new();
    for (frame, raw) in [3000, 6000, 16000, 30000].into_iter().enumerate() {
        input.handle(InputEvent::ControllerAxis {
            id: ControllerId(1),
            axis: GamepadAxis::LeftX.index(),
            value: raw,
        });
        input.step(ms(16 * (frame as u64 + 1)));
        let stick = input.stick(walk).unwrap();
        frames.push((stick.value().x > 0.0, stick.pressed_sign().x));
    }

    assert_eq!(frames, vec![(false, 0), (false, 0), (true, 1), (true, 0)]);

    // Back inside the deadzone, then out again, is a second press
    for (raw, at) in [(2000, 100), (20000, 116)] {
        input.handle(InputEvent::ControllerAxis {
            id: ControllerId(1),
            axis: GamepadAxis::LeftX.index(),
            value: raw,
        });
        input.step(ms(at));
    }
    assert_eq!(input.stick(walk).unwrap().pressed_sign(), IVec2::new(1, 0));
}

#[test]
fn square_deadzone_stick_zeroes_each_axis() {
    let mut input = InputCoordinator::default();
    let binding = StickBinding::left_stick(0.2).with_deadzone(DeadzoneShape::Square, 0.2);
    let walk = input.create_stick("walk", binding, Device::Any);

    input.handle_all([
        connect(1, "Pad"),
        InputEvent::ControllerAxis {
            id: ControllerId(1),
            axis: GamepadAxis::LeftX.index(),
            value: 16384,
        },
        InputEvent::ControllerAxis {
            id: ControllerId(1),
            axis: GamepadAxis::LeftY.index(),
            value: 3000,
        },
    ]);
    input.step(ms(16));

    let stick = input.stick(walk).unwrap();
    assert!((stick.value().x - 0.375).abs() < 1e-3);
    assert_eq!(stick.value().y, 0.0);
    assert!(stick.value_no_deadzone().y > 0.0);
    assert_eq!(stick.direction(), IVec2::new(1, 0));
    assert_eq!(stick.pressed_sign(), IVec2::new(1, 0));
}
