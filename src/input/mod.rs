//! Virtual input system
//!
//! Turns raw device events into named, frame-stable logical inputs:
//! - Tracks keyboard, mouse and a fixed number of controller slots
//! - Resolves bindings (keys, mouse buttons, controller buttons and axes)
//!   into digital buttons, signed axes and 2D sticks
//! - Applies deadzones, overlap policies, press buffering and repeat
//! - Filters binding entries by the active mask set
//!
//! # Architecture
//!
//! ```text
//! Platform events → InputCoordinator::handle → live DeviceTables
//!                                                   ↓
//!                                  step(now): previous ← current ← live
//!                                                   ↓
//!                                   VirtualButton / VirtualAxis / VirtualStick
//!                                       (refreshed in registration order)
//! ```
//!
//! Queries between two steps always return the same answers; events
//! delivered after a step become visible at the next one.
//!
//! # Usage
//!
//! ```ignore
//! let mut input = InputCoordinator::default();
//! let jump = input.create_button("jump", ActionBinding::new().key(Key::Space), Device::Any);
//!
//! // While pumping platform events
//! input.handle(InputEvent::Key { key: Key::Space, down: true });
//!
//! // Once per frame, before game logic
//! input.step(elapsed);
//! if input.button(jump).is_some_and(|b| b.pressed()) {
//!     // ...
//! }
//! ```

mod binding;
mod binding_set;
mod coordinator;
mod error;
mod events;
mod resolve;
mod state;
mod virtual_input;

// Re-export public API
pub use binding::{
    ActionBinding, AxisBinding, AxisSign, Binding, BindingEntry, DeadzoneShape, Device, MaskSet,
    Overlap, StickBinding, StickDeadzone,
};
pub use binding_set::{AxisSpec, BindingSet, ButtonSpec, RegisteredInputs, StickSpec};
pub use coordinator::{
    AxisHandle, ButtonHandle, DEFAULT_CONTROLLER_SLOTS, InputCoordinator, InputId, InputSettings,
    StickHandle,
};
pub use error::{InputError, InputResult};
pub use events::{
    ControllerDescriptor, ControllerId, GamepadAxis, GamepadButton, GamepadType, InputEvent, Key,
    MouseButton,
};
pub use resolve::apply_deadzone;
pub use state::{
    AxisRecord, ButtonRecord, Controller, DeviceTables, KeyboardState, MouseState, normalize_axis,
};
pub use virtual_input::{
    AxisState, ButtonTiming, VirtualAxis, VirtualButton, VirtualInput, VirtualStick, shape_stick,
};
