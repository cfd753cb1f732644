//! Application module
//!
//! Handles windowing and translates platform events for the input system.

#[cfg(feature = "gamepad")]
pub mod gamepad;
pub mod platform;
mod runner;
mod window;

pub use platform::PlatformInput;
pub use runner::{App, load_bindings};
pub use window::window_attributes_from_config;
