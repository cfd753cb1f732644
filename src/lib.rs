//! Kiln
//!
//! Window and input framework built on winit, with a virtual-input binding
//! engine that turns raw device events into frame-stable logical inputs.

/// Application shell - windowing and platform event translation
pub mod app;

/// Build-time information (timestamp, target, compiler)
pub mod build_info;

/// Profile-based application configuration
pub mod config;

/// System health checks
pub mod health;

/// Virtual input engine - device tables, bindings, and virtual inputs
pub mod input;
