//! Built-in health checks

pub mod bindings;
pub mod build_info;
pub mod config;
pub mod input_pipeline;
pub mod system_info;

pub use bindings::BindingSetCheck;
pub use build_info::BuildInfoCheck;
pub use config::ConfigCheck;
pub use input_pipeline::InputPipelineCheck;
pub use system_info::SystemInfoCheck;
