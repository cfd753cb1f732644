//! Build-time information
//!
//! Metadata captured by the build script: timestamp, cargo configuration and
//! compiler version.

/// Crate version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Rust compiler version (e.g., 1.85.0)
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// Rust channel (stable, beta, or nightly)
pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

/// Name of the compiled-in controller backend
pub fn gamepad_backend() -> &'static str {
    if cfg!(feature = "gamepad") {
        "gilrs"
    } else {
        "none"
    }
}

/// Short version string
///
/// Format: `{version} ({target_triple}-opt{opt_level})`
/// Example: `0.1.0 (x86_64-unknown-linux-gnu-opt0)`
pub fn version_string() -> String {
    format!(
        "{} ({}-opt{})",
        PKG_VERSION, CARGO_TARGET_TRIPLE, CARGO_OPT_LEVEL
    )
}

/// Multi-line build description
pub fn detailed_info() -> String {
    format!(
        "Version: {}\nBuilt: {}\nTarget: {}\nOptimization: {}\nRustc: {} ({})\nGamepad: {}",
        PKG_VERSION,
        BUILD_TIMESTAMP,
        CARGO_TARGET_TRIPLE,
        CARGO_OPT_LEVEL,
        RUSTC_SEMVER,
        RUSTC_CHANNEL,
        gamepad_backend()
    )
}
