use std::env;
use std::fs;
use std::path::Path;
use vergen::{BuildBuilder, CargoBuilder, Emitter, RustcBuilder};

/// Files copied next to the binary for every build profile
const SHARED_CONFIGS: &[&str] = &["release.toml", "bindings.toml"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = BuildBuilder::default().build_timestamp(true).build()?;

    let cargo = CargoBuilder::default()
        .opt_level(true)
        .target_triple(true)
        .build()?;

    let rustc = RustcBuilder::default()
        .semver(true)
        .channel(true)
        .build()?;

    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&cargo)?
        .add_instructions(&rustc)?
        .emit()?;

    copy_configs()?;

    Ok(())
}

fn copy_config(name: &str, out_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = Path::new("config").join(name);
    println!("cargo:rerun-if-changed={}", source.display());
    if source.exists() {
        fs::copy(&source, out_dir.join(name))?;
    }
    Ok(())
}

fn copy_configs() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = env::var("OUT_DIR")?;
    let profile = env::var("PROFILE")?;

    // OUT_DIR is like target/debug/build/kiln-xxx/out; configs go to target/debug/config
    let target_dir = Path::new(&out_dir)
        .parent()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .ok_or("Could not determine target directory")?;

    let config_out_dir = target_dir.join("config");
    fs::create_dir_all(&config_out_dir)?;

    for name in SHARED_CONFIGS {
        copy_config(name, &config_out_dir)?;
    }

    // Release builds only ship the release profile
    if profile != "release" {
        copy_config("debug.toml", &config_out_dir)?;
    }

    Ok(())
}
