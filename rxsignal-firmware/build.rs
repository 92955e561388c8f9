//! Build script for rxsignal-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates receiver.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use rxsignal_core::calibration::TxRxCombo;
use rxsignal_core::config::ReceiverConfig;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate receiver.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=receiver.toml");

    let config_path = Path::new("receiver.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: receiver.toml not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a receiver.toml configuration file.       ║\n\
            ║  Please create one in the rxsignal-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read receiver.toml                             ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax first, so a typo is reported as such rather than as a type error
    let raw: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail("Invalid TOML syntax in receiver.toml", &[e.to_string()]),
    };

    let config: ReceiverConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => fail("Invalid receiver configuration", &[e.to_string()]),
    };

    if let Err(e) = config.validate() {
        fail("Invalid receiver configuration", &[format!("{:?}", e)]);
    }

    warn_unknown_combos(&raw);

    println!(
        "cargo:warning=receiver.toml validated successfully ({} channels)",
        config.channels.len()
    );
}

/// Unknown combo names silently fall back to the generic curve; say so
fn warn_unknown_combos(raw: &toml::Value) {
    let Some(channels) = raw.get("channel").and_then(|c| c.as_array()) else {
        return;
    };

    for (i, channel) in channels.iter().enumerate() {
        let Some(name) = channel.get("combo").and_then(|c| c.as_str()) else {
            continue;
        };
        if TxRxCombo::from_name(name).name() != name {
            println!(
                "cargo:warning=[[channel]] {} combo '{}' is unknown, using '{}'",
                i,
                name,
                TxRxCombo::Legacy.name()
            );
        }
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .flat_map(|e| e.lines())
            .map(format_error_line)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Format one error line with box drawing
fn format_error_line(line: &str) -> String {
    let truncated = if line.len() > 64 {
        format!("{}...", &line[..61])
    } else {
        line.to_string()
    };
    format!("║  {:<64} ║", truncated)
}
