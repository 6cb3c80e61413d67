//! Build script for classplate-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates classplate.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
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

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate classplate.toml at compile time
///
/// The firmware parses the same file with a small no_std parser at boot.
/// Catching mistakes here keeps a typo from silently falling back to
/// defaults on the device.
fn validate_config() {
    println!("cargo:rerun-if-changed=classplate.toml");

    let config_path = Path::new("classplate.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read classplate.toml                           ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in classplate.toml                   ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_keys(&config, &mut errors);
    validate_ranges(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in classplate.toml                 ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=classplate.toml validated successfully");
}

/// Keys the boot parser understands, per section
const KNOWN_KEYS: &[(&str, &[&str])] = &[
    (
        "scroll",
        &[
            "cadence_ms",
            "default_message",
            "char_gap_columns",
            "end_gap_columns",
        ],
    ),
    ("display", &["brightness"]),
    ("clock", &["refresh_ms", "temperature_max_age_s"]),
    ("link", &["heartbeat_interval_s"]),
];

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every section and key must be one the firmware parser knows
fn validate_keys(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("configuration must be a table".to_string());
        return;
    };

    for (section, body) in root {
        let Some((_, keys)) = KNOWN_KEYS.iter().find(|(name, _)| name == section) else {
            errors.push(format!("unknown section [{}]", section));
            continue;
        };
        let Some(body) = body.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };
        for key in body.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", section, key));
            }
        }
    }
}

fn integer(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

/// Same limits as DisplayConfig::validate
fn validate_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    let ranges: &[(&str, &str, i64, i64)] = &[
        ("scroll", "cadence_ms", 1, 1000),
        ("scroll", "char_gap_columns", 0, 8),
        ("scroll", "end_gap_columns", 1, 64),
        ("display", "brightness", 0, 15),
        ("clock", "refresh_ms", 100, 60_000),
        ("clock", "temperature_max_age_s", 0, u32::MAX as i64),
        ("link", "heartbeat_interval_s", 1, u32::MAX as i64),
    ];

    for &(section, key, min, max) in ranges {
        let present = config.get(section).and_then(|s| s.get(key)).is_some();
        match integer(config, section, key) {
            Some(value) if value < min || value > max => {
                errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            }
            None if present => {
                errors.push(format!("[{}] {} must be an integer", section, key));
            }
            _ => {}
        }
    }

    if let Some(message) = config.get("scroll").and_then(|s| s.get("default_message")) {
        match message.as_str() {
            Some("") => errors.push("[scroll] default_message must not be empty".to_string()),
            Some(text) if text.len() > 128 => {
                errors.push("[scroll] default_message longer than 128 bytes".to_string())
            }
            Some(text) if text.contains('"') || text.contains('\\') => {
                errors.push("[scroll] default_message cannot contain quotes or escapes".to_string())
            }
            Some(_) => {}
            None => errors.push("[scroll] default_message must be a string".to_string()),
        }
    }
}
