//! Build script for desk-height-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates desk.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted in each section
const SERIAL_KEYS: &[&str] = &["baudrate"];
const POLL_KEYS: &[&str] = &[
    "boot_delay_ms",
    "idle_interval_ms",
    "active_interval_ms",
    "activity_timeout_ms",
    "activity",
];
const QUERY_KEYS: &[&str] = &["boot", "idle", "active"];

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

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate desk.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=desk.toml");

    let config_path = Path::new("desk.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: desk.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds desk.toml as its configuration.             ║\n\
            ║  Please create one in the desk-height-firmware directory.        ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read desk.toml                                 ║\n\
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
                ║  ERROR: Invalid TOML syntax in desk.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_serial(&config, &mut errors);
    validate_poll(&config, &mut errors);
    validate_query(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid desk.toml                                        ║\n\
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

    println!("cargo:warning=desk.toml validated successfully");
}

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

/// Only the three known sections, each a table of known keys
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let root = match config.as_table() {
        Some(t) => t,
        None => return,
    };

    for (name, section) in root {
        let known = match name.as_str() {
            "serial" => SERIAL_KEYS,
            "poll" => POLL_KEYS,
            "query" => QUERY_KEYS,
            _ => {
                errors.push(format!("unknown section [{}]", name));
                continue;
            }
        };

        let table = match section.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("[{}] must be a table", name));
                continue;
            }
        };

        for key in table.keys() {
            if !known.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

fn section<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::value::Table> {
    config.get(name).and_then(|s| s.as_table())
}

/// Integer in milliseconds or baud, must fit a u32
fn integer(
    table: &toml::value::Table,
    section: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        None => None,
        Some(toml::Value::Integer(v)) if (0..=u32::MAX as i64).contains(v) => Some(*v),
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer 0-{}", section, key, u32::MAX));
            None
        }
    }
}

fn validate_serial(config: &toml::Value, errors: &mut Vec<String>) {
    let serial = match section(config, "serial") {
        Some(t) => t,
        None => return,
    };

    if integer(serial, "serial", "baudrate", errors) == Some(0) {
        errors.push("[serial] baudrate must not be 0".to_string());
    }
}

fn validate_poll(config: &toml::Value, errors: &mut Vec<String>) {
    // Defaults mirror desk-height-core so partial files are judged correctly
    let mut idle = 5_000;
    let mut active = 330;

    if let Some(poll) = section(config, "poll") {
        integer(poll, "poll", "boot_delay_ms", errors);
        if let Some(v) = integer(poll, "poll", "idle_interval_ms", errors) {
            idle = v;
        }
        if let Some(v) = integer(poll, "poll", "active_interval_ms", errors) {
            active = v;
        }
        if integer(poll, "poll", "activity_timeout_ms", errors) == Some(0) {
            errors.push("[poll] activity_timeout_ms must not be 0".to_string());
        }

        if let Some(value) = poll.get("activity") {
            if !matches!(value.as_str(), Some("every_reading" | "on_change")) {
                errors.push("[poll] activity must be 'every_reading' or 'on_change'".to_string());
            }
        }
    }

    if idle == 0 || active == 0 {
        errors.push("[poll] poll intervals must not be 0".to_string());
    } else if active >= idle {
        errors.push("[poll] active_interval_ms must be below idle_interval_ms".to_string());
    }
}

fn validate_query(config: &toml::Value, errors: &mut Vec<String>) {
    let query = match section(config, "query") {
        Some(t) => t,
        None => return,
    };

    for key in QUERY_KEYS {
        let value = match query.get(*key) {
            Some(v) => v,
            None => continue,
        };

        let allowed: &[&str] = if *key == "idle" {
            &["wake", "silent", "none"]
        } else {
            &["wake", "silent"]
        };

        match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            _ => errors.push(format!(
                "[query] {} must be one of {}",
                key,
                allowed.join(", ")
            )),
        }
    }
}
