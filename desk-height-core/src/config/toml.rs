//! Simple TOML parser for the sensor configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `desk.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [section] headers: `serial`, `poll`, `query`
//! - Comments (# ...)
//!
//! Keys that are not given keep their defaults. The result is validated
//! before it is returned.

use desk_height_protocol::QueryCommand;

use super::types::{ActivityPolicy, ConfigError, DeskConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Key not known in its section
    UnknownKey,
    /// Invalid value type
    InvalidValue,
    /// Parsed values failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Serial,
    Poll,
    Query,
}

/// Parse TOML configuration into DeskConfig
pub fn parse_config(input: &str) -> Result<DeskConfig, ParseError> {
    let mut config = DeskConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(&mut config, section, key, value)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let header = line
        .strip_prefix('[')
        .and_then(|rest| rest.split('#').next())
        .map(str::trim)
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?;

    match header.trim() {
        "serial" => Ok(Section::Serial),
        "poll" => Ok(Section::Poll),
        "query" => Ok(Section::Query),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split a `key = value` line, dropping any inline comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        // Make sure # is not inside a string
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    // TOML allows 5_000 style separators
    let mut digits = heapless::String::<16>::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_query(value: &str) -> Result<QueryCommand, ParseError> {
    match parse_string(value) {
        "wake" => Ok(QueryCommand::Wake),
        "silent" => Ok(QueryCommand::Silent),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_optional_query(value: &str) -> Result<Option<QueryCommand>, ParseError> {
    match parse_string(value) {
        "none" => Ok(None),
        _ => parse_query(value).map(Some),
    }
}

fn parse_activity(value: &str) -> Result<ActivityPolicy, ParseError> {
    match parse_string(value) {
        "every_reading" => Ok(ActivityPolicy::EveryReading),
        "on_change" => Ok(ActivityPolicy::OnChange),
        _ => Err(ParseError::InvalidValue),
    }
}

fn apply_value(
    config: &mut DeskConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    let timing = &mut config.sensor.timing;

    match (section, key) {
        (Section::Serial, "baudrate") => config.serial.baudrate = parse_int(value)?,

        (Section::Poll, "boot_delay_ms") => timing.boot_delay_ms = parse_int(value)?,
        (Section::Poll, "idle_interval_ms") => timing.idle_interval_ms = parse_int(value)?,
        (Section::Poll, "active_interval_ms") => timing.active_interval_ms = parse_int(value)?,
        (Section::Poll, "activity_timeout_ms") => {
            timing.activity_timeout_ms = parse_int(value)?
        }
        (Section::Poll, "activity") => config.sensor.activity = parse_activity(value)?,

        (Section::Query, "boot") => config.sensor.boot_query = parse_query(value)?,
        (Section::Query, "idle") => config.sensor.idle_query = parse_optional_query(value)?,
        (Section::Query, "active") => config.sensor.active_query = parse_query(value)?,

        _ => return Err(ParseError::UnknownKey),
    }

    Ok(())
}
