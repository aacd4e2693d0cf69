//! Configuration loading
//!
//! The configuration is `desk.toml`, embedded at compile time and already
//! checked by build.rs. Parsing happens once at boot.

use defmt::*;

use desk_height_core::config::{parse_config, DeskConfig};

/// Embedded configuration, edit desk.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../desk.toml");

/// Parse the embedded configuration
///
/// Falls back to the built-in defaults if parsing fails.
pub fn load_config() -> DeskConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration: {}", config);
            config
        }
        Err(e) => {
            // Only reachable if build.rs and the parser disagree
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using default configuration");
            DeskConfig::default()
        }
    }
}
