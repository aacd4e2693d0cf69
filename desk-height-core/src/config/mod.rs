//! Configuration types
//!
//! Board-agnostic configuration structures plus a small TOML reader for
//! the `desk.toml` file embedded in firmware images.

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::*;
