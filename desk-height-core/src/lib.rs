//! Board-agnostic core logic for the desk height sensor
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Height interpretation and publish de-duplication
//! - Poll state machine
//! - Adaptive poll scheduler
//! - Sensor composition driven by a host tick
//! - Configuration types and the `desk.toml` parser
//! - Collaborator traits (height sink, event log)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod interpreter;
pub mod scheduler;
pub mod sensor;
pub mod state;
pub mod traits;

pub use sensor::DeskHeightSensor;
