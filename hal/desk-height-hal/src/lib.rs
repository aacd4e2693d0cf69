//! Desk Height Hardware Abstraction Layer
//!
//! This crate defines the narrow capabilities the sensor core needs from
//! its host: a non-blocking serial port and a monotonic millisecond clock.
//! Board crates (the RP2040 firmware, host simulators, test fakes) implement
//! them so the same decoder runs everywhere.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  desk-height-firmware / test harness    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  desk-height-core (sensor, scheduler)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  desk-height-hal (this crate - traits)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialRx`], [`uart::SerialTx`] - Serial communication
//! - [`clock::Clock`] - Monotonic millisecond time source

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clock::{elapsed_ms, Clock};
pub use uart::{DataBits, Parity, Serial, SerialConfig, SerialRx, SerialTx, StopBits};
