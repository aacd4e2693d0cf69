//! Desk Controller Bus Protocol
//!
//! This crate decodes the UART traffic between a standing desk's control
//! box and its keypad display. The control box broadcasts what the keypad
//! should show as three 7-segment digit bytes; the keypad (or anything
//! impersonating it) can ask for a fresh broadcast with a short query frame.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────────┬────────┬──────┬──────────────────┬──────┐
//! │ START     │ LENGTH │ TYPE │ PAYLOAD          │ END  │
//! │ 9B or 98  │ 1B     │ 1B   │ LENGTH - 2 bytes │ 9D   │
//! └───────────┴────────┴──────┴──────────────────┴──────┘
//! ```
//!
//! A frame is `LENGTH + 2` bytes long. There is no checksum; the end byte
//! is the only integrity check the bus offers.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;
pub mod segment;

pub use frame::{
    FrameError, FrameReceiver, Frames, Packet, END_BYTE, MAX_PAYLOAD_SIZE, RX_BUFFER_SIZE,
    START_BYTES,
};
pub use messages::{DeskMessage, HeightDigits, QueryCommand, MSG_HEARTBEAT, MSG_HEIGHT};
pub use segment::{decode, encode, has_decimal, Digit};
