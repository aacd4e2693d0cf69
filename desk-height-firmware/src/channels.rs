//! Inter-task communication channels
//!
//! Defines the static pipes and signals used between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use embassy_sync::signal::Signal;

/// Bytes buffered from the UART for the sensor
///
/// At 9600 baud about 50 bytes arrive per sensor tick.
pub const RX_PIPE_SIZE: usize = 256;

/// Bytes queued by the sensor for the UART
pub const TX_PIPE_SIZE: usize = 64;

/// Controller → sensor bytes
pub static RX_PIPE: Pipe<CriticalSectionRawMutex, RX_PIPE_SIZE> = Pipe::new();

/// Sensor → controller bytes
pub static TX_PIPE: Pipe<CriticalSectionRawMutex, TX_PIPE_SIZE> = Pipe::new();

/// Latest published desk height in centimetres
pub static HEIGHT: Signal<CriticalSectionRawMutex, f32> = Signal::new();
