//! Glue between the Embassy runtime and the sensor's collaborator traits
//!
//! The sensor runs synchronously inside one task. The UART tasks move
//! bytes through static pipes, so the sensor only ever sees pipes that
//! can be read and written without waiting.

use defmt::*;
use embassy_rp::uart::{
    Config as UartConfig, DataBits as RpDataBits, Parity as RpParity, StopBits as RpStopBits,
};
use embassy_sync::pipe::{TryReadError, TryWriteError};
use embassy_time::Instant;

use desk_height_core::traits::{EventLog, HeightSink, Level, SensorEvent};
use desk_height_hal::{Clock, DataBits, Parity, SerialConfig, SerialRx, SerialTx, StopBits};

use crate::channels::{HEIGHT, RX_PIPE, TX_PIPE};

/// Build the RP2040 UART settings
pub fn uart_config(serial: &SerialConfig) -> UartConfig {
    let mut config = UartConfig::default();
    config.baudrate = serial.baudrate;
    config.data_bits = match serial.data_bits {
        DataBits::Seven => RpDataBits::DataBits7,
        DataBits::Eight => RpDataBits::DataBits8,
    };
    config.parity = match serial.parity {
        Parity::None => RpParity::ParityNone,
        Parity::Even => RpParity::ParityEven,
        Parity::Odd => RpParity::ParityOdd,
    };
    config.stop_bits = match serial.stop_bits {
        StopBits::One => RpStopBits::STOP1,
        StopBits::Two => RpStopBits::STOP2,
    };
    config
}

/// Serial pipe errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum PipeError {
    /// Outbound pipe has no room for the whole frame
    TxFull,
}

/// Serial port backed by the static RX/TX pipes
pub struct PipeSerial;

impl SerialRx for PipeSerial {
    type Error = PipeError;

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, PipeError> {
        match RX_PIPE.try_read(buf) {
            Ok(n) => Ok(n),
            Err(TryReadError::Empty) => Ok(0),
        }
    }
}

impl SerialTx for PipeSerial {
    type Error = PipeError;

    fn write_all(&mut self, data: &[u8]) -> Result<(), PipeError> {
        // Query frames are all-or-nothing, half a frame would desync the controller
        if TX_PIPE.free_capacity() < data.len() {
            return Err(PipeError::TxFull);
        }

        let mut rest = data;
        while !rest.is_empty() {
            match TX_PIPE.try_write(rest) {
                Ok(n) => rest = &rest[n..],
                Err(TryWriteError::Full) => return Err(PipeError::TxFull),
            }
        }
        Ok(())
    }
}

/// Embassy time driver as a millisecond clock
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation wraps after ~49.7 days, comparisons use wrapping math
        Instant::now().as_millis() as u32
    }
}

/// Publishes heights to the [`HEIGHT`] signal
pub struct SignalSink;

impl HeightSink for SignalSink {
    fn publish(&mut self, value_cm: f32) {
        HEIGHT.signal(value_cm);
    }
}

/// Forwards sensor events to defmt
pub struct DefmtLog;

impl EventLog for DefmtLog {
    fn record(&mut self, event: SensorEvent) {
        match event.level() {
            Level::Trace => trace!("{}", event),
            Level::Debug => debug!("{}", event),
            Level::Info => info!("{}", event),
            Level::Warn => warn!("{}", event),
        }
    }
}
