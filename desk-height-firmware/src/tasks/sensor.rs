//! Sensor task
//!
//! Owns the [`DeskHeightSensor`] and ticks it on a fixed cadence. All
//! decoding and scheduling happens inside the tick.

use defmt::*;
use embassy_time::{Duration, Ticker};

use desk_height_core::config::SensorConfig;
use desk_height_core::DeskHeightSensor;
use desk_height_hal::Clock;

use crate::transport::{DefmtLog, EmbassyClock, PipeSerial, SignalSink};

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 50;

/// Sensor task - decodes heights and polls the controller
#[embassy_executor::task]
pub async fn sensor_task(config: SensorConfig) {
    info!("Sensor task started");

    let clock = EmbassyClock;
    let mut sensor = match DeskHeightSensor::new(
        PipeSerial,
        SignalSink,
        DefmtLog,
        config,
        clock.now_ms(),
    ) {
        Ok(sensor) => sensor,
        Err(e) => {
            error!("Rejected sensor config: {}", e);
            return;
        }
    };

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        ticker.next().await;
        sensor.poll(&clock);
    }
}
