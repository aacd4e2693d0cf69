//! Configuration type definitions
//!
//! Timing and query choices are configuration rather than constants so
//! that test suites can compress the timeouts and so both observed
//! polling strategies can be selected on real hardware.

use desk_height_hal::SerialConfig;
use desk_height_protocol::QueryCommand;

/// Default delay after boot before the first query (ms)
pub const DEFAULT_BOOT_DELAY_MS: u32 = 5_000;

/// Default poll period while the desk is still (ms)
pub const DEFAULT_IDLE_INTERVAL_MS: u32 = 5_000;

/// Default poll period while the desk is moving (ms)
pub const DEFAULT_ACTIVE_INTERVAL_MS: u32 = 330;

/// Default quiet time before falling back to idle polling (ms)
pub const DEFAULT_ACTIVITY_TIMEOUT_MS: u32 = 3_000;

/// Poll scheduler timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollTiming {
    /// Wait after boot before the first query
    pub boot_delay_ms: u32,
    /// Query period in the idle state
    pub idle_interval_ms: u32,
    /// Query period in the active state
    pub active_interval_ms: u32,
    /// Time without activity before active falls back to idle
    pub activity_timeout_ms: u32,
}

impl Default for PollTiming {
    fn default() -> Self {
        Self {
            boot_delay_ms: DEFAULT_BOOT_DELAY_MS,
            idle_interval_ms: DEFAULT_IDLE_INTERVAL_MS,
            active_interval_ms: DEFAULT_ACTIVE_INTERVAL_MS,
            activity_timeout_ms: DEFAULT_ACTIVITY_TIMEOUT_MS,
        }
    }
}

/// Which decoded readings count as bus activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActivityPolicy {
    /// Every successfully decoded height refreshes the activity timer
    #[default]
    EveryReading,
    /// Only a height different from the previous one does
    OnChange,
}

/// Sensor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Scheduler timing
    pub timing: PollTiming,
    /// Query sent once when boot wait ends
    pub boot_query: QueryCommand,
    /// Query sent every idle interval (None = listen only)
    pub idle_query: Option<QueryCommand>,
    /// Query sent every active interval
    pub active_query: QueryCommand,
    /// Activity definition
    pub activity: ActivityPolicy,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            timing: PollTiming::default(),
            // The keypad is normally dark at boot, light it once to get a reading
            boot_query: QueryCommand::Wake,
            idle_query: Some(QueryCommand::Silent),
            active_query: QueryCommand::Silent,
            activity: ActivityPolicy::EveryReading,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Idle interval is zero
    ZeroIdleInterval,
    /// Active interval is zero
    ZeroActiveInterval,
    /// Active interval is not shorter than the idle interval
    ActiveNotFaster,
    /// Activity timeout is zero
    ZeroActivityTimeout,
    /// Baud rate is zero
    ZeroBaudrate,
}

impl SensorConfig {
    /// Check the configuration for values the scheduler cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        if t.idle_interval_ms == 0 {
            return Err(ConfigError::ZeroIdleInterval);
        }
        if t.active_interval_ms == 0 {
            return Err(ConfigError::ZeroActiveInterval);
        }
        if t.active_interval_ms >= t.idle_interval_ms {
            return Err(ConfigError::ActiveNotFaster);
        }
        if t.activity_timeout_ms == 0 {
            return Err(ConfigError::ZeroActivityTimeout);
        }
        Ok(())
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeskConfig {
    /// UART line settings
    pub serial: SerialConfig,
    /// Decoder and poll settings
    pub sensor: SensorConfig,
}

impl DeskConfig {
    /// Validate all sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }
        self.sensor.validate()
    }
}
