//! UART serial communication abstractions
//!
//! The desk bus is polled from a cooperative tick, so unlike a typical
//! blocking UART driver both directions here must return immediately.

/// UART receiver
///
/// Non-blocking access to bytes that have already arrived.
pub trait SerialRx {
    /// Error type for receive operations
    type Error;

    /// Copy already-received bytes into `buf`
    ///
    /// Returns the number of bytes written, `0` when nothing is pending.
    /// Must never wait for more data.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// UART transmitter
pub trait SerialTx {
    /// Error type for transmit operations
    type Error;

    /// Queue `data` for transmission
    ///
    /// Either the whole slice is accepted or an error is returned.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// Combined UART interface
///
/// For ports that provide both TX and RX on a single peripheral.
pub trait Serial: SerialRx + SerialTx {}

// Blanket implementation
impl<T: SerialRx + SerialTx> Serial for T {}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl SerialConfig {
    /// Line settings used by the desk controller and its keypad
    pub const DESK_BUS: Self = Self {
        baudrate: 9600,
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
    };
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::DESK_BUS
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
