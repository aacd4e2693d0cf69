//! Height broadcast decoding
//!
//! The control box mirrors whatever the keypad shows, which is not always
//! a height: the display blanks while waking up, shows error codes, and
//! shows dashes while the desk recalibrates. Only a plain number becomes
//! a reading.

use desk_height_protocol::{DeskMessage, Digit, HeightDigits, Packet};

/// Why a height broadcast produced no reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IgnoreReason {
    /// All three digits blank, display is waking up
    DisplayWaking,
    /// Display shows something other than a number (error code, stray blank)
    NonNumeric { digits: HeightDigits },
    /// Display shows 000
    Zeroed,
    /// Minus sign in the tens place, desk is resetting
    Resetting,
}

/// A decoded height
///
/// Heights are kept in tenths of a centimetre so repeated readings compare
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeightReading {
    /// Height in 0.1 cm units
    pub value_x10: u16,
    /// Height decoded before this one, if any
    pub previous_x10: Option<u16>,
}

impl HeightReading {
    /// Height in centimetres
    pub fn value_cm(&self) -> f32 {
        self.value_x10 as f32 / 10.0
    }

    /// Whether the desk moved since the previous reading
    ///
    /// The first reading has nothing to compare against and is not a change.
    pub fn has_changed(&self) -> bool {
        matches!(self.previous_x10, Some(previous) if previous != self.value_x10)
    }
}

/// What a packet meant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interpretation {
    /// Keep-alive, nothing to do
    Heartbeat,
    /// Message this sensor does not use
    Unhandled { msg_type: u8, length: u8 },
    /// Height broadcast that did not carry a height
    Ignored(IgnoreReason),
    /// A valid height
    Reading(HeightReading),
}

impl Interpretation {
    /// The reading, if this packet produced one
    pub fn reading(&self) -> Option<&HeightReading> {
        match self {
            Interpretation::Reading(reading) => Some(reading),
            _ => None,
        }
    }
}

/// Decode the display digits into a height in 0.1 cm units
///
/// Rules, in order:
/// 1. all blank: display waking up
/// 2. blank hundreds digit reads as 0 (heights under 100)
/// 3. any unknown pattern: non-numeric content
/// 4. 000: zeroed display
/// 5. minus in the tens place: desk resetting
/// 6. any other non-numeral left: non-numeric content
///
/// A decimal point on the tens digit means the display shows `xx.x`.
pub fn decode_height(digits: &HeightDigits) -> Result<u16, IgnoreReason> {
    let [hundreds, tens, ones] = digits.decode();

    if hundreds.is_blank() && tens.is_blank() && ones.is_blank() {
        return Err(IgnoreReason::DisplayWaking);
    }

    let hundreds = if hundreds.is_blank() {
        Digit::Value(0)
    } else {
        hundreds
    };

    let non_numeric = IgnoreReason::NonNumeric { digits: *digits };

    if [hundreds, tens, ones].contains(&Digit::Invalid) {
        return Err(non_numeric);
    }

    if [hundreds, tens, ones] == [Digit::Value(0); 3] {
        return Err(IgnoreReason::Zeroed);
    }

    if tens == Digit::Minus {
        return Err(IgnoreReason::Resetting);
    }

    let (Some(h), Some(t), Some(o)) = (hundreds.value(), tens.value(), ones.value()) else {
        return Err(non_numeric);
    };

    let raw = 100 * h as u16 + 10 * t as u16 + o as u16;
    if digits.has_decimal() {
        Ok(raw)
    } else {
        Ok(raw * 10)
    }
}

/// Tracks the current height across packets
#[derive(Debug, Clone, Default)]
pub struct HeightInterpreter {
    current_x10: Option<u16>,
}

impl HeightInterpreter {
    /// Create an interpreter with no height yet
    pub const fn new() -> Self {
        Self { current_x10: None }
    }

    /// Interpret one received packet
    ///
    /// Only a successful reading updates the current height.
    pub fn interpret(&mut self, packet: &Packet) -> Interpretation {
        match DeskMessage::from_packet(packet) {
            DeskMessage::Heartbeat => Interpretation::Heartbeat,
            DeskMessage::Unhandled { msg_type, length } => {
                Interpretation::Unhandled { msg_type, length }
            }
            DeskMessage::Height(digits) => match decode_height(&digits) {
                Ok(value_x10) => Interpretation::Reading(HeightReading {
                    value_x10,
                    previous_x10: self.current_x10.replace(value_x10),
                }),
                Err(reason) => Interpretation::Ignored(reason),
            },
        }
    }

    /// Most recent height in centimetres
    pub fn current_cm(&self) -> Option<f32> {
        self.current_x10.map(|v| v as f32 / 10.0)
    }
}
