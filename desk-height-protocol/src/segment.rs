//! 7-segment digit codec
//!
//! The control box sends each keypad digit as the raw segment pattern it
//! wants lit:
//!
//! ```text
//!    _6_
//!   |   |
//!   5   1
//!   |_0_|
//!   |   |
//!   4   2
//!   |_3_|  .7
//! ```
//!
//! Bit 7 is the decimal point next to the digit and is not part of the
//! pattern.

/// Decimal point flag
const DECIMAL_POINT: u8 = 0x80;

/// Segment bits
const SEGMENT_MASK: u8 = 0x7F;

/// Segment patterns for digits 0 through 9
const DIGIT_PATTERNS: [u8; 10] = [
    0b0011_1111, // 0
    0b0000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
];

/// Middle bar only
const MINUS_PATTERN: u8 = 0b0100_0000;

/// No segments lit
const BLANK_PATTERN: u8 = 0x00;

/// A pattern that matches nothing in the table ("E" as in an error code)
const INVALID_PATTERN: u8 = 0b0111_1001;

/// One decoded keypad digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Digit {
    /// A numeral, always 0..=9
    Value(u8),
    /// Minus sign
    Minus,
    /// All segments off
    Blank,
    /// Any other pattern (letters, partial segments)
    Invalid,
}

impl Digit {
    /// Numeric value, if this is a numeral
    pub fn value(self) -> Option<u8> {
        match self {
            Digit::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Whether no segments are lit
    pub fn is_blank(self) -> bool {
        self == Digit::Blank
    }
}

/// Decode a display byte into a digit
///
/// Total over all 256 inputs; the decimal point bit is ignored.
pub fn decode(byte: u8) -> Digit {
    let segments = byte & SEGMENT_MASK;

    if segments == BLANK_PATTERN {
        return Digit::Blank;
    }
    if segments == MINUS_PATTERN {
        return Digit::Minus;
    }

    DIGIT_PATTERNS
        .iter()
        .position(|&pattern| pattern == segments)
        .map(|value| Digit::Value(value as u8))
        .unwrap_or(Digit::Invalid)
}

/// Check if a display byte has the decimal point lit
#[inline]
pub fn has_decimal(byte: u8) -> bool {
    byte & DECIMAL_POINT == DECIMAL_POINT
}

/// Encode a digit as the control box would send it
///
/// Values above 9 are encoded as an unrecognised pattern.
pub fn encode(digit: Digit, decimal: bool) -> u8 {
    let segments = match digit {
        Digit::Value(v) => DIGIT_PATTERNS
            .get(v as usize)
            .copied()
            .unwrap_or(INVALID_PATTERN),
        Digit::Minus => MINUS_PATTERN,
        Digit::Blank => BLANK_PATTERN,
        Digit::Invalid => INVALID_PATTERN,
    };

    if decimal {
        segments | DECIMAL_POINT
    } else {
        segments
    }
}
