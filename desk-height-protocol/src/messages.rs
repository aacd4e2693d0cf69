//! Message types for the desk controller bus
//!
//! Only two inbound message types matter here:
//! - Control box → keypad: height broadcast (the three display digits)
//! - Control box → keypad: heartbeat
//!
//! Everything else is passed through as [`DeskMessage::Unhandled`].
//! Outbound traffic is limited to the two fixed query frames in
//! [`QueryCommand`].

use crate::frame::{FrameError, Packet, START_BYTES};
use crate::segment::{self, Digit};

// Message type IDs: control box → keypad
pub const MSG_HEARTBEAT: u8 = 0x11;
pub const MSG_HEIGHT: u8 = 0x12;

/// LENGTH of a height broadcast (3 digit bytes + 2 reserved)
pub const HEIGHT_LENGTH: u8 = 7;

/// Reserved payload bytes following the digits
const HEIGHT_RESERVED: [u8; 2] = [0x00, 0x00];

/// The three raw display bytes of a height broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeightDigits {
    pub hundreds: u8,
    pub tens: u8,
    pub ones: u8,
}

impl HeightDigits {
    /// Digits as the display bytes appear in the payload
    pub const fn new(hundreds: u8, tens: u8, ones: u8) -> Self {
        Self {
            hundreds,
            tens,
            ones,
        }
    }

    /// Build the display bytes for a numeric reading
    ///
    /// `decimal` lights the point after the tens digit. The hundreds digit
    /// is blanked when zero, like the keypad does.
    pub fn from_value(value: u16, decimal: bool) -> Self {
        let hundreds = ((value / 100) % 10) as u8;
        let hundreds = if hundreds == 0 {
            Digit::Blank
        } else {
            Digit::Value(hundreds)
        };

        Self {
            hundreds: segment::encode(hundreds, false),
            tens: segment::encode(Digit::Value(((value / 10) % 10) as u8), decimal),
            ones: segment::encode(Digit::Value((value % 10) as u8), false),
        }
    }

    /// Decode all three bytes
    pub fn decode(&self) -> [Digit; 3] {
        [
            segment::decode(self.hundreds),
            segment::decode(self.tens),
            segment::decode(self.ones),
        ]
    }

    /// Decimal point after the tens digit
    pub fn has_decimal(&self) -> bool {
        segment::has_decimal(self.tens)
    }

    /// Encode as a height broadcast packet (for testing or simulation)
    pub fn to_packet(&self) -> Result<Packet, FrameError> {
        Packet::new(
            START_BYTES[0],
            MSG_HEIGHT,
            &[
                self.hundreds,
                self.tens,
                self.ones,
                HEIGHT_RESERVED[0],
                HEIGHT_RESERVED[1],
            ],
        )
    }
}

/// Messages parsed from control box frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeskMessage {
    /// What the keypad display should currently show
    Height(HeightDigits),
    /// Periodic keep-alive
    Heartbeat,
    /// Any other type, or a height type with an unexpected length
    Unhandled { msg_type: u8, length: u8 },
}

impl DeskMessage {
    /// Classify a received packet
    pub fn from_packet(packet: &Packet) -> Self {
        match (packet.msg_type, packet.length, packet.payload.as_slice()) {
            (MSG_HEIGHT, HEIGHT_LENGTH, &[hundreds, tens, ones, ..]) => {
                DeskMessage::Height(HeightDigits::new(hundreds, tens, ones))
            }
            (MSG_HEARTBEAT, _, _) => DeskMessage::Heartbeat,
            (msg_type, length, _) => DeskMessage::Unhandled { msg_type, length },
        }
    }
}

/// Outbound query frames
///
/// Both make the control box broadcast the current height. The byte
/// sequences were captured from a keypad and are sent verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueryCommand {
    /// Lights the keypad display while querying ("M" key)
    Wake,
    /// Queries without lighting the display
    Silent,
}

const WAKE_QUERY: [u8; 8] = [0x9B, 0x06, 0x02, 0x20, 0x00, 0xAC, 0xB8, 0x9D];
const SILENT_QUERY: [u8; 8] = [0x9B, 0x06, 0x02, 0x00, 0x00, 0x6C, 0xA1, 0x9D];

impl QueryCommand {
    /// Frame bytes to write to the bus
    pub const fn bytes(self) -> &'static [u8; 8] {
        match self {
            QueryCommand::Wake => &WAKE_QUERY,
            QueryCommand::Silent => &SILENT_QUERY,
        }
    }

    /// Whether sending this lights up the keypad
    pub const fn lights_display(self) -> bool {
        matches!(self, QueryCommand::Wake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameReceiver;

    #[test]
    fn test_height_message() {
        let packet = Packet::new(0x9B, MSG_HEIGHT, &[0x06, 0x5B, 0x4F, 0x00, 0x00]).unwrap();
        let msg = DeskMessage::from_packet(&packet);
        assert_eq!(msg, DeskMessage::Height(HeightDigits::new(0x06, 0x5B, 0x4F)));
    }

    #[test]
    fn test_height_type_with_wrong_length() {
        let packet = Packet::new(0x9B, MSG_HEIGHT, &[0x06, 0x5B, 0x4F]).unwrap();
        let msg = DeskMessage::from_packet(&packet);
        assert_eq!(
            msg,
            DeskMessage::Unhandled {
                msg_type: MSG_HEIGHT,
                length: 5
            }
        );
    }

    #[test]
    fn test_heartbeat_message() {
        let packet = Packet::new(0x98, MSG_HEARTBEAT, &[0x7C, 0xC3]).unwrap();
        assert_eq!(DeskMessage::from_packet(&packet), DeskMessage::Heartbeat);
    }

    #[test]
    fn test_unknown_message() {
        let packet = Packet::new(0x9B, 0x02, &[0x20, 0x00, 0xAC, 0xB8]).unwrap();
        assert_eq!(
            DeskMessage::from_packet(&packet),
            DeskMessage::Unhandled {
                msg_type: 0x02,
                length: 6
            }
        );
    }

    #[test]
    fn test_digits_from_value() {
        let digits = HeightDigits::from_value(123, true);
        assert_eq!(
            digits.decode(),
            [Digit::Value(1), Digit::Value(2), Digit::Value(3)]
        );
        assert!(digits.has_decimal());

        let short = HeightDigits::from_value(74, false);
        assert_eq!(
            short.decode(),
            [Digit::Blank, Digit::Value(7), Digit::Value(4)]
        );
        assert!(!short.has_decimal());
    }

    #[test]
    fn test_digits_packet_roundtrip() {
        let digits = HeightDigits::from_value(987, false);
        let encoded = digits.to_packet().unwrap().encode_to_vec().unwrap();

        let mut receiver = FrameReceiver::new();
        let packet = receiver.frames(&encoded).next().unwrap().unwrap();
        assert_eq!(DeskMessage::from_packet(&packet), DeskMessage::Height(digits));
    }

    #[test]
    fn test_query_frames_are_well_formed() {
        for query in [QueryCommand::Wake, QueryCommand::Silent] {
            let mut receiver = FrameReceiver::new();
            let packet = receiver.frames(query.bytes()).next().unwrap().unwrap();
            assert_eq!(packet.msg_type, 0x02);
            assert_eq!(packet.length, 6);
            assert_eq!(packet.payload.len(), 4);
        }
    }

    #[test]
    fn test_query_bytes() {
        assert_eq!(
            QueryCommand::Wake.bytes(),
            &[0x9B, 0x06, 0x02, 0x20, 0x00, 0xAC, 0xB8, 0x9D]
        );
        assert_eq!(
            QueryCommand::Silent.bytes(),
            &[0x9B, 0x06, 0x02, 0x00, 0x00, 0x6C, 0xA1, 0x9D]
        );
        assert!(QueryCommand::Wake.lights_display());
        assert!(!QueryCommand::Silent.lights_display());
    }
}
