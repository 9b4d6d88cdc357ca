use std::fmt;

use super::{BillType, FaultCode};

/// Idle marker byte, also seen as a spurious prefix on real frames.
pub const IDLE_MARKER: u8 = 0x00;
/// Power-up acknowledgment request frame.
pub const POWER_UP: [u8; 2] = [0x80, 0x8f];
/// Leading byte of an escrow frame.
pub const ESCROW_STX: u8 = 0x81;

/// Classified device response.
///
/// Classification is total: every byte sequence, including the empty one,
/// maps to exactly one variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// Standalone idle marker; the device has nothing to report.
    Idle,
    /// The device powered up and wants an acknowledgment.
    PowerUpRequest,
    /// A bill is held in escrow pending an accept/reject decision.
    Escrow(BillType),
    /// The device reported a fault.
    Fault(FaultCode),
    /// Anything unrecognized, including empty and malformed frames.
    Unknown(Vec<u8>),
}

impl Response {
    /// Classifies a raw response frame.
    ///
    /// A standalone `0x00` is idle. Otherwise one leading `0x00` is stripped
    /// before matching; the device prefixes real frames with a stale idle
    /// byte on occasion.
    pub fn parse(raw: &[u8]) -> Self {
        if raw == [IDLE_MARKER] {
            return Self::Idle;
        }

        let frame = match raw.first() {
            Some(&IDLE_MARKER) => &raw[1..],
            _ => raw,
        };

        match frame {
            [] => Self::Unknown(frame.to_vec()),
            [0x80, 0x8f] => Self::PowerUpRequest,
            // Escrow frames are three bytes; the bill type rides in the third.
            // Shorter 0x81 frames are malformed and fall through to Unknown.
            [ESCROW_STX, _, bill_type, ..] => Self::Escrow(BillType::from(*bill_type)),
            // Only these four codes are dispatched to the fault path. The
            // fault table covers 0x20-0x2a, but the remaining codes have
            // never been routed here and land in Unknown instead.
            [code @ (0x20 | 0x21 | 0x22 | 0x28), ..] => Self::Fault(FaultCode::from(*code)),
            _ => Self::Unknown(frame.to_vec()),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::PowerUpRequest => write!(f, "PowerUpRequest"),
            Self::Escrow(bill_type) => write!(f, "Escrow({bill_type})"),
            Self::Fault(code) => write!(f, "Fault({code})"),
            Self::Unknown(raw) => write!(f, "Unknown({raw:02x?})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle() {
        assert_eq!(Response::parse(&[0x00]), Response::Idle);
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(Response::parse(&[]), Response::Unknown(vec![]));
        // A lone idle prefix with nothing behind it is not a frame either
        assert_eq!(Response::parse(&[0x00, 0x00]), Response::Unknown(vec![0x00]));
    }

    #[test]
    fn test_power_up() {
        assert_eq!(Response::parse(&[0x80, 0x8f]), Response::PowerUpRequest);
    }

    #[test]
    fn test_idle_prefix_stripped() {
        assert_eq!(Response::parse(&[0x00, 0x80, 0x8f]), Response::PowerUpRequest);
        assert_eq!(
            Response::parse(&[0x00, 0x81, 0x00, 0x41]),
            Response::Escrow(BillType::from(0x41))
        );
    }

    #[test]
    fn test_escrow() {
        assert_eq!(
            Response::parse(&[0x81, 0x00, 0x41]),
            Response::Escrow(BillType::from(0x41))
        );
    }

    #[test]
    fn test_short_escrow_frame_is_unknown() {
        assert_eq!(Response::parse(&[0x81]), Response::Unknown(vec![0x81]));
        assert_eq!(
            Response::parse(&[0x81, 0x00]),
            Response::Unknown(vec![0x81, 0x00])
        );
    }

    #[test]
    fn test_dispatched_faults() {
        for code in [0x20, 0x21, 0x22, 0x28] {
            assert_eq!(
                Response::parse(&[code]),
                Response::Fault(FaultCode::from(code))
            );
        }
    }

    #[test]
    fn test_undispatched_fault_codes_are_unknown() {
        // Present in the fault table, but never routed to the fault path.
        for code in [0x23, 0x24, 0x25, 0x27, 0x29, 0x2a] {
            assert_eq!(Response::parse(&[code]), Response::Unknown(vec![code]));
        }
    }

    #[test]
    fn test_classification_is_total() {
        // Every single-byte frame classifies without panicking.
        for code in (0u16..=255).map(|c| c as u8) {
            let _ = Response::parse(&[code]);
        }

        // So does every two-byte frame.
        for hi in (0u16..=255).map(|c| c as u8) {
            for lo in (0u16..=255).map(|c| c as u8) {
                let _ = Response::parse(&[hi, lo]);
            }
        }
    }
}
