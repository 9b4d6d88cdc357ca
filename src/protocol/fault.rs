use std::fmt;

/// Device fault code reported in a status frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaultCode(u8);

impl FaultCode {
    /// Creates a [FaultCode] from the raw wire byte.
    pub const fn from_u8(code: u8) -> Self {
        Self(code)
    }

    /// Gets the raw wire byte.
    pub const fn as_inner(&self) -> u8 {
        self.0
    }

    /// Gets a human-readable description of the fault.
    ///
    /// Unmapped codes resolve to a generic description, never an error.
    pub const fn description(&self) -> &'static str {
        match self.0 {
            0x20 => "Motor Failure",
            0x21 => "Checksum Error",
            0x22 => "Bill Jam",
            0x23 => "Bill Removed",
            0x24 => "Stacker Open",
            0x25 => "Sensor Problem",
            0x27 => "Bill Fish",
            0x28 => "Stacker Problem",
            0x29 => "Bill Reject",
            0x2a => "Invalid Command",
            _ => "Unknown Error",
        }
    }

    /// Gets whether recovering from the fault requires a hardware reset.
    ///
    /// Only motor failures, bill jams, and stacker problems need one; every
    /// other fault is cleared by re-enabling the device.
    pub const fn requires_reset(&self) -> bool {
        matches!(self.0, 0x20 | 0x22 | 0x28)
    }
}

impl From<u8> for FaultCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x} ({})", self.0, self.description())
    }
}
