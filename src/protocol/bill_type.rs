use std::fmt;

/// Device-specific code identifying a currency denomination.
///
/// Codes observed on the wire fall in the `64..=69` range; anything else maps
/// to an unknown denomination rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BillType(u8);

impl BillType {
    /// Creates a [BillType] from the raw wire byte.
    pub const fn from_u8(code: u8) -> Self {
        Self(code)
    }

    /// Gets the raw wire byte.
    pub const fn as_inner(&self) -> u8 {
        self.0
    }

    /// Gets the denomination label for the bill type.
    pub const fn denomination(&self) -> &'static str {
        match self.0 {
            64 => "10 nghìn",
            65 => "20 nghìn",
            66 => "50 nghìn",
            67 => "100 nghìn",
            68 => "200 nghìn",
            69 => "500 nghìn",
            _ => "Unknown",
        }
    }
}

impl From<u8> for BillType {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl fmt::Display for BillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x} ({})", self.0, self.denomination())
    }
}
