use std::fmt;

/// Host-to-device command bytes.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Request the current device status.
    Poll = 0x0c,
    /// Acknowledge a power-up request, or accept an escrowed bill.
    ///
    /// The device uses the same byte for both.
    Accept = 0x02,
    /// Reset the device after a hardware fault.
    Reset = 0x30,
    /// (Re-)arm the device to accept bills.
    Enable = 0x3e,
}

impl Command {
    /// Gets the command as its wire byte.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Gets the command as the byte sequence sent on the wire.
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Poll => &[0x0c],
            Self::Accept => &[0x02],
            Self::Reset => &[0x30],
            Self::Enable => &[0x3e],
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poll => write!(f, "Poll"),
            Self::Accept => write!(f, "Accept"),
            Self::Reset => write!(f, "Reset"),
            Self::Enable => write!(f, "Enable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_bytes() {
        assert_eq!(Command::Poll.as_bytes(), [0x0c]);
        assert_eq!(Command::Accept.as_bytes(), [0x02]);
        assert_eq!(Command::Reset.as_bytes(), [0x30]);
        assert_eq!(Command::Enable.as_bytes(), [0x3e]);

        for cmd in [Command::Poll, Command::Accept, Command::Reset, Command::Enable] {
            assert_eq!(cmd.as_bytes(), [cmd.to_u8()]);
        }
    }
}
