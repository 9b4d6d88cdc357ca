use std::io::Read;
use std::{thread, time};

use serialport::{SerialPort, TTYPort};

use crate::{Error, Result};

/// Timeout for serial reads and writes (milliseconds).
pub const SERIAL_TIMEOUT_MS: u64 = 1_000;
/// Number of attempts to open the serial device before giving up.
pub const OPEN_ATTEMPTS: u32 = 3;
/// Delay between open attempts (milliseconds).
pub const OPEN_RETRY_MS: u64 = 2_000;

// Granularity of the bounded wait for response bytes (milliseconds).
const READ_WAIT_STEP_MS: u64 = 10;

/// Byte-oriented duplex channel to the acceptor device.
///
/// Narrow seam between the protocol driver and the serial hardware; tests
/// substitute [MockTransport](crate::mock::MockTransport).
pub trait Transport {
    /// Writes all bytes to the device.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Reads whatever response bytes are available, waiting up to the
    /// transport's fixed timeout for the first byte to arrive.
    ///
    /// Returns an empty buffer if the device stays silent.
    fn read_available(&mut self) -> Result<Vec<u8>>;
}

/// Serial connection to the acceptor device.
///
/// The acceptor talks RS-232 at 8 data bits, even parity, one stop bit.
pub struct SerialTransport {
    port: TTYPort,
    path: String,
}

impl SerialTransport {
    /// Opens the serial device at `path`, retrying up to [OPEN_ATTEMPTS]
    /// times with a fixed backoff before surfacing a fatal error.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let builder = serialport::new(path, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::Even)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            // bounds both reads and writes so a silent or wedged device
            // cannot stall the polling loop
            .timeout(time::Duration::from_millis(SERIAL_TIMEOUT_MS));

        let mut attempt = 1;
        loop {
            match builder.clone().open_native() {
                Ok(port) => {
                    log::info!("connected to bill acceptor on {path} at {baud_rate} baud");

                    return Ok(Self {
                        port,
                        path: path.into(),
                    });
                }
                Err(err) if attempt < OPEN_ATTEMPTS => {
                    log::warn!("attempt {attempt}: error opening serial port {path}: {err}");
                    attempt += 1;

                    thread::sleep(time::Duration::from_millis(OPEN_RETRY_MS));
                }
                Err(err) => {
                    return Err(Error::Open {
                        path: path.into(),
                        attempts: OPEN_ATTEMPTS,
                        source: err,
                    })
                }
            }
        }
    }

    /// Gets the path of the underlying serial device.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        use std::io::Write;

        self.port.write_all(bytes)?;

        Ok(())
    }

    fn read_available(&mut self) -> Result<Vec<u8>> {
        let now = time::Instant::now();

        while self.port.bytes_to_read()? == 0 {
            if now.elapsed().as_millis() >= SERIAL_TIMEOUT_MS as u128 {
                return Ok(Vec::new());
            }

            thread::sleep(time::Duration::from_millis(READ_WAIT_STEP_MS));
        }

        // Let the remainder of a short frame land before draining the buffer.
        thread::sleep(time::Duration::from_millis(READ_WAIT_STEP_MS));

        let mut buf = vec![0u8; self.port.bytes_to_read()? as usize];
        let read = self.port.read(buf.as_mut_slice())?;
        buf.truncate(read);

        Ok(buf)
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        log::info!("serial port {} closed", self.path);
    }
}
