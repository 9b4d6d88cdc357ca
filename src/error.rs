use thiserror::Error;

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the driver.
#[derive(Debug, Error)]
pub enum Error {
    /// Opening the serial device failed after exhausting all retries.
    #[error("failed to open {path} after {attempts} attempts: {source}")]
    Open {
        path: String,
        attempts: u32,
        source: serialport::Error,
    },

    /// Serial port configuration or locking problem.
    #[error("serial port: {0}")]
    SerialPort(String),

    /// I/O failure on the open port.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A background polling routine is already running.
    #[error("background polling routine already started")]
    PollingReinit,

    /// No event arrived on the queue before the timeout.
    #[error("timed out waiting for an event from the queue")]
    QueueTimeout,
}

impl From<serialport::Error> for Error {
    fn from(err: serialport::Error) -> Self {
        Self::SerialPort(err.to_string())
    }
}
