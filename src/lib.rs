pub mod protocol;
#[macro_use]
mod macros;
mod device_handle;
mod error;
pub mod mock;
mod transport;

pub use device_handle::{
    DeviceHandle, PushEventReceiver, BAUD_RATE, LOCK_TIMEOUT_MS, POLLING_INTERVAL_MS,
    QUEUE_TIMEOUT_MS,
};
pub use error::{Error, Result};
pub use protocol::{BillType, Command, FaultCode, Response};
pub use transport::{SerialTransport, Transport, OPEN_ATTEMPTS, OPEN_RETRY_MS, SERIAL_TIMEOUT_MS};
