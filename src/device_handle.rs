use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc, Arc,
};
use std::{thread, time};

use parking_lot::{Mutex, MutexGuard};

use crate::continue_on_err;
use crate::protocol::{Command, FaultCode, Response};
use crate::transport::{SerialTransport, Transport};
use crate::{Error, Result};

/// Timeout for waiting for a lock on the serial port (milliseconds).
pub const LOCK_TIMEOUT_MS: u64 = 5_000;
/// Interval between polling messages (milliseconds).
///
/// A deliberate rate limit; polling faster overwhelms the device.
pub const POLLING_INTERVAL_MS: u64 = 200;
/// Timeout for retrieving an event from a queue (milliseconds).
pub const QUEUE_TIMEOUT_MS: u128 = 50;
/// Default serial connection BAUD rate (bps).
pub const BAUD_RATE: u32 = 9_600;

static POLLING_INIT: AtomicBool = AtomicBool::new(false);

// Whether the polling routine has started.
fn polling_inited() -> bool {
    POLLING_INIT.load(Ordering::Relaxed)
}

// Sets the flag indicating whether the polling routine started.
fn set_polling_inited(inited: bool) {
    POLLING_INIT.store(inited, Ordering::SeqCst);
}

/// Receiver end of the device-sent event queue.
///
/// Owner of the receiver can regularly attempt to pop events from the queue,
/// and decide how to handle any returned event(s).
///
/// Example:
///
/// ```rust, no_run
/// # use std::sync::{Arc, atomic::AtomicBool};
/// # fn main() -> ict_server::Result<()> {
/// let stop_polling = Arc::new(AtomicBool::new(false));
///
/// let handle = ict_server::DeviceHandle::new("/dev/ttyUSB0")?;
///
/// let rx: ict_server::PushEventReceiver =
///     handle.start_background_polling_with_queue(Arc::clone(&stop_polling))?;
///
/// loop {
///     while let Ok(event) = rx.pop_event() {
///         log::debug!("Received an event: {event}");
///         // do stuff in response to the event...
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct PushEventReceiver(pub mpsc::Receiver<Response>);

impl PushEventReceiver {
    /// Creates a new [PushEventReceiver] from the provided `queue`.
    pub fn new(queue: mpsc::Receiver<Response>) -> Self {
        Self(queue)
    }

    /// Attempt to pop an event from the queue.
    ///
    /// Returns `Err(_)` if an event could not be retrieved before the timeout.
    pub fn pop_event(&self) -> Result<Response> {
        let now = time::Instant::now();
        let queue = &self.0;

        while now.elapsed().as_millis() < QUEUE_TIMEOUT_MS {
            if let Ok(evt) = queue.try_recv() {
                return Ok(evt);
            }
        }

        Err(Error::QueueTimeout)
    }
}

/// Handle for communicating with an ICT-protocol bill acceptor over serial.
///
/// ```no_run
/// let _handle = ict_server::DeviceHandle::new("/dev/ttyUSB0").unwrap();
/// ```
pub struct DeviceHandle {
    serial_port: Arc<Mutex<SerialTransport>>,
}

impl DeviceHandle {
    /// Creates a new [DeviceHandle] with a serial connection over the supplied
    /// serial device, at the default [BAUD_RATE].
    pub fn new(serial_path: &str) -> Result<Self> {
        Self::new_with_baud_rate(serial_path, BAUD_RATE)
    }

    /// Creates a new [DeviceHandle] with an explicit BAUD rate.
    pub fn new_with_baud_rate(serial_path: &str, baud_rate: u32) -> Result<Self> {
        let serial_port = Arc::new(Mutex::new(SerialTransport::open(serial_path, baud_rate)?));

        Ok(Self { serial_port })
    }

    /// Acquires a lock on the serial port used for communication with the acceptor device.
    pub fn serial_port(&self) -> Result<MutexGuard<'_, SerialTransport>> {
        Self::lock_serial_port(&self.serial_port)
    }

    pub(crate) fn lock_serial_port(
        serial_port: &Arc<Mutex<SerialTransport>>,
    ) -> Result<MutexGuard<'_, SerialTransport>> {
        serial_port
            .try_lock_for(time::Duration::from_millis(LOCK_TIMEOUT_MS))
            .ok_or(Error::SerialPort("timed out locking serial port".into()))
    }

    /// Starts background polling routine to regularly send [Poll](Command::Poll)
    /// messages to the device, dispatching follow-up commands automatically.
    ///
    /// **Args**
    ///
    /// - `stop_polling`: used to control when the polling routine should stop sending polling messages.
    ///
    /// If background polling has already started, returns an `Err(_)`.
    ///
    /// Example:
    ///
    /// ```rust, no_run
    /// # use std::sync::{Arc, atomic::AtomicBool};
    /// # fn main() -> ict_server::Result<()> {
    /// let stop_polling = Arc::new(AtomicBool::new(false));
    ///
    /// let handle = ict_server::DeviceHandle::new("/dev/ttyUSB0")?;
    ///
    /// handle.start_background_polling(Arc::clone(&stop_polling))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn start_background_polling(&self, stop_polling: Arc<AtomicBool>) -> Result<()> {
        if polling_inited() {
            Err(Error::PollingReinit)
        } else {
            // Set the global flag to disallow multiple background polling threads.
            set_polling_inited(true);

            let serial_port = Arc::clone(&self.serial_port);
            let end_polling = Arc::clone(&stop_polling);

            thread::spawn(move || {
                let mut now = time::Instant::now();

                while !end_polling.load(Ordering::Relaxed) {
                    if now.elapsed().as_millis() >= POLLING_INTERVAL_MS as u128 {
                        now = time::Instant::now();

                        let mut locked_port = continue_on_err!(
                            Self::lock_serial_port(&serial_port),
                            "Failed to lock serial port in background polling routine"
                        );

                        let res = continue_on_err!(
                            Self::poll_once(&mut *locked_port),
                            "Failed poll cycle in background polling routine"
                        );

                        if let Some(res) = res {
                            log::debug!("Successful poll cycle, response: {res}");
                        }
                    }

                    thread::sleep(time::Duration::from_millis(POLLING_INTERVAL_MS / 3));
                }

                // Now that polling finished, reset the flag to allow another background routine to
                // start.
                set_polling_inited(false);
            });

            Ok(())
        }
    }

    /// Starts background polling routine to regularly send [Poll](Command::Poll)
    /// messages to the device, with an additional event queue for sending
    /// device events to the host.
    ///
    /// Every non-idle classification is forwarded to the returned
    /// [PushEventReceiver]; follow-up commands are still dispatched
    /// automatically.
    ///
    /// If background polling has already started, returns an `Err(_)`.
    pub fn start_background_polling_with_queue(
        &self,
        stop_polling: Arc<AtomicBool>,
    ) -> Result<PushEventReceiver> {
        if polling_inited() {
            Err(Error::PollingReinit)
        } else {
            // Set the global flag to disallow multiple background polling threads.
            set_polling_inited(true);

            let serial_port = Arc::clone(&self.serial_port);
            let end_polling = Arc::clone(&stop_polling);

            let (tx, rx) = mpsc::channel();

            thread::spawn(move || {
                let mut now = time::Instant::now();

                while !end_polling.load(Ordering::Relaxed) {
                    if now.elapsed().as_millis() >= POLLING_INTERVAL_MS as u128 {
                        now = time::Instant::now();

                        let mut locked_port = continue_on_err!(
                            Self::lock_serial_port(&serial_port),
                            "Failed to lock serial port in background polling routine"
                        );

                        let res = continue_on_err!(
                            Self::poll_once(&mut *locked_port),
                            "Failed poll cycle in background polling routine"
                        );

                        match res {
                            Some(Response::Idle) | None => (),
                            Some(res) => continue_on_err!(
                                tx.send(res),
                                "Failed to queue device event in background polling routine"
                            ),
                        }
                    }

                    thread::sleep(time::Duration::from_millis(POLLING_INTERVAL_MS / 3));
                }

                set_polling_inited(false);
            });

            Ok(PushEventReceiver::new(rx))
        }
    }

    /// Send a [Poll](Command::Poll) message to the device, and dispatch on the
    /// classified response.
    pub fn poll(&self) -> Result<Option<Response>> {
        let mut serial_port = self.serial_port()?;

        Self::poll_once(&mut *serial_port)
    }

    /// Drives one poll cycle over the supplied transport.
    ///
    /// Sends [Poll](Command::Poll), reads whatever response arrives within the
    /// transport timeout, classifies it, and emits the follow-up command the
    /// response calls for.
    ///
    /// Returns `Ok(None)` when the device sent nothing; silence on a fixed
    /// poll interval is expected steady-state behavior, not an error.
    pub fn poll_once(port: &mut dyn Transport) -> Result<Option<Response>> {
        Self::send_command(port, Command::Poll)?;

        let raw = port.read_available()?;
        if raw.is_empty() {
            log::trace!("No response to poll");

            return Ok(None);
        }

        log::trace!("Received response: {raw:02x?}");

        let res = Response::parse(raw.as_ref());
        Self::dispatch(port, &res)?;

        Ok(Some(res))
    }

    // Emits the follow-up command for a classified response.
    fn dispatch(port: &mut dyn Transport, response: &Response) -> Result<()> {
        match response {
            Response::Idle => {
                log::debug!("Received idle status, no action needed");

                Ok(())
            }
            Response::PowerUpRequest => {
                log::info!("Power-up acknowledgment request received");

                Self::send_command(port, Command::Accept)
            }
            Response::Escrow(bill_type) => {
                log::info!("Bill in escrow, type: {bill_type}");

                // Same command byte accepts the bill and acknowledges power-up.
                Self::send_command(port, Command::Accept)
            }
            Response::Fault(code) => Self::recover(port, *code),
            Response::Unknown(raw) => {
                log::warn!("Unknown response: {raw:02x?}");

                Ok(())
            }
        }
    }

    // Runs the fault recovery handshake: at most one Reset, then exactly one
    // Enable to re-arm the device. No acknowledgment is awaited; confirmation
    // arrives on a later poll cycle.
    fn recover(port: &mut dyn Transport, code: FaultCode) -> Result<()> {
        log::warn!("Fault detected: {code}");

        if code.requires_reset() {
            log::warn!("Hardware fault, attempting device reset");

            Self::send_command(port, Command::Reset)?;
        } else {
            log::debug!("No specific recovery action for fault: {code}");
        }

        Self::send_command(port, Command::Enable)
    }

    fn send_command(port: &mut dyn Transport, command: Command) -> Result<()> {
        log::trace!("Sending command: {command} ({:#04x})", command.to_u8());

        port.write_all(command.as_bytes())
    }

    /// Send an [Accept](Command::Accept) message to the device.
    ///
    /// Accepts a bill in escrow, or acknowledges a power-up request.
    pub fn accept(&self) -> Result<()> {
        let mut serial_port = self.serial_port()?;

        Self::send_command(&mut *serial_port, Command::Accept)
    }

    /// Send a [Reset](Command::Reset) message to the device.
    ///
    /// No response is returned. The caller should wait a reasonable amount of
    /// time for the device to come back online before sending additional messages.
    pub fn reset(&self) -> Result<()> {
        let mut serial_port = self.serial_port()?;

        Self::send_command(&mut *serial_port, Command::Reset)
    }

    /// Send an [Enable](Command::Enable) message to the device, arming it to
    /// accept bills.
    pub fn enable(&self) -> Result<()> {
        let mut serial_port = self.serial_port()?;

        Self::send_command(&mut *serial_port, Command::Enable)
    }
}
