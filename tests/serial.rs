#[cfg(feature = "test-e2e")]
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread, time,
};

mod common;

#[cfg(feature = "test-e2e")]
#[test]
fn test_e2e_polling() -> ict_server::Result<()> {
    let _lock = common::init();

    let stop_polling = Arc::new(AtomicBool::new(false));

    let handle = ict_server::DeviceHandle::new("/dev/ttyUSB0")?;

    handle.enable()?;

    let rx = handle.start_background_polling_with_queue(Arc::clone(&stop_polling))?;

    // Wait long enough for multiple poll messages
    thread::sleep(time::Duration::from_secs(5));

    while let Ok(event) = rx.pop_event() {
        log::info!("Device event: {event}");
    }

    match handle.poll() {
        Ok(res) => log::debug!("Poll command succeeded: {res:?}"),
        Err(err) => log::error!("Failed poll command: {err}"),
    }

    stop_polling.store(true, Ordering::SeqCst);

    Ok(())
}
