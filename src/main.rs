use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::{env, thread, time};

use ict_server::{DeviceHandle, BAUD_RATE, POLLING_INTERVAL_MS};

fn main() -> ict_server::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format_timestamp(Some(env_logger::fmt::TimestampPrecision::Millis))
        .init();

    let mut args = env::args().skip(1);
    let serial_path = args.next().unwrap_or("/dev/ttyUSB0".into());
    let baud_rate = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(BAUD_RATE);

    let stop_polling = Arc::new(AtomicBool::new(false));

    // Set signal handlers
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&stop_polling))?;
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop_polling))?;

    let handle = DeviceHandle::new_with_baud_rate(&serial_path, baud_rate)?;

    handle.start_background_polling(Arc::clone(&stop_polling))?;

    while !stop_polling.load(Ordering::Relaxed) {
        thread::sleep(time::Duration::from_millis(POLLING_INTERVAL_MS));
    }

    log::info!("Exiting");

    // Give the polling routine a chance to observe the stop flag and release
    // its reference to the port before the handle drops.
    thread::sleep(time::Duration::from_millis(POLLING_INTERVAL_MS));

    Ok(())
}
