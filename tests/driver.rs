use ict_server::mock::MockTransport;
use ict_server::{BillType, Command, DeviceHandle, Response, Result};

mod common;

#[test]
fn test_silent_device_is_not_an_error() -> Result<()> {
    let _lock = common::init();

    let mut port = MockTransport::new();

    let res = DeviceHandle::poll_once(&mut port)?;

    assert_eq!(res, None);
    // Only the poll went out
    assert_eq!(port.written(), [Command::Poll.to_u8()]);

    Ok(())
}

#[test]
fn test_idle_response_takes_no_action() -> Result<()> {
    let _lock = common::init();

    let mut port = MockTransport::new();
    port.push_response(&[0x00]);

    let res = DeviceHandle::poll_once(&mut port)?;

    assert_eq!(res, Some(Response::Idle));
    assert_eq!(port.written(), [Command::Poll.to_u8()]);

    Ok(())
}

#[test]
fn test_power_up_is_acknowledged() -> Result<()> {
    let _lock = common::init();

    let mut port = MockTransport::new();
    port.push_response(&[0x80, 0x8f]);

    let res = DeviceHandle::poll_once(&mut port)?;

    assert_eq!(res, Some(Response::PowerUpRequest));
    assert_eq!(
        port.written(),
        [Command::Poll.to_u8(), Command::Accept.to_u8()]
    );

    Ok(())
}

#[test]
fn test_escrowed_bill_is_accepted() -> Result<()> {
    let _lock = common::init();

    let mut port = MockTransport::new();
    port.push_response(&[0x81, 0x00, 0x41]);

    let res = DeviceHandle::poll_once(&mut port)?;

    assert_eq!(res, Some(Response::Escrow(BillType::from(0x41))));
    assert_eq!(
        port.written(),
        [Command::Poll.to_u8(), Command::Accept.to_u8()]
    );

    Ok(())
}

#[test]
fn test_hardware_fault_recovery_resets_then_enables() -> Result<()> {
    let _lock = common::init();

    let mut port = MockTransport::new();
    // Bill Jam
    port.push_response(&[0x22]);

    DeviceHandle::poll_once(&mut port)?;

    assert_eq!(
        port.written(),
        [
            Command::Poll.to_u8(),
            Command::Reset.to_u8(),
            Command::Enable.to_u8()
        ]
    );

    Ok(())
}

#[test]
fn test_soft_fault_recovery_only_enables() -> Result<()> {
    let _lock = common::init();

    let mut port = MockTransport::new();
    // Checksum Error
    port.push_response(&[0x21]);

    DeviceHandle::poll_once(&mut port)?;

    assert_eq!(
        port.written(),
        [Command::Poll.to_u8(), Command::Enable.to_u8()]
    );

    Ok(())
}

#[test]
fn test_malformed_escrow_frame_is_skipped() -> Result<()> {
    let _lock = common::init();

    let mut port = MockTransport::new();
    port.push_response(&[0x81, 0x00]);

    let res = DeviceHandle::poll_once(&mut port)?;

    assert_eq!(res, Some(Response::Unknown(vec![0x81, 0x00])));
    assert_eq!(port.written(), [Command::Poll.to_u8()]);

    Ok(())
}

#[test]
fn test_poll_cycle_sequence() -> Result<()> {
    let _lock = common::init();

    let mut port = MockTransport::new();

    // Idle, power-up handshake, escrowed bill, motor failure: the reactive
    // commands are none, Accept, Accept, then Reset + Enable.
    let cycles: [(&[u8], &[u8]); 4] = [
        (&[0x00], &[]),
        (&[0x80, 0x8f], &[0x02]),
        (&[0x81, 0x05, 0x42], &[0x02]),
        (&[0x20], &[0x30, 0x3e]),
    ];

    for (response, _) in cycles {
        port.push_response(response);
    }

    for (response, reaction) in cycles {
        port.clear_written();

        DeviceHandle::poll_once(&mut port)?;

        let mut expected = vec![Command::Poll.to_u8()];
        expected.extend_from_slice(reaction);

        assert_eq!(port.written(), expected, "response: {response:02x?}");
    }

    Ok(())
}
