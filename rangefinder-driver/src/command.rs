use crate::constants::{
    HEADER_SIZE, LIDAR_ANS_LENGTH_MEASUREMENT, LIDAR_ANS_TYPE_MEASUREMENT, LIDAR_CMD_SCAN,
    LIDAR_CMD_SET_MOTOR_PWM, LIDAR_CMD_STOP, N_READ_TRIALS,
};
use crate::error::DriverError;
use crate::packet::{encode_request, validate_response_header};
use crate::time::sleep_ms;
use crate::transport::Transport;

pub(crate) fn start_scan(transport: &mut dyn Transport) -> Result<(), DriverError> {
    send_command(transport, LIDAR_CMD_SCAN)?;
    let header = read(transport, HEADER_SIZE)?;
    let descriptor = validate_response_header(
        &header,
        Some(LIDAR_ANS_LENGTH_MEASUREMENT),
        LIDAR_ANS_TYPE_MEASUREMENT,
    )?;
    log::debug!("Scan answer in send mode {}", descriptor.send_mode);
    Ok(())
}

fn stop_scan(transport: &mut dyn Transport) -> Result<(), DriverError> {
    send_command(transport, LIDAR_CMD_STOP)?;
    sleep_ms(1);
    Ok(())
}

pub(crate) fn stop_scan_and_flush(transport: &mut dyn Transport) -> Result<(), DriverError> {
    stop_scan(transport)?;
    flush(transport)?;
    Ok(())
}

pub(crate) fn set_motor_pwm(transport: &mut dyn Transport, pwm: u16) -> Result<(), DriverError> {
    send_data(
        transport,
        &encode_request(LIDAR_CMD_SET_MOTOR_PWM, &pwm.to_le_bytes()),
    )?;
    Ok(())
}

fn send_data(transport: &mut dyn Transport, data: &[u8]) -> Result<usize, DriverError> {
    let n = transport.write(data)?;
    transport.flush()?;
    Ok(n)
}

pub(crate) fn send_command(transport: &mut dyn Transport, command: u8) -> Result<usize, DriverError> {
    send_data(transport, &encode_request(command, &[]))
}

/// Discards everything waiting in the input queue.
pub(crate) fn flush(transport: &mut dyn Transport) -> Result<(), DriverError> {
    let n_read = transport.available().unwrap_or(0);
    if n_read == 0 {
        return Ok(());
    }
    let mut packet: Vec<u8> = vec![0; n_read];
    transport.read(packet.as_mut_slice())?;
    Ok(())
}

/// Reads exactly `data_size` bytes, giving the device `N_READ_TRIALS` chances to deliver them.
pub(crate) fn read(transport: &mut dyn Transport, data_size: usize) -> Result<Vec<u8>, DriverError> {
    assert!(data_size > 0);
    let mut packet: Vec<u8> = vec![0; data_size];
    let mut offset = 0;
    for _ in 0..N_READ_TRIALS {
        if transport.available()? == 0 {
            sleep_ms(10);
            continue;
        }
        offset += transport.read(&mut packet[offset..])?;
        if offset == data_size {
            return Ok(packet);
        }
    }
    Err(DriverError::Timeout)
}
