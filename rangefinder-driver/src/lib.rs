use std::time::Duration;

mod command;
mod constants;
mod driver;
mod error;
mod health;
mod numeric;
mod packet;
mod scan;
mod time;
pub mod transport;

use crate::command::{read, send_command};
use crate::constants::{
    HEADER_SIZE, LIDAR_ANS_LENGTH_DEVHEALTH, LIDAR_ANS_LENGTH_DEVINFO, LIDAR_ANS_TYPE_DEVHEALTH,
    LIDAR_ANS_TYPE_DEVINFO, LIDAR_CMD_GET_DEVICE_HEALTH, LIDAR_CMD_GET_DEVICE_INFO,
};
use crate::health::to_device_health;
use crate::packet::validate_response_header;
use crate::transport::Transport;
use rangefinder_data::{DeviceHealth, DeviceIdentity, ScanFrame};

pub use crate::constants::DEFAULT_MOTOR_PWM;
pub use crate::driver::ProtocolDriver;
pub use crate::error::DriverError;
pub use crate::transport::ChannelSpec;

/// Usable outcome of a rotation capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureStatus {
    /// A whole rotation was captured
    Complete,
    /// The deadline passed; the frame holds whatever arrived before it
    Timeout,
}

/// Capability the scanning core needs from a device driver.
///
/// Every call blocks until the device answered or a driver-level timeout hit.
pub trait LidarDriver {
    fn connect(&mut self, channel: &ChannelSpec) -> Result<(), DriverError>;
    fn device_info(&mut self) -> Result<DeviceIdentity, DriverError>;
    fn health(&mut self) -> Result<DeviceHealth, DriverError>;
    fn set_motor_speed(&mut self, speed: u16) -> Result<(), DriverError>;
    fn start_scan(&mut self) -> Result<(), DriverError>;
    fn stop(&mut self) -> Result<(), DriverError>;

    /// Fills `frame` with one rotation. Hard failures are errors, running out
    /// of time is [`CaptureStatus::Timeout`].
    fn grab_scan_data(
        &mut self,
        frame: &mut ScanFrame,
        timeout: Duration,
    ) -> Result<CaptureStatus, DriverError>;

    /// Puts the frame in ascending angle order.
    fn ascend_scan_data(&mut self, frame: &mut ScanFrame) -> Result<(), DriverError> {
        frame.sort_by_angle();
        Ok(())
    }
}

pub fn get_device_health(transport: &mut dyn Transport) -> Result<DeviceHealth, DriverError> {
    send_command(transport, LIDAR_CMD_GET_DEVICE_HEALTH)?;
    let header = read(transport, HEADER_SIZE)?;
    validate_response_header(
        &header,
        Some(LIDAR_ANS_LENGTH_DEVHEALTH),
        LIDAR_ANS_TYPE_DEVHEALTH,
    )?;
    let health = read(transport, LIDAR_ANS_LENGTH_DEVHEALTH as usize)?;
    Ok(to_device_health(&health))
}

pub fn get_device_info(transport: &mut dyn Transport) -> Result<DeviceIdentity, DriverError> {
    send_command(transport, LIDAR_CMD_GET_DEVICE_INFO)?;
    let header = read(transport, HEADER_SIZE)?;
    validate_response_header(
        &header,
        Some(LIDAR_ANS_LENGTH_DEVINFO),
        LIDAR_ANS_TYPE_DEVINFO,
    )?;
    let info = read(transport, LIDAR_ANS_LENGTH_DEVINFO as usize)?;
    let mut serial_number = [0u8; 16];
    serial_number.copy_from_slice(&info[4..20]);
    Ok(DeviceIdentity {
        model_number: info[0],
        firmware_minor_version: info[1],
        firmware_major_version: info[2],
        hardware_version: info[3],
        serial_number,
    })
}
