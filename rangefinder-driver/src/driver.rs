use crate::command::{set_motor_pwm, start_scan, stop_scan_and_flush};
use crate::error::DriverError;
use crate::scan::RotationAssembler;
use crate::time::sleep_ms;
use crate::transport::{self, ChannelSpec, Transport};
use crate::{get_device_health, get_device_info, CaptureStatus, LidarDriver};
use rangefinder_data::{DeviceHealth, DeviceIdentity, ScanFrame};
use std::time::{Duration, Instant};

/// Driver speaking the request/response protocol over any [`Transport`].
#[derive(Default)]
pub struct ProtocolDriver {
    transport: Option<Box<dyn Transport>>,
    assembler: RotationAssembler,
}

impl ProtocolDriver {
    pub fn new() -> Self {
        ProtocolDriver::default()
    }

    /// Driver already bound to an open transport.
    pub fn with_transport<T: Transport + 'static>(transport: T) -> Self {
        ProtocolDriver {
            transport: Some(Box::new(transport)),
            assembler: RotationAssembler::default(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    fn transport(&mut self) -> Result<&mut (dyn Transport + 'static), DriverError> {
        self.transport
            .as_deref_mut()
            .ok_or(DriverError::NotConnected)
    }
}

impl LidarDriver for ProtocolDriver {
    fn connect(&mut self, channel: &ChannelSpec) -> Result<(), DriverError> {
        let transport = transport::open(channel)?;
        self.transport = Some(transport);
        self.assembler.reset();
        Ok(())
    }

    fn device_info(&mut self) -> Result<DeviceIdentity, DriverError> {
        get_device_info(self.transport()?)
    }

    fn health(&mut self) -> Result<DeviceHealth, DriverError> {
        get_device_health(self.transport()?)
    }

    fn set_motor_speed(&mut self, speed: u16) -> Result<(), DriverError> {
        set_motor_pwm(self.transport()?, speed)
    }

    fn start_scan(&mut self) -> Result<(), DriverError> {
        start_scan(self.transport()?)?;
        self.assembler.reset();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        stop_scan_and_flush(self.transport()?)
    }

    fn grab_scan_data(
        &mut self,
        frame: &mut ScanFrame,
        timeout: Duration,
    ) -> Result<CaptureStatus, DriverError> {
        let deadline = Instant::now() + timeout;
        let transport = self
            .transport
            .as_deref_mut()
            .ok_or(DriverError::NotConnected)?;
        let assembler = &mut self.assembler;

        assembler.begin(frame);
        loop {
            if assembler.assemble(frame) {
                return Ok(CaptureStatus::Complete);
            }
            // a device streaming garbage keeps `available` above zero
            if Instant::now() >= deadline {
                assembler.finish(frame);
                return Ok(CaptureStatus::Timeout);
            }

            let n_read = transport.available()?;
            if n_read == 0 {
                sleep_ms(1);
                continue;
            }
            let mut signal = vec![0u8; n_read];
            let n = transport.read(&mut signal)?;
            assembler.buffer.extend(&signal[..n]);
        }
    }
}
