//! Scripted driver for session and capture tests

use rangefinder_data::{DeviceHealth, DeviceIdentity, HealthStatus, ScanFrame, ScanPoint};
use rangefinder_driver::{CaptureStatus, ChannelSpec, DriverError, LidarDriver};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

pub(crate) enum Capture {
    Complete(Vec<ScanPoint>),
    Timeout(Vec<ScanPoint>),
    Fail,
}

pub(crate) struct FakeDriver {
    calls: Rc<RefCell<Vec<String>>>,
    health: DeviceHealth,
    captures: VecDeque<Capture>,
    fail_connect: bool,
    fail_device_info: bool,
    fail_health: bool,
    fail_motor: bool,
    fail_start_scan: bool,
    fail_stop: bool,
}

impl FakeDriver {
    pub(crate) fn new() -> Self {
        FakeDriver {
            calls: Rc::new(RefCell::new(Vec::new())),
            health: DeviceHealth {
                status: HealthStatus::Ok,
                error_code: 0,
            },
            captures: VecDeque::new(),
            fail_connect: false,
            fail_device_info: false,
            fail_health: false,
            fail_motor: false,
            fail_start_scan: false,
            fail_stop: false,
        }
    }

    pub(crate) fn with_health(mut self, status: HealthStatus, error_code: u16) -> Self {
        self.health = DeviceHealth { status, error_code };
        self
    }

    pub(crate) fn with_captures(mut self, captures: Vec<Capture>) -> Self {
        self.captures = captures.into();
        self
    }

    pub(crate) fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    pub(crate) fn failing_device_info(mut self) -> Self {
        self.fail_device_info = true;
        self
    }

    pub(crate) fn failing_health(mut self) -> Self {
        self.fail_health = true;
        self
    }

    /// Motor refuses to spin up. Stopping it still works.
    pub(crate) fn failing_motor(mut self) -> Self {
        self.fail_motor = true;
        self
    }

    pub(crate) fn failing_start_scan(mut self) -> Self {
        self.fail_start_scan = true;
        self
    }

    pub(crate) fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    /// Call log that outlives the driver
    pub(crate) fn calls(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.calls)
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }
}

fn link_lost() -> DriverError {
    DriverError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "link lost"))
}

fn fill(frame: &mut ScanFrame, points: Vec<ScanPoint>) {
    for point in points {
        if frame.push(point).is_err() {
            break;
        }
    }
}

impl LidarDriver for FakeDriver {
    fn connect(&mut self, _channel: &ChannelSpec) -> Result<(), DriverError> {
        self.record("connect");
        if self.fail_connect {
            return Err(DriverError::InvalidAddress("fake".to_string()));
        }
        Ok(())
    }

    fn device_info(&mut self) -> Result<DeviceIdentity, DriverError> {
        self.record("device_info");
        if self.fail_device_info {
            return Err(DriverError::Timeout);
        }
        Ok(DeviceIdentity {
            model_number: 0x18,
            firmware_major_version: 1,
            firmware_minor_version: 29,
            hardware_version: 7,
            serial_number: [0xAB; 16],
        })
    }

    fn health(&mut self) -> Result<DeviceHealth, DriverError> {
        self.record("health");
        if self.fail_health {
            return Err(DriverError::Timeout);
        }
        Ok(self.health)
    }

    fn set_motor_speed(&mut self, speed: u16) -> Result<(), DriverError> {
        self.record(&format!("set_motor_speed({})", speed));
        if self.fail_stop && speed == 0 {
            return Err(link_lost());
        }
        if self.fail_motor && speed != 0 {
            return Err(link_lost());
        }
        Ok(())
    }

    fn start_scan(&mut self) -> Result<(), DriverError> {
        self.record("start_scan");
        if self.fail_start_scan {
            return Err(DriverError::InvalidTypeCode(0x06, 0x81));
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DriverError> {
        self.record("stop");
        if self.fail_stop {
            return Err(link_lost());
        }
        Ok(())
    }

    fn grab_scan_data(
        &mut self,
        frame: &mut ScanFrame,
        _timeout: Duration,
    ) -> Result<CaptureStatus, DriverError> {
        self.record("grab_scan_data");
        match self.captures.pop_front() {
            Some(Capture::Complete(points)) => {
                fill(frame, points);
                Ok(CaptureStatus::Complete)
            }
            Some(Capture::Timeout(points)) => {
                fill(frame, points);
                Ok(CaptureStatus::Timeout)
            }
            Some(Capture::Fail) | None => Err(link_lost()),
        }
    }
}

pub(crate) fn serial_channel() -> ChannelSpec {
    ChannelSpec::Serial {
        port: "/dev/ttyUSB0".to_string(),
        baud_rate: 115200,
    }
}

pub(crate) fn udp_channel() -> ChannelSpec {
    ChannelSpec::Udp {
        address: "192.168.11.2".to_string(),
        port: 8089,
    }
}

pub(crate) fn point(angle_degree: f32, distance_mm: f32) -> ScanPoint {
    ScanPoint {
        angle_z_q14: (angle_degree * 16384. / 90.) as u16,
        dist_mm_q2: (distance_mm * 4.) as u32,
        quality: 47,
        flag: 0,
    }
}
