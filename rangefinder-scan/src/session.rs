use rangefinder_data::{DeviceHealth, DeviceIdentity, HealthStatus, ScanFrame};
use rangefinder_driver::{CaptureStatus, ChannelSpec, DriverError, LidarDriver, DEFAULT_MOTOR_PWM};
use std::thread;
use std::time::Duration;

/// Where a session stands. Transitions only ever move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Unconnected,
    Connected,
    Identified,
    HealthChecked,
    MotorRunning,
    Scanning,
    Stopped,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Cannot bind to {channel}: {source}")]
    ChannelBind {
        channel: String,
        #[source]
        source: DriverError,
    },
    #[error("Cannot get device info: {0}")]
    DeviceInfo(#[source] DriverError),
    #[error("Cannot retrieve device health: {0}")]
    HealthQuery(#[source] DriverError),
    #[error("Device is in an internal error state, error code {code:#06X}")]
    CriticalHealth { code: u16 },
    #[error("Cannot start scanning: {0}")]
    ScanStart(#[source] DriverError),
    #[error("Failed to get scan data: {0}")]
    ScanCapture(#[source] DriverError),
    #[error("{operation} is not allowed in state {found:?}")]
    OutOfOrder {
        operation: &'static str,
        found: SessionState,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub motor_speed: u16,
    pub capture_timeout: Duration,
    pub settle_delay: Duration,
    pub motor_stop_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            motor_speed: DEFAULT_MOTOR_PWM,
            capture_timeout: Duration::from_millis(2000),
            settle_delay: Duration::from_millis(1000),
            motor_stop_delay: Duration::from_millis(200),
        }
    }
}

/// Exclusive owner of the device for one run.
///
/// Bring-up goes connect, identify, health check, motor, scan. The first
/// failure shuts the session down and no later step is attempted. Shutdown
/// also runs when the session is dropped, so every exit path releases the
/// device exactly once.
pub struct DeviceSession<D: LidarDriver> {
    driver: D,
    options: SessionOptions,
    state: SessionState,
    physical: bool,
    identity: Option<DeviceIdentity>,
}

impl<D: LidarDriver> DeviceSession<D> {
    pub fn new(driver: D, options: SessionOptions) -> Self {
        Self {
            driver,
            options,
            state: SessionState::Unconnected,
            physical: false,
            identity: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    pub fn is_physical(&self) -> bool {
        self.physical
    }

    /// Runs every bring-up step in order, stopping at the first failure.
    pub fn bring_up(&mut self, channel: &ChannelSpec) -> Result<(), SessionError> {
        self.connect(channel)?;
        self.identify()?;
        self.check_health()?;
        self.start_motion()?;
        self.start_scanning()
    }

    pub fn connect(&mut self, channel: &ChannelSpec) -> Result<(), SessionError> {
        self.require("connect", &[SessionState::Unconnected])?;
        if let Err(source) = self.driver.connect(channel) {
            return Err(self.abort(SessionError::ChannelBind {
                channel: channel.to_string(),
                source,
            }));
        }
        self.physical = channel.is_physical();
        self.state = SessionState::Connected;
        log::info!("Connected over {}", channel);
        Ok(())
    }

    pub fn identify(&mut self) -> Result<DeviceIdentity, SessionError> {
        self.require("identify", &[SessionState::Connected])?;
        let identity = match self.driver.device_info() {
            Ok(identity) => identity,
            Err(e) => return Err(self.abort(SessionError::DeviceInfo(e))),
        };
        log::info!("Serial number: {}", identity.serial_hex());
        log::info!(
            "Firmware version: {}, hardware revision: {}",
            identity.firmware_version(),
            identity.hardware_version
        );
        self.identity = Some(identity.clone());
        self.state = SessionState::Identified;
        Ok(identity)
    }

    /// WARNING is reported and accepted, ERROR ends the session.
    pub fn check_health(&mut self) -> Result<DeviceHealth, SessionError> {
        self.require("check_health", &[SessionState::Identified])?;
        let health = match self.driver.health() {
            Ok(health) => health,
            Err(e) => return Err(self.abort(SessionError::HealthQuery(e))),
        };
        match health.status {
            HealthStatus::Ok => log::info!("Health status: {}", health.status),
            HealthStatus::Warning => log::warn!(
                "Health status: {} (error code {:#06X})",
                health.status,
                health.error_code
            ),
            HealthStatus::Error => {
                return Err(self.abort(SessionError::CriticalHealth {
                    code: health.error_code,
                }))
            }
        }
        self.state = SessionState::HealthChecked;
        Ok(health)
    }

    /// Spins the motor up on serial links. Network links have no motor and skip this.
    pub fn start_motion(&mut self) -> Result<(), SessionError> {
        self.require("start_motion", &[SessionState::HealthChecked])?;
        if !self.physical {
            return Ok(());
        }
        if let Err(e) = self.driver.set_motor_speed(self.options.motor_speed) {
            return Err(self.abort(SessionError::ScanStart(e)));
        }
        self.state = SessionState::MotorRunning;
        Ok(())
    }

    pub fn start_scanning(&mut self) -> Result<(), SessionError> {
        self.require(
            "start_scanning",
            &[SessionState::HealthChecked, SessionState::MotorRunning],
        )?;
        if let Err(e) = self.driver.start_scan() {
            return Err(self.abort(SessionError::ScanStart(e)));
        }
        self.state = SessionState::Scanning;
        log::info!("Scanning started, settling for {:?}", self.options.settle_delay);
        thread::sleep(self.options.settle_delay);
        Ok(())
    }

    /// Pulls one rotation into `frame`. Errors here do not shut the session down.
    pub fn capture(&mut self, frame: &mut ScanFrame) -> Result<CaptureStatus, SessionError> {
        self.require("capture", &[SessionState::Scanning])?;
        self.driver
            .grab_scan_data(frame, self.options.capture_timeout)
            .map_err(SessionError::ScanCapture)
    }

    pub fn ascend(&mut self, frame: &mut ScanFrame) -> Result<(), SessionError> {
        self.require("ascend", &[SessionState::Scanning])?;
        self.driver
            .ascend_scan_data(frame)
            .map_err(SessionError::ScanCapture)
    }

    /// Stops scanning and, on serial links, the motor. Never fails; driver
    /// errors on this path are only logged at debug level. Later calls are no-ops.
    pub fn shutdown(&mut self) {
        match self.state {
            SessionState::Stopped => return,
            SessionState::Unconnected => {}
            _ => {
                if let Err(e) = self.driver.stop() {
                    log::debug!("Ignoring stop failure during shutdown: {}", e);
                }
                if self.physical {
                    thread::sleep(self.options.motor_stop_delay);
                    if let Err(e) = self.driver.set_motor_speed(0) {
                        log::debug!("Ignoring motor stop failure during shutdown: {}", e);
                    }
                }
            }
        }
        self.state = SessionState::Stopped;
        log::info!("Session stopped");
    }

    fn abort(&mut self, error: SessionError) -> SessionError {
        self.shutdown();
        error
    }

    fn require(
        &mut self,
        operation: &'static str,
        allowed: &[SessionState],
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            return Ok(());
        }
        let found = self.state;
        Err(self.abort(SessionError::OutOfOrder { operation, found }))
    }
}

impl<D: LidarDriver> Drop for DeviceSession<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
