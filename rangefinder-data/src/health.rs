#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health level reported by the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HealthStatus {
    /// The device works normally
    Ok,
    /// The device works but reported a recoverable condition
    Warning,
    /// The device is in a protection state and will not scan
    Error,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HealthStatus::Ok => write!(f, "OK"),
            HealthStatus::Warning => write!(f, "WARNING"),
            HealthStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Health status together with the raw error code of the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceHealth {
    pub status: HealthStatus,
    pub error_code: u16,
}

impl DeviceHealth {
    pub fn is_critical(&self) -> bool {
        self.status == HealthStatus::Error
    }
}
