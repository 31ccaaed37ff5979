#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identity reported by the device once per session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceIdentity {
    pub model_number: u8,
    pub firmware_major_version: u8,
    pub firmware_minor_version: u8,
    pub hardware_version: u8,
    pub serial_number: [u8; 16],
}

impl DeviceIdentity {
    /// Serial number as contiguous upper-case hex, e.g. `"0A1B..."`.
    pub fn serial_hex(&self) -> String {
        self.serial_number
            .iter()
            .map(|e| format!("{:02X}", e))
            .collect()
    }

    /// Firmware version in `major.minor` form with a two-digit minor.
    pub fn firmware_version(&self) -> String {
        format!(
            "{}.{:02}",
            self.firmware_major_version, self.firmware_minor_version
        )
    }
}
