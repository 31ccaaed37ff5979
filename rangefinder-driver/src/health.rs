use crate::numeric::to_u16;
use rangefinder_data::{DeviceHealth, HealthStatus};

pub(crate) fn to_health_status(value: u8) -> HealthStatus {
    match value {
        0 => HealthStatus::Ok,
        1 => HealthStatus::Warning,
        _ => HealthStatus::Error,
    }
}

pub(crate) fn to_device_health(answer: &[u8]) -> DeviceHealth {
    DeviceHealth {
        status: to_health_status(answer[0]),
        error_code: to_u16(answer[2], answer[1]),
    }
}
