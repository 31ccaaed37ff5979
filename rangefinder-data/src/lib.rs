pub mod device_info;
pub mod health;
pub mod scan;

pub use device_info::DeviceIdentity;
pub use health::{DeviceHealth, HealthStatus};
pub use scan::{FrameFull, ScanFrame, ScanPoint, DEFAULT_FRAME_CAPACITY};
