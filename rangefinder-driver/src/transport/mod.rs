//! Byte channels the driver talks through

use crate::error::DriverError;
use std::fmt;

#[cfg(test)]
pub(crate) mod mock;
mod serial;
mod udp;

pub use serial::SerialChannel;
pub use udp::UdpChannel;

/// Bidirectional byte channel to the device.
pub trait Transport: Send {
    /// Read into `buffer`, returning the number of bytes read (0 when nothing arrived in time)
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, DriverError>;

    fn write(&mut self, data: &[u8]) -> Result<usize, DriverError>;

    fn flush(&mut self) -> Result<(), DriverError>;

    /// Number of bytes that can be read without blocking
    fn available(&mut self) -> Result<usize, DriverError> {
        Ok(0)
    }

    /// Whether a motor sits behind this channel
    fn is_physical(&self) -> bool;
}

/// Channel selection, fixed once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelSpec {
    Serial { port: String, baud_rate: u32 },
    Udp { address: String, port: u16 },
}

impl ChannelSpec {
    pub fn is_physical(&self) -> bool {
        matches!(self, ChannelSpec::Serial { .. })
    }
}

impl fmt::Display for ChannelSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChannelSpec::Serial { port, baud_rate } => write!(f, "serial {} @ {} baud", port, baud_rate),
            ChannelSpec::Udp { address, port } => write!(f, "udp {}:{}", address, port),
        }
    }
}

/// Opens the channel described by `spec`.
pub fn open(spec: &ChannelSpec) -> Result<Box<dyn Transport>, DriverError> {
    match spec {
        ChannelSpec::Serial { port, baud_rate } => {
            Ok(Box::new(SerialChannel::open(port, *baud_rate)?))
        }
        ChannelSpec::Udp { address, port } => Ok(Box::new(UdpChannel::open(address, *port)?)),
    }
}
