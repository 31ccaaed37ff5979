use super::Transport;
use crate::constants::SERIAL_TIMEOUT_MS;
use crate::error::DriverError;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{Read, Write};
use std::time::Duration;

/// UART link to the device. The motor is reachable through it.
pub struct SerialChannel {
    port: Box<dyn SerialPort>,
}

impl SerialChannel {
    /// Opens `port_name` (such as `/dev/ttyUSB0`) at `baud_rate`, 8N1.
    pub fn open(port_name: &str, baud_rate: u32) -> Result<Self, DriverError> {
        let port = serialport::new(port_name, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(SERIAL_TIMEOUT_MS))
            .open()?;

        log::info!("Opened serial port {} at {} baud", port_name, baud_rate);
        Ok(SerialChannel { port })
    }

    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        SerialChannel { port }
    }
}

impl Transport for SerialChannel {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, DriverError> {
        match self.port.read(buffer) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, DriverError> {
        Ok(self.port.write(data)?)
    }

    fn flush(&mut self) -> Result<(), DriverError> {
        self.port.flush()?;
        Ok(())
    }

    fn available(&mut self) -> Result<usize, DriverError> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn is_physical(&self) -> bool {
        true
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::time::sleep_ms;
    use serialport::TTYPort;

    #[test]
    fn test_serial_channel_round_trip() {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create ptty pair");
        let mut channel = SerialChannel::from_port(Box::new(slave));

        master.write_all(&[0xA5, 0x5A, 0x03]).unwrap();
        sleep_ms(10);
        assert_eq!(channel.available().unwrap(), 3);
        let mut buf = [0u8; 3];
        assert_eq!(channel.read(&mut buf).unwrap(), 3);
        assert_eq!(buf, [0xA5, 0x5A, 0x03]);

        channel.write(&[0xA5, 0x25]).unwrap();
        sleep_ms(10);
        let mut buf = [0u8; 2];
        master.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0xA5, 0x25]);
        assert!(channel.is_physical());
    }
}
