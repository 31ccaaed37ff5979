use super::Transport;
use crate::constants::UDP_DATAGRAM_SIZE;
use crate::error::DriverError;
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Network link to a device speaking the protocol over UDP datagrams.
/// There is no motor to drive through it.
pub struct UdpChannel {
    socket: UdpSocket,
    pending: VecDeque<u8>,
}

impl UdpChannel {
    pub fn open(address: &str, port: u16) -> Result<Self, DriverError> {
        let remote = (address, port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| DriverError::InvalidAddress(format!("{}:{}", address, port)))?;
        let local: SocketAddr = if remote.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(remote)?;
        socket.set_nonblocking(true)?;

        log::info!("Opened UDP channel to {}", remote);
        Ok(UdpChannel {
            socket,
            pending: VecDeque::new(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DriverError> {
        Ok(self.socket.local_addr()?)
    }

    fn receive_pending(&mut self) -> Result<(), DriverError> {
        let mut datagram = [0u8; UDP_DATAGRAM_SIZE];
        loop {
            match self.socket.recv(&mut datagram) {
                Ok(n) => self.pending.extend(&datagram[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                // ICMP unreachable from a peer that is not listening yet
                Err(e) if e.kind() == ErrorKind::ConnectionRefused => {
                    log::debug!("UDP peer refused: {}", e);
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Transport for UdpChannel {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, DriverError> {
        self.receive_pending()?;
        let n = self.pending.len().min(buffer.len());
        for (item, byte) in buffer.iter_mut().zip(self.pending.drain(..n)) {
            *item = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, DriverError> {
        Ok(self.socket.send(data)?)
    }

    fn flush(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn available(&mut self) -> Result<usize, DriverError> {
        self.receive_pending()?;
        Ok(self.pending.len())
    }

    fn is_physical(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::sleep_ms;

    #[test]
    fn test_udp_channel_round_trip() {
        let device = UdpSocket::bind("127.0.0.1:0").unwrap();
        let device_addr = device.local_addr().unwrap();

        let mut channel = UdpChannel::open("127.0.0.1", device_addr.port()).unwrap();
        channel.write(&[0xA5, 0x52]).unwrap();

        let mut buf = [0u8; 16];
        let (n, from) = device.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xA5, 0x52]);

        device.send_to(&[0xA5, 0x5A, 0x03], from).unwrap();
        device.send_to(&[0x00, 0x00], from).unwrap();
        sleep_ms(20);

        assert_eq!(channel.available().unwrap(), 5);
        let mut buf = [0u8; 4];
        assert_eq!(channel.read(&mut buf).unwrap(), 4);
        assert_eq!(buf, [0xA5, 0x5A, 0x03, 0x00]);
        assert_eq!(channel.available().unwrap(), 1);
        assert!(!channel.is_physical());
    }
}
