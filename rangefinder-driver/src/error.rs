use std::io;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Response header must be always seven bytes. Actually {0} bytes.")]
    InvalidHeaderLength(usize),
    #[error("Header sign must start with 0xA5 0x5A. Observed = {0}.")]
    InvalidMagicNumber(String),
    #[error("Expected response length of {0} bytes but found {1} bytes.")]
    InvalidResponseLength(usize, usize),
    #[error("Expected type code {0:#04X} but obtained {1:#04X}.")]
    InvalidTypeCode(u8, u8),
    #[error("Driver is not connected to a channel")]
    NotConnected,
    #[error("Cannot resolve channel address \"{0}\"")]
    InvalidAddress(String),
    #[error("Operation timed out")]
    Timeout,
    #[error(transparent)]
    Serial(#[from] serialport::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
