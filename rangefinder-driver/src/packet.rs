use crate::constants::{HEADER_SIZE, LIDAR_ANS_SYNC_BYTE, LIDAR_CMD_SYNC_BYTE};
use crate::error::DriverError;
use crate::numeric::{to_string, to_u32_le};

/// Decoded seven byte response descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ResponseDescriptor {
    pub(crate) length: u32,
    pub(crate) send_mode: u8,
    pub(crate) type_code: u8,
}

pub(crate) fn validate_response_header(
    header: &[u8],
    maybe_response_length: Option<u32>,
    type_code: u8,
) -> Result<ResponseDescriptor, DriverError> {
    if header.len() != HEADER_SIZE {
        return Err(DriverError::InvalidHeaderLength(header.len()));
    }
    if header[0..2] != [LIDAR_CMD_SYNC_BYTE, LIDAR_ANS_SYNC_BYTE] {
        return Err(DriverError::InvalidMagicNumber(to_string(&header[0..2])));
    }
    let size_q30_subtype = to_u32_le(&header[2..6]);
    let descriptor = ResponseDescriptor {
        length: size_q30_subtype & 0x3FFF_FFFF,
        send_mode: (size_q30_subtype >> 30) as u8,
        type_code: header[6],
    };
    if let Some(len) = maybe_response_length {
        if descriptor.length != len {
            return Err(DriverError::InvalidResponseLength(
                len as usize,
                descriptor.length as usize,
            ));
        }
    }
    if descriptor.type_code != type_code {
        return Err(DriverError::InvalidTypeCode(type_code, descriptor.type_code));
    }
    Ok(descriptor)
}

pub(crate) fn calc_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, e| acc ^ e)
}

/// Builds a request packet. Requests with a payload carry the payload size
/// and a trailing XOR checksum over every preceding byte.
pub(crate) fn encode_request(command: u8, payload: &[u8]) -> Vec<u8> {
    let mut packet = vec![LIDAR_CMD_SYNC_BYTE, command];
    if payload.is_empty() {
        return packet;
    }
    packet.push(payload.len() as u8);
    packet.extend_from_slice(payload);
    packet.push(calc_checksum(&packet));
    packet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_response_header() {
        assert!(matches!(
            validate_response_header(
                &[0xA5, 0x5A, 0x14, 0x00, 0x00, 0x00, 0x04],
                Some(20),
                0x04
            ),
            Ok(ResponseDescriptor {
                length: 20,
                send_mode: 0,
                type_code: 0x04
            })
        ));

        assert!(matches!(
            validate_response_header(
                &[0xA5, 0x5A, 0x14, 0x00, 0x00, 0x00, 0x04, 0x09],
                Some(20),
                0x04
            ),
            Err(DriverError::InvalidHeaderLength(8))
        ));

        assert!(matches!(
            validate_response_header(
                &[0xA6, 0x5A, 0x14, 0x00, 0x00, 0x00, 0x04],
                Some(20),
                0x04
            ),
            Err(DriverError::InvalidMagicNumber(_))
        ));

        assert!(matches!(
            validate_response_header(
                &[0xA5, 0x5A, 0x14, 0x00, 0x00, 0x00, 0x04],
                Some(18),
                0x04
            ),
            Err(DriverError::InvalidResponseLength(18, 20))
        ));

        assert!(matches!(
            validate_response_header(
                &[0xA5, 0x5A, 0x14, 0x00, 0x00, 0x00, 0x08],
                Some(20),
                0x04
            ),
            Err(DriverError::InvalidTypeCode(0x04, 0x08))
        ));
    }

    #[test]
    fn test_continuous_mode_descriptor() {
        let descriptor = validate_response_header(
            &[0xA5, 0x5A, 0x05, 0x00, 0x00, 0x40, 0x81],
            Some(5),
            0x81,
        )
        .unwrap();
        assert_eq!(descriptor.length, 5);
        assert_eq!(descriptor.send_mode, 1);
    }

    #[test]
    fn test_encode_request() {
        assert_eq!(encode_request(0x25, &[]), vec![0xA5, 0x25]);
        // 660 == 0x0294
        assert_eq!(
            encode_request(0xF0, &[0x94, 0x02]),
            vec![0xA5, 0xF0, 0x02, 0x94, 0x02, 0xA5 ^ 0xF0 ^ 0x02 ^ 0x94 ^ 0x02]
        );
    }
}
