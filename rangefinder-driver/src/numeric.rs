pub(crate) fn to_u16(a: u8, b: u8) -> u16 {
    ((a as u16) << 8) + (b as u16)
}

pub(crate) fn to_u32_le(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(4)
        .rev()
        .fold(0u32, |acc, &e| (acc << 8) | (e as u32))
}

/// Converts a Q6 angle (64 == 1 degree) to Q14 (16384 == 90 degrees).
/// A full turn wraps to zero.
pub(crate) fn q6_to_q14(angle_q6: u16) -> u16 {
    ((((angle_q6 as u32) << 8) / 90) & 0xFFFF) as u16
}

pub(crate) fn to_string(data: &[u8]) -> String {
    data.iter()
        .map(|e| format!("{:02X}", e))
        .collect::<Vec<_>>()
        .join(" ")
}
