#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of points a frame may hold.
pub const DEFAULT_FRAME_CAPACITY: usize = 8192;

/// One measurement in fixed-point form, as produced by the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanPoint {
    /// Angle in Q14 degrees, 16384 == 90 degrees.
    pub angle_z_q14: u16,
    /// Distance in Q2 millimetres, 4 == 1 mm.
    pub dist_mm_q2: u32,
    /// Return strength of the laser pulse.
    pub quality: u8,
    /// Bit 0 is set on the first point of a rotation.
    pub flag: u8,
}

impl ScanPoint {
    pub fn angle_degrees(&self) -> f32 {
        self.angle_z_q14 as f32 * 90. / 16384.
    }

    pub fn distance_mm(&self) -> f32 {
        self.dist_mm_q2 as f32 / 4.
    }

    pub fn is_rotation_start(&self) -> bool {
        self.flag & 0x01 == 1
    }
}

/// Returned by [`ScanFrame::push`] when the frame is already at capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameFull(pub ScanPoint);

impl fmt::Display for FrameFull {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Scan frame is full")
    }
}

impl std::error::Error for FrameFull {}

/// Points of one rotation, bounded by a capacity fixed at creation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanFrame {
    points: Vec<ScanPoint>,
    capacity: usize,
}

impl ScanFrame {
    pub fn with_capacity(capacity: usize) -> ScanFrame {
        ScanFrame {
            points: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a point, handing it back if the frame is full.
    pub fn push(&mut self, point: ScanPoint) -> Result<(), FrameFull> {
        if self.points.len() >= self.capacity {
            return Err(FrameFull(point));
        }
        self.points.push(point);
        Ok(())
    }

    pub fn points(&self) -> &[ScanPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.points.len() >= self.capacity
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Reorders points by ascending angle, keeping arrival order among equal angles.
    pub fn sort_by_angle(&mut self) {
        self.points.sort_by_key(|p| p.angle_z_q14);
    }
}

impl Default for ScanFrame {
    fn default() -> Self {
        ScanFrame::with_capacity(DEFAULT_FRAME_CAPACITY)
    }
}
