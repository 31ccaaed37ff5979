use crate::constants::NODE_SIZE;
use crate::numeric::{q6_to_q14, to_u16};
use rangefinder_data::{ScanFrame, ScanPoint};
use std::collections::VecDeque;

/// Decodes one 5-byte measurement node.
/// Returns `None` when the start bit pair or the check bit is inconsistent,
/// which means the stream is out of sync at this byte.
pub(crate) fn decode_node(node: &[u8]) -> Option<ScanPoint> {
    if node.len() < NODE_SIZE {
        return None;
    }
    let start = node[0] & 0x01;
    let inverted_start = (node[0] >> 1) & 0x01;
    if start == inverted_start {
        return None;
    }
    if node[1] & 0x01 != 1 {
        return None;
    }
    let angle_q6 = to_u16(node[2], node[1]) >> 1;
    let distance_q2 = to_u16(node[4], node[3]);
    Some(ScanPoint {
        angle_z_q14: q6_to_q14(angle_q6),
        dist_mm_q2: distance_q2 as u32,
        quality: node[0] >> 2,
        flag: start,
    })
}

/// Cuts the measurement stream into rotations.
///
/// Nodes seen before the first start bit belong to a partial rotation and are
/// discarded. The node that opens the next rotation is kept back for the
/// following frame.
#[derive(Debug, Default)]
pub(crate) struct RotationAssembler {
    pub(crate) buffer: VecDeque<u8>,
    pending: Option<ScanPoint>,
    in_rotation: bool,
    rotation_points: usize,
    dropped_points: usize,
}

impl RotationAssembler {
    pub(crate) fn reset(&mut self) {
        *self = RotationAssembler::default();
    }

    /// Prepares a new frame, moving the held-back opening node into it.
    pub(crate) fn begin(&mut self, frame: &mut ScanFrame) {
        self.rotation_points = 0;
        self.dropped_points = 0;
        if let Some(point) = self.pending.take() {
            self.store(frame, point);
        }
    }

    /// Consumes buffered bytes. Returns true once a full rotation is in `frame`.
    pub(crate) fn assemble(&mut self, frame: &mut ScanFrame) -> bool {
        while self.buffer.len() >= NODE_SIZE {
            let node: Vec<u8> = self.buffer.iter().take(NODE_SIZE).copied().collect();
            let point = match decode_node(&node) {
                Some(p) => p,
                None => {
                    // slide by one byte to resynchronize
                    self.buffer.pop_front();
                    continue;
                }
            };
            self.buffer.drain(..NODE_SIZE);

            if point.is_rotation_start() && self.rotation_points > 0 {
                self.pending = Some(point);
                self.finish(frame);
                return true;
            }
            if point.is_rotation_start() || self.in_rotation {
                self.store(frame, point);
            }
        }
        false
    }

    pub(crate) fn dropped_points(&self) -> usize {
        self.dropped_points
    }

    fn store(&mut self, frame: &mut ScanFrame, point: ScanPoint) {
        self.in_rotation = true;
        self.rotation_points += 1;
        if frame.push(point).is_err() {
            self.dropped_points += 1;
        }
    }

    pub(crate) fn finish(&self, frame: &ScanFrame) {
        if self.dropped_points() > 0 {
            log::warn!(
                "Dropped {} points beyond the frame capacity of {}",
                self.dropped_points(),
                frame.capacity()
            );
        }
    }
}

#[cfg(test)]
pub(crate) fn encode_node(start: bool, quality: u8, angle_degree: f64, distance_mm: f64) -> [u8; 5] {
    let s = start as u8;
    let angle_q6 = (angle_degree * 64.) as u16;
    let angle = (angle_q6 << 1) | 0x01;
    let distance = (distance_mm * 4.) as u16;
    [
        (quality << 2) | ((1 - s) << 1) | s,
        (angle & 0xFF) as u8,
        (angle >> 8) as u8,
        (distance & 0xFF) as u8,
        (distance >> 8) as u8,
    ]
}
