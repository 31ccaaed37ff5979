use crate::config::{AngleSpan, HistogramConfig};
use rangefinder_data::{ScanFrame, ScanPoint};

/// Q14 value of a full turn.
const Q14_FULL_ROTATION: usize = 65536;
/// Q14 value of 90 degrees.
const Q14_QUADRANT: usize = 16384;

const LIT: char = '*';
const BLANK: char = ' ';
const SEPARATOR: char = '-';

/// One angular slice of the chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramBucket {
    pub index: usize,
    /// Smoothed distance in millimetres, `None` if no point fell in the slice
    pub distance: Option<f32>,
}

/// Turns one rotation into a fixed-size text bar chart.
/// Nothing is carried over from one frame to the next.
#[derive(Clone, Debug)]
pub struct Histogram {
    buckets: usize,
    height: usize,
    angle_span: AngleSpan,
}

impl Histogram {
    pub fn new(config: &HistogramConfig) -> Self {
        Self {
            buckets: config.buckets.max(1),
            height: config.height.max(1),
            angle_span: config.angle_span,
        }
    }

    /// Bucket for a Q14 angle, always in `0..buckets`.
    pub fn bucket_index(&self, angle_z_q14: u16) -> usize {
        let span = match self.angle_span {
            AngleSpan::FullRotation => Q14_FULL_ROTATION,
            AngleSpan::Quadrant => Q14_QUADRANT,
        };
        let index = angle_z_q14 as usize * self.buckets / span;
        if index >= self.buckets {
            0
        } else {
            index
        }
    }

    /// Folds points into buckets in arrival order. A bucket's first point sets
    /// it, every further point replaces it with the mean of the old value and
    /// the new distance.
    pub fn aggregate(&self, points: &[ScanPoint]) -> Vec<HistogramBucket> {
        let mut buckets: Vec<HistogramBucket> = (0..self.buckets)
            .map(|index| HistogramBucket {
                index,
                distance: None,
            })
            .collect();
        for point in points {
            let bucket = &mut buckets[self.bucket_index(point.angle_z_q14)];
            let distance = point.distance_mm();
            bucket.distance = Some(match bucket.distance {
                None => distance,
                Some(previous) => (previous + distance) / 2.,
            });
        }
        buckets
    }

    pub fn render(&self, frame: &ScanFrame) -> String {
        let buckets = self.aggregate(frame.points());
        let max = buckets
            .iter()
            .filter_map(|b| b.distance)
            .fold(0f32, f32::max);

        let mut chart = String::with_capacity((self.buckets + 1) * (self.height + 1));
        for row in (1..=self.height).rev() {
            let threshold = max * row as f32 / self.height as f32;
            for bucket in &buckets {
                let lit = max > 0. && bucket.distance.map_or(false, |d| d >= threshold);
                chart.push(if lit { LIT } else { BLANK });
            }
            chart.push('\n');
        }
        chart.extend(std::iter::repeat(SEPARATOR).take(self.buckets));
        chart.push('\n');
        chart
    }
}
