use crate::session::SessionOptions;
use anyhow::{ensure, Context};
use rangefinder_data::DEFAULT_FRAME_CAPACITY;
use rangefinder_driver::DEFAULT_MOTOR_PWM;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How raw angles are spread over the histogram buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleSpan {
    /// 0..360 degrees across all buckets
    FullRotation,
    /// 0..90 degrees across all buckets; anything past 90 degrees lands in bucket 0
    Quadrant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    pub buckets: usize,
    pub height: usize,
    pub angle_span: AngleSpan,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            buckets: 75,
            height: 20,
            angle_span: AngleSpan::FullRotation,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Upper bound on captured rotations
    pub iterations: usize,
    pub frame_capacity: usize,
    pub histogram: HistogramConfig,
    pub log_path: PathBuf,
    pub capture_timeout_ms: u64,
    /// Wait after starting the scan, before the first capture
    pub settle_delay_ms: u64,
    pub inter_scan_delay_ms: u64,
    /// Wait between stopping the scan and stopping the motor
    pub motor_stop_delay_ms: u64,
    pub motor_speed: u16,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            frame_capacity: DEFAULT_FRAME_CAPACITY,
            histogram: HistogramConfig::default(),
            log_path: PathBuf::from("scan_log.txt"),
            capture_timeout_ms: 2000,
            settle_delay_ms: 1000,
            inter_scan_delay_ms: 100,
            motor_stop_delay_ms: 200,
            motor_speed: DEFAULT_MOTOR_PWM,
        }
    }
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading run config {}", path_ref.display()))?;
        let config: RunConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing run config {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.frame_capacity > 0, "frame_capacity must be positive");
        ensure!(self.histogram.buckets > 0, "histogram.buckets must be positive");
        ensure!(self.histogram.height > 0, "histogram.height must be positive");
        Ok(())
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            motor_speed: self.motor_speed,
            capture_timeout: Duration::from_millis(self.capture_timeout_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            motor_stop_delay: Duration::from_millis(self.motor_stop_delay_ms),
        }
    }

    pub fn inter_scan_delay(&self) -> Duration {
        Duration::from_millis(self.inter_scan_delay_ms)
    }
}
