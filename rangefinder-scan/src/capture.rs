use crate::config::RunConfig;
use crate::histogram::Histogram;
use crate::persistence::LogWriter;
use crate::session::{DeviceSession, SessionError};
use rangefinder_data::ScanFrame;
use rangefinder_driver::{CaptureStatus, LidarDriver};
use std::io::Write;
use std::thread;
use std::time::Duration;

/// What a capture run did.
#[derive(Debug, Default)]
pub struct CaptureReport {
    /// Rotations charted and handed to the log writer
    pub frames: usize,
    /// Captures that ran out of time and were used as partial rotations
    pub timeouts: usize,
    /// Frames whose points could not be logged
    pub log_failures: usize,
    pub points_logged: usize,
    /// Capture error that ended the run early
    pub failure: Option<SessionError>,
}

/// Captures up to a fixed number of rotations, one at a time.
/// Every usable rotation is charted to the console, then appended to the log.
pub struct CaptureLoop<W: Write> {
    histogram: Histogram,
    writer: LogWriter,
    console: W,
    iterations: usize,
    frame_capacity: usize,
    inter_scan_delay: Duration,
}

impl<W: Write> CaptureLoop<W> {
    pub fn new(config: &RunConfig, console: W) -> Self {
        Self {
            histogram: Histogram::new(&config.histogram),
            writer: LogWriter::new(config.log_path.clone()),
            console,
            iterations: config.iterations,
            frame_capacity: config.frame_capacity,
            inter_scan_delay: config.inter_scan_delay(),
        }
    }

    pub fn into_console(self) -> W {
        self.console
    }

    pub fn run<D: LidarDriver>(&mut self, session: &mut DeviceSession<D>) -> CaptureReport {
        let mut report = CaptureReport::default();
        for iteration in 0..self.iterations {
            let mut frame = ScanFrame::with_capacity(self.frame_capacity);
            match self.capture(session, &mut frame) {
                Ok(CaptureStatus::Complete) => {}
                Ok(CaptureStatus::Timeout) => {
                    report.timeouts += 1;
                    log::warn!(
                        "Capture {} timed out, using {} points",
                        iteration,
                        frame.len()
                    );
                }
                Err(e) => {
                    log::error!("{}", e);
                    report.failure = Some(e);
                    break;
                }
            }

            self.display(&frame);
            match self.writer.append_frame(&frame) {
                Ok(n) => report.points_logged += n,
                Err(e) => {
                    log::error!("{}", e);
                    report.log_failures += 1;
                }
            }
            report.frames += 1;

            if iteration + 1 < self.iterations {
                thread::sleep(self.inter_scan_delay);
            }
        }
        report
    }

    fn capture<D: LidarDriver>(
        &self,
        session: &mut DeviceSession<D>,
        frame: &mut ScanFrame,
    ) -> Result<CaptureStatus, SessionError> {
        let status = session.capture(frame)?;
        session.ascend(frame)?;
        Ok(status)
    }

    fn display(&mut self, frame: &ScanFrame) {
        let chart = self.histogram.render(frame);
        let written = self
            .console
            .write_all(chart.as_bytes())
            .and_then(|_| self.console.flush());
        if let Err(e) = written {
            log::warn!("Cannot draw histogram: {}", e);
        }
    }
}
