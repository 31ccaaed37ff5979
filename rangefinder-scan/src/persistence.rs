use rangefinder_data::ScanFrame;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Cannot open scan log {}: {source}", .path.display())]
    LogOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot write scan log {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Appends frames to a plain text log, one `<epoch-ms> <angle> <distance>`
/// line per point. The file is opened for each frame and closed before
/// `append_frame` returns.
#[derive(Clone, Debug)]
pub struct LogWriter {
    path: PathBuf,
}

impl LogWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of lines written.
    pub fn append_frame(&self, frame: &ScanFrame) -> Result<usize, PersistError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| PersistError::LogOpen {
                path: self.path.clone(),
                source,
            })?;
        let mut writer = BufWriter::new(file);

        self.write_points(&mut writer, frame)
            .and_then(|_| writer.flush())
            .map_err(|source| PersistError::Write {
                path: self.path.clone(),
                source,
            })?;
        Ok(frame.len())
    }

    fn write_points<W: Write>(&self, writer: &mut W, frame: &ScanFrame) -> io::Result<()> {
        for point in frame.points() {
            writeln!(
                writer,
                "{} {:.3} {:.2}",
                epoch_ms(),
                point.angle_degrees(),
                point.distance_mm()
            )?;
        }
        Ok(())
    }
}

fn epoch_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
