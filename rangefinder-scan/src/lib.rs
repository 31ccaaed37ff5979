//! Scanning core for rotating rangefinders.
//!
//! A [`session::DeviceSession`] brings the device up and owns it until
//! shutdown. The [`capture::CaptureLoop`] pulls one rotation at a time,
//! draws it as a [`histogram::Histogram`] chart and appends its points to
//! the [`persistence::LogWriter`] file.

pub mod capture;
pub mod config;
pub mod histogram;
pub mod persistence;
pub mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use capture::{CaptureLoop, CaptureReport};
pub use config::{AngleSpan, HistogramConfig, RunConfig};
pub use histogram::{Histogram, HistogramBucket};
pub use persistence::{LogWriter, PersistError};
pub use session::{DeviceSession, SessionError, SessionOptions, SessionState};
