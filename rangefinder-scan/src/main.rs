use anyhow::Context;
use clap::{ArgGroup, Parser};
use rangefinder_driver::{ChannelSpec, ProtocolDriver};
use rangefinder_scan::{CaptureLoop, DeviceSession, RunConfig};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Scans a rotating rangefinder, charts every rotation and logs its points"
)]
#[command(group(ArgGroup::new("mode").required(true).args(["serial", "udp"])))]
struct Args {
    /// Select the channel type with one of the following flags
    #[arg(long, required = true)]
    channel: bool,
    /// Serial link: <port name> <baud rate>
    #[arg(short = 's', long)]
    serial: bool,
    /// UDP link: <address> <port>
    #[arg(short = 'u', long)]
    udp: bool,
    /// Serial port name such as /dev/ttyUSB0, or device IP address
    target: String,
    /// Baud rate for a serial link, port number for UDP
    param: u32,
    /// Load run settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the number of rotations to capture
    #[arg(long)]
    iterations: Option<usize>,
    /// Override the scan log path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn channel_spec(&self) -> anyhow::Result<ChannelSpec> {
        if self.serial {
            return Ok(ChannelSpec::Serial {
                port: self.target.clone(),
                baud_rate: self.param,
            });
        }
        let port = u16::try_from(self.param)
            .with_context(|| format!("UDP port {} is out of range", self.param))?;
        Ok(ChannelSpec::Udp {
            address: self.target.clone(),
            port,
        })
    }

    fn run_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(log_file) = &self.log_file {
            config.log_path = log_file.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = args.run_config()?;
    let channel = args.channel_spec()?;
    log::info!(
        "Capturing up to {} rotations into {}",
        config.iterations,
        config.log_path.display()
    );

    let mut session = DeviceSession::new(ProtocolDriver::new(), config.session_options());
    session
        .bring_up(&channel)
        .with_context(|| format!("bringing up device on {}", channel))?;

    let stdout = io::stdout();
    let mut capture = CaptureLoop::new(&config, stdout.lock());
    let report = capture.run(&mut session);
    session.shutdown();

    log::info!(
        "Captured {} rotations ({} timed out), logged {} points, {} log failures",
        report.frames,
        report.timeouts,
        report.points_logged,
        report.log_failures
    );
    if let Some(failure) = report.failure {
        log::warn!("Capture ended early: {}", failure);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_serial_channel() {
        let args =
            Args::try_parse_from(["rangefinder-scan", "--channel", "-s", "/dev/ttyUSB0", "115200"])
                .unwrap();
        assert_eq!(
            args.channel_spec().unwrap(),
            ChannelSpec::Serial {
                port: "/dev/ttyUSB0".to_string(),
                baud_rate: 115200
            }
        );
    }

    #[test]
    fn test_parses_udp_channel_with_overrides() {
        let args = Args::try_parse_from([
            "rangefinder-scan",
            "--channel",
            "--udp",
            "192.168.11.2",
            "8089",
            "--iterations",
            "3",
        ])
        .unwrap();
        assert_eq!(
            args.channel_spec().unwrap(),
            ChannelSpec::Udp {
                address: "192.168.11.2".to_string(),
                port: 8089
            }
        );
        assert_eq!(args.run_config().unwrap().iterations, 3);
    }

    #[test]
    fn test_rejects_short_command_lines() {
        assert!(Args::try_parse_from(["rangefinder-scan", "--channel", "-s", "/dev/ttyUSB0"]).is_err());
        assert!(Args::try_parse_from(["rangefinder-scan", "-s", "/dev/ttyUSB0", "115200"]).is_err());
        assert!(Args::try_parse_from(["rangefinder-scan", "--channel", "/dev/ttyUSB0", "115200"]).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_udp_port() {
        let args =
            Args::try_parse_from(["rangefinder-scan", "--channel", "-u", "10.0.0.1", "70000"])
                .unwrap();
        assert!(args.channel_spec().is_err());
    }
}
