//! `ttysend` binary: flag parsing, config merging, and wiring.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use ttysend::config::Config;
use ttysend::init_tracing;
use ttysend::transmit::{SystemClock, Transmitter};
use ttysend::transport::SerialTransport;

/// Send standard input to a serial device, one CRLF-terminated line at a
/// time, draining device echo and pausing between lines.
#[derive(Debug, Parser)]
#[command(name = "ttysend", version)]
struct Cli {
    /// Serial device path (overrides config)
    #[arg(short, long)]
    device: Option<String>,

    /// Baud rate (overrides config)
    #[arg(short, long)]
    baud: Option<u32>,

    /// Pause after each line, in milliseconds (overrides config)
    #[arg(short, long)]
    pause_ms: Option<u64>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let device = cli.device.unwrap_or(config.serial.device);
    let baud = cli.baud.unwrap_or(config.serial.baud);
    let pause = Duration::from_millis(cli.pause_ms.unwrap_or(config.pacing.pause_ms));

    // The whole input is buffered before the device is touched, so a slow
    // or interactive stdin never stretches the inter-line pacing.
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read standard input")?;

    let mut transport = SerialTransport::open(&device, baud)?;
    tracing::info!(device = %device, baud, pause_ms = pause.as_millis() as u64, "serial device opened");

    let mut transmitter = Transmitter::new(pause, SystemClock);
    let stats = transmitter.run(&mut transport, &input)?;

    tracing::info!(
        lines = stats.lines_sent,
        bytes = stats.bytes_sent,
        drained = stats.bytes_discarded,
        "transmission complete"
    );

    Ok(())
}
