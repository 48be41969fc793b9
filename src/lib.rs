//! Send lines from standard input to a serial device.
//!
//! The library is split along the seams of the data flow:
//!
//! ```text
//! stdin bytes → lines::split_lines → transmit::Transmitter → transport::Transport
//! ```
//!
//! `transmit` owns the write → drain → pause loop; `transport` hides the
//! serial device behind a trait so the loop can be exercised against fakes.

pub mod config;
pub mod lines;
pub mod transmit;
pub mod transport;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Output goes to
/// stderr: stdout must stay silent so the tool composes in pipelines and
/// never mixes diagnostics into redirected output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}
