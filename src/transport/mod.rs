//! Serial transport abstraction.
//!
//! The device is an external collaborator reduced to the four operations the
//! transmit loop actually needs: open, write, availability, drain read.
//! Everything behind the trait is fatal-on-error; no variant is retried.

mod serial;

pub use serial::SerialTransport;

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the serial device.
///
/// `Open` covers connection establishment (device missing, busy, permission
/// denied); the rest cover faults on an already-open connection. All of them
/// terminate the transmission.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to open serial device '{path}' at {baud} baud: {source}")]
    Open {
        path: PathBuf,
        baud: u32,
        #[source]
        source: serialport::Error,
    },

    #[error("Write to serial device failed: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error("Read from serial device failed: {source}")]
    Read {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to query serial receive buffer: {source}")]
    Poll {
        #[source]
        source: serialport::Error,
    },
}

/// Byte-level operations the transmit loop performs on an open connection.
pub trait Transport {
    /// Write all of `bytes`; either the whole frame is accepted or the
    /// transmission is over.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Number of bytes currently buffered by the receive side.
    fn bytes_available(&mut self) -> Result<usize, TransportError>;

    /// Read up to and including the next `\n`, or whatever is currently
    /// buffered if no terminator arrives. Must not block waiting for bytes
    /// that have not been received.
    fn read_line(&mut self) -> Result<Vec<u8>, TransportError>;
}
