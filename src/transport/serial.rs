//! `serialport`-backed implementation of [`Transport`].

use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use serialport::SerialPort;

use crate::transport::{Transport, TransportError};

/// Short read timeout as a backstop: `read_line` only reads bytes the
/// driver already reported as buffered, but if the driver retracts them
/// between the availability check and the read, the call returns instead of
/// hanging the process.
const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// An open serial connection.
///
/// Owns the device handle; dropping it closes the device on every exit
/// path, including the fatal-error path. There is no explicit close.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open `path` at `baud`, 8N1 (the `serialport` builder default).
    pub fn open(path: &str, baud: u32) -> Result<Self, TransportError> {
        let port = serialport::new(path, baud)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| TransportError::Open {
                path: PathBuf::from(path),
                baud,
                source: e,
            })?;

        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.port
            .write_all(bytes)
            .and_then(|()| self.port.flush())
            .map_err(|e| TransportError::Write { source: e })
    }

    fn bytes_available(&mut self) -> Result<usize, TransportError> {
        self.port
            .bytes_to_read()
            .map(|n| n as usize)
            .map_err(|e| TransportError::Poll { source: e })
    }

    fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        // Availability is re-checked before every byte so this never waits
        // for echo the device has not produced.
        while self.bytes_available()? > 0 {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(TransportError::Read { source: e }),
            }
        }

        Ok(line)
    }
}
