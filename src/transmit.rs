//! The write → drain → pause loop.

use std::time::Duration;

use crate::lines::split_lines;
use crate::transport::{Transport, TransportError};

/// Sleep seam, so pacing is observable in tests.
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Real clock; blocks the whole process, which is the intended pacing model.
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Counters for the completion log line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransmitStats {
    /// Line records written, empty ones included.
    pub lines_sent: usize,
    /// Bytes written to the device, CRLF terminators included.
    pub bytes_sent: usize,
    /// Echoed bytes read and discarded during drain phases.
    pub bytes_discarded: usize,
}

/// Sends line records over a [`Transport`] with fixed inter-line pacing.
pub struct Transmitter<C: Clock> {
    pause: Duration,
    clock: C,
}

impl<C: Clock> Transmitter<C> {
    pub fn new(pause: Duration, clock: C) -> Self {
        Self { pause, clock }
    }

    /// Split `input` into line records and send each as `record + b"\r\n"`,
    /// in input order. After every write the receive side is drained, then
    /// the fixed pause elapses before the next record. The pause is not
    /// compensated for time spent writing or draining, and it also follows
    /// the final record.
    ///
    /// The first transport error aborts the run; no further records are
    /// attempted.
    pub fn run<T: Transport>(
        &mut self,
        transport: &mut T,
        input: &[u8],
    ) -> Result<TransmitStats, TransportError> {
        let mut stats = TransmitStats::default();

        for record in split_lines(input) {
            let mut frame = Vec::with_capacity(record.len() + 2);
            frame.extend_from_slice(record);
            frame.extend_from_slice(b"\r\n");

            transport.write_all(&frame)?;
            stats.lines_sent += 1;
            stats.bytes_sent += frame.len();
            tracing::debug!(line = stats.lines_sent, bytes = frame.len(), "frame written");

            let discarded = drain(transport)?;
            stats.bytes_discarded += discarded;
            if discarded > 0 {
                tracing::debug!(bytes = discarded, "echo drained");
            }

            self.clock.sleep(self.pause);
        }

        Ok(stats)
    }
}

/// Discard whatever the device has echoed back so far.
///
/// Best-effort clearing only: one availability signal is not assumed to be
/// one complete echoed line, so the loop keeps reading until the receive
/// buffer reports empty.
fn drain<T: Transport>(transport: &mut T) -> Result<usize, TransportError> {
    let mut discarded = 0;
    while transport.bytes_available()? > 0 {
        let chunk = transport.read_line()?;
        if chunk.is_empty() {
            break;
        }
        discarded += chunk.len();
    }
    Ok(discarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Write(Vec<u8>),
        Drained(usize),
        Sleep(Duration),
    }

    type EventLog = Rc<RefCell<Vec<Event>>>;

    /// Scripted transport: `echo` holds the byte chunks the fake device has
    /// "echoed" after each write; `fail_on_write` injects a fault on the
    /// n-th write call (1-based).
    struct FakeTransport {
        log: EventLog,
        echo: VecDeque<Vec<u8>>,
        pending: VecDeque<Vec<u8>>,
        writes: usize,
        fail_on_write: Option<usize>,
    }

    impl FakeTransport {
        fn new(log: EventLog) -> Self {
            Self {
                log,
                echo: VecDeque::new(),
                pending: VecDeque::new(),
                writes: 0,
                fail_on_write: None,
            }
        }

        fn with_echo(mut self, chunks: &[&[u8]]) -> Self {
            self.echo = chunks.iter().map(|c| c.to_vec()).collect();
            self
        }

        fn failing_on_write(mut self, n: usize) -> Self {
            self.fail_on_write = Some(n);
            self
        }
    }

    impl Transport for FakeTransport {
        fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
            self.writes += 1;
            if self.fail_on_write == Some(self.writes) {
                return Err(TransportError::Write {
                    source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "device gone"),
                });
            }
            self.log.borrow_mut().push(Event::Write(bytes.to_vec()));
            // Each write makes the next scripted echo chunk available.
            if let Some(chunk) = self.echo.pop_front() {
                self.pending.push_back(chunk);
            }
            Ok(())
        }

        fn bytes_available(&mut self) -> Result<usize, TransportError> {
            Ok(self.pending.front().map_or(0, Vec::len))
        }

        fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
            let chunk = self.pending.pop_front().unwrap_or_default();
            self.log.borrow_mut().push(Event::Drained(chunk.len()));
            Ok(chunk)
        }
    }

    /// Clock that records instead of sleeping, into the shared event log so
    /// ordering against writes and drains is assertable.
    struct FakeClock {
        log: EventLog,
    }

    impl Clock for FakeClock {
        fn sleep(&mut self, duration: Duration) {
            self.log.borrow_mut().push(Event::Sleep(duration));
        }
    }

    const PAUSE: Duration = Duration::from_millis(500);

    fn harness() -> (EventLog, FakeTransport, Transmitter<FakeClock>) {
        let log: EventLog = Rc::new(RefCell::new(Vec::new()));
        let transport = FakeTransport::new(Rc::clone(&log));
        let tx = Transmitter::new(PAUSE, FakeClock { log: Rc::clone(&log) });
        (log, transport, tx)
    }

    fn writes(log: &EventLog) -> Vec<Vec<u8>> {
        log.borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn every_frame_is_record_plus_crlf() {
        let (log, mut transport, mut tx) = harness();
        let stats = tx.run(&mut transport, b"hello\nWorld \n").unwrap();

        assert_eq!(
            writes(&log),
            vec![b"hello\r\n".to_vec(), b"World \r\n".to_vec()]
        );
        assert_eq!(stats.lines_sent, 2);
        assert_eq!(stats.bytes_sent, 7 + 8);
    }

    #[test]
    fn input_order_is_preserved() {
        let (log, mut transport, mut tx) = harness();
        tx.run(&mut transport, b"a\nb\nc\nd").unwrap();

        assert_eq!(
            writes(&log),
            vec![
                b"a\r\n".to_vec(),
                b"b\r\n".to_vec(),
                b"c\r\n".to_vec(),
                b"d\r\n".to_vec()
            ]
        );
    }

    #[test]
    fn empty_record_sends_bare_terminator() {
        let (log, mut transport, mut tx) = harness();
        tx.run(&mut transport, b"a\n\nb").unwrap();

        assert_eq!(
            writes(&log),
            vec![b"a\r\n".to_vec(), b"\r\n".to_vec(), b"b\r\n".to_vec()]
        );
    }

    #[test]
    fn empty_input_touches_nothing() {
        let (log, mut transport, mut tx) = harness();
        let stats = tx.run(&mut transport, b"").unwrap();

        assert_eq!(stats, TransmitStats::default());
        assert!(log.borrow().is_empty());
        assert_eq!(transport.writes, 0);
    }

    #[test]
    fn pause_follows_every_record_including_the_last() {
        let (log, mut transport, mut tx) = harness();
        tx.run(&mut transport, b"a\nb\n").unwrap();

        let sleeps: Vec<_> = log
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Sleep(_)))
            .cloned()
            .collect();
        assert_eq!(sleeps, vec![Event::Sleep(PAUSE), Event::Sleep(PAUSE)]);
        assert!(matches!(log.borrow().last(), Some(Event::Sleep(_))));
    }

    #[test]
    fn drain_completes_before_the_pause() {
        let (log, transport, mut tx) = harness();
        let mut transport = transport.with_echo(&[b"OK\r\n", b"OK\r\n"]);
        let stats = tx.run(&mut transport, b"a\nb\n").unwrap();

        assert_eq!(stats.bytes_discarded, 8);
        assert_eq!(
            *log.borrow(),
            vec![
                Event::Write(b"a\r\n".to_vec()),
                Event::Drained(4),
                Event::Sleep(PAUSE),
                Event::Write(b"b\r\n".to_vec()),
                Event::Drained(4),
                Event::Sleep(PAUSE),
            ]
        );
    }

    #[test]
    fn write_failure_aborts_after_exact_attempt_count() {
        let (log, transport, mut tx) = harness();
        let mut transport = transport.failing_on_write(2);
        let err = tx.run(&mut transport, b"a\nb\nc\n").unwrap_err();

        assert!(matches!(err, TransportError::Write { .. }));
        assert_eq!(transport.writes, 2);
        assert_eq!(writes(&log), vec![b"a\r\n".to_vec()]);
        // The failed iteration never reaches its pause.
        let sleeps = log
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Sleep(_)))
            .count();
        assert_eq!(sleeps, 1);
    }
}
