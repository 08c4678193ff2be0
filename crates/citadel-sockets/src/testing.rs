//! Scripted transports for unit tests.

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read, Write};

use crate::transport::Transport;

/// Outcome of one underlying call.
#[derive(Debug)]
pub(crate) enum Step {
    /// Move up to this many bytes.
    Chunk(usize),
    /// Fail with this error kind.
    Fail(ErrorKind),
    /// Return zero bytes.
    Close,
}

/// A transport that replays a script of call outcomes.
///
/// Reads, receives and peeks share one script; writes have their own. Once a
/// script runs out, reads move `read_chunk` bytes, peeks expose everything
/// still pending and writes accept `write_chunk` bytes.
pub(crate) struct ScriptedTransport {
    incoming: Vec<u8>,
    consumed: usize,
    reads: VecDeque<Step>,
    writes: VecDeque<Step>,
    flushes: VecDeque<Step>,
    flush_calls: usize,
    read_chunk: usize,
    write_chunk: usize,
    written: Vec<u8>,
    calls: usize,
    knows_close: bool,
}

impl ScriptedTransport {
    pub fn new(incoming: &[u8]) -> Self {
        Self {
            incoming: incoming.to_vec(),
            consumed: 0,
            reads: VecDeque::new(),
            writes: VecDeque::new(),
            flushes: VecDeque::new(),
            flush_calls: 0,
            read_chunk: usize::MAX,
            write_chunk: usize::MAX,
            written: Vec::new(),
            calls: 0,
            knows_close: false,
        }
    }

    pub fn read_chunk(mut self, n: usize) -> Self {
        self.read_chunk = n;
        self
    }

    pub fn write_chunk(mut self, n: usize) -> Self {
        self.write_chunk = n;
        self
    }

    pub fn script_reads(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.reads.extend(steps);
        self
    }

    pub fn script_writes(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.writes.extend(steps);
        self
    }

    /// Outcomes of successive flushes; only `Fail` steps have an effect.
    pub fn script_flushes(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.flushes.extend(steps);
        self
    }

    /// Report the peer as closed, as a transport that saw EOF would.
    pub fn knows_close(mut self) -> Self {
        self.knows_close = true;
        self
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn flushes(&self) -> usize {
        self.flush_calls
    }

    fn pending(&self) -> &[u8] {
        &self.incoming[self.consumed..]
    }

    fn take(&mut self, buf: &mut [u8], consume: bool) -> io::Result<usize> {
        self.calls += 1;
        let default = if consume { self.read_chunk } else { usize::MAX };
        let limit = match self.reads.pop_front() {
            Some(Step::Chunk(n)) => n,
            Some(Step::Fail(kind)) => return Err(kind.into()),
            Some(Step::Close) => return Ok(0),
            None => default,
        };

        let n = limit.min(buf.len()).min(self.pending().len());
        buf[..n].copy_from_slice(&self.pending()[..n]);
        if consume {
            self.consumed += n;
        }
        Ok(n)
    }
}

impl Transport for ScriptedTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.take(buf, true)
    }

    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.take(buf, false)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.calls += 1;
        let limit = match self.writes.pop_front() {
            Some(Step::Chunk(n)) => n,
            Some(Step::Fail(kind)) => return Err(kind.into()),
            Some(Step::Close) => return Ok(0),
            None => self.write_chunk,
        };

        let n = limit.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_calls += 1;
        match self.flushes.pop_front() {
            Some(Step::Fail(kind)) => Err(kind.into()),
            _ => Ok(()),
        }
    }

    fn peer_closed(&self) -> bool {
        self.knows_close
    }
}

/// An in-memory stream standing in for an established TLS stream.
///
/// Reads hand out at most `chunk` bytes per call, like a record at a time,
/// and return 0 once the data is exhausted.
pub(crate) struct MockStream {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    reads: usize,
    failures: Vec<(usize, io::Error)>,
    flush_failure: Option<ErrorKind>,
    written: Vec<u8>,
}

impl MockStream {
    pub fn new(data: &[u8], chunk: usize) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            chunk,
            reads: 0,
            failures: Vec::new(),
            flush_failure: None,
            written: Vec::new(),
        }
    }

    /// Fail the `call`-th read (zero-based) with `kind`.
    pub fn fail_read_at(&mut self, call: usize, kind: ErrorKind) {
        self.fail_read_with(call, kind.into());
    }

    /// Fail the `call`-th read (zero-based) with `err`.
    pub fn fail_read_with(&mut self, call: usize, err: io::Error) {
        self.failures.push((call, err));
    }

    /// Fail every flush with `kind`.
    pub fn fail_flush(&mut self, kind: ErrorKind) {
        self.flush_failure = Some(kind);
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl Read for MockStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let call = self.reads;
        self.reads += 1;
        if let Some(i) = self.failures.iter().position(|(at, _)| *at == call) {
            return Err(self.failures.swap_remove(i).1);
        }

        let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for MockStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.flush_failure {
            Some(kind) => Err(kind.into()),
            None => Ok(()),
        }
    }
}
