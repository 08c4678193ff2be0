//! Secured-session transport.
//!
//! [`SecureSession`] wraps an already-established secure stream (normally a
//! `rustls::StreamOwned`) so the drain loops can run against it exactly as
//! they run against a raw socket. The handshake, certificates and session
//! lifetime stay with the caller; the drain loops only borrow the session for
//! one call.
//!
//! TLS has no native peek. Peeked plaintext is held in a lookahead buffer
//! inside the session and handed out first by the next consuming read, so a
//! peek followed by a receive observes the same bytes.

use std::io::{self, Read, Write};

use crate::policy::{ErrorPolicy, SecurePolicy};
use crate::transport::Transport;

/// A rustls stream as a secured-session transport.
pub type TlsSession<C, T> = SecureSession<rustls::StreamOwned<C, T>>;

/// An established secure stream plus the state needed to peek into it.
#[derive(Debug)]
pub struct SecureSession<S> {
    stream: S,
    lookahead: Vec<u8>,
    closed: bool,
}

impl<S: Read + Write> SecureSession<S> {
    /// Wrap an established secure stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            lookahead: Vec::new(),
            closed: false,
        }
    }

    /// The wrapped stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// The wrapped stream, mutably. Reading from it directly bypasses the
    /// lookahead.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Number of peeked bytes not yet consumed.
    pub fn buffered(&self) -> usize {
        self.lookahead.len()
    }

    /// Unwrap the stream, returning any peeked but unconsumed plaintext.
    pub fn into_parts(self) -> (S, Vec<u8>) {
        (self.stream, self.lookahead)
    }
}

impl<S: Read + Write> Transport for SecureSession<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.lookahead.is_empty() {
            let n = self.lookahead.len().min(buf.len());
            buf[..n].copy_from_slice(&self.lookahead[..n]);
            self.lookahead.drain(..n);
            return Ok(n);
        }

        let n = self.stream.read(buf)?;
        if n == 0 && !buf.is_empty() {
            self.closed = true;
        }
        Ok(n)
    }

    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let held = self.lookahead.len();
        if held < buf.len() && !self.closed {
            self.lookahead.resize(buf.len(), 0);
            match self.stream.read(&mut self.lookahead[held..]) {
                Ok(n) => {
                    self.lookahead.truncate(held + n);
                    if n == 0 {
                        self.closed = true;
                    }
                }
                Err(e) => {
                    self.lookahead.truncate(held);
                    return Err(e);
                }
            }
        }

        let n = self.lookahead.len().min(buf.len());
        buf[..n].copy_from_slice(&self.lookahead[..n]);
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }

    fn peer_closed(&self) -> bool {
        self.closed
    }

    fn is_fatal(&self, err: &io::Error) -> bool {
        SecurePolicy.is_fatal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Op};
    use crate::io::{recvn, recvn_peek, writen};
    use crate::testing::MockStream;
    use std::io::ErrorKind;
    use std::sync::Arc;

    const DATA: &[u8] = b"sphinx of black quartz, judge my vow";

    #[test]
    fn peek_does_not_consume() {
        let mut session = SecureSession::new(MockStream::new(b"abcdef", 4));

        let mut peeked = [0u8; 3];
        assert_eq!(session.peek(&mut peeked).unwrap(), 3);
        assert_eq!(&peeked, b"abc");
        assert_eq!(session.buffered(), 3);

        let mut buf = [0u8; 6];
        assert_eq!(session.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"abc");
        assert_eq!(session.buffered(), 0);

        assert_eq!(session.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"def");
    }

    #[test]
    fn peek_accumulates_across_records() {
        let mut session = SecureSession::new(MockStream::new(b"0123456789", 3));
        let mut peeked = [0u8; 8];

        assert_eq!(session.peek(&mut peeked).unwrap(), 3);
        assert_eq!(session.peek(&mut peeked).unwrap(), 6);
        assert_eq!(session.peek(&mut peeked).unwrap(), 8);
        assert_eq!(&peeked, b"01234567");
        assert!(!session.peer_closed());
    }

    #[test]
    fn close_is_remembered() {
        let mut session = SecureSession::new(MockStream::new(b"xy", 8));
        let mut peeked = [0u8; 4];

        assert_eq!(session.peek(&mut peeked).unwrap(), 2);
        assert!(!session.peer_closed());
        assert_eq!(session.peek(&mut peeked).unwrap(), 2);
        assert!(session.peer_closed());

        let (_, rest) = session.into_parts();
        assert_eq!(rest, b"xy");
    }

    #[test]
    fn failed_peek_keeps_lookahead() {
        let mut stream = MockStream::new(b"abcd", 2);
        stream.fail_read_at(1, ErrorKind::WouldBlock);
        let mut session = SecureSession::new(stream);
        let mut peeked = [0u8; 4];

        assert_eq!(session.peek(&mut peeked).unwrap(), 2);
        let err = session.peek(&mut peeked).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WouldBlock);
        assert_eq!(session.buffered(), 2);
        assert_eq!(session.peek(&mut peeked).unwrap(), 4);
    }

    #[test]
    fn writes_pass_through() {
        let mut session = SecureSession::new(MockStream::new(b"", 2));
        assert_eq!(session.write(b"hello").unwrap(), 2);
        assert_eq!(session.get_ref().written(), b"he");
    }

    #[test]
    fn recvn_sees_what_recvn_peek_saw() {
        let mut session = SecureSession::new(MockStream::new(DATA, 3));

        let mut peeked = [0u8; 8];
        assert_eq!(recvn_peek(&mut session, &mut peeked).unwrap(), 8);
        assert_eq!(session.buffered(), 8);

        let mut received = [0u8; 8];
        assert_eq!(recvn(&mut session, &mut received).unwrap(), 8);
        assert_eq!(peeked, received);
        assert_eq!(session.buffered(), 0);

        let mut rest = vec![0u8; DATA.len() - 8];
        assert_eq!(recvn(&mut session, &mut rest).unwrap(), rest.len());
        assert_eq!(rest, &DATA[8..]);
    }

    #[test]
    fn writen_through_single_byte_records() {
        let mut session = SecureSession::new(MockStream::new(b"", 1));
        let written = writen(&mut session, DATA).unwrap();
        assert_eq!(written.bytes, DATA.len());
        assert_eq!(written.attempts as usize, DATA.len());
        assert_eq!(session.get_ref().written(), DATA);
    }

    #[test]
    fn recvn_aborts_on_tls_error_disguised_as_would_block() {
        let mut stream = MockStream::new(DATA, 4);
        stream.fail_read_with(1, io::Error::new(ErrorKind::WouldBlock, rustls::Error::DecryptError));
        let mut session = SecureSession::new(stream);

        let mut buf = [0u8; 12];
        match recvn(&mut session, &mut buf).unwrap_err() {
            Error::Fatal {
                op,
                transferred,
                attempts,
                source,
            } => {
                assert_eq!(op, Op::Recv);
                assert_eq!(transferred, 4);
                assert_eq!(attempts, 2);
                assert_eq!(source.kind(), ErrorKind::WouldBlock);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn writen_reports_failed_session_flush() {
        let mut stream = MockStream::new(b"", 64);
        stream.fail_flush(ErrorKind::ConnectionReset);
        let mut session = SecureSession::new(stream);

        match writen(&mut session, DATA).unwrap_err() {
            Error::Fatal {
                op,
                transferred,
                source,
                ..
            } => {
                assert_eq!(op, Op::Write);
                assert_eq!(transferred, DATA.len());
                assert_eq!(source.kind(), ErrorKind::ConnectionReset);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn tls_session_fails_when_handshake_gets_no_reply() {
        let config = rustls::ClientConfig::builder()
            .with_root_certificates(rustls::RootCertStore::empty())
            .with_no_client_auth();
        let name = rustls::pki_types::ServerName::try_from("localhost").unwrap();
        let conn = rustls::ClientConnection::new(Arc::new(config), name).unwrap();
        let mut session: TlsSession<_, _> =
            SecureSession::new(rustls::StreamOwned::new(conn, MockStream::new(b"", 4096)));

        match writen(&mut session, DATA).unwrap_err() {
            Error::Fatal {
                op,
                transferred,
                attempts,
                source,
            } => {
                assert_eq!(op, Op::Write);
                assert_eq!(transferred, 0);
                assert_eq!(attempts, 1);
                assert_eq!(source.kind(), ErrorKind::UnexpectedEof);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // The client hello still went out.
        assert!(!session.get_ref().sock.written().is_empty());
    }
}
