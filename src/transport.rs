//! Remote error-tracking transport
//!
//! The remote handler hands finalized events to a [`Transport`]. The
//! shipped implementation sends one JSON object per line over TCP with
//! bounded write timeouts and a single reconnect-and-resend attempt on a
//! broken connection. Delivery is best-effort; the facade never surfaces
//! transport failures to the application.

use crate::core::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// One finalized, fully-rendered event for the remote sink.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Event {
    pub timestamp: String,
    pub level: String,
    pub message: String,
    pub release: String,
    pub environment: String,
    pub attrs: BTreeMap<String, serde_json::Value>,
}

/// Narrow collaborator interface for the remote sink.
pub trait Transport: Send + Sync {
    /// Deliver one event. Failures are reported but callers treat delivery
    /// as fire-and-continue.
    fn capture(&self, event: &Event) -> Result<()>;

    /// Block until buffered events are on the wire or the timeout elapses.
    /// Returns true on completion within the deadline.
    fn flush(&self, timeout: Duration) -> bool;
}

/// TCP JSON-line transport. The DSN is a `host:port` socket address.
#[derive(Debug)]
pub struct TcpTransport {
    address: String,
    debug: bool,
    stream: parking_lot::Mutex<Option<TcpStream>>,
}

impl TcpTransport {
    /// Connect to the sink. Construction fails fast on an empty DSN or an
    /// unreachable endpoint so the build pipeline can drop the handler.
    pub fn connect(dsn: &str, debug: bool) -> Result<Self> {
        if dsn.is_empty() {
            return Err(Error::transport("empty dsn"));
        }
        let stream = Self::open(dsn)?;
        Ok(Self {
            address: dsn.to_string(),
            debug,
            stream: parking_lot::Mutex::new(Some(stream)),
        })
    }

    fn open(address: &str) -> Result<TcpStream> {
        let stream = TcpStream::connect(address)
            .map_err(|e| Error::transport(format!("connect '{}': {}", address, e)))?;
        stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    fn send_line(&self, line: &[u8]) -> Result<()> {
        let mut guard = self.stream.lock();

        let result = match guard.as_mut() {
            Some(stream) => stream.write_all(line),
            None => {
                return Err(Error::transport("stream not connected"));
            }
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                // Connection lost; reconnect once and resend.
                *guard = None;
                if self.debug {
                    eprintln!("[fanlog] transport send failed, reconnecting: {}", e);
                }
                let mut stream = Self::open(&self.address)?;
                stream
                    .write_all(line)
                    .map_err(|resend| Error::transport(format!("resend failed: {}", resend)))?;
                *guard = Some(stream);
                Ok(())
            }
        }
    }
}

impl Transport for TcpTransport {
    fn capture(&self, event: &Event) -> Result<()> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        let result = self.send_line(&line);
        if self.debug {
            match &result {
                Ok(()) => eprintln!("[fanlog] transport delivered event: {}", event.message),
                Err(e) => eprintln!("[fanlog] transport dropped event: {}", e),
            }
        }
        result
    }

    fn flush(&self, timeout: Duration) -> bool {
        let mut guard = self.stream.lock();
        let Some(stream) = guard.as_mut() else {
            return true;
        };
        let previous = stream.write_timeout().ok().flatten();
        let bounded = stream.set_write_timeout(Some(timeout)).is_ok();
        let flushed = stream.flush().is_ok();
        if bounded {
            let _ = stream.set_write_timeout(previous.or(Some(WRITE_TIMEOUT)));
        }
        flushed
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        let _ = self.flush(WRITE_TIMEOUT);
    }
}
