//! Fan-out dispatch across a fixed handler set

use super::{handler::Handler, record::Record, severity::Severity};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Combines the constructed handlers into one logical dispatch target.
/// Composition is fixed for the lifetime of one built logger; handlers are
/// visited in configuration order.
#[derive(Clone, Default)]
pub struct Fanout {
    handlers: Arc<[Arc<dyn Handler>]>,
}

impl Fanout {
    pub fn new(handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self {
            handlers: handlers.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when at least one member would emit at `severity`.
    pub fn enabled(&self, severity: Severity) -> bool {
        self.handlers.iter().any(|h| h.enabled(severity))
    }

    /// Forward one record to every member. Each member applies its own
    /// floor; a member failure is reported on stderr and never prevents
    /// delivery to the rest.
    pub fn dispatch(&self, record: &Record) {
        for handler in self.handlers.iter() {
            if !handler.enabled(record.severity) {
                continue;
            }
            if let Err(e) = handler.handle(record) {
                eprintln!("[fanlog] handler '{}' failed: {}", handler.name(), e);
            }
        }
    }

    /// Flush every member within one shared deadline. Returns false if any
    /// member failed or the deadline ran out before the walk finished.
    pub fn flush_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut ok = true;
        for handler in self.handlers.iter() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            if !handler.flush_timeout(remaining) {
                eprintln!("[fanlog] handler '{}' flush failed", handler.name());
                ok = false;
            }
        }
        ok
    }
}
