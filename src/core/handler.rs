//! Handler trait for log output destinations

use super::{error::Result, record::Record, severity::Severity};
use std::time::Duration;

/// One configured output path. Handlers are shared immutably across derived
/// loggers and threads; sinks that need mutation hold it internally.
pub trait Handler: Send + Sync {
    fn name(&self) -> &str;

    /// Cheap enablement check against this handler's current floor. Called
    /// on every log call before any record is built.
    fn enabled(&self, severity: Severity) -> bool;

    fn handle(&self, record: &Record) -> Result<()>;

    fn flush(&self) -> Result<()>;

    /// Bounded flush. Destinations with no meaningful deadline treat this
    /// as a plain flush; the remote sink honors the timeout.
    fn flush_timeout(&self, _timeout: Duration) -> bool {
        self.flush().is_ok()
    }
}
