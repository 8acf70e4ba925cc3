//! Remote error-tracking handler

use crate::core::{timestamp, Handler, Record, Result, Severity};
use crate::transport::{Event, Transport};
use std::collections::BTreeMap;
use std::time::Duration;

/// Key stripped from outgoing events. The sink captures its own stack
/// trace; a caller-supplied one would conflict with it.
const STACKTRACE_KEY: &str = "stacktrace";

/// Forwards records at or above a fixed floor to the error-tracking
/// transport. The floor is set at construction and owns no level cell, so
/// runtime level changes never address this handler.
pub struct RemoteHandler {
    name: String,
    floor: Severity,
    release: String,
    environment: String,
    transport: Box<dyn Transport>,
}

impl RemoteHandler {
    pub fn new(
        name: impl Into<String>,
        transport: Box<dyn Transport>,
        floor: Severity,
        release: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            floor,
            release: release.into(),
            environment: environment.into(),
            transport,
        }
    }

    fn finalize(&self, record: &Record) -> Event {
        let attrs: BTreeMap<String, serde_json::Value> = record
            .attrs
            .iter()
            .filter(|attr| attr.key != STACKTRACE_KEY)
            .map(|attr| (attr.key.clone(), attr.value.to_json_value()))
            .collect();

        Event {
            timestamp: timestamp::format_wire(&record.timestamp),
            level: record.severity.to_str().to_string(),
            message: record.message.clone(),
            release: self.release.clone(),
            environment: self.environment.clone(),
            attrs,
        }
    }
}

impl Handler for RemoteHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.floor
    }

    fn handle(&self, record: &Record) -> Result<()> {
        self.transport.capture(&self.finalize(record))
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn flush_timeout(&self, timeout: Duration) -> bool {
        self.transport.flush(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Attr;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct RecordingTransport {
        events: Arc<Mutex<Vec<Event>>>,
        flushes: Arc<Mutex<Vec<Duration>>>,
    }

    impl Transport for RecordingTransport {
        fn capture(&self, event: &Event) -> Result<()> {
            self.events.lock().push(event.clone());
            Ok(())
        }

        fn flush(&self, timeout: Duration) -> bool {
            self.flushes.lock().push(timeout);
            true
        }
    }

    fn remote_with_transport(floor: Severity) -> (RemoteHandler, RecordingTransport) {
        let transport = RecordingTransport::default();
        let handler = RemoteHandler::new(
            "sentry",
            Box::new(transport.clone()),
            floor,
            "abc123",
            "staging",
        );
        (handler, transport)
    }

    #[test]
    fn test_fixed_floor() {
        let (handler, _) = remote_with_transport(Severity::Error);
        assert!(!handler.enabled(Severity::Warn));
        assert!(handler.enabled(Severity::Error));
    }

    #[test]
    fn test_event_carries_release_and_environment() {
        let (handler, transport) = remote_with_transport(Severity::Info);
        handler
            .handle(&Record::new(Severity::Error, "payment failed"))
            .unwrap();

        let events = transport.events.lock();
        assert_eq!(events[0].release, "abc123");
        assert_eq!(events[0].environment, "staging");
        assert_eq!(events[0].level, "ERROR");
    }

    #[test]
    fn test_stacktrace_attr_stripped() {
        let (handler, transport) = remote_with_transport(Severity::Info);
        let record = Record::new(Severity::Error, "boom").with_attrs(vec![
            Attr::new("stacktrace", "frame0\\nframe1"),
            Attr::new("order_id", 77),
        ]);
        handler.handle(&record).unwrap();

        let events = transport.events.lock();
        assert!(!events[0].attrs.contains_key("stacktrace"));
        assert_eq!(events[0].attrs["order_id"], 77);
    }

    #[test]
    fn test_flush_timeout_reaches_transport() {
        let (handler, transport) = remote_with_transport(Severity::Info);
        assert!(handler.flush_timeout(Duration::from_millis(250)));
        assert_eq!(
            transport.flushes.lock().as_slice(),
            &[Duration::from_millis(250)]
        );
    }
}
