//! Timestamp formatting
//!
//! Every handler emits the same wire format: UTC, ISO 8601, microsecond
//! precision (`2025-01-08T10:30:45.123456Z`).

use chrono::{DateTime, Utc};

/// strftime form of the wire format.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Render a timestamp in the wire format.
#[must_use]
pub fn format_wire(datetime: &DateTime<Utc>) -> String {
    datetime.format(WIRE_FORMAT).to_string()
}

/// Parse a wire-format timestamp back into UTC. Used by consumers that
/// verify emitted output.
pub fn parse_wire(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}
