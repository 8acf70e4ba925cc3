//! JSON handler for structured logging
//!
//! Writes each record as a single-line JSON object (JSONL form), compatible
//! with log aggregation tools.

use crate::core::{timestamp, Handler, LevelCell, Record, Result, Severity};
use parking_lot::Mutex;
use serde_json::{json, Map, Value as JsonValue};
use std::io::Write;

/// Renders each record as `{"time":...,"level":...,"source":...,"msg":...}`
/// plus the record's attributes at top level, with groups as nested
/// objects. A later duplicate key replaces an earlier one in the rendered
/// object.
pub struct JsonHandler {
    name: String,
    level: LevelCell,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonHandler {
    pub fn new(name: impl Into<String>, writer: Box<dyn Write + Send>, level: LevelCell) -> Self {
        Self {
            name: name.into(),
            level,
            writer: Mutex::new(writer),
        }
    }

    pub fn level(&self) -> &LevelCell {
        &self.level
    }

    fn to_json(&self, record: &Record) -> JsonValue {
        let mut object = Map::new();
        object.insert(
            "time".to_string(),
            JsonValue::String(timestamp::format_wire(&record.timestamp)),
        );
        object.insert(
            "level".to_string(),
            JsonValue::String(record.severity.to_str().to_string()),
        );
        if let Some(ref source) = record.source {
            object.insert(
                "source".to_string(),
                json!({
                    "file": source.file,
                    "line": source.line,
                    "function": source.function,
                }),
            );
        }
        object.insert("msg".to_string(), JsonValue::String(record.message.clone()));

        for attr in &record.attrs {
            object.insert(attr.key.clone(), attr.value.to_json_value());
        }

        JsonValue::Object(object)
    }
}

impl Handler for JsonHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level.get()
    }

    fn handle(&self, record: &Record) -> Result<()> {
        let mut line = serde_json::to_string(&self.to_json(record))?;
        line.push('\n');
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attr, SourceLocation};
    use crate::handlers::testutil::SharedBuf;

    fn handler_with_buf(floor: Severity) -> (JsonHandler, SharedBuf) {
        let buf = SharedBuf::new();
        let handler = JsonHandler::new("json", Box::new(buf.clone()), LevelCell::new(floor));
        (handler, buf)
    }

    fn parse_line(buf: &SharedBuf) -> JsonValue {
        let contents = buf.contents();
        let line = contents.lines().next().expect("one line");
        serde_json::from_str(line).expect("valid JSON")
    }

    #[test]
    fn test_core_keys() {
        let (handler, buf) = handler_with_buf(Severity::Debug);
        let record = Record::new(Severity::Warn, "disk low")
            .with_attrs(vec![Attr::new("free_mb", 12)]);
        handler.handle(&record).unwrap();

        let parsed = parse_line(&buf);
        assert_eq!(parsed["level"], "WARN");
        assert_eq!(parsed["msg"], "disk low");
        assert_eq!(parsed["free_mb"], 12);
        assert!(timestamp::parse_wire(parsed["time"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_group_nesting() {
        let (handler, buf) = handler_with_buf(Severity::Debug);
        let record = Record::new(Severity::Info, "request").with_attrs(vec![Attr::group(
            "g",
            vec![Attr::new("k", "v")],
        )]);
        handler.handle(&record).unwrap();

        let parsed = parse_line(&buf);
        assert_eq!(parsed["g"]["k"], "v");
    }

    #[test]
    fn test_source_object() {
        let (handler, buf) = handler_with_buf(Severity::Debug);
        let record = Record::new(Severity::Error, "boom")
            .with_source(Some(SourceLocation::new("src/a.rs", 3, "a::run")));
        handler.handle(&record).unwrap();

        let parsed = parse_line(&buf);
        assert_eq!(parsed["source"]["file"], "src/a.rs");
        assert_eq!(parsed["source"]["line"], 3);
        assert_eq!(parsed["source"]["function"], "a::run");
    }

    #[test]
    fn test_no_source_key_when_absent() {
        let (handler, buf) = handler_with_buf(Severity::Debug);
        handler.handle(&Record::new(Severity::Info, "plain")).unwrap();

        let parsed = parse_line(&buf);
        assert!(parsed.get("source").is_none());
    }

    #[test]
    fn test_last_duplicate_key_wins() {
        let (handler, buf) = handler_with_buf(Severity::Debug);
        let record = Record::new(Severity::Info, "dup")
            .with_attrs(vec![Attr::new("k", 1), Attr::new("k", 2)]);
        handler.handle(&record).unwrap();

        let parsed = parse_line(&buf);
        assert_eq!(parsed["k"], 2);
    }

    #[test]
    fn test_one_object_per_line() {
        let (handler, buf) = handler_with_buf(Severity::Debug);
        for i in 0..3 {
            handler
                .handle(&Record::new(Severity::Info, format!("msg {}", i)))
                .unwrap();
        }

        let contents = buf.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let parsed: JsonValue = serde_json::from_str(line).unwrap();
            assert!(parsed["msg"].is_string());
        }
    }
}
