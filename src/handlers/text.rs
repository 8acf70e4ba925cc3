//! Text handler: human-readable lines

use crate::core::{timestamp, Attr, Handler, LevelCell, Record, Result, Severity};
use colored::Colorize;
use parking_lot::Mutex;
use std::io::Write;

/// Renders each record as one line:
/// `[<time>] [<LEVEL>] [<file>:<line>:<function>] <msg> k=v g.k=v`
///
/// Nested groups flatten to dotted keys. The source segment appears only
/// when the record carries a location.
pub struct TextHandler {
    name: String,
    level: LevelCell,
    use_colors: bool,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TextHandler {
    pub fn new(name: impl Into<String>, writer: Box<dyn Write + Send>, level: LevelCell) -> Self {
        Self {
            name: name.into(),
            level,
            use_colors: false,
            writer: Mutex::new(writer),
        }
    }

    /// Colorize the level tag. Only sensible for terminal sinks.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn level(&self) -> &LevelCell {
        &self.level
    }

    fn format_line(&self, record: &Record) -> String {
        let level_str = if self.use_colors {
            format!("{:5}", record.severity.to_str())
                .color(record.severity.color_code())
                .to_string()
        } else {
            format!("{:5}", record.severity.to_str())
        };

        let mut line = format!(
            "[{}] [{}]",
            timestamp::format_wire(&record.timestamp),
            level_str
        );

        if let Some(ref source) = record.source {
            line.push_str(&format!(" [{}]", source));
        }

        line.push(' ');
        line.push_str(&record.message);

        for (key, value) in Attr::flatten(&record.attrs) {
            line.push_str(&format!(" {}={}", key, value));
        }

        line
    }
}

impl Handler for TextHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.level.get()
    }

    fn handle(&self, record: &Record) -> Result<()> {
        let mut line = self.format_line(record);
        line.push('\n');
        // one write_all per record so a rotation never splits a line
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}
