//! Logger facade

use super::{
    attr::{Attr, Scope},
    fanout::Fanout,
    level_cell::LevelCell,
    record::{Record, SourceLocation},
    severity::Severity,
};
use crate::config::Config;
use crate::core::error::Result;
use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

/// Construction-time options. Each option is independently optional and
/// order-independent.
///
/// # Example
/// ```
/// use fanlog::Options;
///
/// let opts = Options::new()
///     .version("1.4.2")
///     .git_rev("deadbeef")
///     .source(true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub(crate) version: String,
    pub(crate) git_rev: String,
    pub(crate) caller_skip: usize,
    pub(crate) add_source: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Application version string carried by the facade.
    #[must_use = "builder methods return a new value"]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Git revision; doubles as the remote sink's release id when the
    /// configuration does not carry one.
    #[must_use = "builder methods return a new value"]
    pub fn git_rev(mut self, rev: impl Into<String>) -> Self {
        self.git_rev = rev.into();
        self
    }

    /// Wrapper-frame depth for facades layered above this one. Values of
    /// zero are ignored. Attribution inside this crate is declarative
    /// (`#[track_caller]` on every entry point and static capture in the
    /// macros); the stored depth is surfaced via [`Logger::caller_skip`].
    #[must_use = "builder methods return a new value"]
    pub fn caller_skip(mut self, skip: usize) -> Self {
        if skip > 0 {
            self.caller_skip = skip;
        }
        self
    }

    /// Enable call-site capture. Off by default; when off, records carry no
    /// source location and no capture work happens.
    #[must_use = "builder methods return a new value"]
    pub fn source(mut self, enabled: bool) -> Self {
        self.add_source = enabled;
        self
    }
}

/// The public logger value: a fan-out dispatch target, the name-to-cell
/// index for runtime level changes, and an attribute scope.
///
/// Loggers are immutable. [`Logger::with`] and [`Logger::with_group`]
/// return derived values sharing the same handlers and cells; the receiver
/// is never changed. A logger starts life disabled (every call is silently
/// dropped) and becomes live only through a successful build.
#[derive(Clone, Default)]
pub struct Logger {
    fanout: Fanout,
    levels: Arc<HashMap<String, LevelCell>>,
    scope: Scope,
    version: String,
    git_rev: String,
    caller_skip: usize,
    add_source: bool,
}

impl Logger {
    /// The safe no-op logger used before any configuration is applied.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build a logger from a configuration document. Individual handler
    /// failures are warned and skipped; this fails only when the document
    /// yields no handler at all.
    pub fn from_config(config: &Config, options: Options) -> Result<Self> {
        let built = crate::handlers::build(config, &options)?;
        Ok(Self::from_parts(
            Fanout::new(built.handlers),
            built.levels,
            options,
        ))
    }

    /// True once the logger has a live dispatch target.
    pub fn configured(&self) -> bool {
        !self.fanout.is_empty()
    }

    /// True when at least one handler would emit at `severity`. This is the
    /// cheap pre-check: suppressed calls stop here, before any record
    /// construction, time capture, or source capture.
    pub fn enabled(&self, severity: Severity) -> bool {
        self.fanout.enabled(severity)
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(Severity::Debug, message, attrs);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(Severity::Info, message, attrs);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(Severity::Warn, message, attrs);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>, attrs: Vec<Attr>) {
        self.log(Severity::Error, message, attrs);
    }

    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl Into<String>, attrs: Vec<Attr>) {
        if !self.enabled(severity) {
            return;
        }
        let source = if self.add_source {
            Some(SourceLocation::from_caller(Location::caller()))
        } else {
            None
        };
        self.emit(severity, message, attrs, source);
    }

    /// Build and dispatch one record. Callers are expected to have passed
    /// the enablement check; the capture macros call this directly with a
    /// statically captured location.
    pub fn emit(
        &self,
        severity: Severity,
        message: impl Into<String>,
        attrs: Vec<Attr>,
        source: Option<SourceLocation>,
    ) {
        let source = if self.add_source { source } else { None };
        let record = Record::new(severity, message)
            .with_attrs(self.scope.apply(attrs))
            .with_source(source);
        self.fanout.dispatch(&record);
    }

    /// Derive a logger with `attrs` pre-bound to every future record.
    /// Attributes accumulate left to right; duplicate keys do not remove
    /// earlier bindings.
    #[must_use]
    pub fn with(&self, attrs: Vec<Attr>) -> Logger {
        let mut derived = self.clone();
        derived.scope = self.scope.with_attrs(attrs);
        derived
    }

    /// Derive a logger whose subsequently bound attributes are namespaced
    /// under `name`. Nested groups nest further.
    #[must_use]
    pub fn with_group(&self, name: &str) -> Logger {
        let mut derived = self.clone();
        derived.scope = self.scope.with_group(name);
        derived
    }

    /// Retarget the named handler's severity floor. Returns false for an
    /// unknown handler name or an unrecognized level string, leaving state
    /// unchanged. The remote handler owns no cell and is never addressable
    /// here.
    pub fn set_level(&self, handler: &str, level: &str) -> bool {
        let Some(cell) = self.levels.get(handler) else {
            return false;
        };
        match level.parse::<Severity>() {
            Ok(severity) => {
                cell.set(severity);
                true
            }
            Err(_) => false,
        }
    }

    /// Flush every handler within `timeout`. Intended before process exit
    /// so the remote sink gets its bounded drain.
    pub fn flush(&self, timeout: Duration) -> bool {
        self.fanout.flush_timeout(timeout)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn git_rev(&self) -> &str {
        &self.git_rev
    }

    pub fn caller_skip(&self) -> usize {
        self.caller_skip
    }

    pub fn source_capture(&self) -> bool {
        self.add_source
    }

    pub fn handler_count(&self) -> usize {
        self.fanout.len()
    }

    pub(crate) fn from_parts(
        fanout: Fanout,
        levels: HashMap<String, LevelCell>,
        options: Options,
    ) -> Self {
        Self {
            fanout,
            levels: Arc::new(levels),
            scope: Scope::new(),
            version: options.version,
            git_rev: options.git_rev,
            caller_skip: options.caller_skip,
            add_source: options.add_source,
        }
    }
}
