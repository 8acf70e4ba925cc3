//! Process-wide logger singleton
//!
//! The current logger is a single atomically swappable reference, seeded
//! with the disabled no-op logger. Package-level convenience calls load
//! whatever the reference holds at call time: a call racing a [`set`]
//! observes either the old or the new logger, never a partial one.

use crate::config::Config;
use crate::core::error::Result;
use crate::core::{Attr, Logger, Options, Severity};
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;

static CURRENT: Lazy<ArcSwap<Logger>> =
    Lazy::new(|| ArcSwap::from_pointee(Logger::disabled()));

/// Build a logger from the configuration and install it as the process-wide
/// singleton. On failure the previous logger (or the no-op default) stays
/// active and the reason is returned.
pub fn set(config: &Config, options: Options) -> Result<()> {
    let logger = Logger::from_config(config, options)?;
    CURRENT.store(Arc::new(logger));
    Ok(())
}

/// [`set`] from a YAML configuration document.
pub fn set_from_yaml(doc: &str, options: Options) -> Result<()> {
    let config = Config::from_yaml(doc)?;
    set(&config, options)
}

/// The current process-wide logger.
pub fn get() -> Arc<Logger> {
    CURRENT.load_full()
}

#[track_caller]
pub fn debug(message: impl Into<String>, attrs: Vec<Attr>) {
    CURRENT.load().debug(message, attrs);
}

#[track_caller]
pub fn info(message: impl Into<String>, attrs: Vec<Attr>) {
    CURRENT.load().info(message, attrs);
}

#[track_caller]
pub fn warn(message: impl Into<String>, attrs: Vec<Attr>) {
    CURRENT.load().warn(message, attrs);
}

#[track_caller]
pub fn error(message: impl Into<String>, attrs: Vec<Attr>) {
    CURRENT.load().error(message, attrs);
}

#[track_caller]
pub fn log(severity: Severity, message: impl Into<String>, attrs: Vec<Attr>) {
    CURRENT.load().log(severity, message, attrs);
}

/// Derive a logger from the current singleton with pre-bound attributes.
pub fn with(attrs: Vec<Attr>) -> Logger {
    CURRENT.load().with(attrs)
}

/// Derive a logger from the current singleton with a group opened.
pub fn with_group(name: &str) -> Logger {
    CURRENT.load().with_group(name)
}

/// Retarget a handler's severity floor on the current singleton.
///
/// Level cells belong to one built logger: after a later successful [`set`],
/// calls against a logger reference obtained earlier adjust the stale cells,
/// not the new ones. Always go through this function (or re-fetch [`get`])
/// rather than holding on to an old logger.
pub fn set_level(handler: &str, level: &str) -> bool {
    CURRENT.load().set_level(handler, level)
}

/// Flush every handler of the current logger within `timeout`. Call before
/// process exit so the remote sink gets its bounded drain.
pub fn flush(timeout: Duration) -> bool {
    CURRENT.load().flush(timeout)
}
