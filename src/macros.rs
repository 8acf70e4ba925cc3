//! Logging macros with deferred evaluation and static call-site capture.
//!
//! The macros target the process-wide logger and take the flat alternating
//! key/value surface: a message followed by `key, value, key, value, ...`.
//! Attribute expressions are evaluated only after the severity passes the
//! enablement check, so suppressed calls cost one atomic load and a
//! comparison.
//!
//! # Examples
//!
//! ```
//! use fanlog::info;
//!
//! // Basic logging
//! info!("server started");
//!
//! // With attributes
//! let port = 8080;
//! info!("listening", "port", port, "proto", "http");
//! ```

/// Log a message at an explicit severity.
///
/// # Examples
///
/// ```
/// use fanlog::{log, Severity};
/// log!(Severity::Info, "simple message");
/// log!(Severity::Error, "request failed", "status", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($severity:expr, $message:expr $(, $arg:expr)* $(,)?) => {{
        let __severity = $severity;
        let __logger = $crate::get();
        if __logger.enabled(__severity) {
            __logger.emit(
                __severity,
                $message,
                $crate::Attr::from_pairs(::std::vec![$($crate::Value::from($arg)),*]),
                ::core::option::Option::Some($crate::SourceLocation::new(
                    file!(),
                    line!(),
                    module_path!(),
                )),
            );
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// use fanlog::debug;
/// debug!("cache miss", "key", "user:42");
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// use fanlog::info;
/// info!("application started");
/// info!("processed", "items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// use fanlog::warn;
/// warn!("low disk space", "free_mb", 512);
/// ```
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// use fanlog::error;
/// error!("database unreachable", "attempts", 3);
/// ```
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::log!($crate::Severity::Error, $($arg)+)
    };
}

/// Build a `Vec<Attr>` from a flat alternating key/value list, with the
/// same trailing-key tolerance as the logging surface.
///
/// # Examples
///
/// ```
/// use fanlog::attrs;
///
/// let attrs = attrs!["user_id", 42, "action", "login"];
/// assert_eq!(attrs.len(), 2);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        ::std::vec::Vec::<$crate::Attr>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::Attr::from_pairs(::std::vec![$($crate::Value::from($arg)),+])
    };
}

#[cfg(test)]
mod tests {
    use crate::{Severity, Value, MISSING_VALUE};

    #[test]
    fn test_attrs_macro_pairs() {
        let attrs = attrs!["k1", 1, "k2", "v2"];
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].key, "k1");
        assert_eq!(attrs[1].value, Value::String("v2".to_string()));
    }

    #[test]
    fn test_attrs_macro_empty() {
        let attrs = attrs![];
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_attrs_macro_trailing_key() {
        let attrs = attrs!["k", 1, "orphan"];
        assert_eq!(attrs[1].key, "orphan");
        assert_eq!(attrs[1].value, Value::String(MISSING_VALUE.to_string()));
    }

    #[test]
    fn test_log_macros_never_panic() {
        log!(Severity::Info, "plain");
        debug!("debug", "k", 1);
        info!("info");
        warn!("warn", "k", "v");
        error!("error", "k", true, "orphan");
    }
}
