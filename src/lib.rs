//! # Fanlog
//!
//! A structured-logging facade that fans every record out to several
//! independently configured destinations: human-readable text, JSON lines,
//! and a remote error-tracking sink.
//!
//! ## Features
//!
//! - **Fan-out dispatch**: one log call, every configured handler; a
//!   failing sink never blocks the others
//! - **Runtime levels**: each text/json handler owns a severity floor that
//!   can be retargeted by name while the application runs
//! - **Scoped loggers**: `with`/`with_group` derive new logger values with
//!   pre-bound attributes and group nesting, without mutating the source
//! - **Rotating files**: size-triggered rotation with gzip-compressed,
//!   count- and age-pruned backups
//!
//! ## Quick start
//!
//! ```no_run
//! use fanlog::{info, Options};
//!
//! let doc = r#"
//! handlers: [console]
//! console:
//!   handler: text
//!   output: stdout
//!   level: debug
//! "#;
//! fanlog::set_from_yaml(doc, Options::new().version("1.0.0")).unwrap();
//! info!("server started", "port", 8080);
//! ```

pub mod config;
pub mod core;
pub mod global;
pub mod handlers;
pub mod macros;
pub mod transport;

pub mod prelude {
    pub use crate::config::{Config, HandlerConfig};
    pub use crate::core::{
        Attr, Error, Fanout, Handler, LevelCell, Logger, Options, Record, Result, Scope,
        Severity, SourceLocation, Value, MISSING_VALUE,
    };
    pub use crate::handlers::{
        JsonHandler, RemoteHandler, RollingLimits, RollingWriter, TextHandler,
    };
    pub use crate::transport::{Event, TcpTransport, Transport};
}

pub use config::{Config, HandlerConfig};
pub use core::{
    Attr, Error, Fanout, Handler, LevelCell, Logger, Options, Record, Result, Scope, Severity,
    SourceLocation, Value, MISSING_VALUE,
};
pub use global::{
    debug, error, flush, get, info, log, set, set_from_yaml, set_level, warn, with, with_group,
};
pub use handlers::{JsonHandler, RemoteHandler, RollingLimits, RollingWriter, TextHandler};
pub use transport::{Event, TcpTransport, Transport};
