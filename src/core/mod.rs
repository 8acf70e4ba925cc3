//! Core facade types and traits

pub mod attr;
pub mod error;
pub mod fanout;
pub mod handler;
pub mod level_cell;
pub mod logger;
pub mod record;
pub mod severity;
pub mod timestamp;

pub use attr::{Attr, Scope, Value, MISSING_VALUE};
pub use error::{Error, Result};
pub use fanout::Fanout;
pub use handler::Handler;
pub use level_cell::LevelCell;
pub use logger::{Logger, Options};
pub use record::{Record, SourceLocation};
pub use severity::Severity;
