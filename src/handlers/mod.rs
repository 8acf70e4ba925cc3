//! Handler implementations and the configuration-driven build pipeline

pub mod json;
pub mod remote;
pub mod rolling_file;
pub mod text;

pub use json::JsonHandler;
pub use remote::RemoteHandler;
pub use rolling_file::{RollingLimits, RollingWriter};
pub use text::TextHandler;

use crate::config::{Config, HandlerConfig};
use crate::core::error::{Error, Result};
use crate::core::{Handler, LevelCell, Options, Severity};
use crate::transport::TcpTransport;
use std::collections::HashMap;
use std::sync::Arc;

pub const KIND_TEXT: &str = "text";
pub const KIND_JSON: &str = "json";
pub const KIND_SENTRY: &str = "sentry";

pub const OUTPUT_STDOUT: &str = "stdout";
pub const OUTPUT_FILE: &str = "file";

/// Output of the build pipeline: the fan-out members in configuration
/// order plus the name-to-cell index for the level-controllable kinds.
pub(crate) struct Built {
    pub(crate) handlers: Vec<Arc<dyn Handler>>,
    pub(crate) levels: HashMap<String, LevelCell>,
}

impl std::fmt::Debug for Built {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Built")
            .field("handlers", &self.handlers.len())
            .field("levels", &self.levels.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Build every named handler block. An individual failure (missing block,
/// unrecognized kind, bad filename, unreachable transport) is warned and
/// the handler omitted; only a configuration that yields zero handlers is
/// an error.
pub(crate) fn build(config: &Config, options: &Options) -> Result<Built> {
    let release = if config.rev.is_empty() {
        options.git_rev.clone()
    } else {
        config.rev.clone()
    };

    let mut handlers: Vec<Arc<dyn Handler>> = Vec::with_capacity(config.handlers.len());
    let mut levels = HashMap::new();

    for name in &config.handlers {
        let Some(block) = config.block(name) else {
            eprintln!("[fanlog] skipping handler '{}': no such config block", name);
            continue;
        };

        let built = match block.handler.as_str() {
            KIND_TEXT => build_text(name, block),
            KIND_JSON => build_json(name, block),
            KIND_SENTRY => build_sentry(name, block, &release),
            other => Err(Error::invalid_handler_kind(other)),
        };

        match built {
            Ok((handler, cell)) => {
                if let Some(cell) = cell {
                    levels.insert(name.clone(), cell);
                }
                handlers.push(handler);
            }
            Err(e) => eprintln!("[fanlog] skipping handler '{}': {}", name, e),
        }
    }

    if handlers.is_empty() {
        return Err(Error::NoValidHandler);
    }

    Ok(Built { handlers, levels })
}

type BuiltHandler = (Arc<dyn Handler>, Option<LevelCell>);

fn build_text(name: &str, block: &HandlerConfig) -> Result<BuiltHandler> {
    let writer = rolling_file::resolve_writer(name, block)?;
    let cell = LevelCell::new(Severity::parse_or_default(&block.level));
    let handler = TextHandler::new(name, writer, cell.clone())
        .with_colors(block.output != OUTPUT_FILE);
    Ok((Arc::new(handler), Some(cell)))
}

fn build_json(name: &str, block: &HandlerConfig) -> Result<BuiltHandler> {
    let writer = rolling_file::resolve_writer(name, block)?;
    let cell = LevelCell::new(Severity::parse_or_default(&block.level));
    let handler = JsonHandler::new(name, writer, cell.clone());
    Ok((Arc::new(handler), Some(cell)))
}

fn build_sentry(name: &str, block: &HandlerConfig, release: &str) -> Result<BuiltHandler> {
    let transport = TcpTransport::connect(&block.dsn, block.debug)?;
    let handler = RemoteHandler::new(
        name,
        Box::new(transport),
        Severity::parse_or_default(&block.level),
        release,
        &block.env,
    );
    Ok((Arc::new(handler), None))
}
