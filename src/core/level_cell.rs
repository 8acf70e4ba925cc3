//! Runtime-adjustable severity floors

use super::severity::Severity;
use parking_lot::RwLock;
use std::sync::Arc;

/// A mutable, thread-safe severity floor shared between one handler and the
/// facade's name index. Readers are the handler's enablement check on every
/// log call; writers are runtime level-change requests. Last write wins.
#[derive(Debug, Clone, Default)]
pub struct LevelCell {
    inner: Arc<RwLock<Severity>>,
}

impl LevelCell {
    pub fn new(floor: Severity) -> Self {
        Self {
            inner: Arc::new(RwLock::new(floor)),
        }
    }

    pub fn get(&self) -> Severity {
        *self.inner.read()
    }

    pub fn set(&self, floor: Severity) {
        *self.inner.write() = floor;
    }
}
