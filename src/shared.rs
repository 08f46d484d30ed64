use std::sync::{Arc, RwLock};

use crate::config::{ConfigError, TableConfig};
use crate::model::{FlowPatch, FlowRecord, FlowSeed};
use crate::register::{AppendChange, PatchChange, ResetChange};
use crate::table::{FlowTable, ViewId};
use crate::view::{EditSink, FilterSpec};

/// The single mutual-exclusion domain around a table.
///
/// Producer calls and subscription management take the exclusive lock for
/// the whole mutation-plus-fan-out; queries share the lock. Sinks run with
/// the exclusive lock held, so they must not call back into the table.
#[derive(Clone)]
pub struct SharedTable {
    inner: Arc<RwLock<FlowTable>>,
}

impl SharedTable {
    pub fn new(table: FlowTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    /// Shorthand for wrapping a fresh table. Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(FlowTable::new(capacity))
    }

    pub fn from_config(config: &TableConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(FlowTable::from_config(config)?))
    }

    /// Appends a seed batch; sinks fire before this returns.
    pub fn append(&self, seeds: Vec<FlowSeed>) -> AppendChange {
        self.inner.write().unwrap().append(seeds)
    }

    /// Applies a patch batch; sinks fire before this returns.
    pub fn apply_patches(&self, patches: Vec<FlowPatch>) -> PatchChange {
        self.inner.write().unwrap().apply_patches(patches)
    }

    /// Drops every record; sinks fire before this returns.
    pub fn reset(&self) -> ResetChange {
        self.inner.write().unwrap().reset()
    }

    pub fn subscribe(&self, spec: FilterSpec, sink: Box<dyn EditSink + Send + Sync>) -> ViewId {
        self.inner.write().unwrap().subscribe(spec, sink)
    }

    pub fn unsubscribe(&self, id: ViewId) -> bool {
        self.inner.write().unwrap().unsubscribe(id)
    }

    pub fn set_filter(&self, id: ViewId, spec: FilterSpec) -> bool {
        self.inner.write().unwrap().set_filter(id, spec)
    }

    pub fn set_search(&self, id: ViewId, needle: Option<&str>) -> bool {
        self.inner.write().unwrap().set_search(id, needle)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().unwrap().capacity()
    }

    pub fn item_count(&self, id: ViewId) -> Option<usize> {
        self.inner.read().unwrap().item_count(id)
    }

    /// Clone of the record at a view position. For bulk access prefer
    /// [`read`](SharedTable::read) and borrow inside the closure.
    pub fn item(&self, id: ViewId, position: usize) -> Option<FlowRecord> {
        self.inner.read().unwrap().item(id, position).cloned()
    }

    /// Runs a closure under the shared lock.
    pub fn read<R>(&self, f: impl FnOnce(&FlowTable) -> R) -> R {
        f(&self.inner.read().unwrap())
    }

    pub fn render_metrics(&self) -> String {
        self.inner.read().unwrap().render_metrics()
    }

    pub fn journal_lines(&self) -> Vec<String> {
        self.inner.read().unwrap().journal_lines()
    }
}
