use std::fmt;

use crate::config::{ConfigError, TableConfig};
use crate::journal::{self, CaptureJournal, JournalLevel};
use crate::model::{FlowPatch, FlowRecord, FlowSeed};
use crate::register::{AppendChange, FlowLog, PatchChange, ResetChange, StructuralChange};
use crate::view::{EditSink, FilterSpec, ListEdit, LiveView};

/// Handle to one subscription, assigned by the table and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct ViewSlot {
    id: ViewId,
    view: LiveView,
    sink: Box<dyn EditSink + Send + Sync>,
}

/// Owns the register and every attached view.
///
/// Producer calls mutate the register, then fan the resulting change out to
/// each view in subscription order, delivering that view's edits into its
/// sink before returning. Everything here assumes external serialization;
/// [`SharedTable`](crate::shared::SharedTable) provides it.
pub struct FlowTable {
    log: FlowLog,
    views: Vec<ViewSlot>,
    next_view: u64,
    journal: Option<CaptureJournal>,
}

impl FlowTable {
    /// Creates a table with an empty register. Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            log: FlowLog::new(capacity),
            views: Vec::new(),
            next_view: 0,
            journal: None,
        }
    }

    /// Builds a table from validated configuration.
    pub fn from_config(config: &TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut table = Self::new(config.capacity);
        if let Some(settings) = &config.journal {
            table.journal = Some(settings.build());
        }
        Ok(table)
    }

    pub fn with_journal(mut self, journal: CaptureJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn log(&self) -> &FlowLog {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.log.capacity()
    }

    pub fn subscription_count(&self) -> usize {
        self.views.len()
    }

    /// Appends a seed batch and notifies every view.
    pub fn append(&mut self, seeds: Vec<FlowSeed>) -> AppendChange {
        let change = self.log.append_batch(seeds);
        self.fan_out(&StructuralChange::Appended(change.clone()));
        let detail = format!(
            "assigned={}..{} visible={} evicted={} total={}",
            change.assigned.start,
            change.assigned.end,
            change.inserted_count(),
            change.evicted,
            change.total_after
        );
        self.journal_record(JournalLevel::Info, "append", &detail);
        change
    }

    /// Applies a patch batch and notifies every view.
    pub fn apply_patches(&mut self, patches: Vec<FlowPatch>) -> PatchChange {
        let change = self.log.apply_patches(patches);
        self.fan_out(&StructuralChange::Patched(change.clone()));
        let detail = format!(
            "applied={} positions={} untracked={}",
            change.applied,
            change.positions.len(),
            change.untracked
        );
        self.journal_record(JournalLevel::Debug, "patch", &detail);
        if change.untracked > 0 {
            let detail = format!("dropped={}", change.untracked);
            self.journal_record(JournalLevel::Warn, "untracked", &detail);
        }
        change
    }

    /// Drops every record and notifies every view.
    pub fn reset(&mut self) -> ResetChange {
        let change = self.log.clear();
        self.fan_out(&StructuralChange::Reset(change));
        let detail = format!("cleared={}", change.cleared);
        self.journal_record(JournalLevel::Info, "reset", &detail);
        change
    }

    /// Attaches a view and returns its handle.
    ///
    /// If the view starts non-empty, the sink immediately receives one
    /// insert-all edit, so a consumer replaying from subscribe time needs no
    /// separate priming step.
    pub fn subscribe(&mut self, spec: FilterSpec, sink: Box<dyn EditSink + Send + Sync>) -> ViewId {
        let id = ViewId(self.next_view);
        self.next_view += 1;

        let view = LiveView::new(&self.log, spec);
        let count = view.item_count(&self.log);
        let mut slot = ViewSlot { id, view, sink };
        if count > 0 {
            slot.sink.apply(ListEdit::inserted(0, count));
        }
        let detail = format!("view={} filter={} visible={}", id, slot.view.spec(), count);
        self.views.push(slot);
        self.journal_record(JournalLevel::Info, "subscribe", &detail);
        id
    }

    /// Detaches a view. Returns false for an unknown handle.
    pub fn unsubscribe(&mut self, id: ViewId) -> bool {
        let before = self.views.len();
        self.views.retain(|slot| slot.id != id);
        let removed = self.views.len() < before;
        if removed {
            let detail = format!("view={id}");
            self.journal_record(JournalLevel::Info, "unsubscribe", &detail);
        }
        removed
    }

    /// Replaces a view's filter, delivering the full-replace edits to its
    /// sink. Returns false for an unknown handle.
    pub fn set_filter(&mut self, id: ViewId, spec: FilterSpec) -> bool {
        let detail;
        {
            let log = &self.log;
            let slot = match self.views.iter_mut().find(|slot| slot.id == id) {
                Some(slot) => slot,
                None => return false,
            };
            for edit in slot.view.set_spec(log, spec) {
                slot.sink.apply(edit);
            }
            detail = format!(
                "view={} filter={} visible={}",
                slot.id,
                slot.view.spec(),
                slot.view.item_count(log)
            );
        }
        self.journal_record(JournalLevel::Info, "filter", &detail);
        true
    }

    /// Replaces only a view's search text. Returns false for an unknown
    /// handle.
    pub fn set_search(&mut self, id: ViewId, needle: Option<&str>) -> bool {
        let detail;
        {
            let log = &self.log;
            let slot = match self.views.iter_mut().find(|slot| slot.id == id) {
                Some(slot) => slot,
                None => return false,
            };
            for edit in slot.view.set_search(log, needle) {
                slot.sink.apply(edit);
            }
            detail = format!(
                "view={} filter={} visible={}",
                slot.id,
                slot.view.spec(),
                slot.view.item_count(log)
            );
        }
        self.journal_record(JournalLevel::Info, "search", &detail);
        true
    }

    pub fn view(&self, id: ViewId) -> Option<&LiveView> {
        self.views
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| &slot.view)
    }

    /// Visible item count of a view. `None` for an unknown handle.
    pub fn item_count(&self, id: ViewId) -> Option<usize> {
        self.view(id).map(|view| view.item_count(&self.log))
    }

    /// Record at a view position. `None` for an unknown handle or a
    /// position past the end.
    pub fn item(&self, id: ViewId, position: usize) -> Option<&FlowRecord> {
        self.view(id).and_then(|view| view.item(&self.log, position))
    }

    /// Register counters followed by one block per view.
    pub fn render_metrics(&self) -> String {
        let mut out = self.log.telemetry().render_metrics();
        for slot in &self.views {
            out.push_str(&slot.view.telemetry().render_metrics(slot.id.0));
        }
        out
    }

    pub fn journal(&self) -> Option<&CaptureJournal> {
        self.journal.as_ref()
    }

    /// Retained journal lines, empty when journaling is off.
    pub fn journal_lines(&self) -> Vec<String> {
        self.journal
            .as_ref()
            .map(|journal| journal.lines())
            .unwrap_or_default()
    }

    fn fan_out(&mut self, change: &StructuralChange) {
        let log = &self.log;
        for slot in &mut self.views {
            for edit in slot.view.handle(log, change) {
                slot.sink.apply(edit);
            }
        }
    }

    fn journal_record(&mut self, level: JournalLevel, op: &str, detail: &str) {
        if let Some(journal) = self.journal.as_mut() {
            // A lost line never fails the producer call.
            let _ = journal.record(journal::wall_clock_ms(), level, op, detail);
        }
    }
}
