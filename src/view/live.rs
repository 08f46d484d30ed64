use crate::diagnostics::ViewTelemetry;
use crate::model::FlowRecord;
use crate::register::{AppendChange, FlowLog, PatchChange, ResetChange, StructuralChange};

use super::edits::ListEdit;
use super::filter::FilterSpec;

/// An ordered, filtered projection of the register.
///
/// The view holds ids only, never records. While the spec is filtering, `ids`
/// is the in-order subsequence of the window's ids whose records match; with
/// the passthrough spec the sequence stays empty and positions map straight
/// onto the register, with no predicate evaluation at all.
///
/// Every register change translates into positional edits against the view's
/// own coordinates. Consumers that apply the edits in emission order track
/// the view exactly.
#[derive(Debug)]
pub struct LiveView {
    spec: FilterSpec,
    ids: Vec<u64>,
    telemetry: ViewTelemetry,
}

impl LiveView {
    /// Creates a view over the register's current contents. No edits are
    /// emitted for the initial population.
    pub fn new(log: &FlowLog, spec: FilterSpec) -> Self {
        let mut view = Self {
            spec,
            ids: Vec::new(),
            telemetry: ViewTelemetry::default(),
        };
        view.rebuild(log);
        view
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn telemetry(&self) -> &ViewTelemetry {
        &self.telemetry
    }

    /// Visible item count.
    pub fn item_count(&self, log: &FlowLog) -> usize {
        if self.is_passthrough() {
            log.len()
        } else {
            self.ids.len()
        }
    }

    /// Record at a view position. `None` past the end.
    pub fn item<'a>(&self, log: &'a FlowLog, position: usize) -> Option<&'a FlowRecord> {
        if self.is_passthrough() {
            log.get(position)
        } else {
            self.ids.get(position).and_then(|&id| log.get_by_id(id))
        }
    }

    /// Matching ids in view order. Empty in passthrough mode, where the
    /// register's own order is the view order.
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Ids visible through the view, in order, regardless of mode.
    pub fn collect_ids(&self, log: &FlowLog) -> Vec<u64> {
        if self.is_passthrough() {
            log.ids().collect()
        } else {
            self.ids.clone()
        }
    }

    /// Replaces the whole spec and rescans the register.
    ///
    /// Filter changes are never diffed incrementally: the view empties and
    /// refills, emitting a remove-all edit followed by an insert-all edit
    /// (zero-count edits are dropped).
    pub fn set_spec(&mut self, log: &FlowLog, spec: FilterSpec) -> Vec<ListEdit> {
        let before = self.item_count(log);
        self.spec = spec;
        self.rebuild(log);
        self.telemetry.record_rebuild();
        let after = self.item_count(log);

        let mut edits = Vec::new();
        if before > 0 {
            edits.push(ListEdit::removed(0, before));
        }
        if after > 0 {
            edits.push(ListEdit::inserted(0, after));
        }
        edits
    }

    /// Replaces only the search text, keeping the state predicate. Same
    /// rebuild path as [`set_spec`](LiveView::set_spec).
    pub fn set_search(&mut self, log: &FlowLog, needle: Option<&str>) -> Vec<ListEdit> {
        let mut spec = self.spec.clone();
        spec.set_search(needle);
        self.set_spec(log, spec)
    }

    /// Translates a register change into edits against this view.
    ///
    /// Must be called once per change, in change order, after the register
    /// has mutated.
    pub fn handle(&mut self, log: &FlowLog, change: &StructuralChange) -> Vec<ListEdit> {
        match change {
            StructuralChange::Appended(change) => self.on_appended(log, change),
            StructuralChange::Patched(change) => self.on_patched(log, change),
            StructuralChange::Reset(change) => self.on_reset(change),
        }
    }

    fn is_passthrough(&self) -> bool {
        !self.spec.is_filtering()
    }

    fn rebuild(&mut self, log: &FlowLog) {
        self.ids.clear();
        if self.spec.is_filtering() {
            for record in log.iter() {
                if self.spec.matches(record) {
                    self.ids.push(record.id());
                }
            }
        }
    }

    /// Eviction first, then insertions: evicted ids are always the lowest in
    /// the window, so they form a prefix of the view as well.
    fn on_appended(&mut self, log: &FlowLog, change: &AppendChange) -> Vec<ListEdit> {
        let mut edits = Vec::new();

        if self.is_passthrough() {
            if change.evicted > 0 {
                edits.push(ListEdit::removed(0, change.evicted));
            }
            let inserted = change.inserted_count();
            if inserted > 0 {
                edits.push(ListEdit::inserted(change.total_after - inserted, inserted));
            }
            return edits;
        }

        let head = log.window().head();
        let stale = self.ids.partition_point(|&id| id < head);
        if stale > 0 {
            self.ids.drain(..stale);
            edits.push(ListEdit::removed(0, stale));
        }

        let before = self.ids.len();
        for id in change.inserted.clone() {
            if let Some(record) = log.get_by_id(id) {
                if self.spec.matches(record) {
                    self.ids.push(id);
                }
            }
        }
        let appended = self.ids.len() - before;
        if appended > 0 {
            edits.push(ListEdit::inserted(before, appended));
        }
        edits
    }

    /// Patched positions arrive ascending. Each removal mutates the sequence
    /// before the next lookup, so later edits come out in the shifted
    /// coordinates a consumer already sees.
    fn on_patched(&mut self, log: &FlowLog, change: &PatchChange) -> Vec<ListEdit> {
        let mut edits = Vec::new();

        if self.is_passthrough() {
            for &position in &change.positions {
                edits.push(ListEdit::updated(position, 1));
            }
            return edits;
        }

        let window = log.window();
        for &position in &change.positions {
            let id = match window.id_at(position) {
                Some(id) => id,
                None => continue,
            };
            let view_pos = match self.ids.binary_search(&id) {
                Ok(view_pos) => view_pos,
                // Ids outside the view stay out here, even when the patch
                // makes the record match; only appends and rebuilds grow
                // the sequence.
                Err(_) => continue,
            };
            let still_matches = log
                .get_by_id(id)
                .is_some_and(|record| self.spec.matches(record));
            if still_matches {
                edits.push(ListEdit::updated(view_pos, 1));
            } else {
                self.ids.remove(view_pos);
                self.telemetry.record_unmatch();
                edits.push(ListEdit::removed(view_pos, 1));
            }
        }
        edits
    }

    fn on_reset(&mut self, change: &ResetChange) -> Vec<ListEdit> {
        let prior = if self.is_passthrough() {
            change.cleared
        } else {
            self.ids.len()
        };
        self.ids.clear();
        if prior > 0 {
            vec![ListEdit::removed(0, prior)]
        } else {
            Vec::new()
        }
    }
}
