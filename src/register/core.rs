use crate::diagnostics::LogTelemetry;
use crate::model::{FlowPatch, FlowRecord, FlowSeed, PatchPayload, TrafficStats};

use super::change::{AppendChange, PatchChange, ResetChange};
use super::window::IdWindow;

/// Fixed-capacity register of live flows with FIFO rollover.
///
/// Records live in a ring addressed by `id % capacity`; the logical window
/// `[head, head + len)` names the ids currently tracked. Once the window is
/// full, every append evicts the same number of records from the front.
/// Ids are assigned at append time and never reused, not even across
/// [`clear`](FlowLog::clear).
#[derive(Debug)]
pub struct FlowLog {
    slots: Vec<Option<FlowRecord>>,
    window: IdWindow,
    next_id: u64,
    telemetry: LogTelemetry,
}

impl FlowLog {
    /// Creates an empty register. Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "flow log capacity must be positive");
        Self {
            slots: vec![None; capacity],
            window: IdWindow::empty(capacity),
            next_id: 0,
            telemetry: LogTelemetry::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Records currently tracked. Never exceeds the capacity.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Copy of the current logical window.
    pub fn window(&self) -> IdWindow {
        self.window
    }

    pub fn telemetry(&self) -> &LogTelemetry {
        &self.telemetry
    }

    /// Appends a batch, assigning each seed the next id in order.
    ///
    /// When the window would overflow, the oldest records are evicted first.
    /// A batch larger than the whole capacity still consumes one id per seed,
    /// but only the trailing `capacity` seeds become visible.
    pub fn append_batch(&mut self, seeds: Vec<FlowSeed>) -> AppendChange {
        let incoming = seeds.len();
        let first = self.next_id;
        self.next_id += incoming as u64;

        let old_len = self.window.len();
        let final_len = (old_len + incoming).min(self.capacity());
        let dropped = old_len + incoming - final_len;
        let evicted = dropped.min(old_len);
        let survivors = old_len - evicted;
        let inserted_count = final_len - survivors;
        let skip = incoming - inserted_count;

        for (offset, seed) in seeds.into_iter().enumerate().skip(skip) {
            let id = first + offset as u64;
            let slot = self.window.slot_of(id);
            self.slots[slot] = Some(FlowRecord::from_seed(id, seed));
        }

        self.window.reframe(self.next_id - final_len as u64, final_len);
        self.telemetry.record_append(incoming as u64, evicted as u64);

        AppendChange {
            assigned: first..self.next_id,
            inserted: (first + skip as u64)..self.next_id,
            evicted,
            total_after: final_len,
        }
    }

    /// Applies a patch batch in arrival order.
    ///
    /// Later patches to the same id stack on earlier ones. Ids outside the
    /// window are dropped silently and only counted; the returned positions
    /// are ascending and deduplicated.
    pub fn apply_patches(&mut self, patches: Vec<FlowPatch>) -> PatchChange {
        let mut positions = Vec::new();
        let mut applied = 0usize;
        let mut untracked = 0usize;

        for patch in patches {
            match self.window.position_of(patch.id) {
                Some(position) => {
                    let slot = self.window.slot_of(patch.id);
                    if let Some(record) = self.slots[slot].as_mut() {
                        match patch.payload {
                            PatchPayload::Stats(update) => record.apply_stats(update),
                            PatchPayload::Info(update) => record.apply_info(update),
                        }
                        positions.push(position);
                        applied += 1;
                    }
                }
                None => untracked += 1,
            }
        }

        positions.sort_unstable();
        positions.dedup();
        self.telemetry
            .record_patches(applied as u64, untracked as u64);

        PatchChange {
            positions,
            applied,
            untracked,
        }
    }

    /// Drops every record. The window head jumps past all assigned ids, so
    /// flows appended afterwards keep the id sequence rising.
    pub fn clear(&mut self) -> ResetChange {
        let cleared = self.window.len();
        for slot in &mut self.slots {
            *slot = None;
        }
        self.window.reframe(self.next_id, 0);
        self.telemetry.record_reset();
        ResetChange { cleared }
    }

    /// Record at a logical position, oldest record at position zero.
    pub fn get(&self, position: usize) -> Option<&FlowRecord> {
        self.window.id_at(position).and_then(|id| self.get_by_id(id))
    }

    /// Record with the given id, if still tracked.
    pub fn get_by_id(&self, id: u64) -> Option<&FlowRecord> {
        if !self.window.contains(id) {
            return None;
        }
        self.slots[self.window.slot_of(id)].as_ref()
    }

    /// Logical position of an id, if still tracked.
    pub fn position_of(&self, id: u64) -> Option<usize> {
        self.window.position_of(id)
    }

    /// Tracked records in window order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &FlowRecord> {
        self.window.iter_ids().filter_map(|id| self.get_by_id(id))
    }

    /// Tracked ids in window order.
    pub fn ids(&self) -> impl Iterator<Item = u64> {
        self.window.iter_ids()
    }

    /// Aggregate counters over every tracked record.
    pub fn total_traffic(&self) -> TrafficStats {
        let mut total = TrafficStats::default();
        for record in self.iter() {
            total.absorb(record.stats());
        }
        total
    }
}
