use std::ops::Range;

/// Outcome of one append batch.
///
/// `assigned` covers every id the batch consumed; `inserted` is the suffix
/// that actually became visible. The two differ only when a single batch
/// exceeds the whole capacity, in which case the leading seeds burn ids
/// without ever entering the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendChange {
    pub assigned: Range<u64>,
    pub inserted: Range<u64>,
    /// Records dropped from the front of the pre-append window.
    pub evicted: usize,
    pub total_after: usize,
}

impl AppendChange {
    pub fn inserted_count(&self) -> usize {
        (self.inserted.end - self.inserted.start) as usize
    }

    pub fn is_noop(&self) -> bool {
        self.evicted == 0 && self.inserted.is_empty()
    }
}

/// Outcome of one patch batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchChange {
    /// Logical positions touched, ascending and deduplicated. Patches never
    /// shift the window, so these stay valid through fan-out.
    pub positions: Vec<usize>,
    /// Patches applied in place (two patches to one id count twice).
    pub applied: usize,
    /// Patches addressed outside the window and dropped.
    pub untracked: usize,
}

/// Outcome of clearing the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetChange {
    pub cleared: usize,
}

/// Structural change fanned out to every attached view after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralChange {
    Appended(AppendChange),
    Patched(PatchChange),
    Reset(ResetChange),
}
