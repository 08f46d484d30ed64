//! Lifetime counters for the register and its views.
//!
//! Nothing here is an error signal. Untracked patch ids in particular are a
//! normal consequence of rollover racing the capture side, so they only show
//! up as a counter.

/// Counters the register accumulates across its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogTelemetry {
    appended_total: u64,
    evicted_total: u64,
    patched_total: u64,
    untracked_patches_total: u64,
    resets_total: u64,
}

impl LogTelemetry {
    pub(crate) fn record_append(&mut self, appended: u64, evicted: u64) {
        self.appended_total += appended;
        self.evicted_total += evicted;
    }

    pub(crate) fn record_patches(&mut self, applied: u64, untracked: u64) {
        self.patched_total += applied;
        self.untracked_patches_total += untracked;
    }

    pub(crate) fn record_reset(&mut self) {
        self.resets_total += 1;
    }

    /// Seeds ever appended, including ones an oversized batch never surfaced.
    pub fn appended_total(&self) -> u64 {
        self.appended_total
    }

    /// Records dropped from the window front by rollover.
    pub fn evicted_total(&self) -> u64 {
        self.evicted_total
    }

    pub fn patched_total(&self) -> u64 {
        self.patched_total
    }

    /// Patches addressed to ids outside the window, dropped on arrival.
    pub fn untracked_patches_total(&self) -> u64 {
        self.untracked_patches_total
    }

    pub fn resets_total(&self) -> u64 {
        self.resets_total
    }

    pub fn render_metrics(&self) -> String {
        format!(
            "flow_log_appended_total {}\nflow_log_evicted_total {}\nflow_log_patched_total {}\nflow_log_untracked_patches_total {}\nflow_log_resets_total {}\n",
            self.appended_total,
            self.evicted_total,
            self.patched_total,
            self.untracked_patches_total,
            self.resets_total
        )
    }
}

/// Counters one live view accumulates while tracking the register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewTelemetry {
    unmatched_total: u64,
    rebuilds_total: u64,
}

impl ViewTelemetry {
    pub(crate) fn record_unmatch(&mut self) {
        self.unmatched_total += 1;
    }

    pub(crate) fn record_rebuild(&mut self) {
        self.rebuilds_total += 1;
    }

    /// Records expelled from the view because a patch broke their match.
    pub fn unmatched_total(&self) -> u64 {
        self.unmatched_total
    }

    /// Full rescans triggered by filter or search changes.
    pub fn rebuilds_total(&self) -> u64 {
        self.rebuilds_total
    }

    pub fn render_metrics(&self, view: u64) -> String {
        format!(
            "flow_view_unmatched_total{{view=\"{}\"}} {}\nflow_view_rebuilds_total{{view=\"{}\"}} {}\n",
            view, self.unmatched_total, view, self.rebuilds_total
        )
    }
}
