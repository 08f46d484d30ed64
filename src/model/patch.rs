use serde::{Deserialize, Serialize};

use super::flow::{InfoUpdate, StatsUpdate};

/// Payload of an id-addressed mutation.
///
/// The two kinds stay distinct so downstream consumers can tell counter churn
/// apart from metadata arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchPayload {
    /// Overwrites counters, last-seen timestamp, and lifecycle status.
    Stats(StatsUpdate),
    /// Merges resolved metadata onto the record.
    Info(InfoUpdate),
}

/// A mutation addressed to one tracked flow by id.
///
/// Ids outside the register's current window are dropped silently; the
/// register only counts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPatch {
    pub id: u64,
    pub payload: PatchPayload,
}

impl FlowPatch {
    pub fn stats(id: u64, update: StatsUpdate) -> Self {
        Self {
            id,
            payload: PatchPayload::Stats(update),
        }
    }

    pub fn info(id: u64, update: InfoUpdate) -> Self {
        Self {
            id,
            payload: PatchPayload::Info(update),
        }
    }
}
