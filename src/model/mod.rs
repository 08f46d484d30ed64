//! Flow records and the mutations that travel toward the register.
//!
//! Descriptor fields (addresses, protocol tags, host names) are opaque strings
//! here; interpreting them is the capture side's business.

pub mod flow;
pub mod patch;

pub use flow::{
    FlowInfo, FlowRecord, FlowSeed, FlowState, FlowStatus, InfoUpdate, StatsUpdate, TrafficStats,
};
pub use patch::{FlowPatch, PatchPayload};
