//! Capped in-memory register of live network flows with incrementally-diffed
//! views for list renderers.
//!
//! The register ([`FlowLog`]) keeps the latest `capacity` flows behind a
//! logical id window and rolls the oldest ones out as new batches arrive.
//! Views ([`LiveView`]) project an ordered, filtered subsequence of it and
//! translate every change into positional edits; the table ([`FlowTable`])
//! owns both sides and fans edits out to subscribed sinks synchronously.
//! [`SharedTable`] puts the whole thing behind one reader/writer lock.

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod journal;
pub mod model;
pub mod register;
pub mod shared;
pub mod table;
pub mod view;

pub use config::{ConfigError, JournalSettings, TableConfig, DEFAULT_CAPACITY};
pub use diagnostics::{LogTelemetry, ViewTelemetry};
pub use journal::{CaptureJournal, JournalError, JournalLevel, JournalRotation};
pub use model::{
    FlowInfo, FlowPatch, FlowRecord, FlowSeed, FlowState, FlowStatus, InfoUpdate, PatchPayload,
    StatsUpdate, TrafficStats,
};
pub use register::{AppendChange, FlowLog, IdWindow, PatchChange, ResetChange, StructuralChange};
pub use shared::SharedTable;
pub use table::{FlowTable, ViewId};
pub use view::{
    coalesce, edit_channel, BridgeDrain, BridgeIntake, BridgeSink, EditSink, FilterSpec, ListEdit,
    ListMirror, LiveView, MirrorError,
};
