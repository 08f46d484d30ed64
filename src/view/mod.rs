//! Derived views over the register and the edit protocol that drives
//! list renderers.
//!
//! A view never copies records; it keeps an ordered id sequence (or nothing
//! at all in passthrough mode) and turns every register change into minimal
//! positional edits. The mirror and bridge utilities sit on the consumer side
//! of that protocol.

pub mod bridge;
pub mod edits;
pub mod filter;
pub mod live;
pub mod mirror;

pub use bridge::{edit_channel, BridgeDrain, BridgeIntake, BridgeSink};
pub use edits::{coalesce, EditSink, ListEdit};
pub use filter::FilterSpec;
pub use live::LiveView;
pub use mirror::{ListMirror, MirrorError};
