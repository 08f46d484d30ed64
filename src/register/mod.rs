//! The capped flow register: a ring of records behind a logical id window.
//!
//! `FlowLog` owns every record. Mutations come in three shapes (append batch,
//! patch batch, reset) and each returns a change descriptor that downstream
//! views consume to keep their derived sequences in sync.

pub mod change;
pub mod core;
pub mod window;

pub use change::{AppendChange, PatchChange, ResetChange, StructuralChange};
pub use core::FlowLog;
pub use window::IdWindow;
