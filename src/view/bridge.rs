use crossbeam_queue::ArrayQueue;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::edits::{EditSink, ListEdit};

/// Sink half of a bounded edit bridge.
///
/// Lets a render thread consume edits without ever touching the table lock:
/// the producer side pushes under the lock, the drain side pops outside it.
/// When the queue is full the edit is dropped and the bridge marked
/// saturated, since a stream with a hole in it can no longer be replayed.
pub struct BridgeSink {
    queue: Arc<ArrayQueue<ListEdit>>,
    saturated: Arc<AtomicBool>,
}

impl EditSink for BridgeSink {
    fn apply(&mut self, edit: ListEdit) {
        if self.queue.push(edit).is_err() {
            self.saturated.store(true, Ordering::Release);
        }
    }
}

/// What one drain pass hands the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeIntake {
    pub edits: Vec<ListEdit>,
    /// True when edits were lost since the previous drain. The batch must be
    /// discarded and the consumer resynchronized from the view, exactly as
    /// for a full-replace notification.
    pub overflowed: bool,
}

/// Drain half of a bounded edit bridge.
pub struct BridgeDrain {
    queue: Arc<ArrayQueue<ListEdit>>,
    saturated: Arc<AtomicBool>,
}

impl BridgeDrain {
    /// Pops everything currently queued and resets the saturation flag.
    pub fn drain(&self) -> BridgeIntake {
        let mut edits = Vec::new();
        while let Some(edit) = self.queue.pop() {
            edits.push(edit);
        }
        let overflowed = self.saturated.swap(false, Ordering::AcqRel);
        BridgeIntake { edits, overflowed }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Creates a connected sink/drain pair with the given queue capacity.
/// Panics if `capacity` is zero.
pub fn edit_channel(capacity: usize) -> (BridgeSink, BridgeDrain) {
    assert!(capacity > 0, "edit bridge capacity must be positive");
    let queue = Arc::new(ArrayQueue::new(capacity));
    let saturated = Arc::new(AtomicBool::new(false));
    (
        BridgeSink {
            queue: Arc::clone(&queue),
            saturated: Arc::clone(&saturated),
        },
        BridgeDrain { queue, saturated },
    )
}
