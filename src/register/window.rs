/// Logical id window `[head, head + len)` the register currently tracks.
///
/// All position math happens on ids relative to this window; raw ring slot
/// indices never leave the register module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdWindow {
    head: u64,
    len: usize,
    capacity: usize,
}

impl IdWindow {
    pub(super) fn empty(capacity: usize) -> Self {
        Self {
            head: 0,
            len: 0,
            capacity,
        }
    }

    /// Lowest id still tracked.
    pub fn head(&self) -> u64 {
        self.head
    }

    /// One past the highest id tracked.
    pub fn end(&self) -> u64 {
        self.head + self.len as u64
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, id: u64) -> bool {
        id >= self.head && id < self.end()
    }

    /// Logical position of an id, counted from the window head.
    pub fn position_of(&self, id: u64) -> Option<usize> {
        if self.contains(id) {
            Some((id - self.head) as usize)
        } else {
            None
        }
    }

    /// Id at a logical position, if the position is in range.
    pub fn id_at(&self, position: usize) -> Option<u64> {
        if position < self.len {
            Some(self.head + position as u64)
        } else {
            None
        }
    }

    /// Ids in window order, oldest first.
    pub fn iter_ids(&self) -> impl Iterator<Item = u64> {
        self.head..self.end()
    }

    pub(super) fn slot_of(&self, id: u64) -> usize {
        (id % self.capacity as u64) as usize
    }

    pub(super) fn reframe(&mut self, head: u64, len: usize) {
        debug_assert!(len <= self.capacity);
        self.head = head;
        self.len = len;
    }
}
