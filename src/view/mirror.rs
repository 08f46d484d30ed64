use thiserror::Error;

use super::edits::ListEdit;

/// Why a replayed edit stream stopped lining up with its source view.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MirrorError {
    #[error("edit touches positions {start}..{end} but the mirror holds {len} items")]
    OutOfRange {
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("no item resolvable at position {position}")]
    MissingItem { position: usize },
    #[error("mirror holds id {mirrored} at position {position} but the view reports {actual}")]
    Desynced {
        position: usize,
        mirrored: u64,
        actual: u64,
    },
}

/// Replays edit streams the way a list renderer would, holding only ids.
///
/// Feed it every edit one producer call emitted, then resolve positions
/// against the view as it stands after that call; the mirror detects holes
/// and drift. A mirror kept in lockstep from subscribe time always equals the
/// view's visible ids, which is the completeness check the integration tests
/// lean on.
#[derive(Debug, Default)]
pub struct ListMirror {
    ids: Vec<u64>,
}

impl ListMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Applies one edit, resolving inserted and updated positions through
    /// `resolve` (a lookup into the source view).
    pub fn apply<F>(&mut self, edit: ListEdit, resolve: F) -> Result<(), MirrorError>
    where
        F: Fn(usize) -> Option<u64>,
    {
        match edit {
            ListEdit::Inserted { start, count } => {
                if start > self.ids.len() {
                    return Err(MirrorError::OutOfRange {
                        start,
                        end: start + count,
                        len: self.ids.len(),
                    });
                }
                for offset in 0..count {
                    let position = start + offset;
                    let id = resolve(position).ok_or(MirrorError::MissingItem { position })?;
                    self.ids.insert(position, id);
                }
            }
            ListEdit::Updated { start, count } => {
                let end = start + count;
                if end > self.ids.len() {
                    return Err(MirrorError::OutOfRange {
                        start,
                        end,
                        len: self.ids.len(),
                    });
                }
                for position in start..end {
                    let actual = resolve(position).ok_or(MirrorError::MissingItem { position })?;
                    let mirrored = self.ids[position];
                    if mirrored != actual {
                        return Err(MirrorError::Desynced {
                            position,
                            mirrored,
                            actual,
                        });
                    }
                }
            }
            ListEdit::Removed { start, count } => {
                let end = start + count;
                if end > self.ids.len() {
                    return Err(MirrorError::OutOfRange {
                        start,
                        end,
                        len: self.ids.len(),
                    });
                }
                self.ids.drain(start..end);
            }
        }
        Ok(())
    }

    /// Applies a whole batch in order, stopping at the first failure.
    pub fn apply_all<F>(&mut self, edits: &[ListEdit], resolve: F) -> Result<(), MirrorError>
    where
        F: Fn(usize) -> Option<u64>,
    {
        for &edit in edits {
            self.apply(edit, &resolve)?;
        }
        Ok(())
    }
}
