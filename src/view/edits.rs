/// One positional edit against a view's visible list.
///
/// Positions are indices into the view at the moment the edit is emitted;
/// applying each edit in order keeps a consumer's copy exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEdit {
    Inserted { start: usize, count: usize },
    Updated { start: usize, count: usize },
    Removed { start: usize, count: usize },
}

impl ListEdit {
    pub fn inserted(start: usize, count: usize) -> Self {
        ListEdit::Inserted { start, count }
    }

    pub fn updated(start: usize, count: usize) -> Self {
        ListEdit::Updated { start, count }
    }

    pub fn removed(start: usize, count: usize) -> Self {
        ListEdit::Removed { start, count }
    }

    pub fn count(&self) -> usize {
        match *self {
            ListEdit::Inserted { count, .. }
            | ListEdit::Updated { count, .. }
            | ListEdit::Removed { count, .. } => count,
        }
    }
}

/// Consumer half of a subscription. Called synchronously inside the producer
/// call that caused the edit, under the table's exclusive lock, so
/// implementations must return quickly and never call back into the table.
pub trait EditSink {
    fn apply(&mut self, edit: ListEdit);
}

/// Merges adjacent compatible edits: inserts and updates extending the
/// previous range, and removals repeated at the same start (which consume a
/// contiguous block). Anything else is kept as-is, in order.
pub fn coalesce(edits: &[ListEdit]) -> Vec<ListEdit> {
    let mut merged: Vec<ListEdit> = Vec::with_capacity(edits.len());
    for &edit in edits {
        if let Some(last) = merged.last_mut() {
            if let Some(combined) = merge_pair(*last, edit) {
                *last = combined;
                continue;
            }
        }
        merged.push(edit);
    }
    merged
}

fn merge_pair(first: ListEdit, second: ListEdit) -> Option<ListEdit> {
    match (first, second) {
        (
            ListEdit::Inserted { start, count },
            ListEdit::Inserted {
                start: next,
                count: more,
            },
        ) if next == start + count => Some(ListEdit::Inserted {
            start,
            count: count + more,
        }),
        (
            ListEdit::Updated { start, count },
            ListEdit::Updated {
                start: next,
                count: more,
            },
        ) if next == start + count => Some(ListEdit::Updated {
            start,
            count: count + more,
        }),
        (
            ListEdit::Removed { start, count },
            ListEdit::Removed {
                start: next,
                count: more,
            },
        ) if next == start => Some(ListEdit::Removed {
            start,
            count: count + more,
        }),
        _ => None,
    }
}
