//! Linear undo/redo over serialized canvas snapshots.
//!
//! The cursor points one past the most recent saved snapshot. When the user
//! undoes from the live (unsaved) state, that state is parked in a side slot
//! so redo can return to it.

use crate::canvas::Canvas;
use crate::codec::{self, Layout};

/// Snapshot stack with a cursor.
#[derive(Clone, Debug, Default)]
pub struct History {
    snapshots: Vec<Vec<u8>>,
    cursor: usize,
    live: Option<Vec<u8>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.snapshots.len()
    }

    /// Record the canvas before a mutating gesture. Everything that could
    /// have been redone is dropped.
    pub fn save(&mut self, canvas: &Canvas) {
        let snapshot = codec::serialize(canvas, Layout::Masked);
        self.snapshots.truncate(self.cursor);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len();
        self.live = None;
        log::debug!("history saved, {} snapshots", self.snapshots.len());
    }

    /// Step back one snapshot. Returns false if there is nothing to undo.
    pub fn undo(&mut self, canvas: &mut Canvas) -> bool {
        if self.cursor == 0 {
            return false;
        }
        if self.cursor == self.snapshots.len() {
            self.live = Some(codec::serialize(canvas, Layout::Masked));
        }
        self.cursor -= 1;
        Self::load(&self.snapshots[self.cursor], canvas);
        log::debug!("undo to {}/{}", self.cursor, self.snapshots.len());
        true
    }

    /// Step forward one snapshot. Returns false if there is nothing to redo.
    pub fn redo(&mut self, canvas: &mut Canvas) -> bool {
        if self.cursor >= self.snapshots.len() {
            return false;
        }
        self.cursor += 1;
        if self.cursor == self.snapshots.len() {
            if let Some(live) = &self.live {
                Self::load(live, canvas);
            }
        } else {
            Self::load(&self.snapshots[self.cursor], canvas);
        }
        log::debug!("redo to {}/{}", self.cursor, self.snapshots.len());
        true
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn load(snapshot: &[u8], canvas: &mut Canvas) {
        let restored = codec::restore(snapshot, canvas.size());
        canvas.replace(restored.canvas);
    }
}
