//! Invocation cursors.
//!
//! A [`Cursor`] is the stack-scoped record of one in-flight dispatch. It is
//! registered in the signal's table when the dispatch starts and removed in
//! `Drop`, which also runs while a slot panic unwinds through the dispatch.

use crate::storage::{CursorId, SharedTable, SlotBody, SlotId};
use std::rc::Rc;

pub(crate) struct Cursor<A> {
    /// Keeps the table alive for the whole dispatch, even if the signal is
    /// dropped by one of the slots.
    table: SharedTable<A>,
    id: CursorId,
}

impl<A> Cursor<A> {
    pub fn open(table: &SharedTable<A>) -> Self {
        let id = table.borrow_mut().open_cursor();
        tracing::trace!(
            signal = table.borrow().name(),
            cursor = ?id,
            "dispatch started"
        );
        Self {
            table: Rc::clone(table),
            id,
        }
    }

    /// Next slot to notify, with the cursor already moved past it.
    pub fn next_slot(&self) -> Option<(SlotId, SlotBody<A>)> {
        self.table.borrow_mut().advance(self.id)
    }

    pub fn signal_destroyed(&self) -> bool {
        self.table.borrow().cursor_destroyed(self.id)
    }

    pub fn signal_name(&self) -> &'static str {
        self.table.borrow().name()
    }
}

impl<A> Drop for Cursor<A> {
    fn drop(&mut self) {
        let mut table = self.table.borrow_mut();
        table.close_cursor(self.id);
        tracing::trace!(signal = table.name(), cursor = ?self.id, "dispatch finished");
    }
}
