//! Generational slot table shared by a signal and its connections.
//!
//! Slot bodies live in a slot map with generational keys, so a connection
//! handle can never reach a slot that was freed and reused. Notification
//! order is kept separately as a list of keys. Every in-flight dispatch owns
//! a cursor into that list. Removing a slot only frees it from the map; its
//! key stays in the list as a tombstone that cursors skip, and tombstones are
//! compacted out once no dispatch is running and they make up half the list.

use slotmap::{new_key_type, SlotMap};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Unique identifier for a subscription in a signal's table.
    pub struct SlotId;

    /// Identifier for one in-flight dispatch.
    pub(crate) struct CursorId;
}

/// Stored slot body. Cloned out of the table before it is called so no
/// borrow is held while user code runs.
pub(crate) type SlotBody<A> = Rc<dyn Fn(A)>;

pub(crate) type SharedTable<A> = Rc<RefCell<SlotTable<A>>>;
pub(crate) type WeakTable<A> = Weak<RefCell<SlotTable<A>>>;

/// Bookkeeping for one in-flight dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CursorState {
    /// Index into `order` of the next slot to notify.
    pub position: usize,
    /// Set when the signal is dropped while this dispatch is running.
    pub signal_destroyed: bool,
}

/// Subscriptions and active cursors of a single signal.
pub(crate) struct SlotTable<A> {
    slots: SlotMap<SlotId, SlotBody<A>>,
    /// Slots in subscription order, including tombstones of removed ones.
    order: Vec<SlotId>,
    tombstones: usize,
    cursors: SlotMap<CursorId, CursorState>,
    destroyed: bool,
    name: Option<&'static str>,
}

impl<A> SlotTable<A> {
    pub fn new(name: Option<&'static str>) -> Self {
        Self {
            slots: SlotMap::with_key(),
            order: Vec::new(),
            tombstones: 0,
            cursors: SlotMap::with_key(),
            destroyed: false,
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name.unwrap_or("anonymous")
    }

    /// Append a slot at the tail of the notification order.
    pub fn insert(&mut self, body: SlotBody<A>) -> SlotId {
        let id = self.slots.insert(body);
        self.order.push(id);
        id
    }

    /// Remove a slot and return its body.
    ///
    /// The body is handed back so the caller can drop it after releasing the
    /// table borrow: it may own other connections to this same table.
    pub fn remove(&mut self, id: SlotId) -> Option<SlotBody<A>> {
        let body = self.slots.remove(id)?;
        self.tombstones += 1;
        self.compact_if_idle();
        Some(body)
    }

    /// Drop tombstones from `order`. Cursor positions index `order`, so this
    /// only runs while no dispatch is in flight.
    fn compact_if_idle(&mut self) {
        if !self.cursors.is_empty() || self.tombstones * 2 < self.order.len() {
            return;
        }
        let slots = &self.slots;
        self.order.retain(|&id| slots.contains_key(id));
        tracing::trace!(
            signal = self.name(),
            removed = self.tombstones,
            remaining = self.order.len(),
            "compacted slot order"
        );
        self.tombstones = 0;
    }

    pub fn contains(&self, id: SlotId) -> bool {
        !self.destroyed && self.slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Register a new cursor positioned at the head of the order.
    pub fn open_cursor(&mut self) -> CursorId {
        self.cursors.insert(CursorState::default())
    }

    pub fn close_cursor(&mut self, cursor: CursorId) {
        self.cursors.remove(cursor);
        self.compact_if_idle();
    }

    pub fn active_cursors(&self) -> usize {
        self.cursors.len()
    }

    /// Move the cursor past the next live slot and return that slot.
    ///
    /// The cursor is advanced before the body is returned, so a body that
    /// removes its own slot leaves the cursor already past it.
    pub fn advance(&mut self, cursor: CursorId) -> Option<(SlotId, SlotBody<A>)> {
        let state = self.cursors.get_mut(cursor)?;
        if state.signal_destroyed {
            return None;
        }
        while let Some(&id) = self.order.get(state.position) {
            state.position += 1;
            if let Some(body) = self.slots.get(id) {
                return Some((id, Rc::clone(body)));
            }
        }
        None
    }

    pub fn cursor_destroyed(&self, cursor: CursorId) -> bool {
        self.cursors
            .get(cursor)
            .map_or(true, |state| state.signal_destroyed)
    }

    /// Flag the table and every active cursor as belonging to a dropped
    /// signal. Returns the number of interrupted dispatches.
    pub fn mark_destroyed(&mut self) -> usize {
        self.destroyed = true;
        for state in self.cursors.values_mut() {
            state.signal_destroyed = true;
        }
        self.cursors.len()
    }

    #[cfg(test)]
    pub fn cursor_position(&self, cursor: CursorId) -> Option<usize> {
        self.cursors.get(cursor).map(|state| state.position)
    }
}

/// Type-erased view of a table, held weakly by connections.
pub(crate) trait SlotOwner {
    /// Remove the slot if it is still present.
    fn release(&self, id: SlotId) -> bool;

    fn holds(&self, id: SlotId) -> bool;

    fn signal_name(&self) -> &'static str;
}

impl<A: 'static> SlotOwner for RefCell<SlotTable<A>> {
    fn release(&self, id: SlotId) -> bool {
        let removed = self.borrow_mut().remove(id);
        // Dropped here, outside the borrow.
        removed.is_some()
    }

    fn holds(&self, id: SlotId) -> bool {
        self.borrow().contains(id)
    }

    fn signal_name(&self) -> &'static str {
        self.borrow().name()
    }
}
