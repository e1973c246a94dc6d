//! Connection handles.

use crate::storage::{SlotId, SlotOwner};
use std::fmt;
use std::rc::Weak;

/// An owned handle to one subscription.
///
/// Dropping the handle, or calling [`disconnect`](Connection::disconnect),
/// removes the slot from its signal. Connections are not `Clone`: a
/// subscription is a unique resource. Moving a connection (into a field, a
/// `Vec`, another closure) keeps its place in the notification order, even in
/// the middle of a dispatch.
///
/// A connection only holds a weak reference to its signal. Once the signal is
/// dropped the connection reports [`is_connected`](Connection::is_connected)
/// as `false` and disconnecting it does nothing.
///
/// # Examples
///
/// ```rust,no_run
/// use slot_signals::prelude::*;
///
/// let signal = Signal::<i32>::new();
/// let mut connection = signal.subscribe(|value| println!("got {value}"));
/// signal.emit(1);
/// connection.disconnect();
/// signal.emit(2); // nothing printed
/// ```
#[must_use = "dropping a Connection disconnects the slot immediately"]
pub struct Connection {
    owner: Option<Weak<dyn SlotOwner>>,
    id: SlotId,
}

impl Connection {
    pub(crate) fn new(owner: Weak<dyn SlotOwner>, id: SlotId) -> Self {
        Self {
            owner: Some(owner),
            id,
        }
    }

    /// A handle that is not bound to any signal.
    pub fn empty() -> Self {
        Self {
            owner: None,
            id: SlotId::default(),
        }
    }

    /// Whether the slot is still subscribed to a live signal.
    pub fn is_connected(&self) -> bool {
        self.owner
            .as_ref()
            .and_then(Weak::upgrade)
            .map_or(false, |owner| owner.holds(self.id))
    }

    /// Remove the slot from its signal.
    ///
    /// Safe to call from inside any slot, including the one being removed,
    /// and idempotent: later calls and the eventual drop are no-ops.
    pub fn disconnect(&mut self) {
        let Some(owner) = self.owner.take().and_then(|weak| weak.upgrade()) else {
            return;
        };
        if owner.release(self.id) {
            tracing::trace!(signal = owner.signal_name(), slot = ?self.id, "slot disconnected");
        }
    }

    /// Give up the handle without unsubscribing.
    ///
    /// The slot stays subscribed until the signal is dropped.
    pub fn detach(mut self) {
        if let Some(owner) = self.owner.take().and_then(|weak| weak.upgrade()) {
            tracing::trace!(signal = owner.signal_name(), slot = ?self.id, "slot detached");
        }
    }

    /// Get the underlying slot ID (mainly for debugging).
    pub fn id(&self) -> SlotId {
        self.id
    }
}

impl Default for Connection {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}
