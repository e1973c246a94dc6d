//! Core Signal type and dispatch.

use crate::connection::Connection;
use crate::cursor::Cursor;
use crate::error::{panic_message, EmitError};
use crate::storage::{SharedTable, SlotOwner, SlotTable, WeakTable};
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

/// A synchronous, typed notification point.
///
/// Slots registered with [`subscribe`](Signal::subscribe) are called in
/// subscription order every time the signal is emitted. Each slot receives its
/// own clone of the argument; use a tuple to pass several values.
///
/// Slots may freely mutate the signal they are called from: disconnect
/// themselves or other slots, subscribe new slots, emit again through a
/// [`WeakSignal`], or drop the signal altogether. Iteration is live: a slot
/// subscribed during a dispatch is notified by that same dispatch, and a slot
/// disconnected before its turn is skipped.
///
/// # Examples
///
/// ```rust,no_run
/// use slot_signals::prelude::*;
///
/// let clicked = Signal::<(i32, i32)>::named("clicked");
/// let _log = clicked.subscribe(|(x, y)| println!("click at {x},{y}"));
/// clicked.emit((3, 4));
/// ```
pub struct Signal<A> {
    table: SharedTable<A>,
}

impl<A: Clone + 'static> Signal<A> {
    /// Create a signal with no slots.
    pub fn new() -> Self {
        Self::with_name(None)
    }

    /// Create a signal whose name is attached to its log events.
    pub fn named(name: &'static str) -> Self {
        Self::with_name(Some(name))
    }

    fn with_name(name: Option<&'static str>) -> Self {
        Self {
            table: Rc::new(RefCell::new(SlotTable::new(name))),
        }
    }

    /// Subscribe a slot at the tail of the notification order.
    ///
    /// The slot stays subscribed for as long as the returned [`Connection`]
    /// lives.
    pub fn subscribe(&self, slot: impl Fn(A) + 'static) -> Connection {
        subscribe_to(&self.table, Rc::new(slot))
    }

    /// Notify every slot, in subscription order.
    ///
    /// If a slot panics the dispatch stops and the panic propagates; the
    /// remaining slots are not notified but the signal stays usable.
    pub fn emit(&self, args: A) {
        dispatch(&self.table, args);
    }

    /// Notify every slot, catching slot panics.
    ///
    /// Unlike [`emit`](Signal::emit) a panicking slot does not stop the
    /// dispatch. All panics are logged and summarised in the returned error.
    pub fn try_emit(&self, args: A) -> Result<(), EmitError> {
        try_dispatch(&self.table, args)
    }

    /// Create a weak handle that can emit to and subscribe on this signal
    /// without keeping it alive.
    pub fn downgrade(&self) -> WeakSignal<A> {
        WeakSignal {
            table: Rc::downgrade(&self.table),
        }
    }
}

impl<A> Signal<A> {
    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a dispatch of this signal is currently running.
    pub fn is_emitting(&self) -> bool {
        self.table.borrow().active_cursors() > 0
    }

    pub fn name(&self) -> &'static str {
        self.table.borrow().name()
    }
}

impl<A: Clone + 'static> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Drop for Signal<A> {
    fn drop(&mut self) {
        let mut table = self.table.borrow_mut();
        let interrupted = table.mark_destroyed();
        if interrupted > 0 {
            tracing::debug!(
                signal = table.name(),
                interrupted,
                "signal dropped during dispatch"
            );
        }
    }
}

impl<A> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.borrow();
        f.debug_struct("Signal")
            .field("name", &table.name())
            .field("slots", &table.len())
            .field("active_dispatches", &table.active_cursors())
            .finish()
    }
}

/// A non-owning handle to a [`Signal`].
///
/// Slots usually capture one of these to emit again or subscribe more slots
/// on the signal that is calling them. Every operation resolves to "already
/// gone" once the signal has been dropped.
pub struct WeakSignal<A> {
    table: WeakTable<A>,
}

impl<A> Clone for WeakSignal<A> {
    fn clone(&self) -> Self {
        Self {
            table: Weak::clone(&self.table),
        }
    }
}

impl<A> WeakSignal<A> {
    fn live_table(&self) -> Option<SharedTable<A>> {
        self.table
            .upgrade()
            .filter(|table| !table.borrow().is_destroyed())
    }

    /// Whether the signal still exists.
    pub fn is_alive(&self) -> bool {
        self.live_table().is_some()
    }
}

impl<A: Clone + 'static> WeakSignal<A> {
    /// Emit on the signal. Returns `false` if the signal is gone.
    pub fn emit(&self, args: A) -> bool {
        match self.live_table() {
            Some(table) => {
                dispatch(&table, args);
                true
            }
            None => false,
        }
    }

    /// Emit on the signal, catching slot panics like [`Signal::try_emit`].
    pub fn try_emit(&self, args: A) -> Result<(), EmitError> {
        let table = self.live_table().ok_or(EmitError::SignalDropped)?;
        try_dispatch(&table, args)
    }

    /// Subscribe a slot, or return `None` if the signal is gone.
    pub fn subscribe(&self, slot: impl Fn(A) + 'static) -> Option<Connection> {
        let table = self.live_table()?;
        Some(subscribe_to(&table, Rc::new(slot)))
    }
}

impl<A> fmt::Debug for WeakSignal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSignal")
            .field("alive", &self.is_alive())
            .finish()
    }
}

fn subscribe_to<A: 'static>(table: &SharedTable<A>, body: Rc<dyn Fn(A)>) -> Connection {
    let id = table.borrow_mut().insert(body);
    tracing::trace!(signal = table.borrow().name(), slot = ?id, "slot connected");
    let owner = Rc::downgrade(table);
    let owner: Weak<dyn SlotOwner> = owner;
    Connection::new(owner, id)
}

/// Walk the slots with a fresh cursor. A slot panic unwinds through here;
/// the cursor still deregisters on the way out.
fn dispatch<A: Clone>(table: &SharedTable<A>, args: A) {
    let cursor = Cursor::open(table);
    while let Some((_, slot)) = cursor.next_slot() {
        slot(args.clone());
        if cursor.signal_destroyed() {
            tracing::debug!(signal = cursor.signal_name(), "dispatch stopped: signal dropped");
            return;
        }
    }
}

fn try_dispatch<A: Clone>(table: &SharedTable<A>, args: A) -> Result<(), EmitError> {
    let cursor = Cursor::open(table);
    let mut notified = 0;
    let mut panicked = 0;
    let mut first = None;

    while let Some((id, slot)) = cursor.next_slot() {
        notified += 1;
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| slot(args.clone()))) {
            let message = panic_message(payload.as_ref());
            tracing::warn!(
                signal = cursor.signal_name(),
                slot = ?id,
                %message,
                "slot panicked during dispatch"
            );
            panicked += 1;
            first.get_or_insert(message);
        }
        if cursor.signal_destroyed() {
            tracing::debug!(signal = cursor.signal_name(), "dispatch stopped: signal dropped");
            break;
        }
    }

    match first {
        None => Ok(()),
        Some(first) => Err(EmitError::SlotsPanicked {
            panicked,
            notified,
            first,
        }),
    }
}
