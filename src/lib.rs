//! # Slot Signals
//!
//! Synchronous, typed signals and slots that stay correct while the slot set
//! is being changed from inside a dispatch.
//!
//! ## Features
//!
//! - **Ordered delivery**: slots are notified in subscription order
//! - **Owned subscriptions**: a [`Connection`] unsubscribes when dropped
//! - **Mutation-safe dispatch**: slots may disconnect, subscribe, emit again,
//!   or drop the signal while it is calling them
//! - **Memory safe**: generational slot table and weak back-references, no
//!   dangling connections and no unsafe code
//! - **Async bridge**: turn a signal into a `futures` stream
//!
//! ## Example
//!
//! ```rust,no_run
//! use slot_signals::prelude::*;
//!
//! let saved = Signal::<String>::named("saved");
//! let _status = saved.subscribe(|path| println!("saved {path}"));
//! saved.emit("notes.txt".to_string());
//! ```

#![forbid(unsafe_code)]

mod connection;
mod cursor;
mod error;
mod signal;
mod storage;
mod stream;

pub use connection::Connection;
pub use error::EmitError;
pub use signal::{Signal, WeakSignal};
pub use storage::SlotId;
pub use stream::SlotStream;

// Re-export the prelude
pub mod prelude {
    pub use crate::{Connection, EmitError, Signal, SlotStream, WeakSignal};
}
