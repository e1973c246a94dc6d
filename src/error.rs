//! Error types.

use std::any::Any;
use thiserror::Error;

/// Failure reported by [`Signal::try_emit`](crate::Signal::try_emit) and
/// [`WeakSignal::try_emit`](crate::WeakSignal::try_emit).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// One or more slots panicked. Every other slot was still notified.
    #[error("{panicked} of {notified} slots panicked during dispatch; first: {first}")]
    SlotsPanicked {
        panicked: usize,
        notified: usize,
        /// Message of the first panic.
        first: String,
    },

    /// The signal behind a weak handle no longer exists.
    #[error("signal has been dropped")]
    SignalDropped,
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
