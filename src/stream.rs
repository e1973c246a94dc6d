//! Bridge from signals to `futures` streams.
//!
//! A [`SlotStream`] subscribes a slot that forwards every emitted value into
//! an unbounded channel, so async code on the same thread can `await`
//! notifications instead of handling them inside a callback.

use crate::connection::Connection;
use crate::signal::Signal;
use futures::channel::mpsc;
use futures::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Stream of the values emitted on a signal.
///
/// The stream ends once it is disconnected (explicitly, or because the signal
/// was dropped) and every buffered value has been yielded. Dropping the stream
/// disconnects its slot.
pub struct SlotStream<A> {
    receiver: mpsc::UnboundedReceiver<A>,
    connection: Connection,
}

impl<A: Clone + 'static> Signal<A> {
    /// Subscribe a slot that feeds a [`SlotStream`].
    pub fn connect_stream(&self) -> SlotStream<A> {
        let (tx, receiver) = mpsc::unbounded();
        let connection = self.subscribe(move |args| {
            // Ignore errors - if the receiver is closed, nobody is listening
            let _ = tx.unbounded_send(args);
        });
        SlotStream {
            receiver,
            connection,
        }
    }
}

impl<A> SlotStream<A> {
    /// Stop receiving new values. Values already buffered are still yielded.
    pub fn disconnect(&mut self) {
        self.connection.disconnect();
        self.receiver.close();
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }
}

impl<A> Stream for SlotStream<A> {
    type Item = A;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<A>> {
        self.get_mut().receiver.poll_next_unpin(cx)
    }
}

impl<A> fmt::Debug for SlotStream<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotStream")
            .field("connection", &self.connection)
            .finish()
    }
}
