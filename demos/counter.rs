//! Simple counter example demonstrating slot_signals.
//!
//! This example shows:
//! - Creating signals
//! - Subscribing slots and holding their connections
//! - Disconnecting a slot from inside its own callback
//!
//! Run with `RUST_LOG=trace` to see the dispatch events.

use slot_signals::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

struct Counter {
    count: Cell<i32>,
    changed: Signal<i32>,
}

impl Counter {
    fn new() -> Self {
        Self {
            count: Cell::new(0),
            changed: Signal::named("counter.changed"),
        }
    }

    fn change_by(&self, delta: i32) {
        self.count.set(self.count.get() + delta);
        self.changed.emit(self.count.get());
    }

    fn reset(&self) {
        self.count.set(0);
        self.changed.emit(0);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let counter = Counter::new();

    let _display = counter
        .changed
        .subscribe(|value| println!("count is now {value}"));

    // Only reports the first time the count goes past 2.
    let milestone: Rc<RefCell<Option<Connection>>> = Rc::default();
    *milestone.borrow_mut() = Some(counter.changed.subscribe({
        let milestone = milestone.clone();
        move |value| {
            if value > 2 {
                println!("passed 2!");
                if let Some(connection) = milestone.borrow_mut().as_mut() {
                    connection.disconnect();
                }
            }
        }
    }));

    for _ in 0..4 {
        counter.change_by(1);
    }
    counter.reset();
    counter.change_by(5);

    println!("{:?}", counter.changed);
}
