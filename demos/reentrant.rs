//! Slots that re-emit, subscribe, and drop the signal mid-dispatch.

use slot_signals::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let holder: Rc<RefCell<Option<Signal<u32>>>> =
        Rc::new(RefCell::new(Some(Signal::named("countdown"))));
    let weak = holder
        .borrow()
        .as_ref()
        .map(Signal::downgrade)
        .expect("signal was just created");
    let late: Rc<RefCell<Vec<Connection>>> = Rc::default();

    let _connections = {
        let guard = holder.borrow();
        let signal = guard.as_ref().expect("signal was just created");
        vec![
            // Counts down by emitting again from inside the dispatch.
            signal.subscribe({
                let weak = weak.clone();
                move |n| {
                    println!("{:indent$}countdown {n}", "", indent = (3 - n as usize) * 2);
                    if n > 0 {
                        weak.emit(n - 1);
                    }
                }
            }),
            // Adds one more listener the first time it runs.
            signal.subscribe({
                let weak = weak.clone();
                let late = late.clone();
                move |_| {
                    if late.borrow().is_empty() {
                        if let Some(connection) =
                            weak.subscribe(|n| println!("late listener saw {n}"))
                        {
                            late.borrow_mut().push(connection);
                        }
                    }
                }
            }),
            // Drops the signal at the bottom of the countdown.
            signal.subscribe({
                let holder = holder.clone();
                move |n| {
                    if n == 0 {
                        println!("dropping the signal");
                        holder.borrow_mut().take();
                    }
                }
            }),
        ]
    };

    weak.emit(3);
    println!("signal alive after dispatch: {}", weak.is_alive());
}
