//! Toggle-gated combinators.
//!
//! Both helpers gate a source by a boolean toggle stream:
//! - [`switch_map_if`] - run a derived stream per value only while the toggle is on
//! - [`take_if`] - drop values emitted while the toggle is off
//!
//! The toggle is expected to replay its current value on subscribe (a
//! [`watch`](crate::stream::watch) over a signal, or a
//! [`share_replay`](crate::stream::Stream::share_replay) stream). Neither
//! helper keeps state across calls; all state belongs to the subscription.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::Result;
use crate::stream::{Sink, Stream, Subscription};

/// Run `project(value)` for the latest source value while `toggle` is true.
///
/// - A new source value cancels the current derived stream before starting
///   its own (at most one is live).
/// - The toggle turning false cancels the derived stream immediately.
/// - The toggle turning true restarts `project` with the latest source value.
/// - Toggle changes before any source value start nothing.
/// - A projection `Err` terminates the result with that error.
pub fn switch_map_if<T, U, F>(source: &Stream<T>, toggle: &Stream<bool>, project: F) -> Stream<U>
where
    T: Clone + 'static,
    U: 'static,
    F: Fn(T) -> Result<Stream<U>> + 'static,
{
    let toggle = toggle.distinct_until_changed();
    let project = Rc::new(project);
    source.switch_map(move |value: T| {
        let project = Rc::clone(&project);
        toggle.try_switch_map(move |active| {
            if active {
                project(value.clone())
            } else {
                Ok(Stream::never())
            }
        })
    })
}

/// Pass source values only while the latest toggle value is true.
///
/// Values emitted while the toggle is false, or before it produced any
/// value, are dropped and never replayed.
pub fn take_if<T: 'static>(source: &Stream<T>, toggle: &Stream<bool>) -> Stream<T> {
    let source = source.clone();
    let toggle = toggle.clone();
    Stream::new(move |sink: Sink<T>| {
        let active = Rc::new(Cell::new(false));

        let active_for_toggle = active.clone();
        let for_error = sink.clone();
        let gate = toggle.subscribe_with(Sink::new(
            move |value| active_for_toggle.set(value),
            move |error| for_error.error(error),
            || {},
        ));

        let downstream = sink.clone();
        let values = source.subscribe_with(Sink::forward(&sink, move |value| {
            if active.get() {
                downstream.next(value);
            }
        }));

        Subscription::all(vec![values, gate])
    })
}

// =============================================================================
// Tests
// =============================================================================
