//! Push Streams - Single-threaded event streams with scoped teardown.
//!
//! A [`Stream`] is a cold description of values over time. Nothing happens
//! until it is subscribed; each subscription owns whatever it registered
//! (DOM listeners, signal effects, inner subscriptions) and releases it when
//! its [`Subscription`] is dropped.
//!
//! # Pattern: Subscription-scoped Resources
//!
//! Every adapter follows the same shape:
//! 1. Register the external resource inside the subscribe function
//! 2. Forward values into the [`Sink`]
//! 3. Return a [`Subscription`] whose cleanup releases the resource
//!
//! ```ignore
//! let clicks = Stream::new(move |sink: Sink<Event>| {
//!     let id = add_event_listener(target.clone(), EventKind::Click, move |event| sink.next(event.clone()));
//!     Subscription::new(move || { remove_event_listener(id); })
//! });
//! ```
//!
//! # Terminal Notifications
//!
//! A sink closes on its first `error` or `complete`; later notifications are
//! ignored. Sharing operators ([`Stream::share_replay`]) fan a single
//! upstream connection out to many sinks and reference-count it.

mod operators;
mod share;
mod signal;
mod subject;

use std::cell::Cell;
use std::rc::Rc;

use tracing::warn;

use crate::error::Error;

pub use operators::{combine_latest, combine_latest3, merge};
pub use signal::watch;
pub use subject::Subject;

/// Cleanup function run when a resource scope ends.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Subscription
// =============================================================================

/// RAII handle for an active subscription.
///
/// Dropping it runs the cleanup exactly once.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cleanup: Option<Cleanup>,
}

impl Subscription {
    /// Create a subscription that runs `cleanup` when dropped.
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// A subscription holding no resources.
    pub fn empty() -> Self {
        Self { cleanup: None }
    }

    /// Bundle several subscriptions; they are released in order.
    pub fn all(subscriptions: Vec<Subscription>) -> Self {
        Self::new(move || drop(subscriptions))
    }

    /// Release the subscription now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

// =============================================================================
// Sink
// =============================================================================

struct SinkInner<T> {
    on_next: Box<dyn Fn(T)>,
    on_error: Box<dyn Fn(Error)>,
    on_complete: Box<dyn Fn()>,
    closed: Cell<bool>,
}

/// Receiving end of a subscription.
pub struct Sink<T> {
    inner: Rc<SinkInner<T>>,
}

impl<T> Clone for Sink<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Sink<T> {
    /// Create a sink from its three handlers.
    pub fn new(
        on_next: impl Fn(T) + 'static,
        on_error: impl Fn(Error) + 'static,
        on_complete: impl Fn() + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(SinkInner {
                on_next: Box::new(on_next),
                on_error: Box::new(on_error),
                on_complete: Box::new(on_complete),
                closed: Cell::new(false),
            }),
        }
    }

    /// Sink handling values with `on_next` and forwarding terminal
    /// notifications to `downstream`.
    pub fn forward<U: 'static>(downstream: &Sink<U>, on_next: impl Fn(T) + 'static) -> Self {
        let for_error = downstream.clone();
        let for_complete = downstream.clone();
        Self::new(
            on_next,
            move |error| for_error.error(error),
            move || for_complete.complete(),
        )
    }

    /// Deliver a value. Ignored once the sink is closed.
    pub fn next(&self, value: T) {
        if !self.inner.closed.get() {
            (self.inner.on_next)(value);
        }
    }

    /// Deliver a terminal error and close the sink.
    pub fn error(&self, error: Error) {
        if !self.inner.closed.replace(true) {
            (self.inner.on_error)(error);
        }
    }

    /// Deliver completion and close the sink.
    pub fn complete(&self) {
        if !self.inner.closed.replace(true) {
            (self.inner.on_complete)();
        }
    }

    /// Whether a terminal notification has been delivered.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }
}

// =============================================================================
// Stream
// =============================================================================

/// A cold, single-threaded push stream.
pub struct Stream<T> {
    subscribe_fn: Rc<dyn Fn(Sink<T>) -> Subscription>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: Rc::clone(&self.subscribe_fn),
        }
    }
}

impl<T: 'static> Stream<T> {
    /// Create a stream from its subscribe function.
    pub fn new(subscribe: impl Fn(Sink<T>) -> Subscription + 'static) -> Self {
        Self {
            subscribe_fn: Rc::new(subscribe),
        }
    }

    /// Subscribe with a full sink.
    pub fn subscribe_with(&self, sink: Sink<T>) -> Subscription {
        (self.subscribe_fn)(sink)
    }

    /// Subscribe to values only. Errors are logged and end the subscription.
    pub fn subscribe(&self, on_next: impl Fn(T) + 'static) -> Subscription {
        self.subscribe_with(Sink::new(
            on_next,
            |error| warn!(%error, "unhandled stream error"),
            || {},
        ))
    }

    /// A stream that never emits, errors or completes.
    pub fn never() -> Self {
        Self::new(|_sink| Subscription::empty())
    }

    /// A stream that completes immediately.
    pub fn empty() -> Self {
        Self::new(|sink| {
            sink.complete();
            Subscription::empty()
        })
    }

    /// A stream that fails immediately with `error`.
    pub fn fail(error: Error) -> Self {
        Self::new(move |sink| {
            sink.error(error.clone());
            Subscription::empty()
        })
    }

    /// Build a fresh stream per subscription.
    pub fn defer(factory: impl Fn() -> Stream<T> + 'static) -> Self {
        Self::new(move |sink| factory().subscribe_with(sink))
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Emit `value` then complete.
    pub fn of(value: T) -> Self {
        Self::from_values(vec![value])
    }

    /// Emit every value in order, then complete.
    pub fn from_values(values: Vec<T>) -> Self {
        Self::new(move |sink| {
            for value in &values {
                if sink.is_closed() {
                    break;
                }
                sink.next(value.clone());
            }
            sink.complete();
            Subscription::empty()
        })
    }
}

// =============================================================================
// Test Support
// =============================================================================
