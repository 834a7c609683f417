//! Stream operators.
//!
//! Per-subscription state lives in `Rc<RefCell<..>>`/`Rc<Cell<..>>` created
//! inside the subscribe function, so two subscribers of the same operator
//! chain never share state. Borrows are always released before a sink is
//! called, since sinks may re-enter the operator.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::Result;

use super::{Sink, Stream, Subscription};

// =============================================================================
// Element-wise Operators
// =============================================================================

impl<T: 'static> Stream<T> {
    /// Transform every value.
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> Stream<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::new(move |sink: Sink<U>| {
            let f = Rc::clone(&f);
            let downstream = sink.clone();
            source.subscribe_with(Sink::forward(&sink, move |value| downstream.next(f(value))))
        })
    }

    /// Keep values matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Stream<T> {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Stream::new(move |sink: Sink<T>| {
            let predicate = Rc::clone(&predicate);
            let downstream = sink.clone();
            source.subscribe_with(Sink::forward(&sink, move |value| {
                if predicate(&value) {
                    downstream.next(value);
                }
            }))
        })
    }

    /// Transform and filter in one step.
    pub fn filter_map<U: 'static>(&self, f: impl Fn(T) -> Option<U> + 'static) -> Stream<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::new(move |sink: Sink<U>| {
            let f = Rc::clone(&f);
            let downstream = sink.clone();
            source.subscribe_with(Sink::forward(&sink, move |value| {
                if let Some(mapped) = f(value) {
                    downstream.next(mapped);
                }
            }))
        })
    }

    /// Run a side effect for every value, passing it through unchanged.
    pub fn tap(&self, f: impl Fn(&T) + 'static) -> Stream<T> {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::new(move |sink: Sink<T>| {
            let f = Rc::clone(&f);
            let downstream = sink.clone();
            source.subscribe_with(Sink::forward(&sink, move |value| {
                f(&value);
                downstream.next(value);
            }))
        })
    }

    /// Emit `initial()`, evaluated at subscribe time, before the source.
    pub fn start_with_fn(&self, initial: impl Fn() -> T + 'static) -> Stream<T> {
        let source = self.clone();
        let initial = Rc::new(initial);
        Stream::new(move |sink: Sink<T>| {
            sink.next(initial());
            source.subscribe_with(sink)
        })
    }

    /// Run `f` after the subscription has been torn down.
    pub fn finalize(&self, f: impl Fn() + 'static) -> Stream<T> {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::new(move |sink: Sink<T>| {
            let upstream = source.subscribe_with(sink);
            let f = Rc::clone(&f);
            Subscription::new(move || {
                drop(upstream);
                f();
            })
        })
    }

    /// Pair every value with the latest value of `other`.
    ///
    /// Values arriving before `other` has produced anything are dropped.
    pub fn with_latest_from<O: Clone + 'static>(&self, other: &Stream<O>) -> Stream<(T, O)> {
        let source = self.clone();
        let other = other.clone();
        Stream::new(move |sink: Sink<(T, O)>| {
            let latest: Rc<RefCell<Option<O>>> = Rc::new(RefCell::new(None));

            let latest_for_other = latest.clone();
            let for_error = sink.clone();
            let gate = other.subscribe_with(Sink::new(
                move |value| *latest_for_other.borrow_mut() = Some(value),
                move |error| for_error.error(error),
                || {},
            ));

            let downstream = sink.clone();
            let values = source.subscribe_with(Sink::forward(&sink, move |value| {
                let current = latest.borrow().clone();
                if let Some(current) = current {
                    downstream.next((value, current));
                }
            }));

            Subscription::all(vec![values, gate])
        })
    }
}

impl<T: Clone + PartialEq + 'static> Stream<T> {
    /// Suppress values equal to the previous emitted one.
    pub fn distinct_until_changed(&self) -> Stream<T> {
        let source = self.clone();
        Stream::new(move |sink: Sink<T>| {
            let previous: Rc<RefCell<Option<T>>> = Rc::new(RefCell::new(None));
            let downstream = sink.clone();
            source.subscribe_with(Sink::forward(&sink, move |value: T| {
                let changed = previous.borrow().as_ref() != Some(&value);
                if changed {
                    *previous.borrow_mut() = Some(value.clone());
                    downstream.next(value);
                }
            }))
        })
    }
}

// =============================================================================
// Switch to Latest
// =============================================================================

impl<T: 'static> Stream<T> {
    /// Map every value to an inner stream, keeping only the latest one live.
    ///
    /// The previous inner subscription is torn down before `project` runs,
    /// so two inner streams are never subscribed at the same time. A failed
    /// projection is delivered downstream as a terminal error.
    pub fn try_switch_map<U: 'static>(
        &self,
        project: impl Fn(T) -> Result<Stream<U>> + 'static,
    ) -> Stream<U> {
        let source = self.clone();
        let project = Rc::new(project);
        Stream::new(move |sink: Sink<U>| {
            let inner: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
            let generation = Rc::new(Cell::new(0u64));
            let inner_active = Rc::new(Cell::new(false));
            let outer_done = Rc::new(Cell::new(false));

            let on_next = {
                let project = Rc::clone(&project);
                let inner = inner.clone();
                let generation = generation.clone();
                let inner_active = inner_active.clone();
                let outer_done = outer_done.clone();
                let sink = sink.clone();
                move |value: T| {
                    let current = generation.get() + 1;
                    generation.set(current);

                    // Cancel first, then activate
                    let previous = inner.borrow_mut().take();
                    drop(previous);
                    inner_active.set(false);

                    let stream = match project(value) {
                        Ok(stream) => stream,
                        Err(error) => {
                            sink.error(error);
                            return;
                        }
                    };

                    inner_active.set(true);
                    let downstream = sink.clone();
                    let for_error = sink.clone();
                    let for_complete = sink.clone();
                    let generation_for_next = generation.clone();
                    let generation_for_error = generation.clone();
                    let generation_for_complete = generation.clone();
                    let inner_active_for_complete = inner_active.clone();
                    let outer_done_for_complete = outer_done.clone();
                    // A cancelled inner stays silent even if its source
                    // already snapshotted it
                    let subscription = stream.subscribe_with(Sink::new(
                        move |value| {
                            if generation_for_next.get() == current {
                                downstream.next(value);
                            }
                        },
                        move |error| {
                            if generation_for_error.get() == current {
                                for_error.error(error);
                            }
                        },
                        move || {
                            if generation_for_complete.get() == current {
                                inner_active_for_complete.set(false);
                                if outer_done_for_complete.get() {
                                    for_complete.complete();
                                }
                            }
                        },
                    ));

                    // A re-entrant emission may have superseded this inner
                    // while it was subscribing.
                    if generation.get() == current {
                        *inner.borrow_mut() = Some(subscription);
                    } else {
                        drop(subscription);
                    }
                }
            };

            let for_error = sink.clone();
            let for_complete = sink.clone();
            let outer_done_for_complete = outer_done.clone();
            let inner_active_for_complete = inner_active.clone();
            let outer = source.subscribe_with(Sink::new(
                on_next,
                move |error| for_error.error(error),
                move || {
                    outer_done_for_complete.set(true);
                    if !inner_active_for_complete.get() {
                        for_complete.complete();
                    }
                },
            ));

            Subscription::new(move || {
                generation.set(generation.get() + 1);
                drop(outer);
                let current = inner.borrow_mut().take();
                drop(current);
            })
        })
    }

    /// Infallible [`Stream::try_switch_map`].
    pub fn switch_map<U: 'static>(&self, project: impl Fn(T) -> Stream<U> + 'static) -> Stream<U> {
        self.try_switch_map(move |value| Ok(project(value)))
    }
}

// =============================================================================
// Combination
// =============================================================================

/// Interleave values of all `streams`; completes when all have completed.
pub fn merge<T: 'static>(streams: Vec<Stream<T>>) -> Stream<T> {
    Stream::new(move |sink: Sink<T>| {
        let remaining = Rc::new(Cell::new(streams.len()));
        if streams.is_empty() {
            sink.complete();
            return Subscription::empty();
        }

        let subscriptions = streams
            .iter()
            .map(|stream| {
                let downstream = sink.clone();
                let for_error = sink.clone();
                let for_complete = sink.clone();
                let remaining = remaining.clone();
                stream.subscribe_with(Sink::new(
                    move |value| downstream.next(value),
                    move |error| for_error.error(error),
                    move || {
                        remaining.set(remaining.get().saturating_sub(1));
                        if remaining.get() == 0 {
                            for_complete.complete();
                        }
                    },
                ))
            })
            .collect();

        Subscription::all(subscriptions)
    })
}

/// Emit the pair of latest values whenever either side emits, once both
/// have produced a value.
pub fn combine_latest<A, B>(first: &Stream<A>, second: &Stream<B>) -> Stream<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let first = first.clone();
    let second = second.clone();
    Stream::new(move |sink: Sink<(A, B)>| {
        let latest: Rc<RefCell<(Option<A>, Option<B>)>> = Rc::new(RefCell::new((None, None)));
        let remaining = Rc::new(Cell::new(2usize));

        let emit = {
            let latest = latest.clone();
            let sink = sink.clone();
            Rc::new(move || {
                let pair = match &*latest.borrow() {
                    (Some(a), Some(b)) => Some((a.clone(), b.clone())),
                    _ => None,
                };
                if let Some(pair) = pair {
                    sink.next(pair);
                }
            })
        };

        let on_complete = {
            let sink = sink.clone();
            Rc::new(move || {
                remaining.set(remaining.get().saturating_sub(1));
                if remaining.get() == 0 {
                    sink.complete();
                }
            })
        };

        let left = {
            let latest = latest.clone();
            let emit = emit.clone();
            let for_error = sink.clone();
            let on_complete = on_complete.clone();
            first.subscribe_with(Sink::new(
                move |value| {
                    latest.borrow_mut().0 = Some(value);
                    emit();
                },
                move |error| for_error.error(error),
                move || on_complete(),
            ))
        };

        let right = {
            let for_error = sink.clone();
            second.subscribe_with(Sink::new(
                move |value| {
                    latest.borrow_mut().1 = Some(value);
                    emit();
                },
                move |error| for_error.error(error),
                move || on_complete(),
            ))
        };

        Subscription::all(vec![left, right])
    })
}

/// Three-way [`combine_latest`].
pub fn combine_latest3<A, B, C>(
    first: &Stream<A>,
    second: &Stream<B>,
    third: &Stream<C>,
) -> Stream<(A, B, C)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    combine_latest(&combine_latest(first, second), third).map(|((a, b), c)| (a, b, c))
}

// =============================================================================
// Tests
// =============================================================================
