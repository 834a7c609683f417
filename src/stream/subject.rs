//! Hot multicast source.
//!
//! A [`Subject`] pushes imperatively to every currently attached subscriber.
//! It does not replay: subscribers only see values pushed after they attach.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::Error;

use super::{Sink, Stream, Subscription};

/// Imperative multicast event source.
pub struct Subject<T> {
    sinks: Rc<RefCell<Vec<(u64, Sink<T>)>>>,
    next_id: Rc<Cell<u64>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            sinks: Rc::clone(&self.sinks),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    pub fn new() -> Self {
        Self {
            sinks: Rc::new(RefCell::new(Vec::new())),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    /// Sinks attached at the start of a notification. A sink detached by an
    /// earlier one during the same notification is skipped.
    fn for_each_attached(&self, f: impl Fn(&Sink<T>)) {
        let snapshot: Vec<(u64, Sink<T>)> = self.sinks.borrow().clone();
        for (id, sink) in &snapshot {
            let attached = self.sinks.borrow().iter().any(|(sink_id, _)| sink_id == id);
            if attached {
                f(sink);
            }
        }
    }

    /// Push a value to every attached subscriber.
    pub fn next(&self, value: T) {
        self.for_each_attached(|sink| sink.next(value.clone()));
    }

    /// Fail every attached subscriber.
    pub fn error(&self, error: Error) {
        self.for_each_attached(|sink| sink.error(error.clone()));
    }

    /// Complete every attached subscriber.
    pub fn complete(&self) {
        self.for_each_attached(Sink::complete);
    }

    /// Number of attached subscribers.
    pub fn observer_count(&self) -> usize {
        self.sinks.borrow().len()
    }

    /// Stream view of the subject.
    pub fn stream(&self) -> Stream<T> {
        let sinks = Rc::clone(&self.sinks);
        let next_id = Rc::clone(&self.next_id);
        Stream::new(move |sink| {
            let id = next_id.get();
            next_id.set(id + 1);
            sinks.borrow_mut().push((id, sink));

            let sinks = Rc::clone(&sinks);
            Subscription::new(move || {
                sinks.borrow_mut().retain(|(sink_id, _)| *sink_id != id);
            })
        })
    }
}
