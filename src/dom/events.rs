//! Event dispatch for the document model.
//!
//! Listeners are registered per `(target, kind)` and identified by a
//! [`ListenerId`] so adapters can remove exactly what they added.
//! [`from_event`] wraps a registration in a [`Stream`] whose subscription
//! owns the listener.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use crate::stream::{Sink, Stream, Subscription};

// =============================================================================
// Types
// =============================================================================

/// Kinds of events the document dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Focus,
    Blur,
    Change,
    Click,
    BeforePrint,
    AfterPrint,
}

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Element(usize),
    /// A media query list, keyed by its query text.
    Media(String),
}

/// A dispatched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub target: EventTarget,
}

/// Handle for removing a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&Event)>;

struct Registration {
    id: ListenerId,
    target: EventTarget,
    kind: EventKind,
    listener: Listener,
}

thread_local! {
    static LISTENERS: RefCell<Vec<Registration>> = RefCell::new(Vec::new());
    static NEXT_LISTENER_ID: Cell<u64> = const { Cell::new(0) };
}

// =============================================================================
// Registration
// =============================================================================

/// Attach a listener. Listeners fire in registration order.
pub fn add_event_listener(
    target: EventTarget,
    kind: EventKind,
    listener: impl Fn(&Event) + 'static,
) -> ListenerId {
    let id = NEXT_LISTENER_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        ListenerId(id)
    });
    trace!(?target, ?kind, "listener added");
    LISTENERS.with(|listeners| {
        listeners.borrow_mut().push(Registration {
            id,
            target,
            kind,
            listener: Rc::new(listener),
        });
    });
    id
}

/// Detach a listener. Unknown ids are ignored.
pub fn remove_event_listener(id: ListenerId) {
    LISTENERS.with(|listeners| listeners.borrow_mut().retain(|registration| registration.id != id));
}

/// Number of listeners attached for `(target, kind)`.
pub fn listener_count(target: &EventTarget, kind: EventKind) -> usize {
    LISTENERS.with(|listeners| {
        listeners
            .borrow()
            .iter()
            .filter(|registration| &registration.target == target && registration.kind == kind)
            .count()
    })
}

/// Dispatch an event to every listener attached at dispatch time and still
/// attached when its turn comes.
pub fn dispatch_event(target: EventTarget, kind: EventKind) {
    // Snapshot first: listeners may add or remove listeners
    let matching: Vec<(ListenerId, Listener)> = LISTENERS.with(|listeners| {
        listeners
            .borrow()
            .iter()
            .filter(|registration| registration.target == target && registration.kind == kind)
            .map(|registration| (registration.id, Rc::clone(&registration.listener)))
            .collect()
    });

    let event = Event { kind, target };
    for (id, listener) in matching {
        // Removed by an earlier listener of this dispatch
        if !is_attached(id) {
            continue;
        }
        listener(&event);
    }
}

fn is_attached(id: ListenerId) -> bool {
    LISTENERS.with(|listeners| listeners.borrow().iter().any(|registration| registration.id == id))
}

/// Drop every listener attached to an element.
pub(crate) fn release_target(index: usize) {
    let target = EventTarget::Element(index);
    LISTENERS.with(|listeners| listeners.borrow_mut().retain(|registration| registration.target != target));
}

pub(crate) fn reset() {
    LISTENERS.with(|listeners| listeners.borrow_mut().clear());
}

// =============================================================================
// Streams
// =============================================================================

/// Stream of `kind` events on `target`. The listener is attached on
/// subscribe and removed on unsubscribe.
pub fn from_event(target: EventTarget, kind: EventKind) -> Stream<Event> {
    Stream::new(move |sink: Sink<Event>| {
        let id = add_event_listener(target.clone(), kind, move |event| sink.next(event.clone()));
        Subscription::new(move || remove_event_listener(id))
    })
}
