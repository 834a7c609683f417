//! Replay-latest sharing with reference counting.
//!
//! The first subscriber connects the source; every later subscriber attaches
//! to that one connection and immediately receives the most recent value.
//! When the last subscriber leaves, the connection is dropped (releasing
//! listeners and effects) and the cached value is forgotten, so the next
//! subscriber sees fresh state.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::error::Error;

use super::{Sink, Stream, Subscription};

#[derive(Clone)]
enum Terminal {
    Error(Error),
    Complete,
}

struct ShareState<T> {
    sinks: Vec<(u64, Sink<T>)>,
    next_id: u64,
    latest: Option<T>,
    terminal: Option<Terminal>,
    connection: Option<Subscription>,
    connected: bool,
}

impl<T> ShareState<T> {
    fn new() -> Self {
        Self {
            sinks: Vec::new(),
            next_id: 0,
            latest: None,
            terminal: None,
            connection: None,
            connected: false,
        }
    }

    fn is_attached(&self, id: u64) -> bool {
        self.sinks.iter().any(|(sink_id, _)| *sink_id == id)
    }
}

/// Notify the sinks attached when the notification started, skipping any
/// that an earlier sink detached in the meantime.
fn notify<T>(state: &Rc<RefCell<ShareState<T>>>, snapshot: Vec<(u64, Sink<T>)>, f: impl Fn(&Sink<T>)) {
    for (id, sink) in &snapshot {
        let attached = state.borrow().is_attached(*id);
        if attached {
            f(sink);
        }
    }
}

fn hub_sink<T: Clone + 'static>(state: &Rc<RefCell<ShareState<T>>>) -> Sink<T> {
    let for_next = Rc::clone(state);
    let for_error = Rc::clone(state);
    let for_complete = Rc::clone(state);

    Sink::new(
        move |value: T| {
            let sinks = {
                let mut state = for_next.borrow_mut();
                state.latest = Some(value.clone());
                state.sinks.clone()
            };
            notify(&for_next, sinks, |sink| sink.next(value.clone()));
        },
        move |error| {
            let sinks = {
                let mut state = for_error.borrow_mut();
                state.terminal = Some(Terminal::Error(error.clone()));
                state.sinks.clone()
            };
            notify(&for_error, sinks, |sink| sink.error(error.clone()));
        },
        move || {
            let sinks = {
                let mut state = for_complete.borrow_mut();
                state.terminal = Some(Terminal::Complete);
                state.sinks.clone()
            };
            notify(&for_complete, sinks, Sink::complete);
        },
    )
}

impl<T: Clone + 'static> Stream<T> {
    /// Share one upstream connection among all subscribers, replaying the
    /// latest value to each new one.
    pub fn share_replay(&self) -> Stream<T> {
        let source = self.clone();
        let state: Rc<RefCell<ShareState<T>>> = Rc::new(RefCell::new(ShareState::new()));

        Stream::new(move |sink: Sink<T>| {
            let (id, replay, terminal, connect) = {
                let mut shared = state.borrow_mut();
                let id = shared.next_id;
                shared.next_id += 1;
                shared.sinks.push((id, sink.clone()));
                let connect = !shared.connected;
                shared.connected = true;
                (id, shared.latest.clone(), shared.terminal.clone(), connect)
            };

            if let Some(value) = replay {
                sink.next(value);
            }
            match terminal {
                Some(Terminal::Error(error)) => sink.error(error),
                Some(Terminal::Complete) => sink.complete(),
                None => {}
            }

            if connect {
                debug!("connecting shared stream");
                let connection = source.subscribe_with(hub_sink(&state));
                // Everyone may have left while the source was emitting.
                let stale = {
                    let mut shared = state.borrow_mut();
                    if shared.sinks.is_empty() {
                        shared.connected = false;
                        shared.latest = None;
                        shared.terminal = None;
                        Some(connection)
                    } else {
                        shared.connection = Some(connection);
                        None
                    }
                };
                drop(stale);
            }

            let state = Rc::clone(&state);
            Subscription::new(move || {
                let connection = {
                    let mut shared = state.borrow_mut();
                    shared.sinks.retain(|(sink_id, _)| *sink_id != id);
                    if shared.sinks.is_empty() && shared.connected {
                        shared.connected = false;
                        shared.latest = None;
                        shared.terminal = None;
                        shared.connection.take()
                    } else {
                        None
                    }
                };
                if connection.is_some() {
                    debug!("last subscriber left, disconnecting shared stream");
                }
                drop(connection);
            })
        })
    }
}
