//! Media query lists.
//!
//! Query matching is driven by the host: [`set_media_match`] records the
//! current result and dispatches `Change` on the query's target when it flips.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;

use super::events::{dispatch_event, from_event, EventKind, EventTarget};
use crate::stream::Stream;

thread_local! {
    static MATCHES: RefCell<HashMap<String, bool>> = RefCell::new(HashMap::new());
}

/// Whether `query` currently matches. Unknown queries do not match.
pub fn media_matches(query: &str) -> bool {
    MATCHES.with(|matches| matches.borrow().get(query).copied().unwrap_or(false))
}

/// Record the result of `query`, dispatching `Change` when it differs.
pub fn set_media_match(query: &str, matches: bool) {
    let previous = MATCHES.with(|map| map.borrow_mut().insert(query.to_string(), matches));
    if previous.unwrap_or(false) != matches {
        debug!(query, matches, "media query changed");
        dispatch_event(EventTarget::Media(query.to_string()), EventKind::Change);
    }
}

/// Stream whether `query` matches: the current result on subscribe, then
/// every change.
pub fn watch_media(query: &str) -> Stream<bool> {
    let query = query.to_string();
    let current = query.clone();
    from_event(EventTarget::Media(query.clone()), EventKind::Change)
        .map(move |_| media_matches(&query))
        .start_with_fn(move || media_matches(&current))
        .distinct_until_changed()
}

pub(crate) fn reset() {
    MATCHES.with(|matches| matches.borrow_mut().clear());
}
