//! Document Model - A minimal, single-threaded DOM.
//!
//! Elements are indices into parallel arrays (see [`arrays`]), allocated by
//! the [`registry`]. On top of that sit:
//! - [`query`] - selector matching
//! - [`events`] - listener registration, dispatch, event streams
//! - [`focus`] - active element tracking
//! - [`media`] - media query results driven by the host
//!
//! All state is thread-local. Tests call [`reset_document`] first.

pub mod arrays;
pub mod events;
pub mod focus;
pub mod media;
pub mod query;
pub mod registry;

pub use arrays::{
    children_of, get_attribute, get_style, has_attribute, offset_height, offset_top, parent_of,
    remove_attribute, remove_style, set_attribute, set_layout_box, set_style, tag_name,
};
pub use events::{
    add_event_listener, dispatch_event, from_event, listener_count, remove_event_listener, Event,
    EventKind, EventTarget, ListenerId,
};
pub use focus::{active_element, blur_element, focus_element};
pub use media::{media_matches, set_media_match, watch_media};
pub use query::{get_element, get_elements, matches};
pub use registry::{
    append_child, create_child, create_element, element_count, get_element_by_id, is_allocated,
    release_element, reset_document,
};
