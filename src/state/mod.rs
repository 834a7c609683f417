//! State Module - Element-level reactive state
//!
//! - **Focus** - Focus/blur of a single element as a shared boolean stream
//! - **Clipboard** - Copy-success events from the clipboard library, copy buttons

pub mod clipboard;
pub mod focus;

pub use clipboard::{
    copied_messages, inject_copy_buttons, ClipboardAction, ClipboardBridge, ClipboardEvent,
    ClipboardLibrary,
};
pub use focus::watch_element_focus;
