//! Clipboard Bridge - Copy-success events from a clipboard library.
//!
//! The copy itself is done by an external library bound to the copy
//! buttons. The bridge constructs that library lazily, at most once, and
//! turns its success callback into a multicast stream.
//!
//! # Example
//!
//! ```ignore
//! use site_reactive::state::clipboard::{inject_copy_buttons, ClipboardBridge};
//!
//! inject_copy_buttons("pre > code", ".md-clipboard");
//! let bridge = ClipboardBridge::new(library, ".md-clipboard");
//! let messages = copied_messages(&bridge.watch(), "Copied to clipboard");
//! ```

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::dom::{children_of, create_child, get_attribute, get_elements, parent_of, set_attribute};
use crate::stream::{Sink, Stream, Subject};

// =============================================================================
// Types
// =============================================================================

/// What the library did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardAction {
    Copy,
    Cut,
}

/// A successful clipboard operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEvent {
    pub action: ClipboardAction,
    /// Text placed on the clipboard.
    pub text: String,
    /// The button that triggered the copy.
    pub trigger: usize,
}

/// An external clipboard library.
pub trait ClipboardLibrary {
    /// Whether the environment can copy at all.
    fn is_supported(&self) -> bool;

    /// Construct the library instance for buttons matching `selector`.
    /// `on_success` runs after every successful copy.
    fn attach(&self, selector: &str, on_success: Box<dyn Fn(ClipboardEvent)>);
}

impl<L: ClipboardLibrary + ?Sized> ClipboardLibrary for Rc<L> {
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn attach(&self, selector: &str, on_success: Box<dyn Fn(ClipboardEvent)>) {
        (**self).attach(selector, on_success);
    }
}

// =============================================================================
// Bridge
// =============================================================================

/// Lazily constructed, multicast view of a [`ClipboardLibrary`].
pub struct ClipboardBridge<L> {
    library: Rc<L>,
    selector: String,
    events: Subject<ClipboardEvent>,
    attached: Rc<Cell<bool>>,
}

impl<L: ClipboardLibrary + 'static> ClipboardBridge<L> {
    pub fn new(library: L, selector: &str) -> Self {
        Self {
            library: Rc::new(library),
            selector: selector.to_string(),
            events: Subject::new(),
            attached: Rc::new(Cell::new(false)),
        }
    }

    /// Stream of copy-success events.
    ///
    /// Unsupported environments get a stream that never emits, errors or
    /// completes, and the library is never constructed.
    pub fn watch(&self) -> Stream<ClipboardEvent> {
        if !self.library.is_supported() {
            debug!("clipboard unsupported");
            return Stream::never();
        }

        let library = Rc::clone(&self.library);
        let selector = self.selector.clone();
        let events = self.events.clone();
        let attached = Rc::clone(&self.attached);
        Stream::new(move |sink: Sink<ClipboardEvent>| {
            let subscription = events.stream().subscribe_with(sink);
            if !attached.replace(true) {
                debug!(selector = %selector, "constructing clipboard library");
                let events = events.clone();
                library.attach(&selector, Box::new(move |event| events.next(event)));
            }
            subscription
        })
    }
}

/// Map copy events to the message shown to the reader.
pub fn copied_messages(events: &Stream<ClipboardEvent>, message: &str) -> Stream<String> {
    let message = message.to_string();
    events.map(move |_| message.clone())
}

// =============================================================================
// Copy Buttons
// =============================================================================

/// Append a copy button to every code block matching `code_selector`.
///
/// Each block's parent gets an `id` of the form `__code_N`; the button
/// targets its code element through `data-clipboard-target`. Blocks that
/// already carry a button are skipped. Returns the new buttons.
pub fn inject_copy_buttons(code_selector: &str, button_class: &str) -> Vec<usize> {
    let class = button_class.trim_start_matches('.');
    let mut buttons = Vec::new();

    for (n, code) in get_elements(code_selector, None).into_iter().enumerate() {
        let Some(block) = parent_of(code) else { continue };
        let has_button = children_of(block).into_iter().any(|child| {
            get_attribute(child, "class").is_some_and(|c| c.split_whitespace().any(|name| name == class))
        });
        if has_button {
            continue;
        }

        let id = get_attribute(block, "id").unwrap_or_else(|| {
            let id = format!("__code_{n}");
            set_attribute(block, "id", &id);
            id
        });
        let button = create_child(block, "button", None);
        set_attribute(button, "class", class);
        set_attribute(button, "title", "Copy to clipboard");
        set_attribute(button, "data-clipboard-target", &format!("#{id} > code"));
        buttons.push(button);
    }

    buttons
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::dom::{create_element, reset_document};
    use crate::stream::testing::record;

    #[derive(Default)]
    struct FakeLibrary {
        supported: bool,
        constructions: Rc<Cell<usize>>,
        on_success: Rc<RefCell<Option<Box<dyn Fn(ClipboardEvent)>>>>,
    }

    impl ClipboardLibrary for FakeLibrary {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn attach(&self, _selector: &str, on_success: Box<dyn Fn(ClipboardEvent)>) {
            self.constructions.set(self.constructions.get() + 1);
            *self.on_success.borrow_mut() = Some(on_success);
        }
    }

    fn copy_event(text: &str) -> ClipboardEvent {
        ClipboardEvent {
            action: ClipboardAction::Copy,
            text: text.to_string(),
            trigger: 0,
        }
    }

    #[test]
    fn test_unsupported_never_constructs_or_emits() {
        let library = FakeLibrary::default();
        let constructions = library.constructions.clone();
        let bridge = ClipboardBridge::new(library, ".md-clipboard");

        let recorder = record(&bridge.watch());
        assert_eq!(constructions.get(), 0);
        assert!(recorder.values().is_empty());
        assert!(recorder.errors().is_empty());
        assert!(!recorder.completed());
    }

    #[test]
    fn test_constructs_once_and_multicasts() {
        let library = FakeLibrary {
            supported: true,
            ..Default::default()
        };
        let constructions = library.constructions.clone();
        let on_success = library.on_success.clone();
        let bridge = ClipboardBridge::new(library, ".md-clipboard");

        let events = bridge.watch();
        assert_eq!(constructions.get(), 0, "construction waits for a subscriber");

        let first = record(&events);
        let second = record(&bridge.watch());
        drop(first);
        let third = record(&events);
        assert_eq!(constructions.get(), 1);

        if let Some(callback) = on_success.borrow().as_ref() {
            callback(copy_event("cargo add tracing"));
        }
        assert_eq!(second.values(), vec![copy_event("cargo add tracing")]);
        assert_eq!(third.values().len(), 1);
    }

    #[test]
    fn test_copied_messages() {
        let subject = Subject::new();
        let recorder = record(&copied_messages(&subject.stream(), "Copied to clipboard"));
        subject.next(copy_event("x"));
        assert_eq!(recorder.values(), vec!["Copied to clipboard".to_string()]);
    }

    #[test]
    fn test_inject_copy_buttons_is_idempotent() {
        reset_document();
        let body = create_element("body", None);
        let pre = create_child(body, "pre", None);
        let _code = create_child(pre, "code", None);
        let named = create_child(body, "pre", Some("listing"));
        let _named_code = create_child(named, "code", None);

        let buttons = inject_copy_buttons("pre > code", ".md-clipboard");
        assert_eq!(buttons.len(), 2);
        assert_eq!(get_attribute(pre, "id").as_deref(), Some("__code_0"));
        assert_eq!(
            get_attribute(buttons[1], "data-clipboard-target").as_deref(),
            Some("#listing > code")
        );

        assert!(inject_copy_buttons("pre > code", ".md-clipboard").is_empty());
    }
}
