//! Document focus.
//!
//! A single active element, held in a signal so effects can track it.
//! Moving focus blurs the previous element before focusing the next one,
//! dispatching `Blur` and `Focus` events on each.

use spark_signals::{signal, Signal};

use super::events::{dispatch_event, EventKind, EventTarget};

thread_local! {
    static ACTIVE_ELEMENT: Signal<Option<usize>> = signal(None);
}

/// The currently focused element.
pub fn active_element() -> Option<usize> {
    ACTIVE_ELEMENT.with(|s| s.get())
}

/// Focus `index`, blurring the previous active element first.
pub fn focus_element(index: usize) {
    let previous = active_element();
    if previous == Some(index) {
        return;
    }
    if let Some(previous) = previous {
        blur_element(previous);
    }
    ACTIVE_ELEMENT.with(|s| s.set(Some(index)));
    dispatch_event(EventTarget::Element(index), EventKind::Focus);
}

/// Blur `index` if it is the active element.
pub fn blur_element(index: usize) {
    if active_element() != Some(index) {
        return;
    }
    ACTIVE_ELEMENT.with(|s| s.set(None));
    dispatch_event(EventTarget::Element(index), EventKind::Blur);
}

pub(crate) fn reset() {
    ACTIVE_ELEMENT.with(|s| s.set(None));
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::dom::{add_event_listener, create_element, reset_document};

    #[test]
    fn test_focus_moves_with_blur_first() {
        reset_document();
        let a = create_element("input", None);
        let b = create_element("input", None);

        let log = Rc::new(RefCell::new(Vec::new()));
        for index in [a, b] {
            for kind in [EventKind::Focus, EventKind::Blur] {
                let log = log.clone();
                add_event_listener(EventTarget::Element(index), kind, move |event| {
                    log.borrow_mut().push((index, event.kind));
                });
            }
        }

        focus_element(a);
        focus_element(b);
        focus_element(b);

        assert_eq!(active_element(), Some(b));
        assert_eq!(
            *log.borrow(),
            vec![(a, EventKind::Focus), (a, EventKind::Blur), (b, EventKind::Focus)]
        );
    }

    #[test]
    fn test_blur_ignores_inactive_element() {
        reset_document();
        let a = create_element("input", None);
        let b = create_element("input", None);

        focus_element(a);
        blur_element(b);
        assert_eq!(active_element(), Some(a));
        blur_element(a);
        assert_eq!(active_element(), None);
    }
}
