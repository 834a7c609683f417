//! Print Patch - Expand collapsible blocks before printing.

use tracing::debug;

use crate::dom::{from_event, get_elements, set_attribute, watch_media, EventKind, EventTarget};
use crate::stream::{merge, Stream};

/// Fires when printing starts: the print media query turning true, or the
/// window's `beforeprint` event.
pub fn print_trigger(print_query: &str) -> Stream<()> {
    merge(vec![
        watch_media(print_query).filter(|matches| *matches).map(|_| ()),
        from_event(EventTarget::Window, EventKind::BeforePrint).map(|_| ()),
    ])
}

/// Open every element matching `selector` on each trigger.
///
/// Elements are re-queried per trigger, so blocks added after setup are
/// included. Emits the patched elements. Shared, replays the latest list.
pub fn patch_details(trigger: &Stream<()>, selector: &str) -> Stream<Vec<usize>> {
    let selector = selector.to_string();
    trigger
        .map(move |()| {
            let details = get_elements(&selector, None);
            for &el in &details {
                set_attribute(el, "open", "");
            }
            debug!(count = details.len(), "opened details for print");
            details
        })
        .share_replay()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{create_child, create_element, dispatch_event, has_attribute, reset_document, set_media_match};
    use crate::stream::testing::record;

    #[test]
    fn test_patch_opens_all_details() {
        reset_document();
        let body = create_element("body", None);
        let details: Vec<usize> = (0..3).map(|_| create_child(body, "details", None)).collect();
        set_attribute(details[0], "open", "");
        set_attribute(details[2], "open", "");

        let recorder = record(&patch_details(&print_trigger("print"), "details"));
        assert!(recorder.values().is_empty(), "nothing happens before printing");

        dispatch_event(EventTarget::Window, EventKind::BeforePrint);

        assert!(details.iter().all(|&el| has_attribute(el, "open")));
        assert_eq!(recorder.values(), vec![details.clone()]);
    }

    #[test]
    fn test_print_media_query_triggers() {
        reset_document();
        let body = create_element("body", None);
        let block = create_child(body, "details", None);

        let recorder = record(&patch_details(&print_trigger("print"), "details"));
        set_media_match("print", true);
        set_media_match("print", false);

        assert!(has_attribute(block, "open"));
        assert_eq!(recorder.values().len(), 1, "turning false does not trigger");
    }
}
