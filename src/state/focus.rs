//! Focus Watcher - Element focus as a live boolean stream.
//!
//! ```ignore
//! use site_reactive::state::focus::watch_element_focus;
//!
//! let search = get_element("[data-md-component=search-query]", None)?;
//! let focused = watch_element_focus(search);
//! let _sub = focused.subscribe(|active| println!("search focused: {active}"));
//! ```

use tracing::trace;

use crate::dom::{active_element, from_event, EventKind, EventTarget};
use crate::stream::{merge, Stream};

/// Watch whether `index` has focus.
///
/// - Emits the element's focus state at subscribe time, then `true` on
///   focus and `false` on blur.
/// - All subscribers share one focus and one blur listener; the last
///   unsubscribe removes both.
/// - Late subscribers receive the latest value immediately.
pub fn watch_element_focus(index: usize) -> Stream<bool> {
    let target = EventTarget::Element(index);
    merge(vec![
        from_event(target.clone(), EventKind::Focus).map(|_| true),
        from_event(target, EventKind::Blur).map(|_| false),
    ])
    .start_with_fn(move || active_element() == Some(index))
    .tap(move |focused| trace!(index, focused, "focus"))
    .share_replay()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{blur_element, create_element, focus_element, listener_count, reset_document};
    use crate::stream::testing::record;

    #[test]
    fn test_initial_value_reflects_current_focus() {
        reset_document();
        let input = create_element("input", None);
        let other = create_element("input", None);
        focus_element(input);

        assert_eq!(record(&watch_element_focus(input)).values(), vec![true]);
        assert_eq!(record(&watch_element_focus(other)).values(), vec![false]);
    }

    #[test]
    fn test_focus_then_blur() {
        reset_document();
        let input = create_element("input", None);
        let recorder = record(&watch_element_focus(input));

        focus_element(input);
        blur_element(input);

        assert_eq!(recorder.values(), vec![false, true, false]);
    }

    #[test]
    fn test_late_subscriber_gets_latest_value() {
        reset_document();
        let input = create_element("input", None);
        let focused = watch_element_focus(input);

        let _first = record(&focused);
        focus_element(input);

        let late = record(&focused);
        assert_eq!(late.values(), vec![true]);
    }

    #[test]
    fn test_listeners_shared_and_removed_on_last_unsubscribe() {
        reset_document();
        let input = create_element("input", None);
        let target = EventTarget::Element(input);
        let focused = watch_element_focus(input);

        let first = record(&focused);
        let second = record(&focused);
        assert_eq!(listener_count(&target, EventKind::Focus), 1);
        assert_eq!(listener_count(&target, EventKind::Blur), 1);

        drop(first);
        assert_eq!(listener_count(&target, EventKind::Focus), 1);
        drop(second);
        assert_eq!(listener_count(&target, EventKind::Focus), 0);
        assert_eq!(listener_count(&target, EventKind::Blur), 0);
    }

    #[test]
    fn test_focus_branch_inside_watch_follows_scroll_after_focus_moves() {
        use spark_signals::{flush_sync, signal};

        use crate::pipeline::ViewportSignals;
        use crate::stream::{combine_latest, watch};
        use crate::types::Viewport;

        reset_document();
        let input = create_element("input", None);
        let other = create_element("input", None);
        let viewport = ViewportSignals::new(Viewport::new(0.0, 1024.0, 800.0));
        let mode = signal(0);

        let mode_clone = mode.clone();
        let viewport_clone = viewport.clone();
        let branch = watch(move || mode_clone.get()).switch_map(move |_| {
            combine_latest(&watch_element_focus(input), &viewport_clone.watch())
                .map(|(focused, viewport)| (focused, viewport.offset.y))
        });
        let recorder = record(&branch);
        flush_sync();

        // Reading the active element while subscribing must not tie the branch to it
        focus_element(other);
        flush_sync();
        viewport.scroll_to(60.0);
        flush_sync();

        assert_eq!(recorder.values(), vec![(false, 0.0), (false, 60.0)]);
    }
}
