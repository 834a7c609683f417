//! Sidebar - Navigation sidebar geometry on wide screens.
//!
//! The sidebar follows the main area: it is as tall as the visible part of
//! the main area and locks below the header once the page has scrolled past
//! the sidebar's own offset inside its container.

use tracing::debug;

use crate::dom::{offset_top, parent_of, remove_attribute, remove_style, set_attribute, set_style};
use crate::stream::{combine_latest, Stream};
use crate::types::{HeaderState, MainState, SidebarState, Viewport};

/// Offset of the sidebar's container inside its own parent.
fn container_adjust(index: usize) -> f64 {
    match parent_of(index) {
        Some(parent) => offset_top(parent) - parent_of(parent).map(offset_top).unwrap_or(0.0),
        None => 0.0,
    }
}

/// Compute the sidebar snapshot.
pub fn compute_sidebar(adjust: f64, main: &MainState, viewport: &Viewport) -> SidebarState {
    let y = viewport.offset.y;
    SidebarState {
        height: main.height + adjust.min((y - main.offset).max(0.0)) - adjust,
        lock: y >= main.offset + adjust,
    }
}

/// Watch the sidebar at `index`.
pub fn watch_sidebar(index: usize, main: &Stream<MainState>, viewport: &Stream<Viewport>) -> Stream<SidebarState> {
    let adjust = container_adjust(index);
    combine_latest(main, viewport)
        .map(move |(main, viewport)| compute_sidebar(adjust, &main, &viewport))
        .distinct_until_changed()
}

/// Apply sidebar snapshots to the element.
///
/// Writes `height`, the lock state and, while locked, `top` (the header
/// height). Everything is reset when the subscription ends.
pub fn paint_sidebar(
    index: usize,
    header: &Stream<HeaderState>,
    states: &Stream<SidebarState>,
) -> Stream<SidebarState> {
    states
        .with_latest_from(header)
        .tap(move |(state, header)| {
            set_style(index, "height", &format!("{}px", state.height));
            if state.lock {
                set_attribute(index, "data-md-state", "lock");
                set_style(index, "top", &format!("{}px", header.height));
            } else {
                remove_attribute(index, "data-md-state");
                remove_style(index, "top");
            }
        })
        .map(|(state, _)| state)
        .finalize(move || {
            debug!(index, "resetting sidebar");
            remove_style(index, "top");
            remove_style(index, "height");
            remove_attribute(index, "data-md-state");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{create_child, create_element, get_attribute, get_style, reset_document, set_layout_box};
    use crate::stream::testing::record;
    use crate::stream::Subject;

    fn main_state() -> MainState {
        MainState { offset: 50.0, height: 400.0, active: false }
    }

    #[test]
    fn test_compute_sidebar() {
        let above = compute_sidebar(20.0, &main_state(), &Viewport::new(0.0, 1024.0, 800.0));
        assert_eq!(above, SidebarState { height: 380.0, lock: false });

        let locked = compute_sidebar(20.0, &main_state(), &Viewport::new(100.0, 1024.0, 800.0));
        assert_eq!(locked, SidebarState { height: 400.0, lock: true });
    }

    #[test]
    fn test_watch_sidebar_reads_container_offset() {
        reset_document();
        let container = create_element("div", None);
        set_layout_box(container, 100.0, 1000.0);
        let inner = create_child(container, "div", None);
        set_layout_box(inner, 130.0, 900.0);
        let sidebar = create_child(inner, "div", None);

        let viewport = Subject::new();
        let recorder = record(&watch_sidebar(sidebar, &Stream::of(main_state()), &viewport.stream()));
        viewport.next(Viewport::new(0.0, 1024.0, 800.0));
        viewport.next(Viewport::new(0.0, 800.0, 800.0));

        assert_eq!(recorder.values(), vec![SidebarState { height: 370.0, lock: false }]);
    }

    #[test]
    fn test_paint_sidebar_writes_and_resets() {
        reset_document();
        let sidebar = create_element("div", None);
        let states = Subject::new();
        let header = Stream::of(HeaderState { height: 48.0, sticky: true });

        let recorder = record(&paint_sidebar(sidebar, &header, &states.stream()));
        states.next(SidebarState { height: 380.0, lock: false });
        assert_eq!(get_style(sidebar, "height").as_deref(), Some("380px"));
        assert_eq!(get_attribute(sidebar, "data-md-state"), None);

        states.next(SidebarState { height: 400.0, lock: true });
        assert_eq!(get_attribute(sidebar, "data-md-state").as_deref(), Some("lock"));
        assert_eq!(get_style(sidebar, "top").as_deref(), Some("48px"));
        assert_eq!(recorder.values().len(), 2);

        drop(recorder);
        assert_eq!(get_style(sidebar, "height"), None);
        assert_eq!(get_style(sidebar, "top"), None);
        assert_eq!(get_attribute(sidebar, "data-md-state"), None);
    }
}
