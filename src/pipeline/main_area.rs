//! Main-Area Geometry - Visible height and activation of the content area.
//!
//! # Geometry
//!
//! With the element box (`top`, `bottom = top + offsetHeight`) measured once
//! at mount, the header height as `adjust`, and the viewport scroll `y` and
//! height `h`:
//!
//! ```text
//! offset = top - adjust
//! height = h - max(0, top - y, adjust) - max(0, h + y - bottom)
//! active = y >= top - adjust
//! ```
//!
//! The first term subtracts whatever covers the top of the viewport (the
//! unscrolled space above the element, or the header). The second subtracts
//! the space below the element's bottom edge. `height` is not clamped.

use tracing::trace;

use crate::dom::{offset_height, offset_top};
use crate::stream::{combine_latest, Stream};
use crate::types::{HeaderState, MainState, Viewport};

/// Compute the main-area snapshot for an element box.
pub fn compute_main(top: f64, bottom: f64, adjust: f64, viewport: &Viewport) -> MainState {
    let y = viewport.offset.y;
    let h = viewport.size.height;
    MainState {
        offset: top - adjust,
        height: h - (top - y).max(adjust).max(0.0) - (h + y - bottom).max(0.0),
        active: y >= top - adjust,
    }
}

/// Watch the visible geometry of the main area at `index`.
///
/// Emits once per distinct `(offset, height, active)`. The computation is
/// shared: any number of subscribers run it once, and late subscribers
/// receive the latest snapshot.
pub fn watch_main(index: usize, header: &Stream<HeaderState>, viewport: &Stream<Viewport>) -> Stream<MainState> {
    let top = offset_top(index);
    let bottom = top + offset_height(index);

    let adjust = header.map(|header| header.height).distinct_until_changed();
    combine_latest(&adjust, viewport)
        .map(move |(adjust, viewport)| compute_main(top, bottom, adjust, &viewport))
        .distinct_until_changed()
        .tap(move |main| trace!(index, offset = main.offset, height = main.height, active = main.active, "main"))
        .share_replay()
}

/// Mount the geometry engine on every element `targets` emits.
///
/// A new target tears down the previous one's computation first.
pub fn setup_main(
    targets: &Stream<usize>,
    header: &Stream<HeaderState>,
    viewport: &Stream<Viewport>,
) -> Stream<MainState> {
    let header = header.clone();
    let viewport = viewport.clone();
    targets
        .switch_map(move |index| watch_main(index, &header, &viewport))
        .share_replay()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use spark_signals::{flush_sync, signal};

    use super::*;
    use crate::dom::{create_element, reset_document, set_layout_box};
    use crate::pipeline::viewport::{watch_header, ViewportSignals};
    use crate::stream::testing::record;
    use crate::stream::{Sink, Subject};

    fn header(height: f64) -> HeaderState {
        HeaderState { height, sticky: true }
    }

    #[test]
    fn test_compute_main_formula() {
        let at_top = compute_main(100.0, 500.0, 50.0, &Viewport::new(0.0, 1024.0, 800.0));
        assert_eq!(at_top, MainState { offset: 50.0, height: 400.0, active: false });

        let scrolled = compute_main(100.0, 500.0, 50.0, &Viewport::new(60.0, 1024.0, 800.0));
        assert_eq!(scrolled, MainState { offset: 50.0, height: 390.0, active: true });
    }

    #[test]
    fn test_compute_main_is_not_clamped() {
        // Header taller than the viewport
        let main = compute_main(100.0, 500.0, 900.0, &Viewport::new(0.0, 1024.0, 800.0));
        assert_eq!(main.height, -400.0);
        assert!(main.active);
    }

    #[test]
    fn test_watch_main_follows_scroll() {
        reset_document();
        let el = create_element("main", None);
        set_layout_box(el, 100.0, 400.0);

        let viewport = ViewportSignals::new(Viewport::new(0.0, 1024.0, 800.0));
        let header_signal = signal(header(50.0));
        let main = watch_main(el, &watch_header(&header_signal), &viewport.watch());
        let recorder = record(&main);
        flush_sync();

        viewport.scroll_to(60.0);
        flush_sync();

        assert_eq!(
            recorder.values(),
            vec![
                MainState { offset: 50.0, height: 400.0, active: false },
                MainState { offset: 50.0, height: 390.0, active: true },
            ]
        );
    }

    #[test]
    fn test_watch_main_emits_only_distinct_snapshots() {
        reset_document();
        let el = create_element("main", None);
        set_layout_box(el, 100.0, 400.0);

        let viewport = ViewportSignals::new(Viewport::new(0.0, 1024.0, 800.0));
        let header_signal = signal(header(50.0));
        let recorder = record(&watch_main(el, &watch_header(&header_signal), &viewport.watch()));
        flush_sync();

        // Width changes do not affect geometry
        viewport.resize(800.0, 800.0);
        flush_sync();
        // Sticky flag is not part of the geometry
        header_signal.set(HeaderState { height: 50.0, sticky: false });
        flush_sync();

        assert_eq!(recorder.values().len(), 1);
    }

    #[test]
    fn test_watch_main_computes_once_for_many_subscribers() {
        reset_document();
        let el = create_element("main", None);
        set_layout_box(el, 100.0, 400.0);

        let subscribes = Rc::new(Cell::new(0));
        let viewport_subject = Subject::new();
        let subscribes_clone = subscribes.clone();
        let viewport_subject_clone = viewport_subject.clone();
        let viewport = Stream::new(move |sink: Sink<Viewport>| {
            subscribes_clone.set(subscribes_clone.get() + 1);
            viewport_subject_clone.stream().subscribe_with(sink)
        });

        let main = watch_main(el, &Stream::of(header(50.0)), &viewport);
        let first = record(&main);
        let second = record(&main);
        viewport_subject.next(Viewport::new(0.0, 1024.0, 800.0));
        let late = record(&main);

        assert_eq!(subscribes.get(), 1);
        assert_eq!(first.values(), second.values());
        assert_eq!(late.values(), vec![MainState { offset: 50.0, height: 400.0, active: false }]);
        drop((first, second, late));
        assert_eq!(viewport_subject.observer_count(), 0);
    }

    #[test]
    fn test_setup_main_switches_targets() {
        reset_document();
        let first = create_element("main", None);
        set_layout_box(first, 100.0, 400.0);
        let second = create_element("main", None);
        set_layout_box(second, 200.0, 400.0);

        let targets = Subject::new();
        let viewport = Stream::of(Viewport::new(0.0, 1024.0, 800.0));
        let recorder = record(&setup_main(&targets.stream(), &Stream::of(header(50.0)), &viewport));

        targets.next(first);
        targets.next(second);

        let offsets: Vec<f64> = recorder.values().iter().map(|main| main.offset).collect();
        assert_eq!(offsets, vec![50.0, 150.0]);
    }
}
