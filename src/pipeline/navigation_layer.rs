//! Navigation Layer - Drill-down navigation levels on narrow screens.
//!
//! Each level carries a toggle `input` as its first input child. Checking a
//! toggle slides its level in; the active layer is the last level (in
//! document order) whose toggle is checked, or the first level otherwise.

use tracing::{debug, warn};

use crate::dom::{children_of, from_event, has_attribute, remove_style, set_style, tag_name, EventKind, EventTarget};
use crate::stream::{merge, Stream};
use crate::types::NavigationLayer;

const SCROLLING: &str = "-webkit-overflow-scrolling";

/// Toggle input of a level.
fn level_toggle(level: usize) -> Option<usize> {
    children_of(level).into_iter().find(|&child| tag_name(child) == "input")
}

fn active_layer(levels: &[(usize, Option<usize>)]) -> NavigationLayer {
    let layer = levels
        .iter()
        .rev()
        .find(|(_, toggle)| toggle.is_some_and(|input| has_attribute(input, "checked")))
        .or_else(|| levels.first())
        .map(|(level, _)| *level)
        .unwrap_or_default();
    NavigationLayer { layer }
}

/// Watch which of `levels` is the active layer.
///
/// Emits on subscribe and whenever any level's toggle dispatches `Change`.
/// Without levels the stream never emits.
pub fn watch_navigation_layer(levels: &[usize]) -> Stream<NavigationLayer> {
    if levels.is_empty() {
        warn!("navigation has no levels");
        return Stream::never();
    }

    let table: Vec<(usize, Option<usize>)> = levels.iter().map(|&level| (level, level_toggle(level))).collect();
    let changes = table
        .iter()
        .filter_map(|(_, toggle)| *toggle)
        .map(|input| from_event(EventTarget::Element(input), EventKind::Change))
        .collect();

    let current = table.clone();
    merge(changes)
        .map(move |_| active_layer(&table))
        .start_with_fn(move || active_layer(&current))
        .distinct_until_changed()
}

/// Enable momentum scrolling on the active layer only. All levels are
/// reset when the subscription ends.
pub fn paint_navigation_layer(levels: &[usize], layers: &Stream<NavigationLayer>) -> Stream<NavigationLayer> {
    let levels = levels.to_vec();
    let reset = levels.clone();
    layers
        .tap(move |NavigationLayer { layer }| {
            for &level in &levels {
                remove_style(level, SCROLLING);
            }
            set_style(*layer, SCROLLING, "touch");
        })
        .finalize(move || {
            debug!(levels = reset.len(), "resetting navigation layers");
            for &level in &reset {
                remove_style(level, SCROLLING);
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{create_child, create_element, dispatch_event, get_style, remove_attribute, reset_document, set_attribute};
    use crate::stream::testing::record;

    /// Three nested levels, each with its toggle.
    fn nested_levels() -> (Vec<usize>, Vec<usize>) {
        let root = create_element("nav", None);
        let mut levels = vec![root];
        let mut toggles = vec![create_child(root, "input", None)];
        let mut parent = root;
        for _ in 0..2 {
            let level = create_child(parent, "nav", None);
            toggles.push(create_child(level, "input", None));
            levels.push(level);
            parent = level;
        }
        (levels, toggles)
    }

    fn check(input: usize, checked: bool) {
        if checked {
            set_attribute(input, "checked", "");
        } else {
            remove_attribute(input, "checked");
        }
        dispatch_event(EventTarget::Element(input), EventKind::Change);
    }

    #[test]
    fn test_watch_layer_follows_deepest_checked_toggle() {
        reset_document();
        let (levels, toggles) = nested_levels();
        let recorder = record(&watch_navigation_layer(&levels));

        check(toggles[1], true);
        check(toggles[2], true);
        check(toggles[2], false);
        check(toggles[1], false);

        let layers: Vec<usize> = recorder.values().iter().map(|l| l.layer).collect();
        assert_eq!(layers, vec![levels[0], levels[1], levels[2], levels[1], levels[0]]);
    }

    #[test]
    fn test_watch_layer_without_levels_is_silent() {
        reset_document();
        let recorder = record(&watch_navigation_layer(&[]));
        assert!(recorder.values().is_empty());
        assert!(!recorder.completed());
    }

    #[test]
    fn test_paint_layer_marks_active_and_resets() {
        reset_document();
        let (levels, toggles) = nested_levels();
        let recorder = record(&paint_navigation_layer(&levels, &watch_navigation_layer(&levels)));

        assert_eq!(get_style(levels[0], SCROLLING).as_deref(), Some("touch"));
        check(toggles[1], true);
        assert_eq!(get_style(levels[0], SCROLLING), None);
        assert_eq!(get_style(levels[1], SCROLLING).as_deref(), Some("touch"));

        drop(recorder);
        assert!(levels.iter().all(|&level| get_style(level, SCROLLING).is_none()));
    }
}
