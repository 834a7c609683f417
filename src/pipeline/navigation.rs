//! Navigation Mount - Sidebar or layered navigation, per breakpoint.
//!
//! # State Machine
//!
//! Each mount target runs a two-state machine driven by the screen signal:
//!
//! ```text
//!            screen = true
//!   Narrow ───────────────► Wide
//!   (layers) ◄─────────────  (sidebar)
//!            screen = false
//! ```
//!
//! Every transition cancels the current branch (its listeners, effects and
//! painting) before the next branch subscribes. A new target cancels the
//! whole machine of the previous target.

use std::rc::Rc;

use tracing::debug;

use crate::dom::get_elements;
use crate::stream::Stream;
use crate::types::{HeaderState, MainState, NavigationLayer, NavigationState, SidebarState, Viewport};

use super::{navigation_layer, sidebar};

/// The watch/paint pairs the composer delegates to.
pub trait NavigationCollaborators {
    fn watch_sidebar(&self, index: usize, main: &Stream<MainState>, viewport: &Stream<Viewport>) -> Stream<SidebarState>;

    fn paint_sidebar(
        &self,
        index: usize,
        header: &Stream<HeaderState>,
        states: &Stream<SidebarState>,
    ) -> Stream<SidebarState>;

    fn watch_navigation_layer(&self, levels: &[usize]) -> Stream<NavigationLayer>;

    fn paint_navigation_layer(&self, levels: &[usize], layers: &Stream<NavigationLayer>) -> Stream<NavigationLayer>;
}

/// Collaborators backed by [`sidebar`] and [`navigation_layer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNavigation;

impl NavigationCollaborators for DefaultNavigation {
    fn watch_sidebar(&self, index: usize, main: &Stream<MainState>, viewport: &Stream<Viewport>) -> Stream<SidebarState> {
        sidebar::watch_sidebar(index, main, viewport)
    }

    fn paint_sidebar(
        &self,
        index: usize,
        header: &Stream<HeaderState>,
        states: &Stream<SidebarState>,
    ) -> Stream<SidebarState> {
        sidebar::paint_sidebar(index, header, states)
    }

    fn watch_navigation_layer(&self, levels: &[usize]) -> Stream<NavigationLayer> {
        navigation_layer::watch_navigation_layer(levels)
    }

    fn paint_navigation_layer(&self, levels: &[usize], layers: &Stream<NavigationLayer>) -> Stream<NavigationLayer> {
        navigation_layer::paint_navigation_layer(levels, layers)
    }
}

/// External streams the composer reads.
#[derive(Clone)]
pub struct NavigationInputs {
    /// True while the wide breakpoint matches.
    pub screen: Stream<bool>,
    pub header: Stream<HeaderState>,
    pub main: Stream<MainState>,
    pub viewport: Stream<Viewport>,
}

/// Mount navigation on every element `targets` emits.
///
/// - Wide screen: sidebar, `NavigationState::Sidebar`.
/// - Narrow screen: the levels matching `level_selector` inside the target,
///   `NavigationState::Layer`.
///
/// The result is shared and replays the latest state.
pub fn mount_navigation<C: NavigationCollaborators + 'static>(
    targets: &Stream<usize>,
    inputs: NavigationInputs,
    level_selector: &str,
    collaborators: Rc<C>,
) -> Stream<NavigationState> {
    let level_selector = level_selector.to_string();
    targets
        .switch_map(move |index| {
            let inputs = inputs.clone();
            let collaborators = Rc::clone(&collaborators);
            let level_selector = level_selector.clone();
            inputs
                .screen
                .distinct_until_changed()
                .switch_map(move |wide| {
                    if wide {
                        debug!(index, "mounting sidebar");
                        let states = collaborators.watch_sidebar(index, &inputs.main, &inputs.viewport);
                        collaborators
                            .paint_sidebar(index, &inputs.header, &states)
                            .map(NavigationState::Sidebar)
                    } else {
                        let levels = get_elements(&level_selector, Some(index));
                        debug!(index, levels = levels.len(), "mounting navigation layers");
                        let layers = collaborators.watch_navigation_layer(&levels);
                        collaborators
                            .paint_navigation_layer(&levels, &layers)
                            .map(NavigationState::Layer)
                    }
                })
        })
        .share_replay()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use spark_signals::{flush_sync, signal};

    use super::*;
    use crate::dom::{create_child, create_element, reset_document};
    use crate::stream::testing::record;
    use crate::stream::{watch, Subject, Subscription};

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records the lifetime of every branch it hands out.
    struct Recording {
        log: Log,
    }

    fn logged<T: Clone + 'static>(log: &Log, name: String, value: T) -> Stream<T> {
        let log = log.clone();
        Stream::new(move |sink| {
            log.borrow_mut().push(format!("subscribe {name}"));
            sink.next(value.clone());
            let log = log.clone();
            let name = name.clone();
            Subscription::new(move || log.borrow_mut().push(format!("unsubscribe {name}")))
        })
    }

    impl NavigationCollaborators for Recording {
        fn watch_sidebar(&self, index: usize, _: &Stream<MainState>, _: &Stream<Viewport>) -> Stream<SidebarState> {
            logged(&self.log, format!("sidebar {index}"), SidebarState { height: 100.0, lock: false })
        }

        fn paint_sidebar(&self, _: usize, _: &Stream<HeaderState>, states: &Stream<SidebarState>) -> Stream<SidebarState> {
            states.clone()
        }

        fn watch_navigation_layer(&self, levels: &[usize]) -> Stream<NavigationLayer> {
            logged(&self.log, format!("layer {levels:?}"), NavigationLayer { layer: levels[0] })
        }

        fn paint_navigation_layer(&self, _: &[usize], layers: &Stream<NavigationLayer>) -> Stream<NavigationLayer> {
            layers.clone()
        }
    }

    fn inputs(screen: Stream<bool>) -> NavigationInputs {
        NavigationInputs {
            screen,
            header: Stream::of(HeaderState::default()),
            main: Stream::of(MainState::default()),
            viewport: Stream::of(Viewport::default()),
        }
    }

    #[test]
    fn test_breakpoint_switch_tears_down_before_next_branch() {
        reset_document();
        let nav = create_element("nav", None);
        let level = create_child(nav, "nav", None);

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let screen = signal(true);
        let screen_clone = screen.clone();
        let navigation = mount_navigation(
            &Stream::of(nav),
            inputs(watch(move || screen_clone.get())),
            "nav",
            Rc::new(Recording { log: log.clone() }),
        );
        let recorder = record(&navigation);
        flush_sync();

        screen.set(false);
        flush_sync();

        assert_eq!(
            *log.borrow(),
            vec![
                format!("subscribe sidebar {nav}"),
                format!("unsubscribe sidebar {nav}"),
                format!("subscribe layer [{level}]"),
            ]
        );
        assert_eq!(
            recorder.values(),
            vec![
                NavigationState::Sidebar(SidebarState { height: 100.0, lock: false }),
                NavigationState::Layer(NavigationLayer { layer: level }),
            ]
        );
    }

    #[test]
    fn test_new_target_tears_down_previous_subtree() {
        reset_document();
        let first = create_element("nav", None);
        let second = create_element("nav", None);

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let targets = Subject::new();
        let screen = Subject::new();
        let shared_screen = screen.stream().share_replay();
        let _keep = record(&shared_screen);
        screen.next(true);

        let recorder = record(&mount_navigation(
            &targets.stream(),
            inputs(shared_screen),
            "nav",
            Rc::new(Recording { log: log.clone() }),
        ));
        targets.next(first);
        targets.next(second);
        drop(recorder);

        assert_eq!(
            *log.borrow(),
            vec![
                format!("subscribe sidebar {first}"),
                format!("unsubscribe sidebar {first}"),
                format!("subscribe sidebar {second}"),
                format!("unsubscribe sidebar {second}"),
            ]
        );
    }

    #[test]
    fn test_repeated_screen_value_keeps_branch() {
        reset_document();
        let nav = create_element("nav", None);

        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let screen = Subject::new();
        let shared_screen = screen.stream().share_replay();
        let _keep = record(&shared_screen);
        screen.next(true);

        let _recorder = record(&mount_navigation(
            &Stream::of(nav),
            inputs(shared_screen),
            "nav",
            Rc::new(Recording { log: log.clone() }),
        ));
        screen.next(true);

        assert_eq!(*log.borrow(), vec![format!("subscribe sidebar {nav}")]);
    }

    #[test]
    fn test_default_collaborators_paint_sidebar() {
        use crate::dom::get_style;

        reset_document();
        let nav = create_element("nav", None);
        let navigation = mount_navigation(
            &Stream::of(nav),
            NavigationInputs {
                screen: Stream::of(true),
                header: Stream::of(HeaderState { height: 48.0, sticky: true }),
                main: Stream::of(MainState { offset: 50.0, height: 400.0, active: false }),
                viewport: Stream::of(Viewport::new(0.0, 1024.0, 800.0)),
            },
            "nav",
            Rc::new(DefaultNavigation),
        );

        let recorder = record(&navigation);
        assert_eq!(get_style(nav, "height").as_deref(), Some("400px"));
        assert!(recorder.last().is_some_and(|state| state.is_sidebar()));

        drop(recorder);
        assert_eq!(get_style(nav, "height"), None, "sidebar reset on teardown");
    }
}
