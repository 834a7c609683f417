//! Page setup - Wire the page's components to its external signals.
//!
//! Every stream returned here is cold until subscribed and shared once
//! subscribed. Each `document` emission (a page load or an instant-loading
//! page swap) re-queries the components.

use std::rc::Rc;

use tracing::debug;

use crate::config::SiteConfig;
use crate::dom::get_element;
use crate::error::Error;
use crate::state::{copied_messages, inject_copy_buttons, ClipboardBridge, ClipboardLibrary};
use crate::stream::Stream;
use crate::types::{HeaderState, MainState, NavigationState, Viewport};

use super::main_area::setup_main;
use super::navigation::{mount_navigation, NavigationCollaborators, NavigationInputs};
use super::print::{patch_details, print_trigger};

/// External signals of a page.
#[derive(Clone)]
pub struct PageInputs {
    /// Emits when a document is ready.
    pub document: Stream<()>,
    pub viewport: Stream<Viewport>,
    pub header: Stream<HeaderState>,
    /// True while the wide breakpoint matches.
    pub screen: Stream<bool>,
    /// Clipboard library bound to the copy buttons, if the page has one.
    pub clipboard: Option<Rc<dyn ClipboardLibrary>>,
}

/// Derived streams of a page.
pub struct PageStreams {
    pub main: Stream<MainState>,
    pub navigation: Stream<NavigationState>,
    /// Details blocks opened for printing.
    pub details: Stream<Vec<usize>>,
    /// Copy buttons added to code blocks.
    pub copy_buttons: Stream<Vec<usize>>,
    /// Message to show after every successful copy.
    pub copied: Stream<String>,
}

/// Set up the page components.
///
/// The main area is required: a document without it fails `main` (and
/// everything derived from it) with [`Error::MissingElement`]. Navigation is
/// optional and simply stays silent when absent.
pub fn setup_page<C: NavigationCollaborators + 'static>(
    inputs: PageInputs,
    config: &SiteConfig,
    collaborators: Rc<C>,
) -> PageStreams {
    let selectors = config.selectors.clone();

    let main_selector = selectors.main.clone();
    let main_targets = inputs.document.try_switch_map(move |()| {
        get_element(&main_selector, None)
            .map(Stream::of)
            .ok_or_else(|| Error::MissingElement(main_selector.clone()))
    });
    let main = setup_main(&main_targets, &inputs.header, &inputs.viewport);

    let navigation_selector = selectors.navigation.clone();
    let navigation_targets = inputs.document.filter_map(move |()| {
        let target = get_element(&navigation_selector, None);
        if target.is_none() {
            debug!(selector = %navigation_selector, "no navigation on this page");
        }
        target
    });
    let navigation = mount_navigation(
        &navigation_targets,
        NavigationInputs {
            screen: inputs.screen.clone(),
            header: inputs.header.clone(),
            main: main.clone(),
            viewport: inputs.viewport.clone(),
        },
        &selectors.navigation_levels,
        collaborators,
    );

    let details = patch_details(&print_trigger(&config.media.print), &selectors.details);

    let code_blocks = selectors.code_blocks.clone();
    let clipboard = selectors.clipboard.clone();
    let copy_buttons = inputs
        .document
        .map(move |()| inject_copy_buttons(&code_blocks, &clipboard))
        .share_replay();

    let copied = match inputs.clipboard {
        Some(library) => {
            let bridge = ClipboardBridge::new(library, &selectors.clipboard);
            copied_messages(&bridge.watch(), &config.clipboard.copied)
        }
        None => Stream::never(),
    };

    PageStreams {
        main,
        navigation,
        details,
        copy_buttons,
        copied,
    }
}
