//! Reactive Pipeline
//!
//! Derives page UI state from the external signals.
//!
//! # Pipeline Architecture
//!
//! ```text
//! viewport ─┐
//! header ───┼─► main area ─┐
//!           │              ├─► navigation (sidebar | layers)
//! screen ───┴──────────────┘
//! print ──────► details patch
//! ```
//!
//! ## Key Design Principles
//!
//! - **Pure geometry**: [`compute_main`] and [`sidebar::compute_sidebar`] are
//!   plain functions; the streams only wire inputs to them
//! - **Side effects at the edge**: only the paint stages and the print patch
//!   write to the document, and each undoes its writes on teardown
//! - **Shared results**: every public stream replays its latest value and
//!   runs its computation once, however many subscribers it has

pub mod main_area;
pub mod navigation;
pub mod navigation_layer;
pub mod page;
pub mod print;
pub mod sidebar;
pub mod viewport;

// Re-exports
pub use main_area::{compute_main, setup_main, watch_main};
pub use navigation::{mount_navigation, DefaultNavigation, NavigationCollaborators, NavigationInputs};
pub use navigation_layer::{paint_navigation_layer, watch_navigation_layer};
pub use page::{setup_page, PageInputs, PageStreams};
pub use print::{patch_details, print_trigger};
pub use sidebar::{paint_sidebar, watch_sidebar};
pub use viewport::{watch_header, watch_screen, ViewportSignals};
