//! # site-reactive
//!
//! Reactive state composition for documentation-site front ends.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! external signals (scroll, size, header, breakpoint) and a small push-stream
//! layer for everything derived from them.
//!
//! ## Architecture
//!
//! Elements are indices into a thread-local document model. Each component
//! turns document events and signals into a [`Stream`]; subscribing attaches
//! listeners and effects, dropping the [`Subscription`] releases them.
//!
//! ```text
//! signals/events → stream adapters → geometry + navigation state → paint
//! ```
//!
//! ## Modules
//!
//! - [`stream`] - Streams, operators, subjects, signal bridge
//! - [`combinators`] - `switch_map_if`, `take_if`
//! - [`dom`] - Document model, queries, events, focus, media queries
//! - [`state`] - Focus watcher, clipboard bridge
//! - [`pipeline`] - Main-area geometry, navigation mount, print patch, page setup
//! - [`config`] - Site configuration
//! - [`types`] - Snapshot types

pub mod combinators;
pub mod config;
pub mod dom;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod stream;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use combinators::{switch_map_if, take_if};
pub use config::SiteConfig;
pub use error::{Error, Result};
pub use stream::{combine_latest, merge, watch, Sink, Stream, Subject, Subscription};

pub use pipeline::{
    mount_navigation, patch_details, print_trigger, setup_main, setup_page, watch_main,
    DefaultNavigation, NavigationCollaborators, NavigationInputs, PageInputs, PageStreams,
    ViewportSignals,
};

pub use state::{watch_element_focus, ClipboardBridge, ClipboardEvent, ClipboardLibrary};
