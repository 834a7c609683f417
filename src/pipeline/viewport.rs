//! Viewport, header and screen signals.
//!
//! Page code owns these signals and writes to them from host events
//! (scroll, resize, header measurement, breakpoint changes). The pipeline
//! reads them as streams.

use spark_signals::{signal, Signal};

use crate::stream::{watch, Stream};
use crate::types::{HeaderState, Viewport, ViewportOffset, ViewportSize};

/// Scroll offset and size of the viewport as two signals.
#[derive(Clone)]
pub struct ViewportSignals {
    offset: Signal<ViewportOffset>,
    size: Signal<ViewportSize>,
}

impl ViewportSignals {
    pub fn new(initial: Viewport) -> Self {
        Self {
            offset: signal(initial.offset),
            size: signal(initial.size),
        }
    }

    /// Current snapshot.
    pub fn get(&self) -> Viewport {
        Viewport {
            offset: self.offset.get(),
            size: self.size.get(),
        }
    }

    /// Scroll to vertical offset `y`.
    pub fn scroll_to(&self, y: f64) {
        let x = self.offset.get().x;
        self.offset.set(ViewportOffset { x, y });
    }

    /// Resize the viewport.
    pub fn resize(&self, width: f64, height: f64) {
        self.size.set(ViewportSize { width, height });
    }

    /// Stream of snapshots, emitting on subscribe and on every change of
    /// either signal.
    pub fn watch(&self) -> Stream<Viewport> {
        let offset = self.offset.clone();
        let size = self.size.clone();
        watch(move || Viewport {
            offset: offset.get(),
            size: size.get(),
        })
    }
}

/// Stream the header signal.
pub fn watch_header(header: &Signal<HeaderState>) -> Stream<HeaderState> {
    let header = header.clone();
    watch(move || header.get())
}

/// Stream the wide-breakpoint signal.
pub fn watch_screen(screen: &Signal<bool>) -> Stream<bool> {
    let screen = screen.clone();
    watch(move || screen.get())
}
