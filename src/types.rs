//! Core types for site-reactive.
//!
//! Snapshots that flow through the streams. All are plain values: cloned
//! into each emission and compared for deduplication.

// =============================================================================
// Viewport
// =============================================================================

/// Scroll offset of the viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportOffset {
    pub x: f64,
    pub y: f64,
}

/// Size of the viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

/// Combined viewport snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub offset: ViewportOffset,
    pub size: ViewportSize,
}

impl Viewport {
    pub fn new(y: f64, width: f64, height: f64) -> Self {
        Self {
            offset: ViewportOffset { x: 0.0, y },
            size: ViewportSize { width, height },
        }
    }
}

// =============================================================================
// Header
// =============================================================================

/// Header snapshot. Only `height` feeds the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeaderState {
    pub height: f64,
    pub sticky: bool,
}

// =============================================================================
// Main Area
// =============================================================================

/// Visible geometry of the main content area.
///
/// `height` is not clamped: a header taller than the viewport yields a
/// negative value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MainState {
    /// Main area top minus header height.
    pub offset: f64,
    /// Visible height of the main area.
    pub height: f64,
    /// Scrolled past the top of the main area.
    pub active: bool,
}

// =============================================================================
// Navigation
// =============================================================================

/// Sidebar geometry on wide screens.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SidebarState {
    pub height: f64,
    /// Sidebar is pinned below the header.
    pub lock: bool,
}

/// Active navigation level on narrow screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationLayer {
    /// Element index of the active level.
    pub layer: usize,
}

/// Navigation presentation, one variant per breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationState {
    Layer(NavigationLayer),
    Sidebar(SidebarState),
}

impl NavigationState {
    pub fn is_sidebar(&self) -> bool {
        matches!(self, NavigationState::Sidebar(_))
    }
}
