//! Site configuration.
//!
//! Selectors and media queries the page wiring depends on. Every field is
//! optional in TOML; missing keys fall back to the theme's stock markup.
//!
//! ```toml
//! [selectors]
//! main = "[data-md-component=main]"
//!
//! [media]
//! screen = "(min-width: 76.25em)"
//! ```

use serde::Deserialize;

use crate::error::{Error, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub selectors: Selectors,
    pub media: MediaQueries,
    pub clipboard: ClipboardConfig,
}

/// Element selectors.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Selectors {
    /// Main content area. Required on every page.
    pub main: String,
    /// Primary navigation container. Optional.
    pub navigation: String,
    /// Nested navigation levels, queried inside the navigation container.
    pub navigation_levels: String,
    /// Collapsible blocks opened for printing.
    pub details: String,
    /// Code blocks that receive a copy button.
    pub code_blocks: String,
    /// Copy buttons.
    pub clipboard: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            main: "[data-md-component=main]".to_string(),
            navigation: "[data-md-component=navigation]".to_string(),
            navigation_levels: "nav".to_string(),
            details: "details".to_string(),
            code_blocks: "pre > code".to_string(),
            clipboard: ".md-clipboard".to_string(),
        }
    }
}

/// Media queries.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MediaQueries {
    /// Wide breakpoint: sidebar navigation.
    pub screen: String,
    pub print: String,
}

impl Default for MediaQueries {
    fn default() -> Self {
        Self {
            screen: "(min-width: 76.25em)".to_string(),
            print: "print".to_string(),
        }
    }
}

/// Clipboard messages.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClipboardConfig {
    /// Shown after a successful copy.
    pub copied: String,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            copied: "Copied to clipboard".to_string(),
        }
    }
}

impl SiteConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }
}
