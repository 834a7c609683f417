//! Document Arrays - Per-element state in parallel arrays.
//!
//! Each array index corresponds to one element allocated by the registry:
//! - tag name
//! - parent and ordered children
//! - attributes and inline styles
//! - layout box (`offsetTop`/`offsetHeight`)
//!
//! Element state is plain data. Reactivity lives in the streams that read it.

use std::cell::RefCell;
use std::collections::BTreeMap;

// =============================================================================
// Arrays
// =============================================================================

thread_local! {
    /// Lowercase tag name.
    static TAG: RefCell<Vec<String>> = RefCell::new(Vec::new());

    /// Parent element, `None` for roots.
    static PARENT: RefCell<Vec<Option<usize>>> = RefCell::new(Vec::new());

    /// Children in document order.
    static CHILDREN: RefCell<Vec<Vec<usize>>> = RefCell::new(Vec::new());

    /// Attribute map.
    static ATTRIBUTES: RefCell<Vec<BTreeMap<String, String>>> = RefCell::new(Vec::new());

    /// Inline style properties.
    static STYLES: RefCell<Vec<BTreeMap<String, String>>> = RefCell::new(Vec::new());

    /// Offset from the top of the offset parent, in pixels.
    static OFFSET_TOP: RefCell<Vec<f64>> = RefCell::new(Vec::new());

    /// Rendered height, in pixels.
    static OFFSET_HEIGHT: RefCell<Vec<f64>> = RefCell::new(Vec::new());
}

fn grow<T: Default>(array: &mut Vec<T>, index: usize) {
    if array.len() <= index {
        array.resize_with(index + 1, T::default);
    }
}

// =============================================================================
// Capacity Management
// =============================================================================

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    TAG.with(|arr| grow(&mut arr.borrow_mut(), index));
    PARENT.with(|arr| grow(&mut arr.borrow_mut(), index));
    CHILDREN.with(|arr| grow(&mut arr.borrow_mut(), index));
    ATTRIBUTES.with(|arr| grow(&mut arr.borrow_mut(), index));
    STYLES.with(|arr| grow(&mut arr.borrow_mut(), index));
    OFFSET_TOP.with(|arr| grow(&mut arr.borrow_mut(), index));
    OFFSET_HEIGHT.with(|arr| grow(&mut arr.borrow_mut(), index));
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    ensure_capacity(index);
    TAG.with(|arr| arr.borrow_mut()[index].clear());
    PARENT.with(|arr| arr.borrow_mut()[index] = None);
    CHILDREN.with(|arr| arr.borrow_mut()[index].clear());
    ATTRIBUTES.with(|arr| arr.borrow_mut()[index].clear());
    STYLES.with(|arr| arr.borrow_mut()[index].clear());
    OFFSET_TOP.with(|arr| arr.borrow_mut()[index] = 0.0);
    OFFSET_HEIGHT.with(|arr| arr.borrow_mut()[index] = 0.0);
}

/// Reset all arrays.
pub fn reset() {
    TAG.with(|arr| arr.borrow_mut().clear());
    PARENT.with(|arr| arr.borrow_mut().clear());
    CHILDREN.with(|arr| arr.borrow_mut().clear());
    ATTRIBUTES.with(|arr| arr.borrow_mut().clear());
    STYLES.with(|arr| arr.borrow_mut().clear());
    OFFSET_TOP.with(|arr| arr.borrow_mut().clear());
    OFFSET_HEIGHT.with(|arr| arr.borrow_mut().clear());
}

// =============================================================================
// Tree
// =============================================================================

/// Get the tag name at index.
pub fn tag_name(index: usize) -> String {
    TAG.with(|arr| arr.borrow().get(index).cloned().unwrap_or_default())
}

pub(crate) fn set_tag_name(index: usize, tag: &str) {
    ensure_capacity(index);
    TAG.with(|arr| arr.borrow_mut()[index] = tag.to_ascii_lowercase());
}

/// Get the parent element.
pub fn parent_of(index: usize) -> Option<usize> {
    PARENT.with(|arr| arr.borrow().get(index).copied().flatten())
}

/// Get the children in document order.
pub fn children_of(index: usize) -> Vec<usize> {
    CHILDREN.with(|arr| arr.borrow().get(index).cloned().unwrap_or_default())
}

pub(crate) fn link_child(parent: usize, child: usize) {
    ensure_capacity(parent.max(child));
    PARENT.with(|arr| arr.borrow_mut()[child] = Some(parent));
    CHILDREN.with(|arr| arr.borrow_mut()[parent].push(child));
}

pub(crate) fn unlink_child(parent: usize, child: usize) {
    CHILDREN.with(|arr| {
        if let Some(children) = arr.borrow_mut().get_mut(parent) {
            children.retain(|&c| c != child);
        }
    });
    PARENT.with(|arr| {
        if let Some(slot) = arr.borrow_mut().get_mut(child) {
            *slot = None;
        }
    });
}

// =============================================================================
// Attributes
// =============================================================================

/// Get an attribute value.
pub fn get_attribute(index: usize, name: &str) -> Option<String> {
    ATTRIBUTES.with(|arr| arr.borrow().get(index).and_then(|attrs| attrs.get(name).cloned()))
}

/// Check whether an attribute is present.
pub fn has_attribute(index: usize, name: &str) -> bool {
    ATTRIBUTES.with(|arr| arr.borrow().get(index).is_some_and(|attrs| attrs.contains_key(name)))
}

/// Set an attribute value.
pub fn set_attribute(index: usize, name: &str, value: &str) {
    ensure_capacity(index);
    ATTRIBUTES.with(|arr| {
        arr.borrow_mut()[index].insert(name.to_string(), value.to_string());
    });
}

/// Remove an attribute.
pub fn remove_attribute(index: usize, name: &str) {
    ATTRIBUTES.with(|arr| {
        if let Some(attrs) = arr.borrow_mut().get_mut(index) {
            attrs.remove(name);
        }
    });
}

// =============================================================================
// Styles
// =============================================================================

/// Get an inline style property.
pub fn get_style(index: usize, property: &str) -> Option<String> {
    STYLES.with(|arr| arr.borrow().get(index).and_then(|styles| styles.get(property).cloned()))
}

/// Set an inline style property.
pub fn set_style(index: usize, property: &str, value: &str) {
    ensure_capacity(index);
    STYLES.with(|arr| {
        arr.borrow_mut()[index].insert(property.to_string(), value.to_string());
    });
}

/// Remove an inline style property.
pub fn remove_style(index: usize, property: &str) {
    STYLES.with(|arr| {
        if let Some(styles) = arr.borrow_mut().get_mut(index) {
            styles.remove(property);
        }
    });
}

// =============================================================================
// Layout Box
// =============================================================================

/// Set the layout box measured for an element.
pub fn set_layout_box(index: usize, top: f64, height: f64) {
    ensure_capacity(index);
    OFFSET_TOP.with(|arr| arr.borrow_mut()[index] = top);
    OFFSET_HEIGHT.with(|arr| arr.borrow_mut()[index] = height);
}

/// Get `offsetTop`.
pub fn offset_top(index: usize) -> f64 {
    OFFSET_TOP.with(|arr| arr.borrow().get(index).copied().unwrap_or(0.0))
}

/// Get `offsetHeight`.
pub fn offset_height(index: usize) -> f64 {
    OFFSET_HEIGHT.with(|arr| arr.borrow().get(index).copied().unwrap_or(0.0))
}
