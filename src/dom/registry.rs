//! Element Registry - Index allocation for the document arrays.
//!
//! Manages the lifecycle of element indices:
//! - `id` attribute ↔ index mapping
//! - Free index pool for O(1) reuse
//! - Root list for document-order traversal

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use super::{arrays, events, focus, media};

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map `id` attribute to element index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Currently allocated indices.
    static ALLOCATED_INDICES: RefCell<BTreeSet<usize>> = RefCell::new(BTreeSet::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next index to allocate if pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Elements without a parent, in insertion order.
    static ROOTS: RefCell<Vec<usize>> = RefCell::new(Vec::new());
}

// =============================================================================
// Allocation
// =============================================================================

/// Create a detached root element.
///
/// # Arguments
/// * `tag` - Tag name, case-insensitive.
/// * `id` - Optional `id` attribute. An existing element with the same id is
///   returned unchanged.
pub fn create_element(tag: &str, id: Option<&str>) -> usize {
    if let Some(existing) = id.and_then(get_element_by_id) {
        return existing;
    }

    let index = FREE_INDICES.with(|free| {
        let mut free = free.borrow_mut();
        free.pop().unwrap_or_else(|| {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        })
    });

    arrays::clear_at_index(index);
    arrays::set_tag_name(index, tag);
    if let Some(id) = id {
        arrays::set_attribute(index, "id", id);
        ID_TO_INDEX.with(|map| {
            map.borrow_mut().insert(id.to_string(), index);
        });
    }
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().insert(index);
    });
    ROOTS.with(|roots| roots.borrow_mut().push(index));

    trace!(index, tag, "element created");
    index
}

/// Create an element and append it to `parent`.
pub fn create_child(parent: usize, tag: &str, id: Option<&str>) -> usize {
    let index = create_element(tag, id);
    append_child(parent, index);
    index
}

/// Move `child` to the end of `parent`'s children.
pub fn append_child(parent: usize, child: usize) {
    detach(child);
    arrays::link_child(parent, child);
}

fn detach(index: usize) {
    match arrays::parent_of(index) {
        Some(parent) => arrays::unlink_child(parent, index),
        None => ROOTS.with(|roots| roots.borrow_mut().retain(|&root| root != index)),
    }
}

/// Release an element back to the pool.
///
/// Also recursively releases all children, removes their listeners, and
/// blurs them if focused.
pub fn release_element(index: usize) {
    if !is_allocated(index) {
        return;
    }

    for child in arrays::children_of(index) {
        release_element(child);
    }

    if focus::active_element() == Some(index) {
        focus::blur_element(index);
    }
    events::release_target(index);
    detach(index);

    if let Some(id) = arrays::get_attribute(index, "id") {
        ID_TO_INDEX.with(|map| {
            map.borrow_mut().remove(&id);
        });
    }
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().remove(&index);
    });
    arrays::clear_at_index(index);
    FREE_INDICES.with(|free| free.borrow_mut().push(index));

    // When the document is empty, reset arrays to free memory
    let is_empty = ALLOCATED_INDICES.with(|set| set.borrow().is_empty());
    if is_empty {
        arrays::reset();
        FREE_INDICES.with(|free| free.borrow_mut().clear());
        NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    }
}

// =============================================================================
// Lookups
// =============================================================================

/// Get the element with the given `id` attribute.
pub fn get_element_by_id(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_INDICES.with(|set| set.borrow().contains(&index))
}

/// Number of live elements.
pub fn element_count() -> usize {
    ALLOCATED_INDICES.with(|set| set.borrow().len())
}

/// All elements in document order (pre-order, roots first-to-last).
pub fn document_order() -> Vec<usize> {
    let roots = ROOTS.with(|roots| roots.borrow().clone());
    let mut order = Vec::new();
    for root in roots {
        descendants_into(root, &mut order, true);
    }
    order
}

/// Descendants of `index` in document order, excluding `index` itself.
pub fn descendants_of(index: usize) -> Vec<usize> {
    let mut order = Vec::new();
    descendants_into(index, &mut order, false);
    order
}

fn descendants_into(index: usize, order: &mut Vec<usize>, include_self: bool) {
    if include_self {
        order.push(index);
    }
    for child in arrays::children_of(index) {
        descendants_into(child, order, true);
    }
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset the whole document: elements, listeners, focus and media state.
pub fn reset_document() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    ALLOCATED_INDICES.with(|set| set.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ROOTS.with(|roots| roots.borrow_mut().clear());
    arrays::reset();
    events::reset();
    focus::reset();
    media::reset();
}
