//! Selector queries.
//!
//! Supports the selector subset the site scripts use:
//! - type (`nav`, `*`), id (`#main`), class (`.md-nav`)
//! - attribute presence (`[open]`) and equality (`[data-md-component=main]`)
//! - descendant (`a b`) and child (`a > b`) combinators
//! - selector lists (`a, b`)
//!
//! Matching runs right to left from each candidate, like browsers do.

use std::iter::Peekable;
use std::str::Chars;

use tracing::warn;

use super::arrays::{get_attribute, parent_of, tag_name};
use super::registry::{descendants_of, document_order};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

/// A complex selector. `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selector {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

// =============================================================================
// Parsing
// =============================================================================

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    (!ident.is_empty()).then_some(ident)
}

fn read_attribute(chars: &mut Peekable<Chars<'_>>) -> Option<(String, Option<String>)> {
    let mut body = String::new();
    loop {
        match chars.next()? {
            ']' => break,
            c => body.push(c),
        }
    }
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (name.trim(), Some(value.to_string()))
        }
        None => (body.trim(), None),
    };
    (!name.is_empty()).then(|| (name.to_string(), value))
}

fn parse_compound(chars: &mut Peekable<Chars<'_>>) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut parsed = false;
    while let Some(&c) = chars.peek() {
        match c {
            '*' => {
                chars.next();
            }
            '#' => {
                chars.next();
                compound.id = Some(read_ident(chars)?);
            }
            '.' => {
                chars.next();
                compound.classes.push(read_ident(chars)?);
            }
            '[' => {
                chars.next();
                compound.attributes.push(read_attribute(chars)?);
            }
            c if is_ident_char(c) && !parsed => {
                compound.tag = Some(read_ident(chars)?.to_ascii_lowercase());
            }
            _ => break,
        }
        parsed = true;
    }
    parsed.then_some(compound)
}

fn parse_selector(text: &str) -> Option<Selector> {
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut pending: Option<Combinator> = None;
    let mut chars = text.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            if !compounds.is_empty() && pending.is_none() {
                pending = Some(Combinator::Descendant);
            }
            continue;
        }
        if c == '>' {
            chars.next();
            if compounds.is_empty() {
                return None;
            }
            pending = Some(Combinator::Child);
            continue;
        }
        let compound = parse_compound(&mut chars)?;
        if !compounds.is_empty() {
            combinators.push(pending.take()?);
        }
        compounds.push(compound);
    }

    if compounds.is_empty() || pending == Some(Combinator::Child) {
        return None;
    }
    Some(Selector {
        compounds,
        combinators,
    })
}

fn parse_list(selectors: &str) -> Option<Vec<Selector>> {
    selectors.split(',').map(parse_selector).collect()
}

// =============================================================================
// Matching
// =============================================================================

fn matches_compound(index: usize, compound: &Compound) -> bool {
    if let Some(tag) = &compound.tag {
        if tag_name(index) != *tag {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if get_attribute(index, "id").as_deref() != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.is_empty() {
        let class = get_attribute(index, "class").unwrap_or_default();
        let names: Vec<&str> = class.split_whitespace().collect();
        if !compound.classes.iter().all(|wanted| names.contains(&wanted.as_str())) {
            return false;
        }
    }
    compound.attributes.iter().all(|(name, expected)| match (get_attribute(index, name), expected) {
        (Some(actual), Some(expected)) => actual == *expected,
        (Some(_), None) => true,
        (None, _) => false,
    })
}

fn matches_at(index: usize, selector: &Selector, position: usize) -> bool {
    if !matches_compound(index, &selector.compounds[position]) {
        return false;
    }
    if position == 0 {
        return true;
    }
    match selector.combinators[position - 1] {
        Combinator::Child => parent_of(index).is_some_and(|parent| matches_at(parent, selector, position - 1)),
        Combinator::Descendant => {
            let mut ancestor = parent_of(index);
            while let Some(current) = ancestor {
                if matches_at(current, selector, position - 1) {
                    return true;
                }
                ancestor = parent_of(current);
            }
            false
        }
    }
}

/// Check whether an element matches a selector list.
pub fn matches(index: usize, selectors: &str) -> bool {
    match parse_list(selectors) {
        Some(list) => list.iter().any(|selector| matches_at(index, selector, selector.compounds.len() - 1)),
        None => {
            warn!(selectors, "invalid selector");
            false
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

/// All elements matching `selectors`, in document order.
///
/// With `root`, only descendants of `root` are candidates (ancestors above
/// `root` still take part in matching).
pub fn get_elements(selectors: &str, root: Option<usize>) -> Vec<usize> {
    let Some(list) = parse_list(selectors) else {
        warn!(selectors, "invalid selector");
        return Vec::new();
    };
    let candidates = match root {
        Some(root) => descendants_of(root),
        None => document_order(),
    };
    candidates
        .into_iter()
        .filter(|&index| list.iter().any(|selector| matches_at(index, selector, selector.compounds.len() - 1)))
        .collect()
}

/// First element matching `selectors`, in document order.
pub fn get_element(selectors: &str, root: Option<usize>) -> Option<usize> {
    get_elements(selectors, root).into_iter().next()
}
