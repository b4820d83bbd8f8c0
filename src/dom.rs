//! In-memory element tree the page components read and write.
//!
//! A browser binding mirrors these nodes onto real DOM elements; tests build
//! a tree by hand and inspect it after driving the components. Handles are
//! cheap `Arc` clones so they can move into spawned tasks.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    html: String,
    style: BTreeMap<String, String>,
    value: String,
    disabled: bool,
    top: f64,
    height: f64,
    children: Vec<Element>,
}

/// Shared handle to one display region
#[derive(Clone)]
pub struct Element {
    node: Arc<Mutex<Node>>,
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.lock();
        f.debug_struct("Element")
            .field("tag", &node.tag)
            .field("id", &node.id)
            .field("classes", &node.classes)
            .field("children", &node.children.len())
            .finish()
    }
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            node: Arc::new(Mutex::new(Node {
                tag: tag.to_ascii_lowercase(),
                ..Node::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Node> {
        self.node
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Builders

    pub fn with_id(self, id: &str) -> Self {
        self.lock().id = Some(id.to_string());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_html(self, html: &str) -> Self {
        self.set_html(html);
        self
    }

    pub fn with_value(self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    /// Vertical offset from the document top and rendered height.
    pub fn with_geometry(self, top: f64, height: f64) -> Self {
        {
            let mut node = self.lock();
            node.top = top;
            node.height = height;
        }
        self
    }

    pub fn with_child(self, child: Element) -> Self {
        self.append_child(child);
        self
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    // Identity

    pub fn tag(&self) -> String {
        self.lock().tag.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.lock().id.clone()
    }

    // Classes

    pub fn has_class(&self, class: &str) -> bool {
        self.lock().classes.contains(class)
    }

    pub fn add_class(&self, class: &str) {
        self.lock().classes.insert(class.to_string());
    }

    pub fn remove_class(&self, class: &str) {
        self.lock().classes.remove(class);
    }

    /// Add a class; returns false when it was already present.
    pub fn insert_class(&self, class: &str) -> bool {
        self.lock().classes.insert(class.to_string())
    }

    /// Swap `from` for `to` under one lock.
    pub fn replace_class(&self, from: &str, to: &str) {
        let mut node = self.lock();
        node.classes.remove(from);
        node.classes.insert(to.to_string());
    }

    /// Flip a class; returns whether it is now present.
    pub fn toggle_class(&self, class: &str) -> bool {
        let mut node = self.lock();
        if node.classes.remove(class) {
            false
        } else {
            node.classes.insert(class.to_string());
            true
        }
    }

    /// Add or remove a class depending on `on`.
    pub fn set_class(&self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn classes(&self) -> Vec<String> {
        self.lock().classes.iter().cloned().collect()
    }

    // Attributes

    pub fn attr(&self, name: &str) -> Option<String> {
        let node = self.lock();
        match name {
            "id" => node.id.clone(),
            "class" if !node.classes.is_empty() => Some(
                node.classes
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => node.attributes.get(name).cloned(),
        }
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        let mut node = self.lock();
        match name {
            "id" => node.id = Some(value.to_string()),
            "class" => {
                node.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {
                node.attributes.insert(name.to_string(), value.to_string());
            }
        }
    }

    // Content

    /// Plain text content (`textContent`).
    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    /// Replace the content with plain text, dropping any markup.
    pub fn set_text(&self, text: &str) {
        let mut node = self.lock();
        node.text = text.to_string();
        node.html.clear();
    }

    /// Markup content (`innerHTML`).
    pub fn html(&self) -> String {
        self.lock().html.clone()
    }

    /// Replace the content with markup, dropping any plain text.
    pub fn set_html(&self, html: &str) {
        let mut node = self.lock();
        node.html = html.to_string();
        node.text.clear();
    }

    // Inline style

    pub fn style(&self, property: &str) -> Option<String> {
        self.lock().style.get(property).cloned()
    }

    pub fn set_style(&self, property: &str, value: &str) {
        let mut node = self.lock();
        if value.is_empty() {
            node.style.remove(property);
        } else {
            node.style.insert(property.to_string(), value.to_string());
        }
    }

    // Form state

    pub fn value(&self) -> String {
        self.lock().value.clone()
    }

    pub fn set_value(&self, value: &str) {
        self.lock().value = value.to_string();
    }

    pub fn is_disabled(&self) -> bool {
        self.lock().disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.lock().disabled = disabled;
    }

    // Geometry

    pub fn top(&self) -> f64 {
        self.lock().top
    }

    pub fn height(&self) -> f64 {
        self.lock().height
    }

    pub fn set_geometry(&self, top: f64, height: f64) {
        let mut node = self.lock();
        node.top = top;
        node.height = height;
    }

    // Tree

    pub fn append_child(&self, child: Element) {
        self.lock().children.push(child);
    }

    /// Detach `child`; returns false if it was not a direct child.
    pub fn remove_child(&self, child: &Element) -> bool {
        let mut node = self.lock();
        let before = node.children.len();
        node.children.retain(|c| !c.ptr_eq(child));
        node.children.len() != before
    }

    pub fn contains_child(&self, child: &Element) -> bool {
        self.lock().children.iter().any(|c| c.ptr_eq(child))
    }

    pub fn children(&self) -> Vec<Element> {
        self.lock().children.clone()
    }

    /// All descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(&self, out: &mut Vec<Element>) {
        // Release the lock before recursing so nodes can be revisited.
        let children = self.children();
        for child in children {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    /// Descendants matching a selector, in document order.
    pub fn select(&self, selector: &str) -> Vec<Element> {
        let selector = Selector::parse(selector);
        self.descendants()
            .into_iter()
            .filter(|e| selector.matches(e))
            .collect()
    }

    pub fn select_first(&self, selector: &str) -> Option<Element> {
        let selector = Selector::parse(selector);
        self.descendants().into_iter().find(|e| selector.matches(e))
    }

    /// Whether this element itself matches a selector.
    pub fn matches(&self, selector: &str) -> bool {
        Selector::parse(selector).matches(self)
    }
}

/// A comma-separated list of compound selectors: `tag`, `.class`, `#id`,
/// `[attr]` and `[attr="value"]`, e.g. `section[id]` or `.hero-text, .hero-visual`.
#[derive(Debug, Clone, Default, PartialEq)]
struct Selector {
    alternatives: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Selector {
    fn parse(input: &str) -> Self {
        let alternatives = input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Compound::parse)
            .collect();
        Self { alternatives }
    }

    fn matches(&self, element: &Element) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }
}

impl Compound {
    fn parse(input: &str) -> Self {
        let mut compound = Compound::default();
        let mut rest = input;

        let tag_end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
        if tag_end > 0 {
            compound.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(first) = rest.chars().next() {
            match first {
                '.' | '#' => {
                    let body = &rest[1..];
                    let end = body.find(['.', '#', '[']).unwrap_or(body.len());
                    let name = body[..end].to_string();
                    if first == '.' {
                        compound.classes.push(name);
                    } else {
                        compound.id = Some(name);
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let end = rest.find(']').unwrap_or(rest.len());
                    let inner = &rest[1..end];
                    let attribute = match inner.split_once('=') {
                        Some((name, value)) => (
                            name.trim().to_string(),
                            Some(value.trim().trim_matches(['"', '\'']).to_string()),
                        ),
                        None => (inner.trim().to_string(), None),
                    };
                    compound.attributes.push(attribute);
                    rest = rest.get(end + 1..).unwrap_or("");
                }
                _ => break,
            }
        }

        compound
    }

    fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag() != *tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id().as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| element.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|(name, expected)| {
            match (element.attr(name), expected) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
            }
        })
    }
}

/// The page: a root element plus lookups over it
#[derive(Debug, Clone)]
pub struct Document {
    body: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
        }
    }

    pub fn from_body(body: Element) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    /// `getElementById`
    pub fn by_id(&self, id: &str) -> Option<Element> {
        self.body
            .descendants()
            .into_iter()
            .find(|e| e.id().as_deref() == Some(id))
    }

    /// `querySelectorAll`
    pub fn select(&self, selector: &str) -> Vec<Element> {
        self.body.select(selector)
    }

    /// `querySelector`
    pub fn select_first(&self, selector: &str) -> Option<Element> {
        self.body.select_first(selector)
    }

    /// Nearest element, starting at `target` and walking up, matching `selector`.
    pub fn closest(&self, target: &Element, selector: &str) -> Option<Element> {
        let selector = Selector::parse(selector);
        let mut path = Vec::new();
        if !Self::path_to(&self.body, target, &mut path) {
            return None;
        }
        path.into_iter().rev().find(|e| selector.matches(e))
    }

    /// Direct parent of `target`, if it is in this document.
    pub fn parent_of(&self, target: &Element) -> Option<Element> {
        let mut path = Vec::new();
        if !Self::path_to(&self.body, target, &mut path) {
            return None;
        }
        path.pop();
        path.pop()
    }

    fn path_to(current: &Element, target: &Element, path: &mut Vec<Element>) -> bool {
        path.push(current.clone());
        if current.ptr_eq(target) {
            return true;
        }
        for child in current.children() {
            if Self::path_to(&child, target, path) {
                return true;
            }
        }
        path.pop();
        false
    }
}

/// The visible window of the page at one moment
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_y: f64, width: f64, height: f64) -> Self {
        Self {
            scroll_y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.scroll_y + self.height
    }
}

/// A host event that components may cancel (`preventDefault`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomEvent {
    default_prevented: bool,
}

impl DomEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
