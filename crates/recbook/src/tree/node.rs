//! In-memory document tree

use std::fmt::{self, Write as _};

use indexmap::IndexMap;
use tracing::debug;

/// A child of an element: either a nested element or a run of text
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
}

/// Discriminates the two node kinds for counting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Element(_) => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// The element in this slot; a text run is first replaced by an empty
    /// element
    fn element_mut_or_default(&mut self) -> &mut ElementNode {
        loop {
            match *self {
                Self::Element(ref mut element) => return element,
                Self::Text(_) => *self = Self::Element(ElementNode::default()),
            }
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Self::Text(text) => Some(text),
            Self::Element(_) => None,
        }
    }
}

/// Character data. Has no children and no attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextNode {
    value: String,
}

impl TextNode {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// True when the text is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// A named element owning its attributes and ordered children.
///
/// Attribute names are unique within one element and keep insertion order.
/// Attribute order is not significant for equality.
///
/// Trees built by a [`TreeBuilder`](super::TreeBuilder) never hold
/// whitespace-only text unless a sibling text run carries real content:
/// indentation between elements and blank values such as `<a>  </a>` are
/// dropped as each element closes. A tree assembled by hand with a blank
/// text child therefore does not survive a write and re-parse unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementNode {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<Node>,
}

impl ElementNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        name: String,
        attributes: IndexMap<String, String>,
        children: Vec<Node>,
    ) -> Self {
        Self {
            name,
            attributes,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Drop all attributes and children; the name is kept
    pub fn clear(&mut self) {
        self.attributes.clear();
        self.children.clear();
    }

    // --- text value ---

    /// Concatenation of every direct text child, in order
    pub fn value(&self) -> String {
        self.children
            .iter()
            .filter_map(Node::as_text)
            .map(TextNode::value)
            .collect()
    }

    /// Replace all direct text children with a single one
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.remove_all_text_nodes();
        self.children.push(Node::Text(TextNode::new(value)));
    }

    pub fn has_text_nodes(&self) -> bool {
        self.children.iter().any(|child| child.kind() == NodeKind::Text)
    }

    pub fn remove_all_text_nodes(&mut self) {
        self.children.retain(|child| child.kind() != NodeKind::Text);
    }

    // --- attributes ---

    pub fn attrib_count(&self) -> usize {
        self.attributes.len()
    }

    /// The `index`th attribute in insertion order
    pub fn nth_attrib(&self, index: usize) -> Option<(&str, &str)> {
        self.attributes
            .get_index(index)
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn attrib(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Set an attribute, replacing any existing value. Empty names are refused.
    pub fn add_attrib(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if name.is_empty() {
            return false;
        }
        self.attributes.insert(name, value.into());
        true
    }

    pub fn remove_attrib(&mut self, name: &str) -> bool {
        self.attributes.shift_remove(name).is_some()
    }

    pub fn remove_all_attribs(&mut self) {
        self.attributes.clear();
    }

    // --- children ---

    /// Number of direct children of either kind
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn node_count(&self, kind: NodeKind) -> usize {
        self.children
            .iter()
            .filter(|child| child.kind() == kind)
            .count()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.get_mut(index)
    }

    /// The child at `index` if it is an element
    pub fn element_node(&self, index: usize) -> Option<&Self> {
        self.children.get(index).and_then(Node::as_element)
    }

    pub fn element_node_mut(&mut self, index: usize) -> Option<&mut Self> {
        self.children.get_mut(index).and_then(Node::as_element_mut)
    }

    /// Element children only, in document order
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Append a new element child and return it for filling in
    pub fn add_element_node(&mut self, name: impl Into<String>) -> &mut Self {
        self.insert_element_node(usize::MAX, name)
    }

    /// Insert a new element child at `index`; an index past the end appends
    pub fn insert_element_node(&mut self, index: usize, name: impl Into<String>) -> &mut Self {
        let index = index.min(self.children.len());
        self.children
            .insert_mut(index, Node::Element(Self::new(name)))
            .element_mut_or_default()
    }

    /// Append an already built element
    pub fn push_element(&mut self, element: Self) {
        self.children.push(Node::Element(element));
    }

    pub fn add_text_node(&mut self, text: impl Into<String>) {
        self.insert_text_node(usize::MAX, text);
    }

    /// Insert a text child at `index`; an index past the end appends
    pub fn insert_text_node(&mut self, index: usize, text: impl Into<String>) {
        let index = index.min(self.children.len());
        self.children.insert(index, Node::Text(TextNode::new(text)));
    }

    /// Remove the child at `index`, of either kind
    pub fn remove_child(&mut self, index: usize) -> Option<Node> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    pub fn remove_all_children(&mut self) {
        self.children.clear();
    }

    /// Index of the first element child named `name` at or after `start`
    pub fn find_element(&self, name: &str, start: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, child)| child.as_element().is_some_and(|e| e.name == name))
            .map(|(index, _)| index)
    }

    /// Depth-first search for an element named `name` (and, when given,
    /// whose text value equals `value`). Returns the parent and the child
    /// index of the match. Walks with an explicit stack, so nesting depth
    /// is bounded by memory rather than the call stack.
    pub fn find_element_deep(&self, name: &str, value: Option<&str>) -> Option<(&Self, usize)> {
        let mut pending = vec![(self, 0)];
        while let Some((parent, index)) = pending.pop() {
            let Some(child) = parent.children.get(index) else {
                continue;
            };
            pending.push((parent, index + 1));
            if let Node::Element(element) = child {
                if element.name == name && value.map_or(true, |v| element.value() == v) {
                    return Some((parent, index));
                }
                pending.push((element, 0));
            }
        }
        None
    }

    /// Drop whitespace-only text children unless some text child carries
    /// real content. Applied to each element as it is closed by a builder.
    pub(crate) fn strip_formatting_text(&mut self) {
        let has_content = self
            .children
            .iter()
            .filter_map(Node::as_text)
            .any(|text| !text.is_blank());
        if !has_content {
            self.remove_all_text_nodes();
        }
    }

    /// Indented human-readable outline, one node per line. Also logged at
    /// debug level.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        debug!(root = %self.name, "\n{out}");
        out
    }

    fn dump_into(&self, out: &mut String, level: usize) {
        let pad = "  ".repeat(level);
        let _ = write!(out, "{pad}{}", self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{value}\"");
        }
        out.push('\n');
        for child in &self.children {
            match child {
                Node::Element(element) => element.dump_into(out, level + 1),
                Node::Text(text) => {
                    let _ = writeln!(out, "{pad}  \"{}\"", text.value);
                }
            }
        }
    }
}

impl fmt::Display for ElementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}
