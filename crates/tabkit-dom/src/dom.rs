//! Arena-based document tree.
//!
//! Nodes are stored in a flat `Vec` arena and linked by index. Nodes are
//! never freed: removing a node detaches it (clears its parent link), so a
//! [`NodeId`] stays valid for the lifetime of the document and detached
//! subtrees can be moved back in later.

use crate::layout::LayoutBox;
use tabkit_types::event::NodeId;

// ------------------------------------------------------------------
// Node types
// ------------------------------------------------------------------

/// A document: the arena plus the id of its synthetic root node.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

/// A single node in the tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Geometry supplied by the host or a layout engine.
    pub layout: LayoutBox,
}

/// The kind of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
    /// Pre-rendered markup the engine carries without parsing, e.g. an HTML
    /// fragment fetched from a remote collection.
    Markup(String),
    Comment(String),
}

/// Data associated with an element node.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: TagName,
    pub attributes: Vec<Attribute>,
    /// Inline style declarations in insertion order.
    pub style: Vec<(String, String)>,
}

/// An element attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

// ------------------------------------------------------------------
// TagName
// ------------------------------------------------------------------

/// Tag names the widget creates or looks for. Anything else is kept as
/// `Unknown(String)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagName {
    Html,
    Head,
    Body,
    Header,
    Nav,
    Main,
    Article,
    Section,
    Div,
    Span,
    P,
    A,
    Br,
    Hr,
    Img,
    Button,
    H1,
    H2,
    H3,
    H4,
    Ul,
    Ol,
    Li,
    Unknown(String),
}

impl TagName {
    /// Parse a tag name. Matching is case-insensitive.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "html" => Self::Html,
            "head" => Self::Head,
            "body" => Self::Body,
            "header" => Self::Header,
            "nav" => Self::Nav,
            "main" => Self::Main,
            "article" => Self::Article,
            "section" => Self::Section,
            "div" => Self::Div,
            "span" => Self::Span,
            "p" => Self::P,
            "a" => Self::A,
            "br" => Self::Br,
            "hr" => Self::Hr,
            "img" => Self::Img,
            "button" => Self::Button,
            "h1" => Self::H1,
            "h2" => Self::H2,
            "h3" => Self::H3,
            "h4" => Self::H4,
            "ul" => Self::Ul,
            "ol" => Self::Ol,
            "li" => Self::Li,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Get the string representation of this tag name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Html => "html",
            Self::Head => "head",
            Self::Body => "body",
            Self::Header => "header",
            Self::Nav => "nav",
            Self::Main => "main",
            Self::Article => "article",
            Self::Section => "section",
            Self::Div => "div",
            Self::Span => "span",
            Self::P => "p",
            Self::A => "a",
            Self::Br => "br",
            Self::Hr => "hr",
            Self::Img => "img",
            Self::Button => "button",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::Ul => "ul",
            Self::Ol => "ol",
            Self::Li => "li",
            Self::Unknown(s) => s.as_str(),
        }
    }

    /// Returns `true` for void elements (no closing tag when serialized).
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Br | Self::Hr | Self::Img)
    }
}

// ------------------------------------------------------------------
// ElementData
// ------------------------------------------------------------------

impl ElementData {
    /// Create a new `ElementData` with the given tag and no attributes.
    pub fn new(tag: TagName) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            style: Vec::new(),
        }
    }

    /// Get an attribute value by name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
        } else {
            self.attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Remove an attribute. Returns `true` if it was present.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|a| a.name != name);
        self.attributes.len() != before
    }

    /// Check if this element has a given CSS class.
    ///
    /// The `class` attribute value is split on ASCII whitespace and each
    /// token is compared to `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attribute("class")
            .map(|v| v.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Add a class token if not already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let value = match self.get_attribute("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attribute("class", &value);
    }

    /// Remove every occurrence of a class token.
    pub fn remove_class(&mut self, class: &str) {
        let Some(existing) = self.get_attribute("class") else {
            return;
        };
        let value = existing
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute("class", &value);
    }

    /// Get the `id` attribute if present.
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// Get an inline style value.
    pub fn style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set an inline style value (custom properties included).
    pub fn set_style(&mut self, property: &str, value: &str) {
        if let Some(entry) = self.style.iter_mut().find(|(p, _)| p == property) {
            entry.1 = value.to_string();
        } else {
            self.style.push((property.to_string(), value.to_string()));
        }
    }

    /// Remove an inline style value.
    pub fn remove_style(&mut self, property: &str) {
        self.style.retain(|(p, _)| p != property);
    }
}

// ------------------------------------------------------------------
// Document
// ------------------------------------------------------------------

impl Document {
    /// Create an empty document with a synthetic `Document` root node.
    pub fn new() -> Self {
        let root_node = Node {
            kind: NodeKind::Document,
            parent: None,
            children: Vec::new(),
            layout: LayoutBox::default(),
        };
        Self {
            nodes: vec![root_node],
            root: 0,
        }
    }

    /// The synthetic root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root node exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a new detached node to the arena and return its [`NodeId`].
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            layout: LayoutBox::default(),
        });
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.add_node(NodeKind::Element(ElementData::new(TagName::from_str(tag))))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.add_node(NodeKind::Text(text.to_string()))
    }

    /// Create a detached opaque markup node.
    pub fn create_markup(&mut self, markup: &str) -> NodeId {
        self.add_node(NodeKind::Markup(markup.to_string()))
    }

    /// Whether `id` names a node in this arena.
    pub fn contains_id(&self, id: NodeId) -> bool {
        id < self.nodes.len()
    }

    /// Get a reference to a node by ID.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Get a mutable reference to a node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Get the [`ElementData`] for a node, if it is an `Element`.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable [`ElementData`] for a node, if it is an `Element`.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id)?.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Whether a node is an element with the given tag.
    pub fn is_tag(&self, id: NodeId, tag: &TagName) -> bool {
        self.element(id).is_some_and(|e| e.tag == *tag)
    }

    // -- Tree structure --

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Child nodes that are elements, in order.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .filter(|&c| self.element(c).is_some())
            .collect()
    }

    /// Append `child_id` as the last child of `parent_id`, detaching it from
    /// any previous parent first. Returns `false` and leaves the tree alone
    /// if `parent_id` is `child_id` or one of its descendants.
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> bool {
        if self.contains(child_id, parent_id) {
            return false;
        }
        self.detach(child_id);
        self.nodes[parent_id].children.push(child_id);
        self.nodes[child_id].parent = Some(parent_id);
        true
    }

    /// Insert `child_id` into `parent_id` before `reference`. A missing or
    /// foreign reference appends. Refuses cycles like [`append_child`].
    ///
    /// [`append_child`]: Document::append_child
    pub fn insert_before(
        &mut self,
        parent_id: NodeId,
        child_id: NodeId,
        reference: Option<NodeId>,
    ) -> bool {
        if self.contains(child_id, parent_id) {
            return false;
        }
        self.detach(child_id);
        let pos = reference.and_then(|r| self.nodes[parent_id].children.iter().position(|&c| c == r));
        match pos {
            Some(pos) => self.nodes[parent_id].children.insert(pos, child_id),
            None => self.nodes[parent_id].children.push(child_id),
        }
        self.nodes[child_id].parent = Some(parent_id);
        true
    }

    /// Insert `new_id` right after `existing` in its parent. Returns `false`
    /// if `existing` is detached or the move would create a cycle.
    pub fn insert_after(&mut self, existing: NodeId, new_id: NodeId) -> bool {
        let Some(parent) = self.nodes[existing].parent else {
            return false;
        };
        if self.contains(new_id, parent) {
            return false;
        }
        self.detach(new_id);
        let pos = self.nodes[parent]
            .children
            .iter()
            .position(|&c| c == existing)
            .map_or(self.nodes[parent].children.len(), |p| p + 1);
        self.nodes[parent].children.insert(pos, new_id);
        self.nodes[new_id].parent = Some(parent);
        true
    }

    /// Detach a node (and its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&c| c != id);
        }
    }

    /// Iterate over the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.nodes[id].parent,
        }
    }

    /// Whether `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Whether a node is attached to the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// All descendants of `id` in document (pre-)order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n].children.iter().rev().copied());
        }
        out
    }

    /// Next sibling that is an element.
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id].parent?;
        let siblings = &self.nodes[parent].children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|&s| self.element(s).is_some())
    }

    /// Previous sibling that is an element.
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id].parent?;
        let siblings = &self.nodes[parent].children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .find(|&s| self.element(s).is_some())
    }

    /// Deep-copy a subtree into new detached nodes. Layout is not copied.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let copy = self.add_node(self.nodes[id].kind.clone());
        let children = self.nodes[id].children.clone();
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    // -- Attributes, classes, style --

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attribute(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(e) = self.element_mut(id) {
            e.set_attribute(name, value);
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(e) = self.element_mut(id) {
            e.remove_attribute(name);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(e) = self.element_mut(id) {
            e.add_class(class);
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(e) = self.element_mut(id) {
            e.remove_class(class);
        }
    }

    /// Add or remove a class depending on `on`.
    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)?.style(property)
    }

    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        if let Some(e) = self.element_mut(id) {
            e.set_style(property, value);
        }
    }

    pub fn remove_style(&mut self, id: NodeId, property: &str) {
        if let Some(e) = self.element_mut(id) {
            e.remove_style(property);
        }
    }

    // -- Content --

    /// Get the concatenated text content of a node and all its
    /// descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].kind {
            NodeKind::Text(s) => out.push_str(s),
            NodeKind::Markup(_) | NodeKind::Comment(_) => {},
            _ => {
                for &child in &self.nodes[id].children {
                    self.collect_text(child, out);
                }
            },
        }
    }

    /// Find the first attached element whose `id` attribute matches.
    pub fn get_element_by_id(&self, target: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.element(n).is_some_and(|e| e.id() == Some(target)))
    }

    /// Depth-first search under `from` for the first element with `tag`.
    pub fn find_first_element(&self, from: NodeId, tag: &TagName) -> Option<NodeId> {
        self.descendants(from)
            .into_iter()
            .find(|&n| self.is_tag(n, tag))
    }

    /// Find the `<body>` element.
    pub fn body(&self) -> Option<NodeId> {
        self.find_first_element(self.root, &TagName::Body)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.nodes[current].parent;
        Some(current)
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
