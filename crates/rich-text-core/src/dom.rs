//! Document tree.
//!
//! The editable surface is an arena-backed tree of element and text nodes.
//! There is deliberately no intermediate document model: the live tree *is*
//! the document, and every piece of "current state" (active formats, emptiness,
//! serialized content) is derived from it by query at the moment it is needed.
//!
//! Nodes are addressed by [`NodeId`] indices into the arena. Detached nodes
//! stay in the arena but become unreachable from the root; traversal and
//! serialization only ever follow child links, so they are effectively gone.

use std::collections::BTreeMap;

/// The id attribute carried by the editing root element.
///
/// Ancestor walks never match the root itself and never climb past it.
pub const EDITING_ROOT_ID: &str = "text-content";

/// Handle to a node in a [`Dom`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Element payload: tag, attributes, and parsed inline styles.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes other than `style`, keyed by lowercase name.
    pub attrs: BTreeMap<String, String>,
    /// Inline style declarations, keyed by kebab-case property name.
    pub styles: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena document tree rooted at a `body` element carrying [`EDITING_ROOT_ID`].
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Dom {
    /// Create an empty document: a bare `body` root with the editing-root id.
    pub fn new() -> Self {
        let mut element = Element {
            tag: "body".to_string(),
            ..Element::default()
        };
        element
            .attrs
            .insert("id".to_string(), EDITING_ROOT_ID.to_string());

        let root_node = Node {
            data: NodeData::Element(element),
            parent: None,
            children: Vec::new(),
        };

        Self {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// The editing root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element node with the given (lowercased) tag.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeData::Element(Element {
            tag: tag.to_ascii_lowercase(),
            ..Element::default()
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // -- queries -------------------------------------------------------------

    /// `true` if `node` is an element.
    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].data, NodeData::Element(_))
    }

    /// `true` if `node` is a text node.
    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].data, NodeData::Text(_))
    }

    /// Lowercase tag name, or `None` for text nodes.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Element(element) => Some(element.tag.as_str()),
            NodeData::Text(_) => None,
        }
    }

    /// Text content of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Text(text) => Some(text.as_str()),
            NodeData::Element(_) => None,
        }
    }

    /// Replace the content of a text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let NodeData::Text(current) = &mut self.nodes[node.0].data {
            *current = text.to_string();
        }
    }

    /// Element payload accessor.
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes[node.0].data {
            NodeData::Element(element) => Some(element),
            NodeData::Text(_) => None,
        }
    }

    /// Attribute value on an element node.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.attrs.get(name))
            .map(String::as_str)
    }

    /// Set an attribute on an element node.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeData::Element(element) = &mut self.nodes[node.0].data {
            element.attrs.insert(name.to_string(), value.to_string());
        }
    }

    /// Inline style property on an element node.
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.styles.get(property))
            .map(String::as_str)
    }

    /// Set an inline style property on an element node.
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let NodeData::Element(element) = &mut self.nodes[node.0].data {
            element
                .styles
                .insert(property.to_string(), value.to_string());
        }
    }

    /// Remove an inline style property from an element node.
    pub fn remove_style(&mut self, node: NodeId, property: &str) {
        if let NodeData::Element(element) = &mut self.nodes[node.0].data {
            element.styles.remove(property);
        }
    }

    /// The element's id attribute.
    pub fn id_attr(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    /// `true` if the element's class attribute contains `class_name`.
    pub fn has_class(&self, node: NodeId, class_name: &str) -> bool {
        self.attr(node, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }

    /// `true` if `node` is the editing-root boundary: the root element itself,
    /// any element carrying the editing-root id, or an `html`/`body` tag.
    pub fn is_editing_root(&self, node: NodeId) -> bool {
        if node == self.root {
            return true;
        }
        match self.tag(node) {
            Some("html") | Some("body") => true,
            Some(_) => self.id_attr(node) == Some(EDITING_ROOT_ID),
            None => false,
        }
    }

    /// Parent node, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Child list of a node (empty for text nodes).
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Position of `child` within its parent's child list.
    pub fn child_index(&self, child: NodeId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Iterate ancestors of `node`, nearest first, root included.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.parent(node);
        std::iter::from_fn(move || {
            let next = current?;
            current = self.parent(next);
            Some(next)
        })
    }

    /// Nearest ancestor (the node itself included) matching `predicate`,
    /// stopping at the editing root without matching it.
    pub fn closest<F>(&self, node: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Dom, NodeId) -> bool,
    {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if self.is_editing_root(candidate) {
                return None;
            }
            if predicate(self, candidate) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    // -- mutation ------------------------------------------------------------

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` into `parent` at `index` (clamped to the child count).
    pub fn insert_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let index = index.min(self.nodes[parent.0].children.len());
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index, child);
    }

    /// Insert `node` immediately before `reference` in the same parent.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        if let Some(parent) = self.parent(reference) {
            let index = self.child_index(reference).unwrap_or(0);
            self.insert_child_at(parent, index, node);
        }
    }

    /// Insert `node` immediately after `reference` in the same parent.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        if let Some(parent) = self.parent(reference) {
            let index = self.child_index(reference).map(|i| i + 1).unwrap_or(0);
            self.insert_child_at(parent, index, node);
        }
    }

    /// Detach `node` from its parent. The subtree stays intact and can be
    /// reattached elsewhere.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Remove all children of `node`.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Replace `old` with `new` at the same tree position. `old` is detached.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) {
        if let Some(parent) = self.parent(old) {
            let index = self.child_index(old).unwrap_or(0);
            self.detach(old);
            self.insert_child_at(parent, index, new);
        }
    }

    /// Replace an element with a plain text node holding its inner text.
    ///
    /// Used by `unlink`: `<a href=..>click</a>` becomes the text `click`.
    pub fn replace_with_text(&mut self, node: NodeId) -> Option<NodeId> {
        self.parent(node)?;
        let text = self.inner_text(node);
        let replacement = self.create_text(&text);
        self.replace_with(node, replacement);
        Some(replacement)
    }

    /// Replace an element with its own children, preserving order.
    pub fn unwrap_element(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else {
            return;
        };
        let index = self.child_index(node).unwrap_or(0);
        let children = std::mem::take(&mut self.nodes[node.0].children);
        self.detach(node);
        for (offset, child) in children.into_iter().enumerate() {
            self.nodes[child.0].parent = None;
            self.insert_child_at(parent, index + offset, child);
        }
    }

    /// Shallow-clone an element (tag, attributes, styles; no children).
    pub fn shallow_clone(&mut self, node: NodeId) -> NodeId {
        let element = self
            .element(node)
            .cloned()
            .unwrap_or_default();
        self.push_node(NodeData::Element(element))
    }

    /// Split a text node at a character offset.
    ///
    /// The original keeps `[..offset]`; a new sibling holding `[offset..]` is
    /// inserted right after it and returned. Splitting at either end returns
    /// the node itself without restructuring.
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> NodeId {
        let Some(text) = self.text(node) else {
            return node;
        };
        let char_count = text.chars().count();
        if offset == 0 || offset >= char_count {
            return node;
        }
        let byte_offset = text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        let tail_text = text[byte_offset..].to_string();
        let head_text = text[..byte_offset].to_string();

        self.set_text(node, &head_text);
        let tail = self.create_text(&tail_text);
        self.insert_after(node, tail);
        tail
    }

    /// Length of a text node in characters.
    pub fn text_len(&self, node: NodeId) -> usize {
        self.text(node).map(|t| t.chars().count()).unwrap_or(0)
    }

    // -- traversal -----------------------------------------------------------

    /// All nodes under `root` (inclusive) in document order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            result.push(node);
            for &child in self.children(node).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Text nodes under `root` in document order.
    pub fn text_nodes_in(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&n| self.is_text(n))
            .collect()
    }

    /// First element under `root` (in document order) carrying `class_name`.
    pub fn find_by_class(&self, root: NodeId, class_name: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&n| self.is_element(n) && self.has_class(n, class_name))
    }

    /// First element under `root` with the given tag.
    pub fn find_by_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&n| self.tag(n) == Some(tag))
    }

    /// `true` if `ancestor` contains `node` (or is `node`).
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if ancestor == node {
            return true;
        }
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Plain-text rendering of the subtree: text nodes concatenated, `<br>`
    /// contributing a newline, block-level elements closing a line. Trailing
    /// whitespace is trimmed, matching what a host reads off a rendered
    /// surface.
    pub fn inner_text(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(root, &mut out);
        out.trim_end().to_string()
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element(element) => {
                if element.tag == "br" {
                    out.push('\n');
                    return;
                }
                for &child in self.children(node).iter() {
                    self.collect_text(child, out);
                }
                if is_block_tag(&element.tag) && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Tags treated as block-level for plain-text extraction and block lookup.
pub fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div" | "li" | "ol" | "ul" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote"
    )
}
