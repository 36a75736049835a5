//! Arena-backed document tree.
//!
//! Every node lives in a single `Vec` owned by [`Document`] and is addressed by a [`NodeId`].
//! Ownership runs strictly parent -> children through the `children` lists; the `parent` field is
//! a plain index used for detach/replace and never keeps a node alive. Detached nodes stay in the
//! arena (unreachable from the root) until the document is dropped.

mod serialize;
mod xhtml;

use crate::error::{Error, Result};
use indexmap::IndexMap;

pub use serialize::escape_attribute_value;

/// Attribute map of an element. Keys are unique; insertion order is kept for stable output.
pub type Attributes = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Attributes,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
        }
    }

    pub fn with_attrs(name: impl Into<String>, attrs: Attributes) -> Self {
        Self {
            name: name.into(),
            attrs,
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    // Attribute names are matched ASCII case-insensitively, exact spelling first.
    fn attr_index(&self, name: &str) -> Option<usize> {
        self.attrs.get_index_of(name).or_else(|| {
            self.attrs
                .keys()
                .position(|k| k.eq_ignore_ascii_case(name))
        })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        let (_, value) = self.attrs.get_index(self.attr_index(name)?)?;
        Some(value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr_index(name).is_some()
    }

    /// Sets `name` to `value`. An existing attribute spelled in another case is overwritten in
    /// place and takes the new spelling.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        match self.attr_index(&name) {
            Some(index) if self.attrs.get_index(index).is_some_and(|(k, _)| *k != name) => {
                self.attrs.shift_remove_index(index);
                self.attrs.shift_insert(index, name, value);
            }
            _ => {
                self.attrs.insert(name, value);
            }
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attr_index(name)?;
        self.attrs.shift_remove_index(index).map(|(_, value)| value)
    }

    /// Whitespace-separated `class` membership test.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The single document root. Holds the top-level nodes of the fragment.
    Root,
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeEntry {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeEntry {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeEntry>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![NodeEntry::new(NodeKind::Root)],
        }
    }

    /// Reads a well-formed (XHTML-style) fragment into a new document.
    ///
    /// This is not an HTML5 parser: void elements must be self-closed and only the XML
    /// predefined entities are recognized.
    pub fn parse_fragment(markup: &str) -> Result<Self> {
        xhtml::read_fragment(markup)
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    fn entry(&self, id: NodeId) -> &NodeEntry {
        &self.nodes[id.0]
    }

    fn entry_mut(&mut self, id: NodeId) -> &mut NodeEntry {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry::new(kind));
        id
    }

    pub fn create_element(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeKind::Element(Element::new(name)))
    }

    pub fn create_element_with_attrs(
        &mut self,
        name: impl Into<String>,
        attrs: Attributes,
    ) -> NodeId {
        self.push(NodeKind::Element(Element::with_attrs(name, attrs)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Comment(text.into()))
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.entry(id).kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.entry(id).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.entry_mut(id).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.name.as_str())
    }

    /// `true` when `id` is an element whose tag matches `name` (ASCII case-insensitive).
    pub fn is_element_named(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|el| el.is(name))
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    /// Sets an attribute; a no-op for non-element nodes.
    pub fn set_attr(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            el.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id).and_then(|el| el.remove_attr(name))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.entry(id).children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).children.first().copied()
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let NodeKind::Text(t) = self.kind(node) {
                out.push_str(t);
            }
        }
        out
    }

    /// `true` when `ancestor` is `node` itself or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    /// `true` when the node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(Self::ROOT, id)
    }

    /// Removes `id` from its parent's child list. The node and its subtree stay intact.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.entry_mut(id).parent.take() else {
            return;
        };
        self.entry_mut(parent).children.retain(|&c| c != id);
    }

    /// Appends `child` as the last child of `parent`, detaching it from any previous parent.
    ///
    /// Requests that would create a cycle (appending a node under itself or one of its
    /// descendants) and attempts to move the root are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if child == Self::ROOT || self.is_inclusive_ancestor(child, parent) {
            return;
        }
        self.detach(child);
        self.entry_mut(child).parent = Some(parent);
        self.entry_mut(parent).children.push(child);
    }

    /// Puts `new` at the position of `old` in `old`'s parent. `old` ends up detached.
    ///
    /// Does nothing when `old` has no parent or `new` contains `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if old == new || self.is_inclusive_ancestor(new, old) {
            return;
        }
        let Some(parent) = self.parent(old) else {
            return;
        };
        self.detach(new);
        let Some(pos) = self.children(parent).iter().position(|&c| c == old) else {
            return;
        };
        self.entry_mut(parent).children[pos] = new;
        self.entry_mut(new).parent = Some(parent);
        self.entry_mut(old).parent = None;
    }

    /// Removes the node (and its subtree) from the tree.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// Pre-order traversal of `id` and its descendants, collected up front.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.children(cur).iter().rev().copied());
        }
        out
    }

    /// Snapshot of all attached elements named `tag`, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(Self::ROOT)
            .into_iter()
            .filter(|&id| self.is_element_named(id, tag))
            .collect()
    }

    /// Copies the node without its children. The copy is detached.
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let kind = self.entry(id).kind.clone();
        self.push(kind)
    }

    /// Copies the node and its whole subtree. The copy is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let copy = self.shallow_clone(id);
        let children = self.children(id).to_vec();
        for child in children {
            let child_copy = self.deep_clone(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Verifies parent/child links of everything reachable from the root.
    pub fn check_integrity(&self) -> Result<()> {
        if self.entry(Self::ROOT).parent.is_some() {
            return Err(Error::Integrity {
                node: 0,
                message: "root has a parent".to_string(),
            });
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![Self::ROOT];
        while let Some(cur) = stack.pop() {
            if std::mem::replace(&mut seen[cur.0], true) {
                return Err(Error::Integrity {
                    node: cur.0,
                    message: "node reachable more than once".to_string(),
                });
            }
            let entry = self.entry(cur);
            if !entry.children.is_empty()
                && matches!(entry.kind, NodeKind::Text(_) | NodeKind::Comment(_))
            {
                return Err(Error::Integrity {
                    node: cur.0,
                    message: "character data node has children".to_string(),
                });
            }
            for &child in &entry.children {
                if child == Self::ROOT || child.0 >= self.nodes.len() {
                    return Err(Error::Integrity {
                        node: cur.0,
                        message: format!("invalid child handle {}", child.0),
                    });
                }
                if self.entry(child).parent != Some(cur) {
                    return Err(Error::Integrity {
                        node: child.0,
                        message: format!("parent link does not point back to {}", cur.0),
                    });
                }
                stack.push(child);
            }
        }
        Ok(())
    }

    /// Serializes the children of the root.
    pub fn to_html(&self) -> String {
        serialize::inner_html(self, Self::ROOT)
    }

    /// Serializes a single node including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        serialize::outer_html(self, id)
    }

    /// Serializes the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        serialize::inner_html(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.create_element("div");
        let p = doc.create_element("p");
        let text = doc.create_text("hello");
        doc.append_child(root, div);
        doc.append_child(div, p);
        doc.append_child(p, text);
        (doc, div, p, text)
    }

    #[test]
    fn append_and_detach_keep_links_consistent() {
        let (mut doc, div, p, _) = sample();
        assert_eq!(doc.parent(p), Some(div));
        doc.detach(p);
        assert_eq!(doc.parent(p), None);
        assert!(doc.children(div).is_empty());
        assert!(!doc.is_attached(p));
        doc.check_integrity().unwrap();
    }

    #[test]
    fn append_child_refuses_cycles() {
        let (mut doc, div, p, _) = sample();
        doc.append_child(p, div);
        assert_eq!(doc.parent(div), Some(doc.root()));
        assert_eq!(doc.parent(p), Some(div));
        doc.check_integrity().unwrap();
    }

    #[test]
    fn replace_keeps_position_among_siblings() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.create_element("c");
        for n in [a, b, c] {
            doc.append_child(root, n);
        }
        let x = doc.create_element("x");
        doc.replace(b, x);
        assert_eq!(doc.children(root), &[a, x, c]);
        assert_eq!(doc.parent(b), None);
        assert_eq!(doc.parent(x), Some(root));
        doc.check_integrity().unwrap();
    }

    #[test]
    fn elements_by_tag_is_document_order_and_case_insensitive() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.create_element("VIDEO");
        let inner = doc.create_element("video");
        let sibling = doc.create_element("video");
        doc.append_child(root, outer);
        doc.append_child(outer, inner);
        doc.append_child(root, sibling);
        assert_eq!(doc.elements_by_tag("video"), vec![outer, inner, sibling]);
    }

    #[test]
    fn deep_clone_copies_subtree_detached() {
        let (mut doc, div, _, _) = sample();
        doc.set_attr(div, "class", "x");
        let copy = doc.deep_clone(div);
        assert_eq!(doc.parent(copy), None);
        assert_eq!(doc.outer_html(copy), doc.outer_html(div));
        assert_eq!(doc.text_content(copy), "hello");

        let shallow = doc.shallow_clone(div);
        assert!(doc.children(shallow).is_empty());
        assert_eq!(doc.attr(shallow, "class"), Some("x"));
    }

    #[test]
    fn has_class_matches_whole_tokens() {
        let mut el = Element::new("figure");
        el.set_attr("class", "wp-block-video  alignwide");
        assert!(el.has_class("wp-block-video"));
        assert!(el.has_class("alignwide"));
        assert!(!el.has_class("wp-block"));
    }

    #[test]
    fn attribute_names_match_case_insensitively() {
        let mut el = Element::new("source");
        el.set_attr("SRC", "a.mp4");
        el.set_attr("Type", "video/mp4");
        assert_eq!(el.attr("src"), Some("a.mp4"));
        assert!(el.has_attr("type"));

        el.set_attr("src", "b.mp4");
        let names: Vec<_> = el.attrs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["src", "Type"]);
        assert_eq!(el.attr("SRC"), Some("b.mp4"));

        assert_eq!(el.remove_attr("TYPE").as_deref(), Some("video/mp4"));
        assert!(!el.has_attr("type"));
    }

    #[test]
    fn integrity_check_reports_broken_parent_link() {
        let (mut doc, _, p, _) = sample();
        let root = doc.root();
        doc.entry_mut(p).parent = Some(root);
        let err = doc.check_integrity().unwrap_err();
        assert!(matches!(err, Error::Integrity { node, .. } if node == p.index()));
    }
}
