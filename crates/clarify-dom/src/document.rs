//! Arena document and tree edits.

use crate::error::DomError;
use crate::node::{ElementData, NodeData, NodeId, NodeKind};

/// A document tree. Nodes live in an arena and are addressed by [`NodeId`].
///
/// Accessors index the arena directly and panic when given an id from a
/// different document; boundaries that accept foreign input check with
/// [`Document::contains`] first.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` was created by this document.
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Comment(text.into()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeKind::Fragment)
    }

    pub(crate) fn create_doctype(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Doctype(text.into()))
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Tag name for elements.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    /// Character data of text and comment nodes.
    pub fn char_data(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(t) | NodeKind::Comment(t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn set_char_data(&mut self, id: NodeId, value: String) {
        match &mut self.nodes[id.0].kind {
            NodeKind::Text(t) | NodeKind::Comment(t) => *t = value,
            _ => {}
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Text(_))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// DOM node length: characters for character data, children otherwise.
    pub fn node_len(&self, id: NodeId) -> usize {
        match &self.nodes[id.0].kind {
            NodeKind::Text(t) | NodeKind::Comment(t) => t.chars().count(),
            NodeKind::Doctype(_) => 0,
            _ => self.nodes[id.0].children.len(),
        }
    }

    /// Topmost ancestor (inclusive).
    pub fn tree_root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Whether the node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(id) && self.tree_root(id) == self.root
    }

    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Nearest inclusive ancestor matching `pred`.
    pub fn closest(&self, id: NodeId, pred: impl Fn(&Document, NodeId) -> bool) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(n) = current {
            if pred(self, n) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }

    /// Descendants in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// The `body` element, or the root when the document has none.
    pub fn body(&self) -> NodeId {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.tag(*n) == Some("body"))
            .unwrap_or(self.root)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        if let NodeKind::Text(t) = self.kind(id) {
            return t.clone();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| match self.kind(n) {
                NodeKind::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Detach a node from its parent. No-op for parentless nodes.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Insert `child` into `parent` at `index`, detaching it from any
    /// previous parent first.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<(), DomError> {
        for id in [parent, child] {
            if !self.contains(id) {
                return Err(DomError::UnknownNode(id));
            }
        }
        if !self.kind(parent).is_container() {
            return Err(DomError::NotAContainer(parent));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest(
                "cannot insert a node into itself or its descendant".to_string(),
            ));
        }
        if matches!(self.kind(child), NodeKind::Document) {
            return Err(DomError::HierarchyRequest("cannot insert the document node".to_string()));
        }

        let mut index = index;
        let mut len = self.nodes[parent.0].children.len();
        if self.parent(child) == Some(parent) {
            len -= 1;
            if let Some(old) = self.index_in_parent(child) {
                if old < index {
                    index -= 1;
                }
            }
        }
        if index > len {
            return Err(DomError::InvalidOffset { offset: index, len });
        }
        self.remove(child);
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let len = if self.contains(parent) { self.children(parent).len() } else { 0 };
        self.insert_child(parent, len, child)
    }

    /// Insert `child` before `reference` (or append when `None`).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        match reference {
            None => self.append_child(parent, child),
            Some(r) => {
                if self.parent(r) != Some(parent) {
                    return Err(DomError::HierarchyRequest(
                        "reference node is not a child of parent".to_string(),
                    ));
                }
                let index = self.index_in_parent(r).unwrap_or(0);
                self.insert_child(parent, index, child)
            }
        }
    }

    /// Move every child of `container` before `reference` under `parent`,
    /// preserving order. Returns the moved nodes.
    pub fn move_children_before(
        &mut self,
        container: NodeId,
        parent: NodeId,
        reference: Option<NodeId>,
    ) -> Result<Vec<NodeId>, DomError> {
        let moved = self.children(container).to_vec();
        for child in &moved {
            self.insert_before(parent, *child, reference)?;
        }
        Ok(moved)
    }

    /// Copy of the node without children, detached.
    pub fn clone_shallow(&mut self, id: NodeId) -> NodeId {
        let kind = self.kind(id).clone();
        self.alloc(kind)
    }

    /// Split a text node at a character offset. The tail becomes a new
    /// sibling directly after the original and is returned.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId, DomError> {
        let text = self
            .char_data(id)
            .ok_or_else(|| DomError::InvalidRange("split target is not character data".to_string()))?
            .to_string();
        let len = text.chars().count();
        if offset > len {
            return Err(DomError::InvalidOffset { offset, len });
        }
        let byte = char_to_byte(&text, offset);
        let (head, tail) = text.split_at(byte);
        let tail_node = self.clone_shallow(id);
        self.set_char_data(tail_node, tail.to_string());
        self.set_char_data(id, head.to_string());

        if let Some(parent) = self.parent(id) {
            let index = self.index_in_parent(id).unwrap_or(0);
            self.insert_child(parent, index + 1, tail_node)?;
        }
        Ok(tail_node)
    }

    /// Merge adjacent text children and drop empty text nodes, recursively.
    pub fn normalize(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        let mut previous_text: Option<NodeId> = None;
        for child in children {
            let text = match self.kind(child) {
                NodeKind::Text(t) => Some(t.clone()),
                _ => None,
            };
            match text {
                Some(t) if t.is_empty() => self.remove(child),
                Some(t) => match previous_text {
                    Some(prev) => {
                        let mut merged = self.char_data(prev).unwrap_or_default().to_string();
                        merged.push_str(&t);
                        self.set_char_data(prev, merged);
                        self.remove(child);
                    }
                    None => previous_text = Some(child),
                },
                None => {
                    previous_text = None;
                    self.normalize(child);
                }
            }
        }
    }

    /// Child indices from the tree root down to `id`.
    pub(crate) fn path_from_root(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(self.index_in_parent(current).unwrap_or(0));
            current = parent;
        }
        path.reverse();
        path
    }
}

/// Byte index of the `chars`-th character.
pub(crate) fn char_to_byte(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
