//! Boundary points and ranges.
//!
//! Offsets on character data count characters; offsets on containers count
//! children. Extraction follows DOM range semantics: boundaries inside text
//! are split, partially selected elements are shallow-cloned into the
//! extracted fragment and the range collapses where the contents were.

use std::cmp::Ordering;

use crate::document::{Document, char_to_byte};
use crate::error::DomError;
use crate::node::{NodeId, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

impl Boundary {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A contiguous span between two boundary points, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    start: Boundary,
    end: Boundary,
}

impl Range {
    /// Build a range, checking both boundaries against the document.
    pub fn new(doc: &Document, start: Boundary, end: Boundary) -> Result<Self, DomError> {
        let range = Self { start, end };
        doc.check_range(&range)?;
        Ok(range)
    }

    /// Unchecked constructor for ranges the caller just computed.
    pub(crate) fn between(start: Boundary, end: Boundary) -> Self {
        Self { start, end }
    }

    pub fn collapsed(at: Boundary) -> Self {
        Self { start: at, end: at }
    }

    /// Range covering all children of `node`.
    pub fn node_contents(doc: &Document, node: NodeId) -> Self {
        Self {
            start: Boundary::new(node, 0),
            end: Boundary::new(node, doc.node_len(node)),
        }
    }

    pub fn start(&self) -> Boundary {
        self.start
    }

    pub fn end(&self) -> Boundary {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Plain text covered by the range.
    pub fn text(&self, doc: &Document) -> String {
        doc.range_text(self)
    }

    pub fn common_ancestor(&self, doc: &Document) -> NodeId {
        doc.common_ancestor(self)
    }
}

impl Document {
    /// Document-order comparison of two boundary points in the same tree.
    pub fn compare_boundaries(&self, a: Boundary, b: Boundary) -> Ordering {
        let mut pa = self.path_from_root(a.node);
        pa.push(a.offset);
        let mut pb = self.path_from_root(b.node);
        pb.push(b.offset);
        pa.cmp(&pb)
    }

    /// Verify that a range still describes a valid span of this document.
    pub fn check_range(&self, range: &Range) -> Result<(), DomError> {
        for b in [range.start, range.end] {
            if !self.contains(b.node) {
                return Err(DomError::UnknownNode(b.node));
            }
            if matches!(self.kind(b.node), NodeKind::Doctype(_)) {
                return Err(DomError::InvalidRange("boundary inside a doctype".to_string()));
            }
            let len = self.node_len(b.node);
            if b.offset > len {
                return Err(DomError::InvalidOffset { offset: b.offset, len });
            }
        }
        if self.tree_root(range.start.node) != self.tree_root(range.end.node) {
            return Err(DomError::InvalidRange("boundaries are in different trees".to_string()));
        }
        if self.compare_boundaries(range.start, range.end) == Ordering::Greater {
            return Err(DomError::InvalidRange("start is after end".to_string()));
        }
        Ok(())
    }

    /// Deepest node containing both boundaries.
    pub fn common_ancestor(&self, range: &Range) -> NodeId {
        let mut current = range.start.node;
        loop {
            if self.is_inclusive_ancestor(current, range.end.node) {
                return current;
            }
            match self.parent(current) {
                Some(p) => current = p,
                None => return current,
            }
        }
    }

    /// Plain text covered by the range.
    pub fn range_text(&self, range: &Range) -> String {
        if range.is_collapsed() {
            return String::new();
        }
        if range.start.node == range.end.node {
            if let Some(text) = self.char_data(range.start.node) {
                if self.is_text(range.start.node) {
                    return slice_chars(text, range.start.offset, range.end.offset).to_string();
                }
            }
        }

        let root = self.common_ancestor(range);
        let mut nodes = vec![root];
        nodes.extend(self.descendants(root));

        let mut out = String::new();
        for node in nodes {
            let NodeKind::Text(text) = self.kind(node) else {
                continue;
            };
            let len = text.chars().count();
            let lo = if node == range.start.node {
                range.start.offset
            } else if self.compare_boundaries(Boundary::new(node, 0), range.start) != Ordering::Less {
                0
            } else {
                len
            };
            let hi = if node == range.end.node {
                range.end.offset
            } else if self.compare_boundaries(Boundary::new(node, len), range.end) != Ordering::Greater {
                len
            } else {
                0
            };
            if lo < hi {
                out.push_str(slice_chars(text, lo, hi));
            }
        }
        out
    }

    /// Move the range's contents into a new fragment and collapse the range.
    pub fn extract_contents(&mut self, range: &mut Range) -> Result<NodeId, DomError> {
        self.check_range(range)?;
        let fragment = self.create_fragment();
        if range.is_collapsed() {
            return Ok(fragment);
        }

        let (start, end) = (range.start, range.end);
        if start.node == end.node && self.kind(start.node).is_character_data() {
            let text = self.char_data(start.node).unwrap_or_default().to_string();
            let middle = slice_chars(&text, start.offset, end.offset).to_string();
            let mut remaining = slice_chars(&text, 0, start.offset).to_string();
            remaining.push_str(slice_chars(&text, end.offset, usize::MAX));
            self.set_char_data(start.node, remaining);
            let extracted = self.clone_shallow(start.node);
            self.set_char_data(extracted, middle);
            self.append_child(fragment, extracted)?;
            *range = Range::collapsed(start);
            return Ok(fragment);
        }

        let (end, _) = self.split_at_boundary(end)?;
        let (start, inserted) = self.split_at_boundary(start)?;
        let mut end = end;
        if let Some((parent, index)) = inserted {
            if end.node == parent && end.offset >= index {
                end.offset += 1;
            }
        }

        let collapse_to = self.collapse_point(start, end);
        self.extract_between(start, end, fragment)?;
        *range = Range::collapsed(collapse_to);
        Ok(fragment)
    }

    /// Insert `node` at the range start. Fragments are inserted by moving
    /// their children. Returns the top-level nodes that were inserted.
    pub fn insert_node(&mut self, range: &Range, node: NodeId) -> Result<Vec<NodeId>, DomError> {
        self.check_range(range)?;
        let start = range.start;

        let (parent, reference) = if self.kind(start.node).is_character_data() {
            let parent = self
                .parent(start.node)
                .ok_or_else(|| DomError::InvalidRange("text boundary without parent".to_string()))?;
            let len = self.node_len(start.node);
            let reference = if start.offset == 0 {
                Some(start.node)
            } else if start.offset == len {
                self.next_sibling(start.node)
            } else {
                Some(self.split_text(start.node, start.offset)?)
            };
            (parent, reference)
        } else {
            (start.node, self.children(start.node).get(start.offset).copied())
        };

        if matches!(self.kind(node), NodeKind::Fragment) {
            self.move_children_before(node, parent, reference)
        } else {
            self.insert_before(parent, node, reference)?;
            Ok(vec![node])
        }
    }

    /// First occurrence of `needle` in the text under [`Document::body`],
    /// matched across text node boundaries.
    pub fn find_text(&self, needle: &str) -> Option<Range> {
        if needle.is_empty() {
            return None;
        }
        let body = self.body();
        let texts: Vec<(NodeId, &str)> = self
            .descendants(body)
            .into_iter()
            .filter(|n| !self.in_raw_text(*n))
            .filter_map(|n| match self.kind(n) {
                NodeKind::Text(t) => Some((n, t.as_str())),
                _ => None,
            })
            .collect();
        let haystack: String = texts.iter().map(|(_, t)| *t).collect();
        let byte = haystack.find(needle)?;
        let first = haystack[..byte].chars().count();
        let last = first + needle.chars().count();

        let mut start = None;
        let mut end = None;
        let mut cursor = 0;
        for (node, text) in &texts {
            let len = text.chars().count();
            if start.is_none() && first >= cursor && first < cursor + len {
                start = Some(Boundary::new(*node, first - cursor));
            }
            if end.is_none() && last > cursor && last <= cursor + len {
                end = Some(Boundary::new(*node, last - cursor));
            }
            cursor += len;
        }
        Some(Range::between(start?, end?))
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?.checked_sub(1)?;
        self.children(parent).get(index).copied()
    }

    fn in_raw_text(&self, id: NodeId) -> bool {
        self.parent(id)
            .and_then(|p| self.tag(p))
            .is_some_and(|t| t == "script" || t == "style")
    }

    /// Turn a boundary inside character data into the equivalent container
    /// boundary, splitting the node when the offset falls strictly inside.
    /// Reports `(parent, index)` of a node inserted by the split.
    fn split_at_boundary(
        &mut self,
        b: Boundary,
    ) -> Result<(Boundary, Option<(NodeId, usize)>), DomError> {
        if !self.kind(b.node).is_character_data() {
            return Ok((b, None));
        }
        let parent = self
            .parent(b.node)
            .ok_or_else(|| DomError::InvalidRange("text boundary without parent".to_string()))?;
        let index = self.index_in_parent(b.node).unwrap_or(0);
        let len = self.node_len(b.node);
        if b.offset == 0 {
            Ok((Boundary::new(parent, index), None))
        } else if b.offset >= len {
            Ok((Boundary::new(parent, index + 1), None))
        } else {
            self.split_text(b.node, b.offset)?;
            Ok((Boundary::new(parent, index + 1), Some((parent, index + 1))))
        }
    }

    /// Where the range collapses after extraction.
    fn collapse_point(&self, start: Boundary, end: Boundary) -> Boundary {
        if self.is_inclusive_ancestor(start.node, end.node) {
            return start;
        }
        let mut reference = start.node;
        while let Some(parent) = self.parent(reference) {
            if self.is_inclusive_ancestor(parent, end.node) {
                let index = self.index_in_parent(reference).unwrap_or(0);
                return Boundary::new(parent, index + 1);
            }
            reference = parent;
        }
        start
    }

    /// Child of `ancestor` that contains `node`.
    fn child_containing(&self, ancestor: NodeId, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            if parent == ancestor {
                return current;
            }
            current = parent;
        }
        current
    }

    /// Move everything between two container boundaries into `dest`.
    fn extract_between(&mut self, start: Boundary, end: Boundary, dest: NodeId) -> Result<(), DomError> {
        if start.node == end.node {
            let moved: Vec<NodeId> = self.children(start.node)
                .get(start.offset..end.offset)
                .map(<[NodeId]>::to_vec)
                .unwrap_or_default();
            for child in moved {
                self.append_child(dest, child)?;
            }
            return Ok(());
        }

        let ancestor = self.common_ancestor(&Range::between(start, end));
        let first_partial = (start.node != ancestor).then(|| self.child_containing(ancestor, start.node));
        let last_partial = (end.node != ancestor).then(|| self.child_containing(ancestor, end.node));

        let from = match first_partial {
            Some(p) => self.index_in_parent(p).unwrap_or(0) + 1,
            None => start.offset,
        };
        let to = match last_partial {
            Some(p) => self.index_in_parent(p).unwrap_or(0),
            None => end.offset,
        };
        let contained: Vec<NodeId> = if from < to {
            self.children(ancestor)[from..to].to_vec()
        } else {
            Vec::new()
        };

        if let Some(partial) = first_partial {
            let clone = self.clone_shallow(partial);
            self.append_child(dest, clone)?;
            let len = self.node_len(partial);
            self.extract_between(start, Boundary::new(partial, len), clone)?;
        }
        for child in contained {
            self.append_child(dest, child)?;
        }
        if let Some(partial) = last_partial {
            let clone = self.clone_shallow(partial);
            self.append_child(dest, clone)?;
            self.extract_between(Boundary::new(partial, 0), end, clone)?;
        }
        Ok(())
    }
}

/// Characters `[from, to)` of `text`, clamped to its length.
fn slice_chars(text: &str, from: usize, to: usize) -> &str {
    let start = char_to_byte(text, from);
    let end = char_to_byte(text, to).max(start);
    &text[start..end]
}

#[cfg(test)]
#[path = "range_tests.rs"]
mod tests;
