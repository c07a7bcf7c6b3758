//! Reversible substitutions.
//!
//! [`MutationEngine::apply`] replaces a range with new text inside a wrapper
//! element that carries the encoded original markup.
//! [`MutationEngine::restore`] decodes that markup and puts the original
//! nodes back where the wrapper was. The back-reference lives in the
//! document itself, so a region can be restored from a saved page without any
//! in-memory state.
//!
//! Neither operation fails past its boundary: problems are logged and the
//! call becomes a no-op.

use std::collections::HashSet;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, error, warn};

use crate::document::Document;
use crate::error::DomError;
use crate::node::NodeId;
use crate::range::{Boundary, Range};

/// Class marking a mutated region.
pub const HIGHLIGHT_CLASS: &str = "clarify-highlight";

/// Attribute holding the encoded original markup.
pub const ORIGINAL_ATTR: &str = "data-original-html";

/// Attribute recording how many levels of partially selected elements were
/// split off on each side, as `left,right`. Absent when neither side cut
/// through an element.
pub const EDGES_ATTR: &str = "data-original-edges";

/// Storage representation of a back-reference.
pub trait SnapshotCodec: Send + Sync {
    fn encode(&self, markup: &str) -> String;
    fn decode(&self, encoded: &str) -> Result<String, DomError>;
}

/// Standard base64 over the UTF-8 markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl SnapshotCodec for Base64Codec {
    fn encode(&self, markup: &str) -> String {
        STANDARD.encode(markup.as_bytes())
    }

    fn decode(&self, encoded: &str) -> Result<String, DomError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| DomError::Decode(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| DomError::Decode(e.to_string()))
    }
}

/// Handle to a wrapper created by [`MutationEngine::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutatedRegion(NodeId);

impl MutatedRegion {
    /// Treat an existing node as a region handle, e.g. one found in a
    /// reloaded page.
    pub fn from_node(node: NodeId) -> Self {
        Self(node)
    }

    pub fn node(&self) -> NodeId {
        self.0
    }
}

/// Whether `node` is a wrapper that still carries a back-reference.
pub fn is_mutated_region(doc: &Document, node: NodeId) -> bool {
    doc.contains(node)
        && doc
            .element(node)
            .is_some_and(|el| el.has_class(HIGHLIGHT_CLASS) && el.attr(ORIGINAL_ATTR).is_some())
}

/// Nearest mutated region enclosing `node`, inclusive.
pub fn enclosing_region(doc: &Document, node: NodeId) -> Option<MutatedRegion> {
    if !doc.contains(node) {
        return None;
    }
    doc.closest(node, is_mutated_region).map(MutatedRegion)
}

pub struct MutationEngine {
    codec: Box<dyn SnapshotCodec>,
}

impl Default for MutationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationEngine {
    pub fn new() -> Self {
        Self::with_codec(Base64Codec)
    }

    pub fn with_codec(codec: impl SnapshotCodec + 'static) -> Self {
        Self { codec: Box::new(codec) }
    }

    /// Replace the contents of `range` with `text`. Returns `None` when the
    /// range is no longer valid; the document is then left untouched.
    pub fn apply(&self, doc: &mut Document, range: &Range, text: &str) -> Option<MutatedRegion> {
        match self.try_apply(doc, range, text) {
            Ok(region) => {
                debug!(node = region.0.index(), "Applied transformation to page");
                Some(region)
            }
            Err(e) => {
                error!(error = %e, "Failed to apply transformation");
                None
            }
        }
    }

    fn try_apply(&self, doc: &mut Document, range: &Range, text: &str) -> Result<MutatedRegion, DomError> {
        doc.check_range(range)?;
        if !doc.is_attached(range.start().node) {
            return Err(DomError::Detached(range.start().node));
        }

        let wrapper = doc.create_element("span");
        render_lines(doc, wrapper, text)?;

        let edges = Edges::of(doc, range);
        let mut range = *range;
        let original = doc.extract_contents(&mut range)?;
        let markup = doc.serialize_children(original);
        if let Some(el) = doc.element_mut(wrapper) {
            el.set_attr("class", HIGHLIGHT_CLASS);
            el.set_attr(ORIGINAL_ATTR, self.codec.encode(&markup));
            if !edges.is_flat() {
                el.set_attr(EDGES_ATTR, edges.to_string());
            }
        }

        if let Err(e) = doc.insert_node(&range, wrapper) {
            // Put the extracted nodes back so nothing is lost.
            if let Err(undo) = doc.insert_node(&range, original) {
                error!(error = %undo, "Could not reinsert extracted content");
            }
            return Err(e);
        }
        Ok(MutatedRegion(wrapper))
    }

    /// Put the original markup back in place of the wrapper. Returns whether
    /// anything changed.
    pub fn restore(&self, doc: &mut Document, region: MutatedRegion) -> bool {
        self.restore_range(doc, region).is_some()
    }

    /// Like [`MutationEngine::restore`], returning the range now covering the
    /// restored content so it can be transformed again.
    pub fn restore_range(&self, doc: &mut Document, region: MutatedRegion) -> Option<Range> {
        match self.try_restore(doc, region.0) {
            Ok(range) => range,
            Err(e) => {
                error!(error = %e, node = region.0.index(), "Failed to restore original content");
                None
            }
        }
    }

    fn try_restore(&self, doc: &mut Document, wrapper: NodeId) -> Result<Option<Range>, DomError> {
        if !doc.contains(wrapper) {
            return Err(DomError::UnknownNode(wrapper));
        }
        if !doc.is_attached(wrapper) {
            debug!(node = wrapper.index(), "Restore target is detached, nothing to do");
            return Ok(None);
        }
        let Some(encoded) = doc.element(wrapper).and_then(|el| el.attr(ORIGINAL_ATTR)) else {
            warn!(node = wrapper.index(), "Restore target carries no back-reference");
            return Ok(None);
        };
        let markup = self.codec.decode(encoded)?;
        let edges = doc
            .element(wrapper)
            .and_then(|el| el.attr(EDGES_ATTR))
            .map(Edges::parse)
            .unwrap_or_default();
        let parent = doc.parent(wrapper).ok_or(DomError::Detached(wrapper))?;

        let original = doc.parse_fragment(&markup);
        let (lead, trail) = split_edges(doc, wrapper, original, edges);
        for (clone, _) in lead.iter().chain(trail.iter()) {
            doc.remove(*clone);
        }

        let restored = doc.move_children_before(original, parent, Some(wrapper))?;
        let index = doc.index_in_parent(wrapper).unwrap_or(0);
        doc.remove(wrapper);
        if let Some(el) = doc.element_mut(wrapper) {
            el.remove_attr(ORIGINAL_ATTR);
            el.remove_attr(EDGES_ATTR);
        }

        let mut range = match (restored.first().copied(), restored.last().copied()) {
            (Some(first), Some(last)) => {
                let start = Boundary::new(parent, index - restored.len());
                let end = Boundary::new(parent, index);
                merge_seams(doc, first, last, start, end)
            }
            _ => Range::collapsed(Boundary::new(parent, index)),
        };
        if let Some((clone, into)) = lead {
            let start = merge_leading(doc, into, clone, edges.left)?;
            range = Range::between(start, range.end());
        }
        if let Some((clone, into)) = trail {
            let end = merge_trailing(doc, into, clone, edges.right)?;
            range = Range::between(range.start(), end);
        }
        debug!(node = wrapper.index(), "Restored original content");
        Ok(Some(range))
    }

    /// Restore every mutated region in the document, including regions that
    /// reappear from restored markup. Returns how many were restored.
    pub fn restore_all(&self, doc: &mut Document) -> usize {
        let mut restored = 0;
        let mut skipped = HashSet::new();
        loop {
            let next = doc
                .descendants(doc.root())
                .into_iter()
                .find(|n| !skipped.contains(n) && is_mutated_region(doc, *n));
            let Some(node) = next else {
                break;
            };
            if self.restore(doc, MutatedRegion(node)) {
                restored += 1;
            } else {
                skipped.insert(node);
            }
        }
        restored
    }
}

/// Merge restored text with the text nodes the apply step split off on
/// either side, keeping `start..end` on the restored content.
fn merge_seams(doc: &mut Document, first: NodeId, last: NodeId, start: Boundary, end: Boundary) -> Range {
    let mut start = start;
    let mut end = end;

    // Trailing seam first so indices before it stay put.
    if let Some(next) = doc.next_sibling(last).filter(|n| doc.is_text(*n)) {
        if doc.is_text(last) {
            let len = doc.node_len(last);
            merge_into(doc, last, next);
            end = Boundary::new(last, len);
        }
    }

    let previous = doc.previous_sibling(first).filter(|n| doc.is_text(*n));
    if let Some(previous) = previous {
        if doc.is_text(first) {
            let offset = doc.node_len(previous);
            if end.node == first {
                end = Boundary::new(previous, offset + end.offset);
            } else if end.node == start.node {
                end.offset -= 1;
            }
            merge_into(doc, previous, first);
            start = Boundary::new(previous, offset);
        }
    }
    Range::between(start, end)
}

/// Depth of the partially selected element chains on either side of an
/// extracted range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Edges {
    left: usize,
    right: usize,
}

impl Edges {
    fn of(doc: &Document, range: &Range) -> Self {
        let container = |b: Boundary| {
            if doc.kind(b.node).is_character_data() {
                doc.parent(b.node).unwrap_or(b.node)
            } else {
                b.node
            }
        };
        let (start, end) = (container(range.start()), container(range.end()));
        if range.is_collapsed() || range.start().node == range.end().node || start == end {
            return Self::default();
        }
        let ancestor = doc.common_ancestor(&Range::between(
            Boundary::new(start, 0),
            Boundary::new(end, 0),
        ));
        Self {
            left: depth_below(doc, start, ancestor),
            right: depth_below(doc, end, ancestor),
        }
    }

    fn parse(value: &str) -> Self {
        let parsed = value
            .split_once(',')
            .and_then(|(l, r)| Some((l.trim().parse().ok()?, r.trim().parse().ok()?)));
        match parsed {
            Some((left, right)) => Self { left, right },
            None => {
                warn!(value, "Ignoring malformed edge record");
                Self::default()
            }
        }
    }

    fn is_flat(&self) -> bool {
        self.left == 0 && self.right == 0
    }
}

impl std::fmt::Display for Edges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.left, self.right)
    }
}

fn depth_below(doc: &Document, node: NodeId, ancestor: NodeId) -> usize {
    let mut depth = 0;
    let mut current = node;
    while current != ancestor {
        match doc.parent(current) {
            Some(parent) => current = parent,
            None => break,
        }
        depth += 1;
    }
    depth
}

fn same_element(doc: &Document, a: NodeId, b: NodeId) -> bool {
    matches!((doc.tag(a), doc.tag(b)), (Some(x), Some(y)) if x == y)
}

/// Pair the partial clones at either end of a restored fragment with the
/// elements they were split from, which sit on either side of the wrapper.
fn split_edges(
    doc: &Document,
    wrapper: NodeId,
    fragment: NodeId,
    edges: Edges,
) -> (Option<(NodeId, NodeId)>, Option<(NodeId, NodeId)>) {
    let parts = doc.children(fragment);
    let lead = (edges.left > 0)
        .then(|| parts.first().copied().zip(doc.previous_sibling(wrapper)))
        .flatten()
        .filter(|(clone, into)| same_element(doc, *clone, *into));
    let trail = (edges.right > 0)
        .then(|| parts.last().copied().zip(doc.next_sibling(wrapper)))
        .flatten()
        .filter(|(clone, _)| lead.is_none_or(|(first, _)| first != *clone))
        .filter(|(clone, into)| same_element(doc, *clone, *into));

    if (edges.left > 0 && lead.is_none()) || (edges.right > 0 && trail.is_none()) {
        warn!(node = wrapper.index(), %edges, "Split elements no longer beside the wrapper");
    }
    (lead, trail)
}

/// Fold a leading partial clone back into the element it was split from.
/// Returns where the restored content starts.
fn merge_leading(doc: &mut Document, into: NodeId, clone: NodeId, depth: usize) -> Result<Boundary, DomError> {
    let mut moved = doc.children(clone).to_vec();
    let mut start = None;
    if depth > 1 {
        let nested = moved.first().copied().zip(doc.children(into).last().copied());
        if let Some((nested, target)) = nested.filter(|(n, t)| same_element(doc, *n, *t)) {
            start = Some(merge_leading(doc, target, nested, depth - 1)?);
            moved.remove(0);
        }
    }

    let seam = doc.children(into).last().copied();
    let offset = doc.children(into).len();
    for child in &moved {
        doc.append_child(into, *child)?;
    }
    if let Some(start) = start {
        return Ok(start);
    }
    match (seam, moved.first().copied()) {
        (Some(seam), Some(first)) if doc.is_text(seam) && doc.is_text(first) => {
            let len = doc.node_len(seam);
            merge_into(doc, seam, first);
            Ok(Boundary::new(seam, len))
        }
        _ => Ok(Boundary::new(into, offset)),
    }
}

/// Fold a trailing partial clone back into the element it was split from.
/// Returns where the restored content ends.
fn merge_trailing(doc: &mut Document, into: NodeId, clone: NodeId, depth: usize) -> Result<Boundary, DomError> {
    let mut moved = doc.children(clone).to_vec();
    let mut end = None;
    if depth > 1 {
        let nested = moved.last().copied().zip(doc.children(into).first().copied());
        if let Some((nested, target)) = nested.filter(|(n, t)| same_element(doc, *n, *t)) {
            end = Some(merge_trailing(doc, target, nested, depth - 1)?);
            moved.pop();
        }
    }

    let reference = doc.children(into).first().copied();
    for child in &moved {
        doc.insert_before(into, *child, reference)?;
    }
    if let Some(end) = end {
        return Ok(end);
    }
    match (moved.last().copied(), reference) {
        (Some(last), Some(next)) if doc.is_text(last) && doc.is_text(next) => {
            let len = doc.node_len(last);
            merge_into(doc, last, next);
            Ok(Boundary::new(last, len))
        }
        _ => Ok(Boundary::new(into, moved.len())),
    }
}

/// Append the data of `from` to `into` and detach `from`.
fn merge_into(doc: &mut Document, into: NodeId, from: NodeId) {
    let mut data = doc.char_data(into).unwrap_or_default().to_string();
    data.push_str(doc.char_data(from).unwrap_or_default());
    doc.set_char_data(into, data);
    doc.remove(from);
}

/// Render text inside `parent`, turning line breaks into `<br>` elements.
pub(crate) fn render_lines(doc: &mut Document, parent: NodeId, text: &str) -> Result<(), DomError> {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            let br = doc.create_element("br");
            doc.append_child(parent, br)?;
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !line.is_empty() {
            let node = doc.create_text(line);
            doc.append_child(parent, node)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
